// SegmentLens - ui/theme.rs
//
// Colour scheme, chart palette, visuals and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Primary brand blue.
pub const PRIMARY: Color32 = Color32::from_rgb(0, 102, 204); // #0066CC
/// Dark navy used for headings in light mode.
pub const NAVY: Color32 = Color32::from_rgb(0, 51, 102); // #003366
/// Light blue for the secondary series of grouped bars.
pub const LIGHT_BLUE: Color32 = Color32::from_rgb(102, 178, 255); // #66B2FF

/// Categorical palette for per-segment series, cycled by index.
pub const SEGMENT_PALETTE: [Color32; 6] = [
    PRIMARY,
    NAVY,
    LIGHT_BLUE,
    Color32::from_rgb(0, 68, 153),   // #004499
    Color32::from_rgb(0, 128, 255),  // #0080FF
    Color32::from_rgb(17, 119, 221), // #1177DD
];

/// Palette colour for the `index`-th series.
pub fn segment_colour(index: usize) -> Color32 {
    SEGMENT_PALETTE[index % SEGMENT_PALETTE.len()]
}

/// Sequential blue scale: `t` in 0..=1 maps light to dark.
pub fn blues(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f32, b: f32| (a + (b - a) * t).round() as u8;
    Color32::from_rgb(lerp(198.0, 8.0), lerp(219.0, 48.0), lerp(239.0, 107.0))
}

/// Heading colour readable on the current background.
pub fn heading_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        LIGHT_BLUE
    } else {
        NAVY
    }
}

/// Background of metric tiles and cards.
pub fn card_fill(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(31, 41, 55) // Gray 800
    } else {
        Color32::from_rgb(248, 249, 250) // #f8f9fa
    }
}

/// Border of metric tiles and cards.
pub fn card_stroke(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(55, 65, 81) // Gray 700
    } else {
        Color32::from_rgb(222, 226, 230) // #dee2e6
    }
}

/// Error banner colours.
pub const ERROR_FILL: Color32 = Color32::from_rgba_premultiplied(185, 28, 28, 40);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(239, 68, 68); // Red 500
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Apply the dark/light visuals and body font size to the context.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    let mut visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.selection.bg_fill = PRIMARY;
    visuals.hyperlink_color = if dark_mode { LIGHT_BLUE } else { PRIMARY };
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        use egui::{FontFamily, FontId, TextStyle};
        style.text_styles = [
            (TextStyle::Heading, FontId::new(font_size * 1.6, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(font_size, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(font_size, FontFamily::Proportional)),
            (TextStyle::Small, FontId::new(font_size * 0.8, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(font_size * 0.9, FontFamily::Monospace)),
        ]
        .into();
    });
}

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 230.0;
pub const CHART_HEIGHT: f32 = 260.0;
pub const BAR_ROW_HEIGHT: f32 = 22.0;
pub const TILE_MIN_WIDTH: f32 = 150.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(segment_colour(0), PRIMARY);
        assert_eq!(segment_colour(SEGMENT_PALETTE.len()), PRIMARY);
    }

    #[test]
    fn test_blues_endpoints() {
        assert_eq!(blues(0.0), Color32::from_rgb(198, 219, 239));
        assert_eq!(blues(1.0), Color32::from_rgb(8, 48, 107));
        assert_eq!(blues(7.0), blues(1.0));
    }
}
