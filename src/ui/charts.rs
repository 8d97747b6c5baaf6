// SegmentLens - ui/charts.rs
//
// Static charts drawn directly with the egui painter: horizontal bars,
// grouped vertical bars and a bubble plot. No interaction beyond layout.

use crate::ui::theme;
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke};

/// One bar of a horizontal bar chart.
pub struct Bar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub colour: Color32,
}

/// One group of a grouped bar chart: a label and one value per series.
pub struct Group<'a> {
    pub label: &'a str,
    pub values: [f64; 2],
}

/// One point of a bubble plot. `size` drives the radius.
pub struct Bubble<'a> {
    pub label: &'a str,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub colour: Color32,
}

fn small_font(ui: &egui::Ui) -> FontId {
    egui::TextStyle::Small.resolve(ui.style())
}

fn body_font(ui: &egui::Ui) -> FontId {
    egui::TextStyle::Body.resolve(ui.style())
}

/// Shorten `s` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}

/// Round `v` up to 1, 2, 5 or 10 times a power of ten, for axis maxima.
fn nice_ceiling(v: f64) -> f64 {
    if v <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(v.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|m| m * magnitude >= v)
        .unwrap_or(10.0);
    step * magnitude
}

fn chart_title(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).strong());
}

fn no_data(ui: &mut egui::Ui) {
    ui.label(egui::RichText::new("No data to chart.").weak().italics());
}

/// Horizontal bars, one row per item, scaled to the largest value.
pub fn horizontal_bars(
    ui: &mut egui::Ui,
    title: &str,
    bars: &[Bar<'_>],
    value_text: impl Fn(f64) -> String,
) {
    chart_title(ui, title);
    if bars.is_empty() {
        no_data(ui);
        return;
    }

    let width = ui.available_width();
    let label_width = (width * 0.35).clamp(80.0, 240.0);
    let value_margin = 56.0;
    let bar_space = (width - label_width - value_margin).max(10.0);
    let row = theme::BAR_ROW_HEIGHT;
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);

    let (rect, _) = ui.allocate_exact_size(vec2(width, bars.len() as f32 * row), Sense::hover());
    let painter = ui.painter_at(rect);
    let font = body_font(ui);
    let text = ui.visuals().text_color();
    let max_label_chars = (label_width / 7.0) as usize;

    for (i, bar) in bars.iter().enumerate() {
        let top = rect.top() + i as f32 * row;
        let centre_y = top + row / 2.0;
        painter.text(
            pos2(rect.left() + label_width - 6.0, centre_y),
            Align2::RIGHT_CENTER,
            truncate(bar.label, max_label_chars),
            font.clone(),
            text,
        );

        let len = if max > 0.0 {
            (bar.value / max) as f32 * bar_space
        } else {
            0.0
        };
        let bar_rect = Rect::from_min_size(
            pos2(rect.left() + label_width, top + 3.0),
            vec2(len, row - 6.0),
        );
        painter.rect_filled(bar_rect, 2.0, bar.colour);
        painter.text(
            pos2(bar_rect.right() + 4.0, centre_y),
            Align2::LEFT_CENTER,
            value_text(bar.value),
            font.clone(),
            text,
        );
    }
    ui.add_space(6.0);
}

/// Vertical bars, two series side by side per group, with a legend.
pub fn grouped_bars(
    ui: &mut egui::Ui,
    title: &str,
    series: [(&str, Color32); 2],
    groups: &[Group<'_>],
) {
    chart_title(ui, title);
    if groups.is_empty() {
        no_data(ui);
        return;
    }

    ui.horizontal(|ui| {
        for (name, colour) in series {
            let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, colour);
            ui.label(name);
            ui.add_space(8.0);
        }
    });

    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(vec2(width, theme::CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let small = small_font(ui);
    let text = ui.visuals().text_color();
    let axis = Stroke::new(1.0, ui.visuals().weak_text_color());

    let label_band = 20.0;
    let axis_left = rect.left() + 36.0;
    let plot = Rect::from_min_max(
        pos2(axis_left, rect.top() + 14.0),
        pos2(rect.right() - 4.0, rect.bottom() - label_band),
    );
    let max = nice_ceiling(
        groups
            .iter()
            .flat_map(|g| g.values)
            .fold(0.0, f64::max),
    );

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);
    for tick in [0.0, 0.5, 1.0] {
        let y = plot.bottom() - tick * plot.height();
        painter.text(
            pos2(plot.left() - 4.0, y),
            Align2::RIGHT_CENTER,
            format!("{}", (max * tick as f64).round()),
            small.clone(),
            text,
        );
    }

    let slot = plot.width() / groups.len() as f32;
    let bar_width = (slot * 0.35).min(40.0);
    let max_label_chars = (slot / 6.0).max(3.0) as usize;

    for (i, group) in groups.iter().enumerate() {
        let centre_x = plot.left() + slot * (i as f32 + 0.5);
        for (s, value) in group.values.iter().enumerate() {
            let h = (*value / max) as f32 * plot.height();
            let left = centre_x - bar_width + s as f32 * bar_width;
            let bar = Rect::from_min_max(
                pos2(left, plot.bottom() - h),
                pos2(left + bar_width - 2.0, plot.bottom()),
            );
            painter.rect_filled(bar, 2.0, series[s].1);
            painter.text(
                pos2(bar.center().x, bar.top() - 2.0),
                Align2::CENTER_BOTTOM,
                format!("{value}"),
                small.clone(),
                text,
            );
        }
        painter.text(
            pos2(centre_x, plot.bottom() + 3.0),
            Align2::CENTER_TOP,
            truncate(group.label, max_label_chars),
            small.clone(),
            text,
        );
    }
    ui.add_space(6.0);
}

/// Scatter of labelled bubbles on linear axes starting at zero.
pub fn bubble_plot(
    ui: &mut egui::Ui,
    title: &str,
    axis_labels: (&str, &str),
    bubbles: &[Bubble<'_>],
) {
    chart_title(ui, title);
    if bubbles.is_empty() {
        no_data(ui);
        return;
    }

    let width = ui.available_width();
    let (rect, _) =
        ui.allocate_exact_size(vec2(width, theme::CHART_HEIGHT + 40.0), Sense::hover());
    let painter = ui.painter_at(rect);
    let small = small_font(ui);
    let text = ui.visuals().text_color();
    let axis = Stroke::new(1.0, ui.visuals().weak_text_color());

    let plot = Rect::from_min_max(
        pos2(rect.left() + 48.0, rect.top() + 10.0),
        pos2(rect.right() - 24.0, rect.bottom() - 36.0),
    );
    let max_x = nice_ceiling(bubbles.iter().map(|b| b.x).fold(0.0, f64::max));
    let max_y = nice_ceiling(bubbles.iter().map(|b| b.y).fold(0.0, f64::max));
    let max_size = bubbles.iter().map(|b| b.size).fold(0.0, f64::max);

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);
    for tick in [0.0, 0.5, 1.0] {
        painter.text(
            pos2(plot.left() + tick * plot.width(), plot.bottom() + 3.0),
            Align2::CENTER_TOP,
            format!("{}", max_x * tick as f64),
            small.clone(),
            text,
        );
        painter.text(
            pos2(plot.left() - 4.0, plot.bottom() - tick * plot.height()),
            Align2::RIGHT_CENTER,
            format!("{}", max_y * tick as f64),
            small.clone(),
            text,
        );
    }
    painter.text(
        pos2(plot.center().x, rect.bottom() - 2.0),
        Align2::CENTER_BOTTOM,
        axis_labels.0,
        small.clone(),
        text,
    );
    painter.text(
        pos2(rect.left() + 2.0, plot.top()),
        Align2::LEFT_TOP,
        axis_labels.1,
        small.clone(),
        text,
    );

    for bubble in bubbles {
        let centre = pos2(
            plot.left() + (bubble.x / max_x) as f32 * plot.width(),
            plot.bottom() - (bubble.y / max_y) as f32 * plot.height(),
        );
        let radius = if max_size > 0.0 {
            6.0 + 18.0 * (bubble.size / max_size).sqrt() as f32
        } else {
            6.0
        };
        painter.circle_filled(centre, radius, bubble.colour.gamma_multiply(0.75));
        painter.circle_stroke(centre, radius, Stroke::new(1.0, bubble.colour));
        painter.text(
            pos2(centre.x + radius + 3.0, centre.y),
            Align2::LEFT_CENTER,
            bubble.label,
            small.clone(),
            text,
        );
    }
    ui.add_space(6.0);
}
