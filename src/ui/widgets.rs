// SegmentLens - ui/widgets.rs
//
// Small reusable widgets shared by the pages: page and section headers,
// metric tiles, multi-select filters and the "Showing X of N" line.

use crate::core::filter::FilterState;
use crate::core::model::{Column, ResultCount};
use crate::ui::theme;

/// Page title in the brand colour.
pub fn page_header(ui: &mut egui::Ui, title: &str) {
    ui.label(
        egui::RichText::new(title)
            .heading()
            .strong()
            .color(theme::PRIMARY),
    );
    ui.add_space(4.0);
}

/// Section heading with an underline rule.
pub fn section_header(ui: &mut egui::Ui, title: &str, dark_mode: bool) {
    ui.add_space(10.0);
    ui.label(
        egui::RichText::new(title)
            .size(egui::TextStyle::Body.resolve(ui.style()).size * 1.25)
            .strong()
            .color(theme::heading_colour(dark_mode)),
    );
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 2.0),
        egui::Sense::hover(),
    );
    ui.painter().rect_filled(rect, 0.0, theme::PRIMARY);
    ui.add_space(4.0);
}

/// A framed tile showing one headline number.
pub fn metric_tile(ui: &mut egui::Ui, label: &str, value: impl std::fmt::Display, dark_mode: bool) {
    egui::Frame::new()
        .fill(theme::card_fill(dark_mode))
        .stroke(egui::Stroke::new(1.0, theme::card_stroke(dark_mode)))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_min_width(theme::TILE_MIN_WIDTH);
            ui.label(egui::RichText::new(label).small().weak());
            ui.label(
                egui::RichText::new(value.to_string())
                    .size(26.0)
                    .strong()
                    .color(theme::heading_colour(dark_mode)),
            );
        });
}

/// A row of metric tiles.
pub fn metric_row(ui: &mut egui::Ui, tiles: &[(&str, usize)], dark_mode: bool) {
    ui.horizontal_wrapped(|ui| {
        for (label, value) in tiles {
            metric_tile(ui, label, value, dark_mode);
        }
    });
}

/// Framed card used for one subsidiary or product.
pub fn card<R>(ui: &mut egui::Ui, dark_mode: bool, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::new()
        .fill(theme::card_fill(dark_mode))
        .stroke(egui::Stroke::new(1.0, theme::card_stroke(dark_mode)))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

/// "Label: value" line; absent values render as a weak placeholder.
pub fn field(ui: &mut egui::Ui, label: &str, value: Option<&str>) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(format!("{label}:")).strong());
        match value {
            Some(v) => ui.label(v),
            None => ui.label(egui::RichText::new("not available").weak().italics()),
        };
    });
}

/// Multi-select over the values of `column`, backed by the filter's
/// permitted set. Returns true if the selection changed.
///
/// "All" removes the constraint; "None" installs an empty permitted set,
/// which excludes every row.
pub fn multi_select(
    ui: &mut egui::Ui,
    label: &str,
    column: Column,
    options: &[String],
    filter: &mut FilterState,
) -> bool {
    let selected = options
        .iter()
        .filter(|o| filter.permits(column, o))
        .count();
    let summary = if !filter.include.contains_key(&column) {
        format!("{label}: all")
    } else {
        format!("{label}: {selected} of {}", options.len())
    };

    let mut changed = false;
    ui.menu_button(summary, |ui| {
        ui.horizontal(|ui| {
            if ui.small_button("All").clicked() {
                filter.unrestrict(column);
                changed = true;
            }
            if ui.small_button("None").clicked() {
                filter.restrict(column, Vec::new());
                changed = true;
            }
        });
        ui.separator();
        egui::ScrollArea::vertical()
            .max_height(320.0)
            .show(ui, |ui| {
                for option in options {
                    let mut checked = filter.permits(column, option);
                    if ui.checkbox(&mut checked, option.as_str()).changed() {
                        filter.toggle(column, option, options);
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Free-text search box. Returns true if the text changed.
pub fn search_box(ui: &mut egui::Ui, hint: &str, text: &mut String) -> bool {
    let response = ui.add(
        egui::TextEdit::singleline(text)
            .hint_text(hint)
            .desired_width(260.0),
    );
    let mut changed = response.changed();
    if !text.is_empty() && ui.small_button("\u{2715}").on_hover_text("Clear search").clicked() {
        text.clear();
        changed = true;
    }
    changed
}

/// "Showing X of N noun", plus an explicit notice when nothing matches.
/// Returns false when the view is empty and the caller should stop.
pub fn result_count(ui: &mut egui::Ui, count: ResultCount, noun: &str) -> bool {
    ui.label(egui::RichText::new(count.label(noun)).strong());
    match count.warning() {
        Some(warning) => {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(warning.to_string()).color(theme::WARNING_TEXT));
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_widgets_report_no_change_without_input() {
        let ctx = egui::Context::default();
        let options = vec!["Diagnostics".to_string(), "Pharma".to_string()];
        let mut filter = FilterState::default();
        let mut text = String::from("roche");
        let mut reported = Vec::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                reported.push(multi_select(
                    ui,
                    "Business Segment",
                    Column::BusinessSegment,
                    &options,
                    &mut filter,
                ));
                reported.push(search_box(ui, "Search", &mut text));
            });
        });

        assert_eq!(reported, [false, false]);
        assert!(filter.is_empty());
        assert_eq!(text, "roche");
    }
}
