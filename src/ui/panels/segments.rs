// SegmentLens - ui/panels/segments.rs
//
// Business Segments page: one segment at a time, with its metrics, its
// subsidiaries and the product categories offered in it.

use crate::app::state::AppState;
use crate::core::aggregate;
use crate::core::model::ResultCount;
use crate::ui::charts::{self, Bar};
use crate::ui::{theme, widgets};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let dark = state.dark_mode;
    widgets::page_header(ui, "Business Segments Analysis");

    let segments = state.segments();
    let Some(active) = state.active_segment() else {
        ui.label(egui::RichText::new("No business segments in the loaded data.").weak());
        return;
    };

    let mut chosen = active.clone();
    egui::ComboBox::from_label("Select Business Segment")
        .selected_text(chosen.as_str())
        .show_ui(ui, |ui| {
            for segment in &segments {
                ui.selectable_value(&mut chosen, segment.clone(), segment.as_str());
            }
        });
    if chosen != active {
        tracing::debug!(segment = %chosen, "Business segment selected");
        state.selected_segment = Some(chosen.clone());
    }

    let detail = aggregate::segment_detail(&state.subsidiaries, &state.products, &chosen);
    ui.add_space(6.0);
    widgets::metric_row(
        ui,
        &[
            ("Subsidiaries", detail.subsidiaries.len()),
            ("Products/Services", detail.products.len()),
            ("Product Categories", detail.distinct_category_count),
        ],
        dark,
    );

    egui::ScrollArea::vertical()
        .id_salt("segment_detail")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            widgets::section_header(ui, &format!("{chosen} - Subsidiaries"), dark);
            let count = ResultCount::new(detail.subsidiaries.len(), state.subsidiaries.len());
            if widgets::result_count(ui, count, "subsidiaries") {
                for s in &detail.subsidiaries {
                    widgets::card(ui, dark, |ui| {
                        ui.label(egui::RichText::new(&s.company_name).strong());
                        if let Some(description) = &s.description {
                            ui.label(description.as_str());
                        }
                        if let Some(position) = &s.market_position {
                            ui.label(
                                egui::RichText::new(format!("Market Position: {position}"))
                                    .italics(),
                            );
                        }
                        if let Some(url) = &s.website_url {
                            ui.hyperlink_to("Visit Website", url);
                        }
                    });
                    ui.add_space(4.0);
                }
            }

            widgets::section_header(ui, &format!("{chosen} - Product Categories"), dark);
            let count = ResultCount::new(detail.products.len(), state.products.len());
            if !widgets::result_count(ui, count, "products/services") {
                return;
            }
            let max = detail.category_counts.first().map_or(1, |c| c.count) as f32;
            let bars: Vec<Bar> = detail
                .category_counts
                .iter()
                .map(|c| Bar {
                    label: &c.value,
                    value: c.count as f64,
                    colour: theme::blues(c.count as f32 / max),
                })
                .collect();
            charts::horizontal_bars(
                ui,
                &format!("Product Categories in {chosen}"),
                &bars,
                |v| format!("{v}"),
            );
        });
}
