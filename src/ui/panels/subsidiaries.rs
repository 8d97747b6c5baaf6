// SegmentLens - ui/panels/subsidiaries.rs
//
// Subsidiaries directory: segment multi-select, free-text search, result
// count and one card per matching subsidiary in table order.

use crate::app::state::AppState;
use crate::core::aggregate;
use crate::core::model::{Column, Subsidiary};
use crate::ui::widgets;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    widgets::page_header(ui, "Subsidiaries Directory");

    let segments = aggregate::distinct_values(&state.subsidiaries, Column::BusinessSegment);
    ui.horizontal_wrapped(|ui| {
        if widgets::multi_select(
            ui,
            "Business Segment",
            Column::BusinessSegment,
            &segments,
            &mut state.subsidiary_filter,
        ) {
            tracing::debug!(column = %Column::BusinessSegment, "Subsidiary filter changed");
        }
        ui.add_space(12.0);
        if widgets::search_box(
            ui,
            "Enter company name or description\u{2026}",
            &mut state.subsidiary_filter.text_search,
        ) {
            tracing::debug!("Subsidiary search changed");
        }
    });
    ui.add_space(6.0);

    if !widgets::result_count(ui, state.subsidiary_count(), "subsidiaries") {
        return;
    }
    ui.add_space(6.0);

    let dark = state.dark_mode;
    egui::ScrollArea::vertical()
        .id_salt("subsidiary_cards")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for subsidiary in state.filtered_subsidiaries() {
                subsidiary_card(ui, subsidiary, dark);
                ui.add_space(6.0);
            }
        });
}

fn subsidiary_card(ui: &mut egui::Ui, s: &Subsidiary, dark: bool) {
    widgets::card(ui, dark, |ui| {
        ui.label(egui::RichText::new(&s.company_name).size(18.0).strong());
        ui.columns(2, |cols| {
            let ui = &mut cols[0];
            widgets::field(ui, Column::BusinessSegment.label(), Some(s.business_segment.as_str()));
            widgets::field(ui, Column::Description.label(), s.description.as_deref());
            widgets::field(
                ui,
                Column::KeyProductsServices.label(),
                s.key_products_services.as_deref(),
            );
            widgets::field(ui, Column::MarketPosition.label(), s.market_position.as_deref());

            let ui = &mut cols[1];
            if let Some(url) = &s.website_url {
                ui.hyperlink_to("\u{1f310} Visit Website", url);
            }
            ui.label(format!("Created: {}", s.created_date.format("%Y-%m-%d")));
            ui.label(format!("Updated: {}", s.last_updated.format("%Y-%m-%d")));
        });
    });
}
