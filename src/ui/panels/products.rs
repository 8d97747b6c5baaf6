// SegmentLens - ui/panels/products.rs
//
// Products & services catalogue: segment and category multi-selects,
// free-text search, result count, and one collapsible group per category
// in first-seen order.

use crate::app::state::AppState;
use crate::core::aggregate;
use crate::core::filter::{self, FilterState};
use crate::core::model::{Column, ProductService};
use crate::ui::widgets;
use crate::util::constants;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    widgets::page_header(ui, "Products & Services Catalog");

    let segments = aggregate::distinct_values(&state.products, Column::BusinessSegment);
    let categories =
        aggregate::distinct_values(&state.products, Column::ProductServiceCategory);
    ui.horizontal_wrapped(|ui| {
        for (label, column, options) in [
            ("Business Segment", Column::BusinessSegment, &segments),
            ("Product Category", Column::ProductServiceCategory, &categories),
        ] {
            if widgets::multi_select(ui, label, column, options, &mut state.product_filter) {
                tracing::debug!(%column, "Product filter changed");
            }
        }
        ui.add_space(12.0);
        if widgets::search_box(
            ui,
            "Enter product name or feature\u{2026}",
            &mut state.product_filter.text_search,
        ) {
            tracing::debug!("Product search changed");
        }
    });
    ui.add_space(6.0);

    if !widgets::result_count(ui, state.product_count(), "products/services") {
        return;
    }
    ui.add_space(6.0);

    let dark = state.dark_mode;
    let filtered = state.filtered_products();
    egui::ScrollArea::vertical()
        .id_salt("product_groups")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for category in aggregate::distinct_values(&filtered, Column::ProductServiceCategory) {
                let in_category: Vec<&ProductService> = filter::apply_filters(
                    &filtered,
                    &FilterState::only(Column::ProductServiceCategory, &category),
                )
                .into_iter()
                .map(|i| filtered[i])
                .collect();

                egui::CollapsingHeader::new(
                    egui::RichText::new(format!("{category} ({} items)", in_category.len()))
                        .strong(),
                )
                .id_salt(("category", category.as_str()))
                .default_open(true)
                .show(ui, |ui| {
                    for product in in_category.iter().take(constants::MAX_CARDS_PER_GROUP) {
                        product_card(ui, product, dark);
                        ui.add_space(4.0);
                    }
                    let hidden = in_category.len().saturating_sub(constants::MAX_CARDS_PER_GROUP);
                    if hidden > 0 {
                        ui.label(
                            egui::RichText::new(format!(
                                "\u{2026} and {hidden} more; refine the filters to see them"
                            ))
                            .weak(),
                        );
                    }
                });
            }
        });
}

fn product_card(ui: &mut egui::Ui, p: &ProductService, dark: bool) {
    widgets::card(ui, dark, |ui| {
        ui.label(egui::RichText::new(&p.product_service_name).size(16.0).strong());
        ui.columns(2, |cols| {
            let ui = &mut cols[0];
            widgets::field(ui, Column::SubsidiaryName.label(), Some(p.subsidiary_name.as_str()));
            widgets::field(ui, Column::Description.label(), p.description.as_deref());
            widgets::field(ui, Column::KeyFeatures.label(), p.key_features.as_deref());

            let ui = &mut cols[1];
            widgets::field(ui, Column::TargetMarket.label(), p.target_market.as_deref());
            if let Some(url) = &p.product_url {
                ui.hyperlink_to("\u{1f517} Product Info", url);
            }
        });
    });
}
