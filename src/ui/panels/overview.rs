// SegmentLens - ui/panels/overview.rs
//
// Overview page: headline metrics, segment and category distributions,
// subsidiaries vs products per segment, and the most recent updates.

use crate::app::state::AppState;
use crate::core::aggregate;
use crate::core::model::Column;
use crate::ui::charts::{self, Bar, Group};
use crate::ui::{theme, widgets};
use crate::util::constants;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let dark = state.dark_mode;
    let subsidiaries = state.subsidiaries.as_slice();
    let products = state.products.as_slice();

    widgets::page_header(ui, "Group Subsidiaries Analysis");
    ui.label("Subsidiary structure, products and services across all business segments.");
    ui.add_space(8.0);

    let metrics = aggregate::overview_metrics(subsidiaries, products);
    widgets::metric_row(
        ui,
        &[
            ("Total Subsidiaries", metrics.total_subsidiaries),
            ("Business Segments", metrics.business_segments),
            ("Product Categories", metrics.product_categories),
            ("Total Products/Services", metrics.total_products),
        ],
        dark,
    );

    ui.columns(2, |cols| {
        widgets::section_header(&mut cols[0], "Subsidiaries by Business Segment", dark);
        let segments = aggregate::count_by_category(subsidiaries, Column::BusinessSegment);
        let bars: Vec<Bar> = segments
            .iter()
            .enumerate()
            .map(|(i, c)| Bar {
                label: &c.value,
                value: c.count as f64,
                colour: theme::segment_colour(i),
            })
            .collect();
        let total = subsidiaries.len().max(1) as f64;
        charts::horizontal_bars(&mut cols[0], "Distribution of Subsidiaries", &bars, |v| {
            format!("{v} ({:.0}%)", v / total * 100.0)
        });

        widgets::section_header(&mut cols[1], "Products/Services by Category", dark);
        let top = aggregate::top_n(products, Column::ProductServiceCategory, constants::TOP_CATEGORIES);
        let max = top.first().map_or(1, |c| c.count) as f32;
        let bars: Vec<Bar> = top
            .iter()
            .map(|c| Bar {
                label: &c.value,
                value: c.count as f64,
                colour: theme::blues(c.count as f32 / max),
            })
            .collect();
        charts::horizontal_bars(&mut cols[1], "Top Product/Service Categories", &bars, |v| {
            format!("{v}")
        });
    });

    widgets::section_header(ui, "Business Segment Analysis", dark);
    let overview = aggregate::segment_overview(subsidiaries, products);
    let groups: Vec<Group> = overview
        .iter()
        .map(|s| Group {
            label: &s.business_segment,
            values: [s.subsidiary_count as f64, s.product_count as f64],
        })
        .collect();
    charts::grouped_bars(
        ui,
        "Subsidiaries and Products by Business Segment",
        [("Subsidiaries", theme::PRIMARY), ("Products/Services", theme::LIGHT_BLUE)],
        &groups,
    );
    egui::Grid::new("segment_overview_grid")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui| {
            ui.strong("Business Segment");
            ui.strong("Subsidiaries");
            ui.strong("With Website");
            ui.strong("Products/Services");
            ui.end_row();
            for row in &overview {
                ui.label(row.business_segment.as_str());
                ui.label(row.subsidiary_count.to_string());
                ui.label(row.with_website.to_string());
                ui.label(row.product_count.to_string());
                ui.end_row();
            }
        });

    widgets::section_header(ui, "Recent Updates", dark);
    let recent = aggregate::latest_updated(
        subsidiaries,
        Column::LastUpdated,
        constants::RECENT_UPDATES_ROWS,
    );
    egui::Grid::new("recent_updates_grid")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            ui.strong(Column::CompanyName.label());
            ui.strong(Column::BusinessSegment.label());
            ui.strong(Column::LastUpdated.label());
            ui.end_row();
            for s in recent {
                ui.label(s.company_name.as_str());
                ui.label(s.business_segment.as_str());
                ui.label(s.last_updated.format("%Y-%m-%d").to_string());
                ui.end_row();
            }
        });
}
