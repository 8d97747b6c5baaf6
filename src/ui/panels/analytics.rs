// SegmentLens - ui/panels/analytics.rs
//
// Analytics page: field completeness of both tables, the cross-segment
// bubble plot, summary statistics, top categories and data consistency.

use crate::app::state::AppState;
use crate::core::aggregate::{self, FieldCompleteness, SummaryStats};
use crate::core::model::Column;
use crate::ui::charts::{self, Bar, Bubble};
use crate::ui::{theme, widgets};
use crate::util::constants;

/// Columns whose completeness is reported, per table.
const SUBSIDIARY_QUALITY_COLUMNS: &[Column] = &[
    Column::CompanyName,
    Column::Description,
    Column::MarketPosition,
    Column::WebsiteUrl,
];
const PRODUCT_QUALITY_COLUMNS: &[Column] = &[
    Column::ProductServiceName,
    Column::Description,
    Column::TargetMarket,
    Column::ProductUrl,
];

fn completeness_chart(ui: &mut egui::Ui, title: &str, fields: &[FieldCompleteness]) {
    let bars: Vec<Bar> = fields
        .iter()
        .map(|f| Bar {
            label: f.column.label(),
            value: f.percent,
            colour: theme::blues(f.percent as f32 / 100.0),
        })
        .collect();
    charts::horizontal_bars(ui, title, &bars, |v| format!("{v:.1}%"));
}

fn stat_cell(ui: &mut egui::Ui, value: Option<f64>) {
    match value {
        Some(v) => ui.label(format!("{v:.2}")),
        None => ui.label(egui::RichText::new("-").weak()),
    };
}

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let dark = state.dark_mode;
    let subsidiaries = state.subsidiaries.as_slice();
    let products = state.products.as_slice();

    widgets::page_header(ui, "Analytics & Insights");

    widgets::section_header(ui, "Data Quality Metrics", dark);
    ui.columns(2, |cols| {
        completeness_chart(
            &mut cols[0],
            "Subsidiaries Data Completeness (%)",
            &aggregate::completeness(subsidiaries, SUBSIDIARY_QUALITY_COLUMNS),
        );
        completeness_chart(
            &mut cols[1],
            "Products Data Completeness (%)",
            &aggregate::completeness(products, PRODUCT_QUALITY_COLUMNS),
        );
    });

    widgets::section_header(ui, "Cross-Segment Analysis", dark);
    let summary = aggregate::cross_segment_summary(subsidiaries, products);
    let bubbles: Vec<Bubble> = summary
        .iter()
        .enumerate()
        .map(|(i, s)| Bubble {
            label: &s.business_segment,
            x: s.subsidiary_count as f64,
            y: s.product_count as f64,
            size: s.distinct_category_count as f64,
            colour: theme::segment_colour(i),
        })
        .collect();
    charts::bubble_plot(
        ui,
        "Business Segment Portfolio Analysis",
        ("Number of Subsidiaries", "Number of Products/Services"),
        &bubbles,
    );
    egui::Grid::new("cross_segment_grid")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            ui.strong("Business Segment");
            ui.strong("Subsidiaries");
            ui.strong("Products/Services");
            ui.strong("Categories");
            ui.strong("Products per Subsidiary");
            ui.end_row();
            for s in &summary {
                ui.label(s.business_segment.as_str());
                ui.label(s.subsidiary_count.to_string());
                ui.label(s.product_count.to_string());
                ui.label(s.distinct_category_count.to_string());
                ui.label(format!("{:.2}", s.products_per_subsidiary));
                ui.end_row();
            }
        });

    widgets::section_header(ui, "Summary Statistics", dark);
    let stats = aggregate::segment_statistics(&summary);
    ui.columns(2, |cols| {
        cols[0].label(egui::RichText::new("Segment Statistics").strong());
        egui::Grid::new("summary_stats_grid")
            .striped(true)
            .num_columns(4)
            .show(&mut cols[0], |ui| {
                let columns: [(&str, &SummaryStats); 3] = [
                    ("Subsidiaries", &stats.subsidiary_count),
                    ("Products", &stats.product_count),
                    ("Categories", &stats.category_count),
                ];
                ui.label("");
                for (name, _) in &columns {
                    ui.strong(*name);
                }
                ui.end_row();

                ui.label("count");
                for (_, s) in &columns {
                    ui.label(s.count.to_string());
                }
                ui.end_row();

                let rows: [(&str, fn(&SummaryStats) -> Option<f64>); 7] = [
                    ("mean", |s| s.mean),
                    ("std", |s| s.std),
                    ("min", |s| s.min),
                    ("25%", |s| s.p25),
                    ("50%", |s| s.p50),
                    ("75%", |s| s.p75),
                    ("max", |s| s.max),
                ];
                for (label, get) in rows {
                    ui.label(label);
                    for (_, s) in &columns {
                        stat_cell(ui, get(s));
                    }
                    ui.end_row();
                }
            });

        cols[1].label(egui::RichText::new("Top Product Categories").strong());
        let top = aggregate::top_n(products, Column::ProductServiceCategory, constants::TOP_CATEGORIES);
        egui::Grid::new("top_categories_grid")
            .striped(true)
            .num_columns(2)
            .show(&mut cols[1], |ui| {
                ui.strong(Column::ProductServiceCategory.label());
                ui.strong("Count");
                ui.end_row();
                for c in &top {
                    ui.label(c.value.as_str());
                    ui.label(c.count.to_string());
                    ui.end_row();
                }
            });
    });

    widgets::section_header(ui, "Data Consistency", dark);
    if state.consistency.is_empty() {
        ui.label("Every product references a known subsidiary in the same business segment.");
    } else {
        ui.label(
            egui::RichText::new(format!(
                "{} product(s) disagree with the subsidiaries table:",
                state.consistency.len()
            ))
            .color(theme::WARNING_TEXT),
        );
        egui::CollapsingHeader::new("Show details")
            .id_salt("consistency_details")
            .show(ui, |ui| {
                for issue in &state.consistency {
                    ui.label(format!("\u{2022} {issue}"));
                }
            });
    }
}
