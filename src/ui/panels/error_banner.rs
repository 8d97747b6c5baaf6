// SegmentLens - ui/panels/error_banner.rs
//
// Page-level banner shown in place of page content when a dataset failed
// to load. Navigation and "Reload data" stay usable.

use crate::ui::theme;
use crate::util::error::DataSourceError;

/// Render the banner for `error`. Returns true if the user asked to reload.
pub fn render(ui: &mut egui::Ui, error: &DataSourceError) -> bool {
    let mut reload = false;
    egui::Frame::new()
        .fill(theme::ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, theme::ERROR_TEXT))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new("Error loading data")
                    .strong()
                    .size(18.0)
                    .color(theme::ERROR_TEXT),
            );
            ui.add_space(4.0);
            ui.label(error.to_string());

            // Full cause chain, innermost last.
            let mut source = std::error::Error::source(error);
            while let Some(cause) = source {
                ui.label(egui::RichText::new(format!("caused by: {cause}")).small().weak());
                source = cause.source();
            }

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Troubleshooting:").strong());
            for (i, step) in error.remediation().iter().enumerate() {
                ui.label(format!("{}. {step}", i + 1));
            }

            ui.add_space(8.0);
            if ui.button("\u{27f3} Reload data").clicked() {
                reload = true;
            }
        });
    reload
}
