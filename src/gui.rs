// SegmentLens - gui.rs
//
// Top-level eframe::App implementation.
// Wires the sidebar navigation, menu bar, status bar and page panels
// together, and persists the session on exit.

use crate::app::session;
use crate::app::state::{AppState, Page};
use crate::core::export;
use crate::core::model::Dataset;
use crate::ui;
use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

/// The SegmentLens application.
pub struct SegmentLensApp {
    pub state: AppState,
    /// Where the session is written on exit; `None` disables persistence.
    pub session_path: Option<PathBuf>,
}

impl SegmentLensApp {
    pub fn new(state: AppState, session_path: Option<PathBuf>) -> Self {
        Self {
            state,
            session_path,
        }
    }

    /// Write the current page's filtered rows to `dest`.
    fn write_export(
        &self,
        dataset: Dataset,
        format: ExportFormat,
        dest: &Path,
    ) -> Result<usize, ExportError> {
        let file = std::fs::File::create(dest).map_err(|e| ExportError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        match (dataset, format) {
            (Dataset::Subsidiaries, ExportFormat::Csv) => {
                export::export_csv(&self.state.filtered_subsidiaries(), file, dest)
            }
            (Dataset::Subsidiaries, ExportFormat::Json) => {
                export::export_json(&self.state.filtered_subsidiaries(), file, dest)
            }
            (Dataset::ProductsServices, ExportFormat::Csv) => {
                export::export_csv(&self.state.filtered_products(), file, dest)
            }
            (Dataset::ProductsServices, ExportFormat::Json) => {
                export::export_json(&self.state.filtered_products(), file, dest)
            }
        }
    }

    fn export_page(&mut self, format: ExportFormat) {
        let Some(dataset) = self.state.page.export_dataset() else {
            return;
        };
        let ext = format.extension();
        let Some(dest) = rfd::FileDialog::new()
            .add_filter(format.label(), &[ext])
            .set_file_name(format!("{}.{ext}", dataset.name()))
            .save_file()
        else {
            return;
        };

        self.state.status_message = match self.write_export(dataset, format, &dest) {
            Ok(n) => format!("Exported {n} rows to {}.", dest.display()),
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                format!("{} export failed: {e}", format.label())
            }
        };
    }

    fn save_session(&self) {
        let Some(path) = &self.session_path else {
            return;
        };
        if let Err(e) = session::save(&self.state.to_session(), path) {
            tracing::warn!(error = %e, "Could not save session");
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let exportable = self.state.page.export_dataset().is_some()
                        && self.state.load_error.is_none();
                    ui.add_enabled_ui(exportable, |ui| {
                        ui.menu_button("Export", |ui| {
                            for format in [ExportFormat::Csv, ExportFormat::Json] {
                                if ui.button(format!("Export {}...", format.label())).clicked() {
                                    ui.close_menu();
                                    self.export_page(format);
                                }
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let label = if self.state.dark_mode {
                        "\u{2600} Light Mode"
                    } else {
                        "\u{1f319} Dark Mode"
                    };
                    if ui.button(label).clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading(
                    egui::RichText::new("Navigation")
                        .color(ui::theme::heading_colour(self.state.dark_mode)),
                );
                ui.add_space(4.0);
                for &page in Page::all() {
                    if ui
                        .selectable_label(self.state.page == page, page.label())
                        .clicked()
                        && self.state.page != page
                    {
                        tracing::debug!(page = page.slug(), "Page selected");
                        self.state.page = page;
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);
                if ui.button("\u{21bb} Reload data").clicked() {
                    self.state.reload();
                }
                match self.state.cache_age() {
                    Some(age) => ui.label(
                        egui::RichText::new(format!("Data age: {}s", age.as_secs()))
                            .small()
                            .weak(),
                    ),
                    None => ui.label(egui::RichText::new("Not loaded").small().weak()),
                };
                ui.label(
                    egui::RichText::new(self.state.loader.source_description())
                        .small()
                        .weak(),
                );

                if !self.state.config_warnings.is_empty() {
                    ui.add_space(8.0);
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Configuration warnings")
                            .strong()
                            .color(ui::theme::WARNING_TEXT),
                    );
                    for w in &self.state.config_warnings {
                        ui.label(egui::RichText::new(w.as_str()).small());
                    }
                }
            });
    }

    fn status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.status_message.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().weak());
                        ui.separator();
                    }
                    if !self.state.consistency.is_empty() {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} consistency warning(s)",
                                self.state.consistency.len()
                            ))
                            .color(ui::theme::WARNING_TEXT),
                        );
                    }
                });
            });
        });
    }
}

impl eframe::App for SegmentLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply(ctx, self.state.dark_mode, self.state.font_size);

        // Cached tables are re-fetched once their TTL lapses; wake up in time
        // to notice even when the user is idle.
        self.state.refresh();
        if self.state.load_error.is_none() {
            let ttl = self.state.loader.ttl();
            ctx.request_repaint_after(ttl.max(std::time::Duration::from_secs(1)));
        }

        self.menu_bar(ctx);
        self.status_bar(ctx);
        self.sidebar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.state.load_error {
                if ui::panels::error_banner::render(ui, error) {
                    self.state.reload();
                }
                return;
            }
            // Directory pages scroll their own card lists below the filters.
            match self.state.page {
                Page::Subsidiaries => ui::panels::subsidiaries::render(ui, &mut self.state),
                Page::ProductsServices => ui::panels::products::render(ui, &mut self.state),
                Page::BusinessSegments => ui::panels::segments::render(ui, &mut self.state),
                Page::Overview | Page::Analytics => {
                    egui::ScrollArea::vertical()
                        .id_salt(self.state.page.slug())
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            if self.state.page == Page::Overview {
                                ui::panels::overview::render(ui, &self.state);
                            } else {
                                ui::panels::analytics::render(ui, &self.state);
                            }
                        });
                }
            }
        });

        ui::panels::about::render(ctx, &mut self.state);
    }

    /// Called by eframe when the application window is about to close.
    ///
    /// Saves the current session so the next launch can restore it.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_session();
    }
}
