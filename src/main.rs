// SegmentLens - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Data source construction and the dataset cache
// 4. Either the headless JSON report or the eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use segmentlens::app;

pub use segmentlens::core;
pub use segmentlens::platform;
pub use segmentlens::ui;
pub use segmentlens::util;

use clap::Parser;
use platform::config::{AppConfig, DataSourceConfig};
use std::path::PathBuf;
use std::time::Duration;

/// SegmentLens - business-segment dashboard.
///
/// Browse a group's subsidiaries and their products and services by
/// business segment, from a SQLite database or a directory of CSV files.
#[derive(Parser, Debug)]
#[command(name = "SegmentLens", version, about)]
struct Cli {
    /// SQLite database to read (overrides config.toml).
    #[arg(long = "sqlite", conflicts_with = "csv_dir")]
    sqlite: Option<PathBuf>,

    /// Directory holding subsidiaries.csv and products_services.csv.
    #[arg(long = "csv-dir")]
    csv_dir: Option<PathBuf>,

    /// Dataset cache lifetime in seconds (0 re-reads on every refresh).
    #[arg(long = "ttl")]
    ttl: Option<u64>,

    /// Page to open: overview, subsidiaries, products, segments, analytics.
    #[arg(long = "page")]
    page: Option<String>,

    /// Print overview metrics and the cross-segment summary as JSON and exit.
    #[arg(long = "report")]
    report: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Apply command-line overrides on top of the file configuration.
fn apply_overrides(cli: &Cli, config: &mut AppConfig, warnings: &mut Vec<String>) {
    if let Some(path) = &cli.sqlite {
        config.data_source = DataSourceConfig::sqlite(path.clone());
    } else if let Some(dir) = &cli.csv_dir {
        config.data_source = DataSourceConfig::csv(dir.clone());
    }
    if let Some(ttl) = cli.ttl {
        if ttl <= util::constants::MAX_CACHE_TTL_SECS {
            config.cache_ttl_secs = ttl;
        } else {
            warnings.push(format!(
                "--ttl {ttl} exceeds the maximum of {}s; using {}s",
                util::constants::MAX_CACHE_TTL_SECS,
                config.cache_ttl_secs
            ));
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and read config.toml before logging so the
    // configured level and log file take effect from the first line.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (mut config, config_errors) = platform::config::load_config(&platform_paths);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SegmentLens starting"
    );

    let mut warnings: Vec<String> = config_errors.iter().map(ToString::to_string).collect();
    apply_overrides(&cli, &mut config, &mut warnings);
    for w in &warnings {
        tracing::warn!(warning = %w, "Configuration warning");
    }

    let source = match platform::source::from_config(&config.data_source) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Cannot open data source");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let loader = app::loader::DatasetLoader::new(source, Duration::from_secs(config.cache_ttl_secs));

    if cli.report {
        let json = app::report::DashboardReport::build(&loader)
            .map_err(|e| e.to_string())
            .and_then(|r| r.to_json().map_err(|e| e.to_string()));
        match json {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!(error = %e, "Report failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut state = app::state::AppState::new(loader, cli.debug);
    state.dark_mode = config.dark_mode;
    state.font_size = config.font_size;
    state.config_warnings = warnings;

    let session_path = app::session::session_path(&platform_paths.data_dir);
    if let Some(session) = app::session::load(&session_path) {
        tracing::debug!(path = %session_path.display(), "Restoring previous session");
        state.restore_session(session);
    }

    if let Some(ref name) = cli.page {
        match app::state::Page::from_slug(name) {
            Some(page) => state.page = page,
            None => {
                tracing::warn!(page = %name, "Unknown page; showing the last page instead");
            }
        }
    }

    tracing::info!(source = %state.loader.source_description(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::SegmentLensApp::new(state, Some(session_path))))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch SegmentLens GUI: {e}");
        std::process::exit(1);
    }
}
