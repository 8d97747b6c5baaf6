// SegmentLens - app/state.rs
//
// Application state management. Holds the loader, the tables currently on
// screen, per-page filter selections and load status.
// Owned by the eframe::App implementation.

use crate::app::loader::DatasetLoader;
use crate::app::session::SessionData;
use crate::core::aggregate::{self, ConsistencyIssue};
use crate::core::filter::{self, FilterState};
use crate::core::model::{Column, Dataset, ProductService, ResultCount, Subsidiary};
use crate::util::constants;
use crate::util::error::DataSourceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Dashboard pages, in sidebar order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Overview,
    Subsidiaries,
    ProductsServices,
    BusinessSegments,
    Analytics,
}

impl Page {
    pub fn all() -> &'static [Page] {
        &[
            Page::Overview,
            Page::Subsidiaries,
            Page::ProductsServices,
            Page::BusinessSegments,
            Page::Analytics,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Subsidiaries => "Subsidiaries",
            Page::ProductsServices => "Products & Services",
            Page::BusinessSegments => "Business Segments",
            Page::Analytics => "Analytics",
        }
    }

    /// Short name accepted on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Subsidiaries => "subsidiaries",
            Page::ProductsServices => "products",
            Page::BusinessSegments => "segments",
            Page::Analytics => "analytics",
        }
    }

    pub fn from_slug(name: &str) -> Option<Page> {
        Page::all()
            .iter()
            .copied()
            .find(|p| p.slug().eq_ignore_ascii_case(name.trim()))
    }

    /// The dataset whose filtered rows File > Export writes on this page.
    pub fn export_dataset(&self) -> Option<Dataset> {
        match self {
            Page::Subsidiaries => Some(Dataset::Subsidiaries),
            Page::ProductsServices => Some(Dataset::ProductsServices),
            _ => None,
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// Cached access to both datasets.
    pub loader: DatasetLoader,

    /// Page shown in the central panel.
    pub page: Page,

    /// Filter selections of the Subsidiaries page.
    pub subsidiary_filter: FilterState,

    /// Filter selections of the Products & Services page.
    pub product_filter: FilterState,

    /// Segment chosen on the Business Segments page.
    pub selected_segment: Option<String>,

    /// Tables currently displayed. Replaced wholesale on refresh.
    pub subsidiaries: Arc<Vec<Subsidiary>>,
    pub products: Arc<Vec<ProductService>>,

    /// Last load failure. While set, pages show the error banner and the
    /// loader is not polled again until the user reloads.
    pub load_error: Option<DataSourceError>,

    /// Cross-table problems found in the current tables.
    pub consistency: Vec<ConsistencyIssue>,

    /// Non-fatal configuration problems found at startup.
    pub config_warnings: Vec<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Whether to show the About window.
    pub show_about: bool,

    /// Dark (true) or light (false) visuals.
    pub dark_mode: bool,

    /// Body font size in points.
    pub font_size: f32,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(loader: DatasetLoader, debug_mode: bool) -> Self {
        Self {
            loader,
            page: Page::default(),
            subsidiary_filter: FilterState::default(),
            product_filter: FilterState::default(),
            selected_segment: None,
            subsidiaries: Arc::new(Vec::new()),
            products: Arc::new(Vec::new()),
            load_error: None,
            consistency: Vec::new(),
            config_warnings: Vec::new(),
            status_message: "Ready.".to_string(),
            show_about: false,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            debug_mode,
        }
    }

    /// Pull both datasets through the loader. Fresh cache entries are
    /// served without touching the source; expired ones are refetched.
    ///
    /// Does nothing while a load error is pending.
    pub fn refresh(&mut self) {
        if self.load_error.is_some() {
            return;
        }
        let loaded = self
            .loader
            .subsidiaries()
            .and_then(|subs| Ok((subs, self.loader.products()?)));

        match loaded {
            Ok((subsidiaries, products)) => {
                let changed = !Arc::ptr_eq(&subsidiaries, &self.subsidiaries)
                    || !Arc::ptr_eq(&products, &self.products);
                if changed {
                    self.subsidiaries = subsidiaries;
                    self.products = products;
                    self.on_tables_replaced();
                }
            }
            Err(e) => {
                self.status_message = format!("Load failed: {e}");
                self.load_error = Some(e);
            }
        }
    }

    /// Drop the cache and any pending error, then load again.
    pub fn reload(&mut self) {
        tracing::info!(source = %self.loader.source_description(), "Manual reload requested");
        self.loader.invalidate_all();
        self.load_error = None;
        self.refresh();
    }

    fn on_tables_replaced(&mut self) {
        let mut issues = aggregate::check_consistency(&self.subsidiaries, &self.products);
        if issues.len() > constants::MAX_WARNINGS {
            tracing::warn!(
                found = issues.len(),
                kept = constants::MAX_WARNINGS,
                "Consistency warnings truncated"
            );
            issues.truncate(constants::MAX_WARNINGS);
        }
        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Data consistency issues found");
        }
        self.consistency = issues;
        self.status_message = format!(
            "Loaded {} subsidiaries and {} products/services from {}",
            self.subsidiaries.len(),
            self.products.len(),
            self.loader.source_description()
        );
    }

    /// Time since the older of the two cached datasets was fetched.
    pub fn cache_age(&self) -> Option<Duration> {
        Dataset::all()
            .iter()
            .filter_map(|d| self.loader.fetched_at(*d))
            .map(|t| t.elapsed())
            .max()
    }

    /// Business segments of the subsidiaries table, first-seen order.
    pub fn segments(&self) -> Vec<String> {
        aggregate::distinct_values(&self.subsidiaries, Column::BusinessSegment)
    }

    /// The segment to show on the Business Segments page: the user's choice
    /// while it still exists, otherwise the first segment.
    pub fn active_segment(&self) -> Option<String> {
        let segments = self.segments();
        match &self.selected_segment {
            Some(s) if segments.contains(s) => Some(s.clone()),
            _ => segments.into_iter().next(),
        }
    }

    pub fn filtered_subsidiaries(&self) -> Vec<&Subsidiary> {
        filter::apply_filters(&self.subsidiaries, &self.subsidiary_filter)
            .into_iter()
            .map(|i| &self.subsidiaries[i])
            .collect()
    }

    pub fn filtered_products(&self) -> Vec<&ProductService> {
        filter::apply_filters(&self.products, &self.product_filter)
            .into_iter()
            .map(|i| &self.products[i])
            .collect()
    }

    pub fn subsidiary_count(&self) -> ResultCount {
        ResultCount::new(self.filtered_subsidiaries().len(), self.subsidiaries.len())
    }

    pub fn product_count(&self) -> ResultCount {
        ResultCount::new(self.filtered_products().len(), self.products.len())
    }

    /// Snapshot of the user-visible selections for session persistence.
    pub fn to_session(&self) -> SessionData {
        SessionData::new(
            self.page,
            self.subsidiary_filter.clone(),
            self.product_filter.clone(),
            self.selected_segment.clone(),
        )
    }

    /// Restore selections saved by a previous run.
    pub fn restore_session(&mut self, session: SessionData) {
        self.page = session.page;
        self.subsidiary_filter = session.subsidiary_filter;
        self.product_filter = session.product_filter;
        self.selected_segment = session.selected_segment;
    }
}
