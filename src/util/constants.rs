// SegmentLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SegmentLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SegmentLens";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Dataset cache
// =============================================================================

/// Default time-to-live of a cached dataset, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound on the configurable TTL (one day). Zero is allowed and means
/// every load goes to the data source.
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;

// =============================================================================
// Data source defaults
// =============================================================================

/// Dataset name of the subsidiaries query.
pub const SUBSIDIARIES_DATASET: &str = "subsidiaries";

/// Dataset name of the products/services query.
pub const PRODUCTS_DATASET: &str = "products_services";

/// Default SQL table holding subsidiaries.
pub const DEFAULT_SUBSIDIARIES_TABLE: &str = "subsidiaries";

/// Default SQL table holding products and services.
pub const DEFAULT_PRODUCTS_TABLE: &str = "subsidiary_products_services";

/// Database file looked up in the platform data directory when no data
/// source path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "segmentlens.db";

/// CSV file name for the subsidiaries dataset inside a CSV directory source.
pub const SUBSIDIARIES_CSV_FILE: &str = "subsidiaries.csv";

/// CSV file name for the products/services dataset.
pub const PRODUCTS_CSV_FILE: &str = "products_services.csv";

/// Maximum length of a SQL table name accepted from config. Names are also
/// restricted to `[A-Za-z0-9_.]` before being interpolated into a query.
pub const MAX_TABLE_NAME_LENGTH: usize = 128;

// =============================================================================
// Aggregation / display limits
// =============================================================================

/// Number of categories shown in "top categories" charts and grids.
pub const TOP_CATEGORIES: usize = 10;

/// Number of rows shown in the "Recent Updates" table on the Overview page.
pub const RECENT_UPDATES_ROWS: usize = 5;

/// Maximum number of product cards rendered per category group before the
/// remainder is summarised as "... and N more".
pub const MAX_CARDS_PER_GROUP: usize = 200;

/// Maximum number of consistency warnings kept after a load.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ROWS: usize = 1_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
