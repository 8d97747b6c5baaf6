// SegmentLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation in the core and app layers.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SegmentLens operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DashboardError {
    /// Loading a dataset from the data source failed.
    DataSource(DataSourceError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataSource(e) => write!(f, "Data source error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DataSource(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Data source errors
// ---------------------------------------------------------------------------

/// Errors raised while fetching or validating a dataset.
///
/// Every variant is user-visible: the views show it as a page-level banner
/// together with [`DataSourceError::remediation`]. None are retried by the
/// application; the user reloads manually.
#[derive(Debug)]
pub enum DataSourceError {
    /// The SQLite database could not be opened.
    Open {
        target: PathBuf,
        source: rusqlite::Error,
    },

    /// A query against the database failed.
    Query {
        dataset: String,
        source: rusqlite::Error,
    },

    /// A CSV export could not be read or decoded.
    Csv { path: PathBuf, source: csv::Error },

    /// The source file or directory could not be accessed.
    Io { path: PathBuf, source: io::Error },

    /// A configured table name contains characters that are not allowed
    /// in an unquoted SQL identifier.
    InvalidTableName { name: String },

    /// The requested dataset name is not one this application knows.
    UnknownDataset { name: String },

    /// A required column is missing from the query result.
    MissingColumn {
        dataset: String,
        column: &'static str,
    },

    /// A required value is null or empty in one row.
    MissingValue {
        dataset: String,
        row: usize,
        column: &'static str,
    },

    /// A date column holds a value that is not a recognised date.
    InvalidDate {
        dataset: String,
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A key column holds the same value in more than one row.
    DuplicateKey {
        dataset: String,
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl DataSourceError {
    /// Troubleshooting steps shown beneath the error banner.
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::Open { .. } | Self::Io { .. } => &[
                "Verify the data source path in config.toml or on the command line",
                "Check that the file exists and is readable by the current user",
            ],
            Self::Query { .. } | Self::InvalidTableName { .. } => &[
                "Ensure the subsidiaries and products/services tables exist",
                "Check [data_source] subsidiaries_table and products_table in config.toml",
                "Verify the database user may read both tables",
            ],
            Self::Csv { .. } => &[
                "Check that both CSV files have a header row",
                "Ensure both files are UTF-8 encoded and comma-separated",
            ],
            Self::UnknownDataset { .. } => &["Use 'subsidiaries' or 'products_services'"],
            Self::MissingColumn { .. }
            | Self::MissingValue { .. }
            | Self::InvalidDate { .. } => &[
                "Check that the tables are populated by the bulk load",
                "Required columns must be present and non-empty in every row",
            ],
            Self::DuplicateKey { .. } => &[
                "Each company_name must appear only once in the subsidiaries table",
                "Remove or rename the repeated row and reload",
            ],
        }
    }
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "Cannot open database '{}': {source}", target.display())
            }
            Self::Query { dataset, source } => {
                write!(f, "Query for dataset '{dataset}' failed: {source}")
            }
            Self::Csv { path, source } => {
                write!(f, "Cannot read CSV '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Cannot access '{}': {source}", path.display())
            }
            Self::InvalidTableName { name } => write!(
                f,
                "Table name '{name}' is not allowed; use letters, digits, '_' and '.' only"
            ),
            Self::UnknownDataset { name } => write!(f, "Unknown dataset '{name}'"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "Dataset '{dataset}' has no column '{column}'")
            }
            Self::MissingValue {
                dataset,
                row,
                column,
            } => write!(
                f,
                "Dataset '{dataset}' row {row}: required column '{column}' is empty"
            ),
            Self::InvalidDate {
                dataset,
                row,
                column,
                value,
            } => write!(
                f,
                "Dataset '{dataset}' row {row}: '{value}' in column '{column}' is not a date"
            ),
            Self::DuplicateKey {
                dataset,
                row,
                column,
                value,
            } => write!(
                f,
                "Dataset '{dataset}' row {row}: '{value}' in key column '{column}' is repeated"
            ),
        }
    }
}

impl std::error::Error for DataSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Query { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DataSourceError> for DashboardError {
    fn from(e: DataSourceError) -> Self {
        Self::DataSource(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for DashboardError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of range or not one of the accepted values.
    /// The default is used in its place.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is not valid (expected {expected}); using the default"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for DashboardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for SegmentLens results.
pub type Result<T> = std::result::Result<T, DashboardError>;
