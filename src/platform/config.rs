// SegmentLens - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SegmentLens data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/segmentlens/ or %APPDATA%\SegmentLens\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file and the default database.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Database used when config.toml names no data source path.
    pub fn default_database(&self) -> PathBuf {
        self.data_dir.join(constants::DEFAULT_DATABASE_FILE)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file can be used
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[data_source]` section.
    pub data_source: DataSourceSection,
    /// `[cache]` section.
    pub cache: CacheSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[data_source]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DataSourceSection {
    /// "sqlite" or "csv".
    pub kind: Option<String>,
    /// Database file (sqlite) or directory of CSV files (csv).
    pub path: Option<String>,
    pub subsidiaries_table: Option<String>,
    pub products_table: Option<String>,
    pub subsidiaries_file: Option<String>,
    pub products_file: Option<String>,
}

/// `[cache]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Dataset time-to-live in seconds (0 = always fetch).
    pub ttl_seconds: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Which kind of data source to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sqlite,
    Csv,
}

/// Validated `[data_source]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceConfig {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub subsidiaries_table: String,
    pub products_table: String,
    pub subsidiaries_file: String,
    pub products_file: String,
}

impl DataSourceConfig {
    /// SQLite database at `path` with the default table names.
    pub fn sqlite(path: PathBuf) -> Self {
        Self {
            kind: SourceKind::Sqlite,
            path,
            subsidiaries_table: constants::DEFAULT_SUBSIDIARIES_TABLE.to_string(),
            products_table: constants::DEFAULT_PRODUCTS_TABLE.to_string(),
            subsidiaries_file: constants::SUBSIDIARIES_CSV_FILE.to_string(),
            products_file: constants::PRODUCTS_CSV_FILE.to_string(),
        }
    }

    /// Directory of CSV files with the default file names.
    pub fn csv(dir: PathBuf) -> Self {
        Self {
            kind: SourceKind::Csv,
            ..Self::sqlite(dir)
        }
    }
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce a `ConfigError` warning and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Data --
    pub data_source: DataSourceConfig,
    /// Dataset cache TTL in seconds.
    pub cache_ttl_secs: u64,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl AppConfig {
    fn with_default_database(database: PathBuf) -> Self {
        Self {
            data_source: DataSourceConfig::sqlite(database),
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL_SECS,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the platform config directory.
///
/// Returns the validated config and a list of non-fatal problems. A missing
/// file is the first-run case and yields defaults with no warnings; an
/// unreadable or unparseable file yields defaults plus one warning.
pub fn load_config(paths: &PlatformPaths) -> (AppConfig, Vec<ConfigError>) {
    let config_path = paths.config_dir.join(constants::CONFIG_FILE_NAME);
    let defaults = AppConfig::with_default_database(paths.default_database());

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (defaults, Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (defaults, vec![err]);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (defaults, vec![err]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    let (config, warnings) = validate(raw, defaults, &config_path);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }
    (config, warnings)
}

fn invalid(field: &str, value: impl ToString, expected: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Validate each field against named constants, accumulating all problems.
/// Relative data source paths are resolved against the config file's directory.
fn validate(raw: RawConfig, defaults: AppConfig, config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings = Vec::new();
    let mut config = defaults;
    let source = &mut config.data_source;

    // -- Data source: kind --
    if let Some(ref kind) = raw.data_source.kind {
        match kind.to_lowercase().as_str() {
            "sqlite" => source.kind = SourceKind::Sqlite,
            "csv" => source.kind = SourceKind::Csv,
            other => warnings.push(invalid("data_source.kind", other, "\"sqlite\" or \"csv\"")),
        }
    }

    // -- Data source: path --
    if let Some(ref path) = raw.data_source.path {
        let path = PathBuf::from(path.trim());
        if path.as_os_str().is_empty() {
            warnings.push(invalid("data_source.path", "", "a file or directory path"));
        } else if path.is_relative() {
            let base = config_path.parent().unwrap_or(Path::new("."));
            source.path = base.join(path);
        } else {
            source.path = path;
        }
    }

    // -- Data source: names; table names are checked again when the source opens --
    let names = [
        ("data_source.subsidiaries_table", raw.data_source.subsidiaries_table, &mut source.subsidiaries_table),
        ("data_source.products_table", raw.data_source.products_table, &mut source.products_table),
        ("data_source.subsidiaries_file", raw.data_source.subsidiaries_file, &mut source.subsidiaries_file),
        ("data_source.products_file", raw.data_source.products_file, &mut source.products_file),
    ];
    for (field, value, slot) in names {
        if let Some(value) = value {
            let value = value.trim();
            if value.is_empty() || value.len() > constants::MAX_TABLE_NAME_LENGTH {
                warnings.push(invalid(
                    field,
                    value,
                    format!("1-{} characters", constants::MAX_TABLE_NAME_LENGTH),
                ));
            } else {
                *slot = value.to_string();
            }
        }
    }

    // -- Cache: ttl_seconds --
    if let Some(ttl) = raw.cache.ttl_seconds {
        if ttl <= constants::MAX_CACHE_TTL_SECS {
            config.cache_ttl_secs = ttl;
        } else {
            warnings.push(invalid(
                "cache.ttl_seconds",
                ttl,
                format!("0-{}", constants::MAX_CACHE_TTL_SECS),
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(invalid("ui.theme", other, "\"dark\" or \"light\"")),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(invalid(
                "ui.font_size",
                size,
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(invalid(
                "logging.level",
                level,
                "error, warn, info, debug or trace",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> PlatformPaths {
        PlatformPaths {
            config_dir: dir.path().join("config"),
            data_dir: dir.path().join("data"),
        }
    }

    fn write_config(paths: &PlatformPaths, content: &str) {
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(paths.config_dir.join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty());
        assert_eq!(config.cache_ttl_secs, constants::DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.data_source, DataSourceConfig::sqlite(paths.default_database()));
    }

    #[test]
    fn test_valid_config_is_applied() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        write_config(
            &paths,
            r#"
            [data_source]
            kind = "csv"
            path = "exports"
            subsidiaries_file = "subs.csv"

            [cache]
            ttl_seconds = 0

            [ui]
            theme = "light"
            font_size = 16.0

            [logging]
            level = "DEBUG"
            "#,
        );
        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.data_source.kind, SourceKind::Csv);
        assert_eq!(config.data_source.path, paths.config_dir.join("exports"));
        assert_eq!(config.data_source.subsidiaries_file, "subs.csv");
        assert_eq!(config.data_source.products_file, constants::PRODUCTS_CSV_FILE);
        assert_eq!(config.cache_ttl_secs, 0);
        assert!(!config.dark_mode);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        write_config(
            &paths,
            r#"
            [data_source]
            kind = "postgres"

            [cache]
            ttl_seconds = 999999

            [ui]
            theme = "sepia"
            font_size = 72.0
            "#,
        );
        let (config, warnings) = load_config(&paths);
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.data_source.kind, SourceKind::Sqlite);
        assert_eq!(config.cache_ttl_secs, constants::DEFAULT_CACHE_TTL_SECS);
        assert!(config.dark_mode);
        assert_eq!(config.font_size, constants::DEFAULT_FONT_SIZE);
        assert!(warnings[0].to_string().contains("data_source.kind"));
    }

    #[test]
    fn test_unparseable_file_gives_defaults_and_one_warning() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        write_config(&paths, "[cache\nttl_seconds = ");
        let (config, warnings) = load_config(&paths);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigError::TomlParse { .. }));
        assert_eq!(config.cache_ttl_secs, constants::DEFAULT_CACHE_TTL_SECS);
    }
}
