// SegmentLens - app/session.rs
//
// Session persistence: save and restore the selected page, per-page filter
// selections and the chosen business segment between application restarts.
//
// - Saved atomically (write temp, rename) so a crash during save never
//   corrupts the previous good session.
// - Load failures start the app fresh rather than surfacing errors.
// - Table data is never persisted; it is always reloaded from the source.

use crate::app::state::Page;
use crate::core::filter::FilterState;
use crate::util::constants::SESSION_FILE_NAME;
use crate::util::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Increment whenever `SessionData` changes in a breaking way. Version
/// mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// Complete persistent session snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    #[serde(default)]
    pub page: Page,

    #[serde(default)]
    pub subsidiary_filter: FilterState,

    #[serde(default)]
    pub product_filter: FilterState,

    /// Segment chosen on the Business Segments page. Ignored on restore if
    /// the segment no longer exists.
    #[serde(default)]
    pub selected_segment: Option<String>,
}

impl SessionData {
    pub fn new(
        page: Page,
        subsidiary_filter: FilterState,
        product_filter: FilterState,
        selected_segment: Option<String>,
    ) -> Self {
        Self {
            version: SESSION_VERSION,
            page,
            subsidiary_filter,
            product_filter,
            selected_segment,
        }
    }
}

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

fn io_error(path: &Path, operation: &'static str, source: std::io::Error) -> DashboardError {
    DashboardError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

/// Save `data` to `path` atomically (write temp, rename).
///
/// Creates parent directories as needed. The caller typically logs a
/// failure and carries on.
pub fn save(data: &SessionData, path: &Path) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error(parent, "create session directory", e))?;
    }

    let json = serde_json::to_string_pretty(data).map_err(|e| {
        io_error(path, "serialise session", std::io::Error::other(e))
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|e| io_error(&tmp, "write session", e))?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        io_error(path, "finalise session", e)
    })?;

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure,
/// version mismatch). The caller treats `None` as "start fresh".
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::info!(path = %path.display(), "Session file loaded");
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Column;
    use tempfile::TempDir;

    fn sample_data() -> SessionData {
        let mut products = FilterState::only(Column::BusinessSegment, "Diagnostics");
        products.text_search = "insulin".to_string();
        let mut subsidiaries = FilterState::default();
        subsidiaries.restrict(Column::BusinessSegment, Vec::new());
        SessionData::new(
            Page::ProductsServices,
            subsidiaries,
            products,
            Some("Pharma".to_string()),
        )
    }

    #[test]
    fn test_session_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        let original = sample_data();

        save(&original, &path).expect("save should succeed");
        let loaded = load(&path).expect("load should return Some after valid save");

        assert_eq!(loaded.page, Page::ProductsServices);
        assert_eq!(loaded.product_filter, original.product_filter);
        assert_eq!(loaded.selected_segment.as_deref(), Some("Pharma"));
        // An explicit empty selection must survive as "nothing permitted",
        // not collapse into "unconstrained".
        assert_eq!(
            loaded.subsidiary_filter.include.get(&Column::BusinessSegment),
            Some(&Default::default())
        );
    }

    #[test]
    fn test_session_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nonexistent.json")).is_none());
    }

    #[test]
    fn test_session_load_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut data = sample_data();
        data.version = 99;
        save(&data, &path).unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_save_replaces_leftover_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        save(&sample_data(), &path).unwrap();

        std::fs::write(path.with_extension("json.tmp"), b"garbage").unwrap();

        let mut updated = sample_data();
        updated.page = Page::Analytics;
        save(&updated, &path).unwrap();

        assert_eq!(load(&path).unwrap().page, Page::Analytics);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
