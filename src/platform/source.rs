// SegmentLens - platform/source.rs
//
// Concrete data sources behind the core::table::DataSource trait:
// a read-only SQLite database and a directory of CSV exports.
//
// Both return untyped RawTables; column-name normalisation and typed
// validation happen once, in the loader, via core::table.

use crate::core::model::Dataset;
use crate::core::table::{DataSource, RawTable};
use crate::platform::config::{DataSourceConfig, SourceKind};
use crate::util::constants;
use crate::util::error::DataSourceError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Build the data source described by `config`.
pub fn from_config(config: &DataSourceConfig) -> Result<Box<dyn DataSource>, DataSourceError> {
    match config.kind {
        SourceKind::Sqlite => Ok(Box::new(SqliteSource::new(
            &config.path,
            &config.subsidiaries_table,
            &config.products_table,
        )?)),
        SourceKind::Csv => Ok(Box::new(
            CsvSource::new(&config.path)
                .with_file_names(&config.subsidiaries_file, &config.products_file),
        )),
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// Read-only SQLite database holding both tables.
///
/// The connection is opened lazily on the first fetch and kept for reuse.
/// A failed query drops it so that the next (manual) reload reconnects.
pub struct SqliteSource {
    path: PathBuf,
    subsidiaries_table: String,
    products_table: String,
    conn: Mutex<Option<Connection>>,
}

/// Table names are interpolated into SQL, so only plain identifiers
/// (optionally schema-qualified) are accepted.
fn validate_table_name(name: &str) -> Result<(), DataSourceError> {
    let valid = !name.is_empty()
        && name.len() <= constants::MAX_TABLE_NAME_LENGTH
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !name.starts_with('.')
        && !name.ends_with('.');
    if valid {
        Ok(())
    } else {
        Err(DataSourceError::InvalidTableName {
            name: name.to_string(),
        })
    }
}

impl SqliteSource {
    pub fn new(
        path: &Path,
        subsidiaries_table: &str,
        products_table: &str,
    ) -> Result<Self, DataSourceError> {
        validate_table_name(subsidiaries_table)?;
        validate_table_name(products_table)?;
        Ok(Self {
            path: path.to_path_buf(),
            subsidiaries_table: subsidiaries_table.to_string(),
            products_table: products_table.to_string(),
            conn: Mutex::new(None),
        })
    }

    /// The query for a dataset, with the orderings the views expect.
    fn query_for(&self, dataset: Dataset) -> String {
        match dataset {
            Dataset::Subsidiaries => format!(
                "SELECT * FROM {} ORDER BY business_segment, company_name",
                self.subsidiaries_table
            ),
            Dataset::ProductsServices => format!(
                "SELECT * FROM {} ORDER BY business_segment, product_service_category, \
                 product_service_name",
                self.products_table
            ),
        }
    }

    fn open(&self) -> Result<Connection, DataSourceError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            DataSourceError::Open {
                target: self.path.clone(),
                source: e,
            }
        })?;
        tracing::info!(path = %self.path.display(), "SQLite data source opened");
        Ok(conn)
    }
}

/// Render one SQLite value as a text cell. Blobs are not meaningful to the
/// dashboard and read as null.
fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn run_query(conn: &Connection, sql: &str) -> rusqlite::Result<RawTable> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(cell_text))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(RawTable::new(columns, rows))
}

impl DataSource for SqliteSource {
    fn describe(&self) -> String {
        format!("SQLite {}", self.path.display())
    }

    fn fetch(&self, dataset: Dataset) -> Result<RawTable, DataSourceError> {
        // A poisoned lock only means a previous fetch panicked; the cached
        // connection is still usable or will be replaced below.
        let mut guard = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };

        let sql = self.query_for(dataset);
        tracing::debug!(dataset = %dataset, sql = %sql, "Running dataset query");
        match run_query(&conn, &sql) {
            Ok(table) => {
                *guard = Some(conn);
                Ok(table)
            }
            // The connection is dropped so the next reload reconnects.
            Err(e) => Err(DataSourceError::Query {
                dataset: dataset.name().to_string(),
                source: e,
            }),
        }
    }
}

// =============================================================================
// CSV directory
// =============================================================================

/// A directory holding one CSV file per dataset (by default
/// `subsidiaries.csv` and `products_services.csv`), each with a header row.
/// Empty cells read as null.
pub struct CsvSource {
    dir: PathBuf,
    subsidiaries_file: String,
    products_file: String,
}

impl CsvSource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            subsidiaries_file: constants::SUBSIDIARIES_CSV_FILE.to_string(),
            products_file: constants::PRODUCTS_CSV_FILE.to_string(),
        }
    }

    pub fn with_file_names(mut self, subsidiaries: &str, products: &str) -> Self {
        self.subsidiaries_file = subsidiaries.to_string();
        self.products_file = products.to_string();
        self
    }

    fn file_for(&self, dataset: Dataset) -> PathBuf {
        let name = match dataset {
            Dataset::Subsidiaries => &self.subsidiaries_file,
            Dataset::ProductsServices => &self.products_file,
        };
        self.dir.join(name)
    }
}

impl DataSource for CsvSource {
    fn describe(&self) -> String {
        format!("CSV {}", self.dir.display())
    }

    fn fetch(&self, dataset: Dataset) -> Result<RawTable, DataSourceError> {
        let path = self.file_for(dataset);
        let file = File::open(&path).map_err(|e| DataSourceError::Io {
            path: path.clone(),
            source: e,
        })?;

        let csv_err = |e: csv::Error| DataSourceError::Csv {
            path: path.clone(),
            source: e,
        };

        // Flexible: short rows are padded with nulls by RawTable.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(
                record
                    .iter()
                    .map(|v| (!v.is_empty()).then(|| v.to_string()))
                    .collect(),
            );
        }

        tracing::debug!(path = %path.display(), rows = rows.len(), "CSV dataset read");
        Ok(RawTable::new(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("subsidiaries").is_ok());
        assert!(validate_table_name("roche.subsidiaries").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("x; DROP TABLE y").is_err());
        assert!(validate_table_name(".hidden").is_err());
    }

    #[test]
    fn test_sqlite_missing_database_is_open_error() {
        let dir = TempDir::new().unwrap();
        let source = SqliteSource::new(
            &dir.path().join("absent.db"),
            "subsidiaries",
            "subsidiary_products_services",
        )
        .unwrap();
        let err = source.fetch(Dataset::Subsidiaries).unwrap_err();
        assert!(matches!(err, DataSourceError::Open { .. }), "got {err:?}");
    }

    #[test]
    fn test_sqlite_missing_table_is_query_error() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("empty.db");
        Connection::open(&db)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER);")
            .unwrap();
        let source = SqliteSource::new(&db, "subsidiaries", "products").unwrap();
        let err = source.fetch(Dataset::ProductsServices).unwrap_err();
        assert!(matches!(err, DataSourceError::Query { .. }), "got {err:?}");
    }

    #[test]
    fn test_sqlite_values_become_text_cells() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("cells.db");
        Connection::open(&db)
            .unwrap()
            .execute_batch(
                "CREATE TABLE subsidiaries (COMPANY_NAME TEXT, BUSINESS_SEGMENT TEXT, \
                 EMPLOYEES INTEGER, WEBSITE_URL TEXT);
                 INSERT INTO subsidiaries VALUES ('Chugai', 'Pharma', 7500, NULL);",
            )
            .unwrap();
        let source = SqliteSource::new(&db, "subsidiaries", "products").unwrap();
        let table = source.fetch(Dataset::Subsidiaries).unwrap();
        assert_eq!(
            table.columns(),
            ["company_name", "business_segment", "employees", "website_url"]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "company_name"), Some("Chugai"));
        assert_eq!(table.cell(0, "employees"), Some("7500"));
        assert_eq!(table.cell(0, "website_url"), None);
    }

    #[test]
    fn test_cell_text_by_storage_class() {
        assert_eq!(cell_text(ValueRef::Null), None);
        assert_eq!(cell_text(ValueRef::Blob(&[0xde, 0xad])), None);
        assert_eq!(cell_text(ValueRef::Integer(-3)).as_deref(), Some("-3"));
        assert_eq!(cell_text(ValueRef::Real(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(ValueRef::Text(b"Roche")).as_deref(), Some("Roche"));
    }

    #[test]
    fn test_csv_custom_file_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("subs.csv"),
            "Company Name,Business-Segment\nChugai,Pharma\nFoundation Medicine,\n",
        )
        .unwrap();
        let source = CsvSource::new(dir.path()).with_file_names("subs.csv", "prods.csv");
        let table = source.fetch(Dataset::Subsidiaries).unwrap();
        assert_eq!(table.columns(), ["company_name", "business_segment"]);
        assert_eq!(table.len(), 2);
        assert!(source.fetch(Dataset::ProductsServices).is_err());
    }

    #[test]
    fn test_csv_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvSource::new(dir.path())
            .fetch(Dataset::Subsidiaries)
            .unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }), "got {err:?}");
    }
}
