// SegmentLens - core/table.rs
//
// The data source boundary: untyped query results, column-name
// normalisation, and the one-time conversion into typed records.
// Core layer: pure logic. Concrete sources live in platform::source.

use crate::core::model::{Dataset, ProductService, Subsidiary};
use crate::util::error::DataSourceError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};

/// Anything that can answer the two named dataset queries.
///
/// Implementations must be shareable across threads: the loader that owns
/// the handle is read concurrently by every view.
pub trait DataSource: Send + Sync {
    /// Short description for logs and the status bar (path, kind).
    fn describe(&self) -> String;

    /// Run the query for `dataset` and return its rows as text cells.
    fn fetch(&self, dataset: Dataset) -> Result<RawTable, DataSourceError>;
}

/// An untyped query result: ordered column names plus rows of nullable text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table, normalising column names once.
    ///
    /// Rows shorter than the header are padded with nulls; extra cells are
    /// ignored.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| normalise_column_name(c)).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

/// Normalise an external column name: trimmed, lower-case, with spaces and
/// hyphens folded to underscores. `"COMPANY_NAME"` → `"company_name"`.
pub fn normalise_column_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Null, empty and whitespace-only cells are all "absent".
fn present(cell: &Option<String>) -> Option<String> {
    cell.as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Parse a date cell. Accepts plain dates, naive timestamps and RFC 3339;
/// the time part is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

// =============================================================================
// Typed conversion
// =============================================================================

/// Column lookup for one raw table, reporting missing columns by name.
struct Columns<'a> {
    dataset: Dataset,
    index: HashMap<&'a str, usize>,
}

impl<'a> Columns<'a> {
    fn new(raw: &'a RawTable, dataset: Dataset) -> Self {
        let index = raw
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        Self { dataset, index }
    }

    fn required(&self, column: &'static str) -> Result<usize, DataSourceError> {
        self.index
            .get(column)
            .copied()
            .ok_or_else(|| DataSourceError::MissingColumn {
                dataset: self.dataset.name().to_string(),
                column,
            })
    }

    /// Optional columns may be missing entirely; every value is then absent.
    fn optional(&self, column: &'static str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

/// Cursor over one row that turns cells into typed values.
struct RowReader<'a> {
    dataset: Dataset,
    row_number: usize,
    cells: &'a [Option<String>],
}

impl RowReader<'_> {
    fn required(&self, idx: usize, column: &'static str) -> Result<String, DataSourceError> {
        present(&self.cells[idx]).ok_or_else(|| DataSourceError::MissingValue {
            dataset: self.dataset.name().to_string(),
            row: self.row_number,
            column,
        })
    }

    fn optional(&self, idx: Option<usize>) -> Option<String> {
        idx.and_then(|i| present(&self.cells[i]))
    }

    fn date(&self, idx: usize, column: &'static str) -> Result<NaiveDate, DataSourceError> {
        let raw = self.required(idx, column)?;
        parse_date(&raw).ok_or_else(|| DataSourceError::InvalidDate {
            dataset: self.dataset.name().to_string(),
            row: self.row_number,
            column,
            value: raw,
        })
    }
}

fn rows<'a>(raw: &'a RawTable, dataset: Dataset) -> impl Iterator<Item = RowReader<'a>> {
    raw.rows.iter().enumerate().map(move |(i, cells)| RowReader {
        dataset,
        // 1-based, matching what a user sees in a spreadsheet or SQL client.
        row_number: i + 1,
        cells,
    })
}

/// Validate and convert the subsidiaries query result.
pub fn subsidiaries_from_raw(raw: &RawTable) -> Result<Vec<Subsidiary>, DataSourceError> {
    let dataset = Dataset::Subsidiaries;
    let cols = Columns::new(raw, dataset);
    let name = cols.required("company_name")?;
    let segment = cols.required("business_segment")?;
    let created = cols.required("created_date")?;
    let updated = cols.required("last_updated")?;
    let description = cols.optional("description");
    let key_products = cols.optional("key_products_services");
    let market_position = cols.optional("market_position");
    let website = cols.optional("website_url");

    rows(raw, dataset)
        .map(|row| -> Result<Subsidiary, DataSourceError> {
            Ok(Subsidiary {
                company_name: row.required(name, "company_name")?,
                business_segment: row.required(segment, "business_segment")?,
                description: row.optional(description),
                key_products_services: row.optional(key_products),
                market_position: row.optional(market_position),
                website_url: row.optional(website),
                created_date: row.date(created, "created_date")?,
                last_updated: row.date(updated, "last_updated")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(|subsidiaries| unique_company_names(subsidiaries, dataset))
}

/// `company_name` is the key products refer to. A repeated name rejects the
/// whole table, reported at the row of its second occurrence.
fn unique_company_names(
    subsidiaries: Vec<Subsidiary>,
    dataset: Dataset,
) -> Result<Vec<Subsidiary>, DataSourceError> {
    let repeated = {
        let mut seen = HashSet::new();
        subsidiaries
            .iter()
            .position(|s| !seen.insert(s.company_name.as_str()))
    };
    match repeated {
        Some(i) => Err(DataSourceError::DuplicateKey {
            dataset: dataset.name().to_string(),
            row: i + 1,
            column: "company_name",
            value: subsidiaries[i].company_name.clone(),
        }),
        None => Ok(subsidiaries),
    }
}

/// Validate and convert the products/services query result.
pub fn products_from_raw(raw: &RawTable) -> Result<Vec<ProductService>, DataSourceError> {
    let dataset = Dataset::ProductsServices;
    let cols = Columns::new(raw, dataset);
    let name = cols.required("product_service_name")?;
    let subsidiary = cols.required("subsidiary_name")?;
    let segment = cols.required("business_segment")?;
    let category = cols.required("product_service_category")?;
    let description = cols.optional("description");
    let features = cols.optional("key_features");
    let market = cols.optional("target_market");
    let url = cols.optional("product_url");

    rows(raw, dataset)
        .map(|row| -> Result<ProductService, DataSourceError> {
            Ok(ProductService {
                product_service_name: row.required(name, "product_service_name")?,
                subsidiary_name: row.required(subsidiary, "subsidiary_name")?,
                business_segment: row.required(segment, "business_segment")?,
                product_service_category: row.required(category, "product_service_category")?,
                description: row.optional(description),
                key_features: row.optional(features),
                target_market: row.optional(market),
                product_url: row.optional(url),
            })
        })
        .collect()
}
