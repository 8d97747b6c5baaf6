// SegmentLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Datasets
// =============================================================================

/// The two named query results the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Subsidiaries,
    ProductsServices,
}

impl Dataset {
    pub fn all() -> &'static [Dataset] {
        &[Dataset::Subsidiaries, Dataset::ProductsServices]
    }

    /// Name used by the data source boundary and in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Subsidiaries => crate::util::constants::SUBSIDIARIES_DATASET,
            Dataset::ProductsServices => crate::util::constants::PRODUCTS_DATASET,
        }
    }

    /// Look a dataset up by its boundary name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Dataset> {
        Dataset::all()
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Columns
// =============================================================================

/// Every column the two datasets expose, addressed by a typed key rather
/// than a runtime string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    // Subsidiary
    CompanyName,
    KeyProductsServices,
    MarketPosition,
    WebsiteUrl,
    CreatedDate,
    LastUpdated,
    // ProductService
    ProductServiceName,
    SubsidiaryName,
    ProductServiceCategory,
    KeyFeatures,
    TargetMarket,
    ProductUrl,
    // Shared
    BusinessSegment,
    Description,
}

impl Column {
    /// Normalised (lower snake-case) column name as it appears after load.
    pub fn name(&self) -> &'static str {
        match self {
            Column::CompanyName => "company_name",
            Column::KeyProductsServices => "key_products_services",
            Column::MarketPosition => "market_position",
            Column::WebsiteUrl => "website_url",
            Column::CreatedDate => "created_date",
            Column::LastUpdated => "last_updated",
            Column::ProductServiceName => "product_service_name",
            Column::SubsidiaryName => "subsidiary_name",
            Column::ProductServiceCategory => "product_service_category",
            Column::KeyFeatures => "key_features",
            Column::TargetMarket => "target_market",
            Column::ProductUrl => "product_url",
            Column::BusinessSegment => "business_segment",
            Column::Description => "description",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Column::CompanyName => "Company Name",
            Column::KeyProductsServices => "Key Products/Services",
            Column::MarketPosition => "Market Position",
            Column::WebsiteUrl => "Website URL",
            Column::CreatedDate => "Created",
            Column::LastUpdated => "Last Updated",
            Column::ProductServiceName => "Product Name",
            Column::SubsidiaryName => "Subsidiary",
            Column::ProductServiceCategory => "Product Category",
            Column::KeyFeatures => "Key Features",
            Column::TargetMarket => "Target Market",
            Column::ProductUrl => "Product URL",
            Column::BusinessSegment => "Business Segment",
            Column::Description => "Description",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Record access
// =============================================================================

/// Typed, column-keyed read access shared by both entity types.
///
/// The filter and aggregation engines are written against this trait so
/// they work on either dataset. A column the record does not carry reads
/// as absent, exactly like a null value.
pub trait Record {
    /// Which dataset rows of this type come from.
    const DATASET: Dataset;

    /// Text columns scanned by the free-text search, in display order.
    const SEARCH_COLUMNS: &'static [Column];

    /// Value of a text column, `None` when absent.
    fn text(&self, column: Column) -> Option<&str>;

    /// Value of a date column, `None` when the column is not a date.
    fn date(&self, _column: Column) -> Option<NaiveDate> {
        None
    }
}

/// Borrowed rows read through to the owned record, so filtered views held
/// as `Vec<&R>` can be aggregated without cloning.
impl<R: Record> Record for &R {
    const DATASET: Dataset = R::DATASET;
    const SEARCH_COLUMNS: &'static [Column] = R::SEARCH_COLUMNS;

    fn text(&self, column: Column) -> Option<&str> {
        (**self).text(column)
    }

    fn date(&self, column: Column) -> Option<NaiveDate> {
        (**self).date(column)
    }
}

// =============================================================================
// Subsidiary
// =============================================================================

/// One company in the group. `company_name` is the unique key.
///
/// Optional text fields are `None` when the source value was null, empty
/// or whitespace-only; the two cases are never distinguished downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subsidiary {
    pub company_name: String,
    pub business_segment: String,
    pub description: Option<String>,
    pub key_products_services: Option<String>,
    pub market_position: Option<String>,
    pub website_url: Option<String>,
    pub created_date: NaiveDate,
    pub last_updated: NaiveDate,
}

impl Record for Subsidiary {
    const DATASET: Dataset = Dataset::Subsidiaries;
    const SEARCH_COLUMNS: &'static [Column] = &[Column::CompanyName, Column::Description];

    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::CompanyName => Some(&self.company_name),
            Column::BusinessSegment => Some(&self.business_segment),
            Column::Description => self.description.as_deref(),
            Column::KeyProductsServices => self.key_products_services.as_deref(),
            Column::MarketPosition => self.market_position.as_deref(),
            Column::WebsiteUrl => self.website_url.as_deref(),
            _ => None,
        }
    }

    fn date(&self, column: Column) -> Option<NaiveDate> {
        match column {
            Column::CreatedDate => Some(self.created_date),
            Column::LastUpdated => Some(self.last_updated),
            _ => None,
        }
    }
}

// =============================================================================
// ProductService
// =============================================================================

/// One product or service offered by a subsidiary.
///
/// `business_segment` is stored redundantly and should agree with the
/// referenced subsidiary's segment; see `aggregate::check_consistency`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductService {
    pub product_service_name: String,
    pub subsidiary_name: String,
    pub business_segment: String,
    pub product_service_category: String,
    pub description: Option<String>,
    pub key_features: Option<String>,
    pub target_market: Option<String>,
    pub product_url: Option<String>,
}

impl Record for ProductService {
    const DATASET: Dataset = Dataset::ProductsServices;
    const SEARCH_COLUMNS: &'static [Column] = &[
        Column::ProductServiceName,
        Column::Description,
        Column::KeyFeatures,
    ];

    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::ProductServiceName => Some(&self.product_service_name),
            Column::SubsidiaryName => Some(&self.subsidiary_name),
            Column::BusinessSegment => Some(&self.business_segment),
            Column::ProductServiceCategory => Some(&self.product_service_category),
            Column::Description => self.description.as_deref(),
            Column::KeyFeatures => self.key_features.as_deref(),
            Column::TargetMarket => self.target_market.as_deref(),
            Column::ProductUrl => self.product_url.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// Loaded tables
// =============================================================================

/// A fully loaded, immutable dataset. Cloning shares the rows.
#[derive(Debug, Clone)]
pub enum Table {
    Subsidiaries(Arc<Vec<Subsidiary>>),
    ProductsServices(Arc<Vec<ProductService>>),
}

impl Table {
    pub fn dataset(&self) -> Dataset {
        match self {
            Table::Subsidiaries(_) => Dataset::Subsidiaries,
            Table::ProductsServices(_) => Dataset::ProductsServices,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Table::Subsidiaries(rows) => rows.len(),
            Table::ProductsServices(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Result counts
// =============================================================================

/// A filter or segment selection matched no rows.
///
/// Not an error: the views render an explicit "Showing 0 of N" state
/// instead of an empty chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResultWarning {
    /// Rows available before filtering.
    pub total: usize,
}

impl std::fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing 0 of {} rows; no rows match the current selection", self.total)
    }
}

/// "Showing X of N" bookkeeping for a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultCount {
    pub shown: usize,
    pub total: usize,
}

impl ResultCount {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }

    /// `Some` when the selection emptied the view.
    pub fn warning(&self) -> Option<EmptyResultWarning> {
        (self.shown == 0).then_some(EmptyResultWarning { total: self.total })
    }

    /// Status label, e.g. "Showing 3 of 12 subsidiaries".
    pub fn label(&self, noun: &str) -> String {
        format!("Showing {} of {} {noun}", self.shown, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subsidiary() -> Subsidiary {
        Subsidiary {
            company_name: "Genentech".to_string(),
            business_segment: "Pharma".to_string(),
            description: None,
            key_products_services: Some("Oncology".to_string()),
            market_position: None,
            website_url: None,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            last_updated: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_dataset_from_name_is_case_insensitive() {
        assert_eq!(Dataset::from_name("SUBSIDIARIES"), Some(Dataset::Subsidiaries));
        assert_eq!(
            Dataset::from_name(" products_services "),
            Some(Dataset::ProductsServices)
        );
        assert_eq!(Dataset::from_name("orders"), None);
    }

    #[test]
    fn test_record_reads_absent_for_foreign_column() {
        let s = subsidiary();
        assert_eq!(s.text(Column::CompanyName), Some("Genentech"));
        assert_eq!(s.text(Column::Description), None);
        assert_eq!(s.text(Column::ProductServiceCategory), None);
        assert_eq!(s.date(Column::Description), None);
        assert_eq!(
            s.date(Column::LastUpdated),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn test_result_count_warns_only_when_empty() {
        assert!(ResultCount::new(3, 12).warning().is_none());
        let warning = ResultCount::new(0, 12).warning().expect("empty view must warn");
        assert_eq!(warning.total, 12);
        assert_eq!(
            ResultCount::new(0, 12).label("subsidiaries"),
            "Showing 0 of 12 subsidiaries"
        );
    }
}
