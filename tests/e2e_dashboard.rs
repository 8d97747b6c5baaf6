// SegmentLens - tests/e2e_dashboard.rs
//
// End-to-end tests for the load -> filter -> aggregate pipeline.
//
// These tests exercise real CSV files and a real SQLite database created in
// temporary directories, the real dataset cache, and the same filter and
// aggregation calls the pages make. No mocks, no stubs.

use rusqlite::Connection;
use segmentlens::app::loader::DatasetLoader;
use segmentlens::app::report::DashboardReport;
use segmentlens::app::state::{AppState, Page};
use segmentlens::core::aggregate;
use segmentlens::core::filter::{self, FilterState};
use segmentlens::core::model::{Column, Dataset, Table};
use segmentlens::platform::config::DataSourceConfig;
use segmentlens::platform::source;
use segmentlens::util::error::DataSourceError;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

const SUBSIDIARIES_CSV: &str = "\
company_name,business_segment,description,key_products_services,market_position,website_url,created_date,last_updated
Genentech,Pharmaceuticals,Biotech pioneer in oncology,Ocrevus; Tecentriq,Leader,https://www.gene.com,2023-01-10,2025-03-01
Chugai,Pharmaceuticals,,Actemra,Strong,,2023-01-10,2025-01-15
Roche Diagnostics,Diagnostics,Lab and point-of-care testing,cobas,Leader,https://diagnostics.roche.com,2023-02-01,2025-02-20
Foundation Medicine,Diagnostics,Genomic profiling,FoundationOne,Niche,   ,2023-03-05,2024-11-30
";

const PRODUCTS_CSV: &str = "\
product_service_name,subsidiary_name,business_segment,product_service_category,description,key_features,target_market,product_url
Ocrevus,Genentech,Pharmaceuticals,Neuroscience,MS therapy,Twice-yearly infusion,Neurology,https://www.ocrevus.com
Tecentriq,Genentech,Pharmaceuticals,Oncology,Immunotherapy,PD-L1 inhibitor,Oncology,
Actemra,Chugai,Pharmaceuticals,Immunology,,IL-6 receptor antibody,Rheumatology,
Accu-Chek,Roche Diagnostics,Diabetes Care,Diabetes Care,Blood glucose monitoring for insulin users,Insulin dosing advice,Patients,https://www.accu-chek.com
cobas 6800,Roche Diagnostics,Diagnostics,Molecular,High-throughput PCR,Automation,Laboratories,
";

fn write_csv_dir(dir: &Path) {
    fs::write(dir.join("subsidiaries.csv"), SUBSIDIARIES_CSV).unwrap();
    fs::write(dir.join("products_services.csv"), PRODUCTS_CSV).unwrap();
}

/// Build a SQLite database with the default table names from the CSV
/// fixtures above, so both sources describe the same data.
fn write_sqlite_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE subsidiaries (
             COMPANY_NAME TEXT, BUSINESS_SEGMENT TEXT, DESCRIPTION TEXT,
             KEY_PRODUCTS_SERVICES TEXT, MARKET_POSITION TEXT, WEBSITE_URL TEXT,
             CREATED_DATE TEXT, LAST_UPDATED TEXT);
         CREATE TABLE subsidiary_products_services (
             PRODUCT_SERVICE_NAME TEXT, SUBSIDIARY_NAME TEXT, BUSINESS_SEGMENT TEXT,
             PRODUCT_SERVICE_CATEGORY TEXT, DESCRIPTION TEXT, KEY_FEATURES TEXT,
             TARGET_MARKET TEXT, PRODUCT_URL TEXT);",
    )
    .unwrap();

    let mut subs = csv::Reader::from_reader(SUBSIDIARIES_CSV.as_bytes());
    for record in subs.records() {
        let record = record.unwrap();
        let values: Vec<Option<&str>> =
            record.iter().map(|v| (!v.is_empty()).then_some(v)).collect();
        conn.execute(
            "INSERT INTO subsidiaries VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params_from_iter(values),
        )
        .unwrap();
    }

    let mut products = csv::Reader::from_reader(PRODUCTS_CSV.as_bytes());
    for record in products.records() {
        let record = record.unwrap();
        let values: Vec<Option<&str>> =
            record.iter().map(|v| (!v.is_empty()).then_some(v)).collect();
        conn.execute(
            "INSERT INTO subsidiary_products_services VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params_from_iter(values),
        )
        .unwrap();
    }
}

fn csv_loader(dir: &Path, ttl: Duration) -> DatasetLoader {
    let source = source::from_config(&DataSourceConfig::csv(dir.to_path_buf())).unwrap();
    DatasetLoader::new(source, ttl)
}

fn sqlite_loader(path: &Path) -> DatasetLoader {
    let source = source::from_config(&DataSourceConfig::sqlite(path.to_path_buf())).unwrap();
    DatasetLoader::new(source, Duration::from_secs(300))
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn e2e_csv_source_loads_typed_tables() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));

    let subs = loader.subsidiaries().unwrap();
    assert_eq!(subs.len(), 4);
    assert_eq!(subs[0].company_name, "Genentech");
    // Empty and whitespace-only cells both read as absent.
    assert_eq!(subs[1].description, None);
    assert_eq!(subs[3].website_url, None);

    let products = loader.products().unwrap();
    assert_eq!(products.len(), 5);

    match loader.load_by_name("products_services").unwrap() {
        Table::ProductsServices(rows) => assert_eq!(rows.len(), 5),
        other => panic!("expected products table, got {:?}", other.dataset()),
    }
}

#[test]
fn e2e_sqlite_source_orders_rows_and_normalises_column_names() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("group.db");
    write_sqlite_db(&db);
    let loader = sqlite_loader(&db);

    let subs = loader.subsidiaries().unwrap();
    let order: Vec<&str> = subs.iter().map(|s| s.company_name.as_str()).collect();
    assert_eq!(
        order,
        ["Foundation Medicine", "Roche Diagnostics", "Chugai", "Genentech"]
    );

    let products = loader.products().unwrap();
    assert_eq!(products.len(), 5);
    assert_eq!(products[0].product_service_name, "Accu-Chek");
}

#[test]
fn e2e_missing_database_reports_open_error() {
    let dir = TempDir::new().unwrap();
    let loader = sqlite_loader(&dir.path().join("absent.db"));

    let err = loader.subsidiaries().unwrap_err();
    assert!(matches!(err, DataSourceError::Open { .. }), "got {err:?}");
    assert!(!err.remediation().is_empty());
}

#[test]
fn e2e_missing_csv_file_reports_io_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("subsidiaries.csv"), SUBSIDIARIES_CSV).unwrap();
    let loader = csv_loader(dir.path(), Duration::from_secs(300));

    assert!(loader.subsidiaries().is_ok());
    assert!(matches!(
        loader.products().unwrap_err(),
        DataSourceError::Io { .. }
    ));
}

#[test]
fn e2e_repeated_company_name_fails_the_load() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let repeated = format!(
        "{SUBSIDIARIES_CSV}Genentech,Diagnostics,Duplicate entry,,,,2023-01-10,2025-03-01\n"
    );
    fs::write(dir.path().join("subsidiaries.csv"), repeated).unwrap();
    let loader = csv_loader(dir.path(), Duration::from_secs(300));

    let err = loader.subsidiaries().unwrap_err();
    match &err {
        DataSourceError::DuplicateKey { row, value, .. } => {
            assert_eq!(*row, 5);
            assert_eq!(value, "Genentech");
        }
        other => panic!("expected a duplicate key error, got {other:?}"),
    }

    // The app shows the banner instead of a misleading segment mismatch.
    let mut state = AppState::new(loader, false);
    state.refresh();
    assert!(matches!(state.load_error, Some(DataSourceError::DuplicateKey { .. })));
    assert!(state.consistency.is_empty());
}

#[test]
fn e2e_unknown_dataset_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));

    assert!(matches!(
        loader.load_by_name("employees").unwrap_err(),
        DataSourceError::UnknownDataset { .. }
    ));
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn e2e_cached_table_survives_file_change_until_invalidated() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));

    let first = loader.subsidiaries().unwrap();
    assert_eq!(first.len(), 4);

    // Drop a row on disk; the cached table is still served.
    let trimmed: String = SUBSIDIARIES_CSV.lines().take(3).map(|l| format!("{l}\n")).collect();
    fs::write(dir.path().join("subsidiaries.csv"), trimmed).unwrap();
    assert_eq!(loader.subsidiaries().unwrap().len(), 4);

    loader.invalidate(Dataset::Subsidiaries);
    assert_eq!(loader.subsidiaries().unwrap().len(), 2);
    // The earlier snapshot is unaffected.
    assert_eq!(first.len(), 4);
}

#[test]
fn e2e_zero_ttl_rereads_every_time() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::ZERO);

    assert_eq!(loader.subsidiaries().unwrap().len(), 4);
    let trimmed: String = SUBSIDIARIES_CSV.lines().take(2).map(|l| format!("{l}\n")).collect();
    fs::write(dir.path().join("subsidiaries.csv"), trimmed).unwrap();
    assert_eq!(loader.subsidiaries().unwrap().len(), 1);
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn e2e_product_search_matches_description_and_features() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));
    let products = loader.products().unwrap();

    let mut filter = FilterState::default();
    filter.text_search = "INSULIN".to_string();
    let hits = filter::filter(&products, &filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].product_service_name, "Accu-Chek");
}

#[test]
fn e2e_segment_and_category_filters_combine() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));
    let products = loader.products().unwrap();

    let mut filter = FilterState::only(Column::BusinessSegment, "Pharmaceuticals");
    filter.restrict(
        Column::ProductServiceCategory,
        ["Oncology".to_string(), "Molecular".to_string()],
    );
    let hits = filter::filter(&products, &filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].product_service_name, "Tecentriq");

    // Deselecting everything shows nothing, rather than everything.
    filter.restrict(Column::BusinessSegment, []);
    assert!(filter::apply_filters(&products, &filter).is_empty());
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn e2e_cross_segment_summary_is_an_outer_join() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));
    let subs = loader.subsidiaries().unwrap();
    let products = loader.products().unwrap();

    let summary = aggregate::cross_segment_summary(&subs, &products);
    let segments: Vec<&str> = summary.iter().map(|s| s.business_segment.as_str()).collect();
    assert_eq!(segments, ["Diabetes Care", "Diagnostics", "Pharmaceuticals"]);

    // Product-only segment.
    assert_eq!(summary[0].subsidiary_count, 0);
    assert_eq!(summary[0].product_count, 1);
    assert_eq!(summary[0].products_per_subsidiary, 0.0);

    assert_eq!(summary[1].subsidiary_count, 2);
    assert_eq!(summary[1].product_count, 1);

    assert_eq!(summary[2].subsidiary_count, 2);
    assert_eq!(summary[2].product_count, 3);
    assert_eq!(summary[2].distinct_category_count, 3);
    assert!((summary[2].products_per_subsidiary - 1.5).abs() < 1e-9);
}

#[test]
fn e2e_completeness_treats_blank_as_missing() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));
    let subs = loader.subsidiaries().unwrap();

    let fields = aggregate::completeness(&subs, &[Column::Description, Column::WebsiteUrl]);
    assert_eq!(fields[0].percent, 75.0);
    assert_eq!(fields[1].percent, 50.0);
}

#[test]
fn e2e_consistency_flags_segment_mismatch() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let loader = csv_loader(dir.path(), Duration::from_secs(300));
    let subs = loader.subsidiaries().unwrap();
    let products = loader.products().unwrap();

    let issues = aggregate::check_consistency(&subs, &products);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].to_string().contains("Accu-Chek"));
}

#[test]
fn e2e_sqlite_and_csv_agree_on_report() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let db = dir.path().join("group.db");
    write_sqlite_db(&db);

    let from_csv = DashboardReport::build(&csv_loader(dir.path(), Duration::from_secs(300))).unwrap();
    let from_sqlite = DashboardReport::build(&sqlite_loader(&db)).unwrap();

    assert_eq!(from_csv.overview, from_sqlite.overview);
    assert_eq!(from_csv.segments, from_sqlite.segments);
    assert_eq!(from_csv.overview.total_subsidiaries, 4);
    assert_eq!(from_csv.overview.business_segments, 2);
}

// =============================================================================
// Application state
// =============================================================================

#[test]
fn e2e_state_refresh_counts_and_exportable_pages() {
    let dir = TempDir::new().unwrap();
    write_csv_dir(dir.path());
    let mut state = AppState::new(csv_loader(dir.path(), Duration::from_secs(300)), false);

    state.refresh();
    assert!(state.load_error.is_none());
    assert_eq!(state.subsidiaries.len(), 4);
    assert_eq!(state.consistency.len(), 1);

    state.subsidiary_filter = FilterState::only(Column::BusinessSegment, "Diagnostics");
    let count = state.subsidiary_count();
    assert_eq!((count.shown, count.total), (2, 4));

    state.subsidiary_filter.text_search = "no such company".to_string();
    assert!(state.subsidiary_count().warning().is_some());

    assert_eq!(Page::Subsidiaries.export_dataset(), Some(Dataset::Subsidiaries));
    assert_eq!(Page::Analytics.export_dataset(), None);
}
