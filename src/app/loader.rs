// SegmentLens - app/loader.rs
//
// Dataset loader with a per-dataset time-to-live cache.
//
// The data source is injected at construction. Each dataset is fetched at
// most once per TTL window; a cached table is an immutable `Arc` that is
// replaced wholesale on refresh, so readers never observe a partial table.

use crate::core::model::{Dataset, ProductService, Subsidiary, Table};
use crate::core::table::{self, DataSource, RawTable};
use crate::util::error::DataSourceError;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// One cached dataset.
struct Cached<T> {
    rows: Arc<Vec<T>>,
    fetched_at: Instant,
}

/// Cache slot for a single dataset. `None` until the first successful load
/// and after invalidation.
struct Slot<T> {
    entry: RwLock<Option<Cached<T>>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    /// The cached rows if they are younger than `ttl`.
    fn fresh(&self, ttl: Duration) -> Option<Arc<Vec<T>>> {
        let guard = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < ttl)
            .map(|c| Arc::clone(&c.rows))
    }

    fn store(&self, rows: Arc<Vec<T>>) {
        let mut guard = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Cached {
            rows,
            fetched_at: Instant::now(),
        });
    }

    fn clear(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn fetched_at(&self) -> Option<Instant> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.fetched_at)
    }
}

/// Loads the two datasets from a `DataSource`, caching each for `ttl`.
///
/// A TTL of zero disables caching: every load goes to the source. Failed
/// fetches are never cached and never retried here; the caller surfaces the
/// error and the user reloads.
pub struct DatasetLoader {
    source: Box<dyn DataSource>,
    ttl: Duration,
    subsidiaries: Slot<Subsidiary>,
    products: Slot<ProductService>,
}

impl DatasetLoader {
    pub fn new(source: Box<dyn DataSource>, ttl: Duration) -> Self {
        tracing::info!(
            source = %source.describe(),
            ttl_secs = ttl.as_secs(),
            "Dataset loader created"
        );
        Self {
            source,
            ttl,
            subsidiaries: Slot::empty(),
            products: Slot::empty(),
        }
    }

    /// Human-readable description of the underlying source.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load a dataset, from cache when fresh.
    pub fn load(&self, dataset: Dataset) -> Result<Table, DataSourceError> {
        Ok(match dataset {
            Dataset::Subsidiaries => Table::Subsidiaries(self.subsidiaries()?),
            Dataset::ProductsServices => Table::ProductsServices(self.products()?),
        })
    }

    /// Load a dataset by its boundary name, e.g. `"subsidiaries"`.
    pub fn load_by_name(&self, name: &str) -> Result<Table, DataSourceError> {
        let dataset = Dataset::from_name(name).ok_or_else(|| DataSourceError::UnknownDataset {
            name: name.to_string(),
        })?;
        self.load(dataset)
    }

    pub fn subsidiaries(&self) -> Result<Arc<Vec<Subsidiary>>, DataSourceError> {
        self.load_slot(
            Dataset::Subsidiaries,
            &self.subsidiaries,
            table::subsidiaries_from_raw,
        )
    }

    pub fn products(&self) -> Result<Arc<Vec<ProductService>>, DataSourceError> {
        self.load_slot(
            Dataset::ProductsServices,
            &self.products,
            table::products_from_raw,
        )
    }

    /// Drop one cached dataset so the next load fetches it.
    pub fn invalidate(&self, dataset: Dataset) {
        match dataset {
            Dataset::Subsidiaries => self.subsidiaries.clear(),
            Dataset::ProductsServices => self.products.clear(),
        }
        tracing::debug!(dataset = %dataset, "Cache entry invalidated");
    }

    pub fn invalidate_all(&self) {
        for dataset in Dataset::all() {
            self.invalidate(*dataset);
        }
    }

    /// When the cached copy of `dataset` was fetched, if there is one.
    pub fn fetched_at(&self, dataset: Dataset) -> Option<Instant> {
        match dataset {
            Dataset::Subsidiaries => self.subsidiaries.fetched_at(),
            Dataset::ProductsServices => self.products.fetched_at(),
        }
    }

    fn load_slot<T>(
        &self,
        dataset: Dataset,
        slot: &Slot<T>,
        convert: fn(&RawTable) -> Result<Vec<T>, DataSourceError>,
    ) -> Result<Arc<Vec<T>>, DataSourceError> {
        if let Some(rows) = slot.fresh(self.ttl) {
            tracing::debug!(dataset = %dataset, rows = rows.len(), "Dataset cache hit");
            return Ok(rows);
        }

        let started = Instant::now();
        let rows = self
            .source
            .fetch(dataset)
            .and_then(|raw| convert(&raw))
            .map_err(|e| {
                tracing::warn!(dataset = %dataset, error = %e, "Dataset load failed");
                e
            })?;
        let rows = Arc::new(rows);
        slot.store(Arc::clone(&rows));

        tracing::info!(
            dataset = %dataset,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset fetched"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts fetches per dataset.
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        fail: bool,
    }

    impl DataSource for CountingSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self, dataset: Dataset) -> Result<RawTable, DataSourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataSourceError::MissingColumn {
                    dataset: dataset.name().to_string(),
                    column: "company_name",
                });
            }
            let cells = |v: &[&str]| v.iter().map(|s| Some(s.to_string())).collect::<Vec<_>>();
            Ok(match dataset {
                Dataset::Subsidiaries => RawTable::new(
                    ["COMPANY_NAME", "BUSINESS_SEGMENT", "CREATED_DATE", "LAST_UPDATED"]
                        .map(String::from)
                        .to_vec(),
                    vec![cells(&["Genentech", "Pharma", "2024-01-01", "2025-01-01"])],
                ),
                Dataset::ProductsServices => RawTable::new(
                    [
                        "PRODUCT_SERVICE_NAME",
                        "SUBSIDIARY_NAME",
                        "BUSINESS_SEGMENT",
                        "PRODUCT_SERVICE_CATEGORY",
                    ]
                    .map(String::from)
                    .to_vec(),
                    vec![
                        cells(&["Ocrevus", "Genentech", "Pharma", "Neuroscience"]),
                        cells(&["Tecentriq", "Genentech", "Pharma", "Oncology"]),
                    ],
                ),
            })
        }
    }

    fn loader(ttl: Duration, fail: bool) -> (DatasetLoader, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: Arc::clone(&fetches),
            fail,
        };
        (DatasetLoader::new(Box::new(source), ttl), fetches)
    }

    #[test]
    fn test_fresh_cache_is_served_without_fetch() {
        let (loader, fetches) = loader(Duration::from_secs(300), false);
        let first = loader.subsidiaries().unwrap();
        let second = loader.subsidiaries().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second), "cache must share the same table");
        assert_eq!(first[0].company_name, "Genentech");
    }

    #[test]
    fn test_datasets_are_cached_independently() {
        let (loader, fetches) = loader(Duration::from_secs(300), false);
        assert_eq!(loader.load(Dataset::ProductsServices).unwrap().len(), 2);
        assert!(loader.fetched_at(Dataset::Subsidiaries).is_none());
        loader.load(Dataset::Subsidiaries).unwrap();
        loader.load(Dataset::ProductsServices).unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_ttl_always_fetches() {
        let (loader, fetches) = loader(Duration::ZERO, false);
        loader.products().unwrap();
        loader.products().unwrap();
        loader.products().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_expired_entry_is_refetched() {
        let (loader, fetches) = loader(Duration::from_millis(20), false);
        loader.subsidiaries().unwrap();
        std::thread::sleep(Duration::from_millis(40));
        loader.subsidiaries().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let (loader, fetches) = loader(Duration::from_secs(300), false);
        loader.subsidiaries().unwrap();
        loader.invalidate_all();
        assert!(loader.fetched_at(Dataset::Subsidiaries).is_none());
        loader.subsidiaries().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let (loader, fetches) = loader(Duration::from_secs(300), true);
        assert!(loader.subsidiaries().is_err());
        assert!(loader.subsidiaries().is_err());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert!(loader.fetched_at(Dataset::Subsidiaries).is_none());
    }

    #[test]
    fn test_unknown_dataset_name() {
        let (loader, fetches) = loader(Duration::from_secs(300), false);
        let err = loader.load_by_name("orders").unwrap_err();
        assert!(matches!(err, DataSourceError::UnknownDataset { .. }));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(
            loader.load_by_name("SUBSIDIARIES").unwrap().dataset(),
            Dataset::Subsidiaries
        );
    }

    #[test]
    fn test_concurrent_readers_share_one_table() {
        let (loader, _) = loader(Duration::from_secs(300), false);
        let loader = Arc::new(loader);
        let expected = loader.products().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = Arc::clone(&loader);
                std::thread::spawn(move || loader.products().unwrap())
            })
            .collect();
        for handle in handles {
            assert!(Arc::ptr_eq(&handle.join().unwrap(), &expected));
        }
    }
}
