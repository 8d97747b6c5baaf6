// SegmentLens - app/report.rs
//
// Headless report for `--report`: overview metrics, the cross-segment
// summary and its statistics, serialised as one JSON document.

use crate::app::loader::DatasetLoader;
use crate::core::aggregate::{self, OverviewMetrics, SegmentStatistics, SegmentSummary};
use crate::util::error::DataSourceError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub source: String,
    pub overview: OverviewMetrics,
    pub segments: Vec<SegmentSummary>,
    pub statistics: SegmentStatistics,
}

impl DashboardReport {
    /// Load both datasets through `loader` and aggregate them.
    pub fn build(loader: &DatasetLoader) -> Result<Self, DataSourceError> {
        let subsidiaries = loader.subsidiaries()?;
        let products = loader.products()?;

        let segments = aggregate::cross_segment_summary(&subsidiaries, &products);
        let statistics = aggregate::segment_statistics(&segments);
        Ok(Self {
            source: loader.source_description(),
            overview: aggregate::overview_metrics(&subsidiaries, &products),
            segments,
            statistics,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Dataset;
    use crate::core::table::{DataSource, RawTable};
    use std::time::Duration;

    struct StaticSource;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn header(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    impl DataSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn fetch(&self, dataset: Dataset) -> Result<RawTable, DataSourceError> {
            Ok(match dataset {
                Dataset::Subsidiaries => RawTable::new(
                    header(&["company_name", "business_segment", "created_date", "last_updated"]),
                    vec![
                        cells(&["Acme Bio", "Pharma", "2024-01-01", "2024-06-01"]),
                        cells(&["Acme Labs", "Pharma", "2024-01-01", "2024-06-01"]),
                        cells(&["Orbit", "Aero", "2024-01-01", "2024-06-01"]),
                    ],
                ),
                Dataset::ProductsServices => RawTable::new(
                    header(&[
                        "subsidiary_name",
                        "business_segment",
                        "product_service_name",
                        "product_service_category",
                    ]),
                    vec![cells(&["Acme Bio", "Pharma", "Insulin pen", "Devices"])],
                ),
            })
        }
    }

    #[test]
    fn test_report_aggregates_both_datasets() {
        let loader = DatasetLoader::new(Box::new(StaticSource), Duration::from_secs(60));
        let report = DashboardReport::build(&loader).unwrap();

        assert_eq!(report.source, "static");
        assert_eq!(report.overview.total_subsidiaries, 3);
        assert_eq!(report.overview.total_products, 1);
        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.segments[0].business_segment, "Aero");
        assert_eq!(report.segments[0].product_count, 0);
        assert_eq!(report.statistics.subsidiary_count.count, 2);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"products_per_subsidiary\""));
    }
}
