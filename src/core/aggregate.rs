// SegmentLens - core/aggregate.rs
//
// Aggregation engine: grouped counts, completeness ratios, cross-segment
// rollups and summary statistics over one or both datasets.
//
// Every function is pure. Inputs are borrowed immutably and nothing is
// cached here; caching belongs to the dataset loader.

use crate::core::filter::{apply_filters, FilterState};
use crate::core::model::{Column, ProductService, Record, Subsidiary};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// =============================================================================
// Category counts
// =============================================================================

/// Number of rows holding one value of a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Count rows per distinct value of `column`.
///
/// Sorted by descending count; ties keep the order in which the values were
/// first seen in `rows`. Absent values are not counted.
pub fn count_by_category<R: Record>(rows: &[R], column: Column) -> Vec<CategoryCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in rows.iter().filter_map(|r| r.text(column)) {
        match position.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(value, counts.len());
                counts.push(CategoryCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// [`count_by_category`] truncated to the first `n` entries. Never padded.
pub fn top_n<R: Record>(rows: &[R], column: Column, n: usize) -> Vec<CategoryCount> {
    let mut counts = count_by_category(rows, column);
    counts.truncate(n);
    counts
}

/// Distinct present values of `column` in first-seen order.
pub fn distinct_values<R: Record>(rows: &[R], column: Column) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|r| r.text(column))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Number of distinct present values of `column`.
pub fn distinct_count<R: Record>(rows: &[R], column: Column) -> usize {
    rows.iter()
        .filter_map(|r| r.text(column))
        .collect::<HashSet<_>>()
        .len()
}

// =============================================================================
// Completeness
// =============================================================================

/// Share of rows in which one column holds a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCompleteness {
    pub column: Column,
    /// 0.0 ..= 100.0
    pub percent: f64,
}

/// Whether `column` holds a value in `row`. Null, empty and whitespace-only
/// are uniformly absent, for every column kind.
fn is_present<R: Record>(row: &R, column: Column) -> bool {
    row.date(column).is_some() || row.text(column).is_some_and(|v| !v.trim().is_empty())
}

/// Percentage of rows with a present value, per requested column, in the
/// order requested. An empty table yields 0 % for every column.
pub fn completeness<R: Record>(rows: &[R], columns: &[Column]) -> Vec<FieldCompleteness> {
    columns
        .iter()
        .map(|&column| {
            let percent = if rows.is_empty() {
                0.0
            } else {
                let present = rows.iter().filter(|r| is_present(*r, column)).count();
                present as f64 / rows.len() as f64 * 100.0
            };
            FieldCompleteness { column, percent }
        })
        .collect()
}

// =============================================================================
// Cross-segment summary
// =============================================================================

/// Per-segment rollup joining both datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub business_segment: String,
    pub subsidiary_count: usize,
    pub product_count: usize,
    pub distinct_category_count: usize,
    /// `product_count / subsidiary_count`, or 0 when there are no subsidiaries.
    pub products_per_subsidiary: f64,
}

/// Outer join of both datasets on `business_segment`.
///
/// A segment present on only one side appears once with zero counts for the
/// other side. Rows are ordered by segment name.
pub fn cross_segment_summary(
    subsidiaries: &[Subsidiary],
    products: &[ProductService],
) -> Vec<SegmentSummary> {
    #[derive(Default)]
    struct Acc<'a> {
        subsidiaries: usize,
        products: usize,
        categories: HashSet<&'a str>,
    }

    let mut by_segment: BTreeMap<&str, Acc> = BTreeMap::new();
    for s in subsidiaries {
        by_segment
            .entry(s.business_segment.as_str())
            .or_default()
            .subsidiaries += 1;
    }
    for p in products {
        let acc = by_segment.entry(p.business_segment.as_str()).or_default();
        acc.products += 1;
        acc.categories.insert(p.product_service_category.as_str());
    }

    by_segment
        .into_iter()
        .map(|(segment, acc)| SegmentSummary {
            business_segment: segment.to_string(),
            subsidiary_count: acc.subsidiaries,
            product_count: acc.products,
            distinct_category_count: acc.categories.len(),
            products_per_subsidiary: if acc.subsidiaries == 0 {
                0.0
            } else {
                acc.products as f64 / acc.subsidiaries as f64
            },
        })
        .collect()
}

// =============================================================================
// Latest updated
// =============================================================================

/// The `n` rows with the most recent value in date `column`.
///
/// Descending by date; ties keep input order. Rows without a value in
/// `column` are skipped.
pub fn latest_updated<R: Record>(rows: &[R], column: Column, n: usize) -> Vec<&R> {
    let mut dated: Vec<_> = rows
        .iter()
        .filter_map(|r| r.date(column).map(|d| (d, r)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().take(n).map(|(_, r)| r).collect()
}

// =============================================================================
// Overview
// =============================================================================

/// Headline figures for the Overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OverviewMetrics {
    pub total_subsidiaries: usize,
    pub business_segments: usize,
    pub product_categories: usize,
    pub total_products: usize,
}

pub fn overview_metrics(subsidiaries: &[Subsidiary], products: &[ProductService]) -> OverviewMetrics {
    OverviewMetrics {
        total_subsidiaries: subsidiaries.len(),
        business_segments: distinct_count(subsidiaries, Column::BusinessSegment),
        product_categories: distinct_count(products, Column::ProductServiceCategory),
        total_products: products.len(),
    }
}

/// Subsidiary-side segment breakdown with product counts joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentOverview {
    pub business_segment: String,
    pub subsidiary_count: usize,
    /// Subsidiaries with a present website URL.
    pub with_website: usize,
    /// Products in the segment; 0 when the segment has none.
    pub product_count: usize,
}

/// Left join from subsidiary segments to product counts, ordered by segment
/// name. Segments that only appear among products are not listed.
pub fn segment_overview(
    subsidiaries: &[Subsidiary],
    products: &[ProductService],
) -> Vec<SegmentOverview> {
    let mut rows: BTreeMap<&str, SegmentOverview> = BTreeMap::new();
    for s in subsidiaries {
        let row = rows
            .entry(s.business_segment.as_str())
            .or_insert_with(|| SegmentOverview {
                business_segment: s.business_segment.clone(),
                subsidiary_count: 0,
                with_website: 0,
                product_count: 0,
            });
        row.subsidiary_count += 1;
        if is_present(s, Column::WebsiteUrl) {
            row.with_website += 1;
        }
    }
    for p in products {
        if let Some(row) = rows.get_mut(p.business_segment.as_str()) {
            row.product_count += 1;
        }
    }
    rows.into_values().collect()
}

// =============================================================================
// Segment detail
// =============================================================================

/// Everything the Business Segments page shows for one segment.
#[derive(Debug, Clone)]
pub struct SegmentDetail<'a> {
    pub business_segment: String,
    pub subsidiaries: Vec<&'a Subsidiary>,
    pub products: Vec<&'a ProductService>,
    pub category_counts: Vec<CategoryCount>,
    pub distinct_category_count: usize,
}

pub fn segment_detail<'a>(
    subsidiaries: &'a [Subsidiary],
    products: &'a [ProductService],
    segment: &str,
) -> SegmentDetail<'a> {
    let filter = FilterState::only(Column::BusinessSegment, segment);
    let segment_subsidiaries: Vec<&Subsidiary> = apply_filters(subsidiaries, &filter)
        .into_iter()
        .map(|i| &subsidiaries[i])
        .collect();
    let segment_products: Vec<&ProductService> = apply_filters(products, &filter)
        .into_iter()
        .map(|i| &products[i])
        .collect();
    let category_counts = count_by_category(&segment_products, Column::ProductServiceCategory);

    SegmentDetail {
        business_segment: segment.to_string(),
        distinct_category_count: category_counts.len(),
        subsidiaries: segment_subsidiaries,
        products: segment_products,
        category_counts,
    }
}

// =============================================================================
// Summary statistics
// =============================================================================

/// Descriptive statistics of a numeric column.
///
/// Everything except `count` is `None` for an empty input; `std` is also
/// `None` for a single value (sample standard deviation is undefined).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Quantile `q` of sorted `values` with linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn describe(values: &[f64]) -> SummaryStats {
    let count = values.len();
    if count == 0 {
        return SummaryStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    SummaryStats {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        p25: Some(quantile(&sorted, 0.25)),
        p50: Some(quantile(&sorted, 0.5)),
        p75: Some(quantile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// Statistics over the count columns of a cross-segment summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentStatistics {
    pub subsidiary_count: SummaryStats,
    pub product_count: SummaryStats,
    pub category_count: SummaryStats,
}

pub fn segment_statistics(summary: &[SegmentSummary]) -> SegmentStatistics {
    let column = |f: fn(&SegmentSummary) -> usize| -> Vec<f64> {
        summary.iter().map(|s| f(s) as f64).collect()
    };
    SegmentStatistics {
        subsidiary_count: describe(&column(|s| s.subsidiary_count)),
        product_count: describe(&column(|s| s.product_count)),
        category_count: describe(&column(|s| s.distinct_category_count)),
    }
}

// =============================================================================
// Referential consistency
// =============================================================================

/// A product row that disagrees with the subsidiaries table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// `subsidiary_name` matches no `company_name`.
    UnknownSubsidiary { product: String, subsidiary: String },

    /// The product's segment differs from its subsidiary's segment.
    SegmentMismatch {
        product: String,
        subsidiary: String,
        product_segment: String,
        subsidiary_segment: String,
    },
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSubsidiary {
                product,
                subsidiary,
            } => write!(
                f,
                "Product '{product}' references unknown subsidiary '{subsidiary}'"
            ),
            Self::SegmentMismatch {
                product,
                subsidiary,
                product_segment,
                subsidiary_segment,
            } => write!(
                f,
                "Product '{product}' is in segment '{product_segment}' but its subsidiary \
                 '{subsidiary}' is in '{subsidiary_segment}'"
            ),
        }
    }
}

/// Report products whose foreign key or redundant segment disagree with the
/// subsidiaries table, in product order.
pub fn check_consistency(
    subsidiaries: &[Subsidiary],
    products: &[ProductService],
) -> Vec<ConsistencyIssue> {
    let segment_of: HashMap<&str, &str> = subsidiaries
        .iter()
        .map(|s| (s.company_name.as_str(), s.business_segment.as_str()))
        .collect();

    products
        .iter()
        .filter_map(|p| match segment_of.get(p.subsidiary_name.as_str()) {
            None => Some(ConsistencyIssue::UnknownSubsidiary {
                product: p.product_service_name.clone(),
                subsidiary: p.subsidiary_name.clone(),
            }),
            Some(&segment) if segment != p.business_segment => {
                Some(ConsistencyIssue::SegmentMismatch {
                    product: p.product_service_name.clone(),
                    subsidiary: p.subsidiary_name.clone(),
                    product_segment: p.business_segment.clone(),
                    subsidiary_segment: segment.to_string(),
                })
            }
            Some(_) => None,
        })
        .collect()
}
