// SegmentLens - ui/panels/mod.rs

pub mod about;
pub mod analytics;
pub mod error_banner;
pub mod overview;
pub mod products;
pub mod segments;
pub mod subsidiaries;
