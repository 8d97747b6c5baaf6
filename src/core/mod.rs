// SegmentLens - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, chrono, serde, csv/serde_json (export only).
// Must NOT depend on: ui, platform, app, or any data source directly.

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod model;
pub mod table;
