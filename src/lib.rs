// SegmentLens - lib.rs
//
// Library entry point, exposing the loader, filter and aggregation layers
// for integration testing and headless reporting.
//
// The window itself (`gui`) lives in `main.rs` and is not part of the
// library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
