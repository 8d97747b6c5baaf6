// SegmentLens - app/mod.rs
//
// Application layer: dataset loading and caching, state management,
// session persistence and the headless report.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod loader;
pub mod report;
pub mod session;
pub mod state;
