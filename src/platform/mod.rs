// SegmentLens - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml and the concrete
// data sources.
// Dependencies: standard library, directories, toml, rusqlite, csv; core
// only for the DataSource trait and the dataset vocabulary.
// Must NOT depend on: app, ui.

pub mod config;
pub mod source;
