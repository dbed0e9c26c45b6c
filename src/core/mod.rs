// PerfTrend - core/mod.rs
//
// Core business logic layer: discovery, extraction, assembly, export, and
// the statistics feeding the charts.
// Must NOT depend on: plot, platform, or app.

pub mod discovery;
pub mod export;
pub mod extract;
pub mod model;
pub mod stats;
pub mod table;
pub mod timestamp;
