// PerfTrend - lib.rs
//
// Library entry point, exposing every layer for integration testing and
// programmatic use. The binary in `main.rs` only adds argument parsing and
// process exit handling.

pub mod app;
pub mod core;
pub mod platform;
pub mod plot;
pub mod util;
