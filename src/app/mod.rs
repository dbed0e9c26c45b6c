// PerfTrend - app/mod.rs
//
// Application layer: orchestration of a batch run.
// Dependencies: core, platform, plot, util.

pub mod pipeline;
