//! stagecast_sim
//!
//! Command-line driver for a single presentation window backed by the
//! simulated surface.

pub mod config;
pub mod scenario;
