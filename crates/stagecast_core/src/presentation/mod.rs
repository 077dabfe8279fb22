//! stagecast_core::presentation
//!
//! Pure presentation phase semantics for one output target.
//! This module intentionally contains **no** timers, threads or surface code.
//!
//! Key ideas:
//! - Stable phases (Clear, Showing) + transition phases (Entering, Holding, Exiting)
//! - Surface lifecycle steps drive the phase through `advance()`
//! - `decide()` chooses between delegating a request now and queueing it
//! - Runtime layer owns the lock, the pending slot and the hold timer

mod engine;
mod graph;
mod phase;
mod step;

pub use engine::{advance, decide, hold_delay, Dispatch, DispatchInput};
pub use graph::{phase_graph, PhaseEdge, PhaseGraph};
pub use phase::{Phase, ALL_PHASES};
pub use step::{Step, ALL_STEPS};
