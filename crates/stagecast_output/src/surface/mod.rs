//! Render surface implementations.
//!
//! Real toolkit adapters live with the application; this crate ships the
//! simulated surface used by the sim tool and the tests.

pub mod simulated;

pub use simulated::SimulatedSurface;
