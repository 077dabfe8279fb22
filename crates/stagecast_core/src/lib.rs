//! stagecast_core: runtime-free core of the presentation output scheduler.
//!
//! Design goals:
//! - Pure, testable logic (no threads, no timers, no toolkit).
//! - Explicit types; no macro wizardry.
//! - Small, stable public API surface.

pub mod error;

/// Output target configuration (device, window mode, behavioral options).
pub mod config;

/// Device-relative rectangles and the content-to-window geometry rule.
pub mod geometry;

/// Requested operations: send, send-wait-clear and clear.
pub mod event;

/// Presentation phase machine + dispatch decision.
pub mod presentation;
