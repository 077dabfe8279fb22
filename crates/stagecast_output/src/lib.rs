//! stagecast_output
//!
//! Runtime layer of the presentation output scheduler.
//! Owns locks, timers and surface delegation, while keeping phase semantics
//! in `stagecast_core`.

// Public modules
pub mod error;

pub mod output;
pub mod surface;

// Re-export core types that output users will commonly need
pub use stagecast_core::config::{
    DeviceId, PresentationEventConfiguration, RenderQuality, WindowMode,
};
pub use stagecast_core::error::{CoreError, Result};
pub use stagecast_core::event::{Animator, ContentFrame, Event, EventId, EventKind};
pub use stagecast_core::geometry::Geometry;
pub use stagecast_core::presentation::Phase;
