//! stagecast_output::output
//!
//! Output-target runtime: the presentation window state machine and the
//! pieces it is assembled from.

// Lifecycle listener contract (surface -> window).
mod listener;
pub use listener::LifecycleListener;

// Collaborator seams (surface, placement, device geometry, capability).
mod collaborators;
pub use collaborators::{
    placement_for, DeviceGeometry, DeviceTable, FloatingPlacement, FullScreenPlacement,
    RenderSurface, StaticCapability, TransitionCapability, WindowPlacement,
};

// Hold timer.
mod wait_timer;
pub use wait_timer::WaitTimer;

// Diagnostics stream.
mod notices;
pub use notices::{DropReason, NoticeKind, PresentationNotice};

// Presentation window state machine.
mod window;
pub use window::PresentationWindow;

// Multi-target routing.
mod registry;
pub use registry::OutputRegistry;
