//! Presentation notice stream.
//!
//! Diagnostics feed for one output target: every routing decision and every
//! lifecycle callback the window accepts is published here. Subscribers are
//! observers only; nothing in the window depends on them.

use std::time::Instant;

use stagecast_core::event::EventId;
use stagecast_core::presentation::Phase;

/// Why an event never ran.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The surface reported `event_dropped` (render failure).
    Surface,
    /// A newer request replaced it in the pending slot.
    Superseded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// Handed to the surface.
    Delegated,
    /// Stored as the pending event behind the in-flight sequence.
    Queued,
    /// The hold of the in-flight sequence was collapsed to zero.
    Accelerated,
    InBegin,
    InComplete,
    OutBegin,
    OutComplete,
    Dropped(DropReason),
    /// A hold timer fired after its sequence had already moved on.
    StaleHold,
    /// A lifecycle callback the phase table rejected.
    Rejected,
}

/// Emitted by a presentation window. `phase` is the phase after the notice's step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationNotice {
    pub event: EventId,
    pub kind: NoticeKind,
    pub phase: Phase,
    pub at: Instant,
}
