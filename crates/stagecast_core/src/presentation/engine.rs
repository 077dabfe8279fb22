use std::time::Duration;

use crate::config::WindowMode;
use crate::error::{CoreError, Result};
use crate::event::EventKind;
use crate::geometry::Geometry;

use super::{Phase, Step};

/// Apply one surface lifecycle step to the current phase.
///
/// This enforces:
/// - entrances only for content events, exits only for clears
/// - completions only from the matching intermediate phase
///
/// Entrances and exits may begin from any phase: a new entrance supersedes a
/// stale hold, and a full-screen surface serializes overlapping paints itself.
pub fn advance(current: Phase, step: Step, kind: EventKind) -> Result<Phase> {
    use Phase::*;
    use Step::*;

    let next = match (current, step, kind) {
        (_, InBegin, EventKind::Send | EventKind::SendWaitClear) => Entering,

        (Entering, InComplete, EventKind::SendWaitClear) => Holding,
        (Entering, InComplete, EventKind::Send) => Showing,

        (_, OutBegin, EventKind::Clear) => Exiting,
        (Exiting, OutComplete, EventKind::Clear) => Clear,

        _ => return Err(CoreError::invalid_phase_step(current.id(), step.id())),
    };

    Ok(next)
}

/// What `execute` does with a content event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Dispatch {
    /// Delegate to the surface right away.
    Immediate,
    /// Store as the pending event and accelerate the in-flight sequence to Clear.
    Queue,
}

/// Inputs to [`decide`], snapshotted under the window lock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DispatchInput {
    pub mode: WindowMode,
    pub wait_for_in_flight: bool,
    pub required: Geometry,
    pub current: Geometry,
    pub phase: Phase,
}

/// Decide whether a content event runs now or waits for the in-flight sequence.
///
/// Only a floating window that must change geometry while an entrance or hold
/// is in progress waits; geometry is compared exactly, so a one-pixel
/// difference still waits.
pub fn decide(input: DispatchInput) -> Dispatch {
    if input.mode == WindowMode::FullScreen
        || !input.wait_for_in_flight
        || input.required == input.current
    {
        return Dispatch::Immediate;
    }

    if input.phase.blocks_resize() {
        Dispatch::Queue
    } else {
        Dispatch::Immediate
    }
}

/// Delay for the hold timer started when a send-wait-clear finishes entering.
///
/// Collapses to zero when a request is already waiting behind this sequence.
pub fn hold_delay(hold: Duration, pending: bool) -> Duration {
    if pending { Duration::ZERO } else { hold }
}
