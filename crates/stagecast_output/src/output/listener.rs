use stagecast_core::event::Event;

/// Lifecycle callbacks a render surface reports while it works an event.
///
/// Contract for a given event:
/// - content events: `in_transition_begin -> in_transition_complete`
/// - clears: `out_transition_begin -> out_transition_complete`
/// - `event_dropped` instead of the above when the surface could not render
///
/// Callbacks may arrive from any thread; implementors must not block on the
/// animation they are being told about.
pub trait LifecycleListener: Send + Sync {
    fn in_transition_begin(&self, event: &Event);
    fn in_transition_complete(&self, event: &Event);
    fn out_transition_begin(&self, event: &Event);
    fn out_transition_complete(&self, event: &Event);

    /// Observational only: the event never started.
    fn event_dropped(&self, event: &Event);
}
