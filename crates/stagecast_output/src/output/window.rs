use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use stagecast_core::config::{DeviceId, PresentationEventConfiguration, WindowMode};
use stagecast_core::error::{CoreError, Domain, Result};
use stagecast_core::event::{Event, EventId, EventKind};
use stagecast_core::geometry::Geometry;
use stagecast_core::presentation::{
    advance, decide, hold_delay, Dispatch, DispatchInput, Phase, Step,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{current_runtime, log_core_error};

use super::{
    placement_for, DeviceGeometry, DropReason, LifecycleListener, NoticeKind, PresentationNotice,
    RenderSurface, TransitionCapability, WaitTimer, WindowPlacement,
};

/// Presentation state machine for one output target.
///
/// Responsibilities:
/// - Decide whether a request runs now or waits behind the in-flight sequence
/// - Hold the single pending request (last request wins)
/// - Drive the hold timer of send-wait-clear events
/// - Reconcile window geometry right before an entrance paints
/// - Publish a notice stream for diagnostics
///
/// Phase, pending slot, hold timer and geometry live under one mutex. The lock
/// is never held while calling into the surface.
pub struct PresentationWindow {
    device_id: DeviceId,
    mode: WindowMode,
    wait_for_in_flight: bool,
    device_bounds: Geometry,
    // Resolved once at construction; animators are stripped when false.
    transitions: bool,
    surface: Arc<dyn RenderSurface>,
    placement: Box<dyn WindowPlacement>,
    state: Mutex<WindowState>,

    // broadcast so that a slow or absent subscriber never stalls a transition.
    notices: broadcast::Sender<PresentationNotice>,

    this: Weak<PresentationWindow>,
}

struct WindowState {
    phase: Phase,
    pending: Option<Event>,
    timer: WaitTimer,
    // Generation of the current hold; a firing with an older token is stale.
    hold_token: u64,
    geometry: Geometry,
    in_flight: Option<EventId>,
}

/// Public API (library user facing).
impl PresentationWindow {
    /// Create the window for the target described by `config`.
    ///
    /// Resolves device bounds and transition support once. Must be called from
    /// within a tokio runtime, which then drives the hold timer.
    pub fn new(
        config: &PresentationEventConfiguration,
        surface: Arc<dyn RenderSurface>,
        devices: &dyn DeviceGeometry,
        capability: &dyn TransitionCapability,
    ) -> Result<Arc<Self>> {
        let device_id = config.device_id().clone();
        let device_bounds = devices
            .device_bounds(&device_id)
            .ok_or_else(|| CoreError::unknown_device(device_id.as_str()))?;
        let runtime = current_runtime(Domain::Scheduler)?;
        let supported = capability.supports_transitions(&device_id);
        let mode = config.window_mode();

        // Full-screen covers the device once and is never placed again.
        let geometry = match mode {
            WindowMode::FullScreen => {
                surface.set_geometry(device_bounds);
                Geometry::sized(device_bounds.width, device_bounds.height)
            }
            WindowMode::Floating => Geometry::default(),
        };

        let (notices, _rx) = broadcast::channel(64);

        debug!(
            device = %device_id,
            mode = mode.label(),
            transitions = supported,
            "presentation window created"
        );

        Ok(Arc::new_cyclic(|this| Self {
            device_id,
            mode,
            wait_for_in_flight: config.wait_for_in_flight_transition(),
            device_bounds,
            transitions: supported,
            surface,
            placement: placement_for(mode),
            state: Mutex::new(WindowState {
                phase: Phase::Clear,
                pending: None,
                timer: WaitTimer::new(runtime),
                hold_token: 0,
                geometry,
                in_flight: None,
            }),
            notices,
            this: this.clone(),
        }))
    }

    /// Submit a request. Never blocks on animation.
    ///
    /// On return the event has either been delegated to the surface or stored
    /// as the pending event, which runs once the in-flight sequence is Clear.
    pub fn execute(&self, event: Event) {
        let event = if self.transitions {
            event
        } else {
            event.without_animators()
        };

        if event.kind() == EventKind::Clear {
            self.delegate(event);
            return;
        }

        let Some(required) = event.required_geometry(self.mode, self.device_bounds) else {
            return;
        };

        let (dispatch, superseded, accelerated, phase) = {
            let mut state = self.lock_state();
            let superseded = state.pending.take();

            let dispatch = decide(DispatchInput {
                mode: self.mode,
                wait_for_in_flight: self.wait_for_in_flight,
                required,
                current: state.geometry,
                phase: state.phase,
            });

            let mut accelerated = false;
            if dispatch == Dispatch::Queue {
                state.pending = Some(event.clone());
                state.timer.set_delay(Duration::ZERO);
                accelerated = state.timer.restart();
            }

            (dispatch, superseded, accelerated, state.phase)
        };

        if let Some(old) = superseded {
            self.report_dropped(&old, DropReason::Superseded, phase);
        }

        match dispatch {
            Dispatch::Immediate => self.delegate(event),
            Dispatch::Queue => {
                info!(
                    device = %self.device_id,
                    event = %event.id(),
                    phase = ?phase,
                    "geometry change must wait for in-flight sequence; queued"
                );
                self.notify(event.id(), NoticeKind::Queued, phase);
                if accelerated {
                    self.notify(event.id(), NoticeKind::Accelerated, phase);
                }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    /// Id of the event waiting behind the in-flight sequence.
    pub fn pending(&self) -> Option<EventId> {
        self.lock_state().pending.as_ref().map(Event::id)
    }

    /// Id of the content event currently entering, holding or showing.
    pub fn in_flight(&self) -> Option<EventId> {
        self.lock_state().in_flight
    }

    /// Current window geometry, device-relative.
    pub fn geometry(&self) -> Geometry {
        self.lock_state().geometry
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn window_mode(&self) -> WindowMode {
        self.mode
    }

    pub fn transitions_supported(&self) -> bool {
        self.transitions
    }

    /// Subscribe to the notice stream.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<PresentationNotice> {
        self.notices.subscribe()
    }
}

/// Internal plumbing.
impl PresentationWindow {
    fn lock_state(&self) -> MutexGuard<'_, WindowState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poison) => {
                warn!(device = %self.device_id, "presentation state mutex poisoned");
                poison.into_inner()
            }
        }
    }

    fn delegate(&self, event: Event) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        let phase = self.phase();
        debug!(device = %self.device_id, event = %event.label(), "delegating to surface");
        self.notify(event.id(), NoticeKind::Delegated, phase);

        let listener: Arc<dyn LifecycleListener> = this;
        self.surface.execute(event, listener);
    }

    fn notify(&self, event: EventId, kind: NoticeKind, phase: Phase) {
        // No receivers is fine: notices are diagnostics only.
        let _ = self.notices.send(PresentationNotice {
            event,
            kind,
            phase,
            at: Instant::now(),
        });
    }

    fn report_dropped(&self, event: &Event, reason: DropReason, phase: Phase) {
        warn!(
            device = %self.device_id,
            event = %event.label(),
            reason = ?reason,
            "event dropped"
        );
        self.notify(event.id(), NoticeKind::Dropped(reason), phase);
    }

    /// Apply a lifecycle step under the lock; rejected steps leave the phase unchanged.
    fn step(state: &mut WindowState, step: Step, event: &Event) -> Result<Phase> {
        let next = advance(state.phase, step, event.kind())?;
        debug!(event = %event.id(), from = ?state.phase, to = ?next, step = step.label(), "phase");
        state.phase = next;
        Ok(next)
    }

    fn rejected(&self, err: CoreError, event: &Event) {
        log_core_error(err);
        let phase = self.phase();
        self.notify(event.id(), NoticeKind::Rejected, phase);
    }

    /// Hold-timer body: clear the send-wait-clear that armed it, unless it is stale.
    fn hold_elapsed(&self, token: u64, clear: Event) {
        let (live, phase) = {
            let state = self.lock_state();
            (
                state.phase == Phase::Holding && state.hold_token == token,
                state.phase,
            )
        };

        if !live {
            debug!(device = %self.device_id, phase = ?phase, "stale hold timer ignored");
            self.notify(clear.id(), NoticeKind::StaleHold, phase);
            return;
        }

        self.execute(clear);
    }
}

impl LifecycleListener for PresentationWindow {
    fn in_transition_begin(&self, event: &Event) {
        let placed = {
            let mut state = self.lock_state();
            match Self::step(&mut state, Step::InBegin, event) {
                Ok(_) => {}
                Err(err) => {
                    drop(state);
                    self.rejected(err, event);
                    return;
                }
            }
            // A new entrance always supersedes a stale hold.
            state.timer.cancel();
            state.in_flight = Some(event.id());

            if self.mode == WindowMode::Floating {
                if let Some(required) = event.required_geometry(self.mode, self.device_bounds) {
                    state.geometry = required;
                }
            }
            state.geometry
        };

        // Resize before the surface paints: the event may have been queued while
        // the geometry differed.
        self.placement
            .place(self.surface.as_ref(), self.device_bounds, placed);
        self.surface.set_visible(true);
        self.surface.raise_to_front();

        self.notify(event.id(), NoticeKind::InBegin, Phase::Entering);
    }

    fn in_transition_complete(&self, event: &Event) {
        let mut accelerated = false;
        let mut drain = None;
        let phase = {
            let mut state = self.lock_state();
            let phase = match Self::step(&mut state, Step::InComplete, event) {
                Ok(phase) => phase,
                Err(err) => {
                    drop(state);
                    self.rejected(err, event);
                    return;
                }
            };

            if let Event::SendWaitClear(swc) = event {
                let pending = state.pending.is_some();
                let delay = hold_delay(swc.hold(), pending);
                accelerated = pending;

                state.hold_token += 1;
                let token = state.hold_token;
                let clear = Event::clear_for(swc);
                let this = self.this.clone();
                state.timer.start(delay, move || {
                    if let Some(window) = this.upgrade() {
                        window.hold_elapsed(token, clear);
                    }
                });
            } else if state.pending.is_some() {
                // A plain send has no hold to collapse; clear it so the pending request runs.
                accelerated = true;
                drain = Some(Event::clear(Arc::clone(event.config()), None));
            }
            phase
        };

        self.notify(event.id(), NoticeKind::InComplete, phase);
        if accelerated {
            info!(
                device = %self.device_id,
                event = %event.id(),
                "hold collapsed for pending request"
            );
            self.notify(event.id(), NoticeKind::Accelerated, phase);
        }
        if let Some(clear) = drain {
            self.execute(clear);
        }
    }

    fn out_transition_begin(&self, event: &Event) {
        let phase = {
            let mut state = self.lock_state();
            match Self::step(&mut state, Step::OutBegin, event) {
                Ok(phase) => {
                    state.timer.cancel();
                    phase
                }
                Err(err) => {
                    drop(state);
                    self.rejected(err, event);
                    return;
                }
            }
        };

        self.notify(event.id(), NoticeKind::OutBegin, phase);
    }

    fn out_transition_complete(&self, event: &Event) {
        let pending = {
            let mut state = self.lock_state();
            if let Err(err) = Self::step(&mut state, Step::OutComplete, event) {
                drop(state);
                self.rejected(err, event);
                return;
            }
            state.in_flight = None;
            state.pending.take()
        };

        self.surface.set_visible(false);
        self.notify(event.id(), NoticeKind::OutComplete, Phase::Clear);

        if let Some(next) = pending {
            debug!(device = %self.device_id, event = %next.label(), "running pending event");
            self.execute(next);
        }
    }

    fn event_dropped(&self, event: &Event) {
        let phase = self.phase();
        self.report_dropped(event, DropReason::Surface, phase);
    }
}

impl std::fmt::Debug for PresentationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationWindow")
            .field("device_id", &self.device_id)
            .field("mode", &self.mode)
            .field("device_bounds", &self.device_bounds)
            .finish_non_exhaustive()
    }
}

/// Unit tests for PresentationWindow, with the test body playing the surface.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DeviceTable, StaticCapability};
    use stagecast_core::event::{Animator, ContentFrame};

    #[derive(Default)]
    struct ManualSurface {
        executed: Mutex<Vec<Event>>,
        geometry: Mutex<Vec<Geometry>>,
        visible: Mutex<Option<bool>>,
    }

    impl ManualSurface {
        fn executed_ids(&self) -> Vec<EventId> {
            self.executed.lock().unwrap().iter().map(Event::id).collect()
        }

        fn last(&self) -> Event {
            self.executed.lock().unwrap().last().cloned().expect("something executed")
        }
    }

    impl RenderSurface for ManualSurface {
        fn execute(&self, event: Event, _listener: Arc<dyn LifecycleListener>) {
            self.executed.lock().unwrap().push(event);
        }
        fn set_geometry(&self, geometry: Geometry) {
            self.geometry.lock().unwrap().push(geometry);
        }
        fn set_visible(&self, visible: bool) {
            *self.visible.lock().unwrap() = Some(visible);
        }
        fn raise_to_front(&self) {}
    }

    fn devices() -> DeviceTable {
        DeviceTable::new().with_device("beamer", Geometry::new(1920, 0, 1920, 1080), true)
    }

    fn floating_window(
        surface: Arc<ManualSurface>,
    ) -> (Arc<PresentationWindow>, Arc<PresentationEventConfiguration>) {
        let cfg = PresentationEventConfiguration::floating("beamer").build().unwrap();
        let window =
            PresentationWindow::new(&cfg, surface, &devices(), &StaticCapability(true)).unwrap();
        (window, cfg)
    }

    fn show(window: &PresentationWindow, event: &Event) {
        window.in_transition_begin(event);
        window.in_transition_complete(event);
    }

    async fn wait_until<F: Fn() -> bool>(what: &str, f: F) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !f() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
    }

    async fn expect_notice(
        rx: &mut broadcast::Receiver<PresentationNotice>,
        event: EventId,
        kind: NoticeKind,
    ) -> PresentationNotice {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let notice = rx.recv().await.expect("notice stream open");
                if notice.event == event && notice.kind == kind {
                    return notice;
                }
            }
        })
        .await
        .unwrap_or_else(|_| panic!("missing {kind:?} for {event}"))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unknown_device_is_rejected() {
        let cfg = PresentationEventConfiguration::floating("nowhere").build().unwrap();
        let err = PresentationWindow::new(
            &cfg,
            Arc::new(ManualSurface::default()),
            &devices(),
            &StaticCapability(true),
        )
        .unwrap_err();
        assert_eq!(err.kind, stagecast_core::error::ErrorKind::UnknownDevice);
    }

    #[test]
    fn requires_a_runtime() {
        let cfg = PresentationEventConfiguration::floating("beamer").build().unwrap();
        let err = PresentationWindow::new(
            &cfg,
            Arc::new(ManualSurface::default()),
            &devices(),
            &StaticCapability(true),
        )
        .unwrap_err();
        assert_eq!(err.kind, stagecast_core::error::ErrorKind::NotSupported);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn entrance_places_floating_window_before_paint() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());

        let ev = Event::send(cfg, None, ContentFrame::new("slide", 800, 600).at(10, 20));
        window.execute(ev.clone());
        assert_eq!(surface.executed_ids(), vec![ev.id()]);

        window.in_transition_begin(&ev);
        assert_eq!(window.phase(), Phase::Entering);
        assert_eq!(window.geometry(), Geometry::new(10, 20, 800, 600));
        assert_eq!(
            surface.geometry.lock().unwrap().last().copied(),
            Some(Geometry::new(1930, 20, 800, 600))
        );
        assert_eq!(*surface.visible.lock().unwrap(), Some(true));

        window.in_transition_complete(&ev);
        assert_eq!(window.phase(), Phase::Showing);
        assert_eq!(window.in_flight(), Some(ev.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn window_mode_wins_over_event_config_mode() {
        let surface = Arc::new(ManualSurface::default());
        let (window, _) = floating_window(surface.clone());

        let full = PresentationEventConfiguration::fullscreen("beamer").build().unwrap();
        let ev = Event::send(full, None, ContentFrame::new("slide", 400, 300).at(10, 10));
        window.execute(ev.clone());
        window.in_transition_begin(&ev);

        assert_eq!(window.geometry(), Geometry::new(10, 10, 400, 300));
        assert_eq!(
            surface.geometry.lock().unwrap().last().copied(),
            Some(Geometry::new(1930, 10, 400, 300))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn differing_geometry_waits_then_runs_after_forced_clear() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());

        let big = Event::send(cfg.clone(), None, ContentFrame::new("big", 800, 600));
        window.execute(big.clone());
        show(&window, &big);

        let small = Event::send_wait_clear(
            cfg.clone(),
            None,
            ContentFrame::new("small", 400, 300),
            Some(Animator::fade(Duration::from_millis(50))),
            Duration::from_secs(30),
        );
        window.execute(small.clone());
        window.in_transition_begin(&small);
        assert_eq!(window.phase(), Phase::Entering);

        let back = Event::send(cfg, None, ContentFrame::new("big-again", 800, 600));
        window.execute(back.clone());
        assert_eq!(window.pending(), Some(back.id()));
        assert_eq!(surface.executed_ids(), vec![big.id(), small.id()]);

        // Entrance completes with a request waiting: the 30s hold collapses.
        window.in_transition_complete(&small);
        assert_eq!(window.phase(), Phase::Holding);
        wait_until("accelerated clear", || surface.executed_ids().len() == 3).await;

        let clear = surface.last();
        assert_eq!(clear.kind(), EventKind::Clear);
        assert_eq!(clear.out_animator().map(|a| a.name.as_ref()), Some("fade"));

        window.out_transition_begin(&clear);
        assert_eq!(window.pending(), Some(back.id()));
        window.out_transition_complete(&clear);

        assert_eq!(window.pending(), None);
        assert_eq!(surface.last().id(), back.id());

        show(&window, &back);
        assert_eq!(window.phase(), Phase::Showing);
        assert_eq!(window.geometry(), Geometry::sized(800, 600));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn queue_while_holding_fires_timer_immediately() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());

        let note = Event::send_wait_clear(
            cfg.clone(),
            None,
            ContentFrame::new("note", 400, 300),
            None,
            Duration::from_secs(30),
        );
        window.execute(note.clone());
        show(&window, &note);
        assert_eq!(window.phase(), Phase::Holding);

        let mut rx = window.subscribe_notices();
        let slide = Event::send(cfg, None, ContentFrame::new("slide", 800, 600));
        window.execute(slide.clone());

        wait_until("accelerated clear", || surface.executed_ids().len() == 2).await;
        assert_eq!(surface.last().kind(), EventKind::Clear);

        let queued = expect_notice(&mut rx, slide.id(), NoticeKind::Queued).await;
        let acc = expect_notice(&mut rx, slide.id(), NoticeKind::Accelerated).await;
        assert!(acc.at >= queued.at);
        assert_eq!(queued.phase, Phase::Holding);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn plain_send_is_cleared_when_a_request_waits_behind_it() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());

        let a = Event::send(cfg.clone(), None, ContentFrame::new("a", 400, 300));
        window.execute(a.clone());
        window.in_transition_begin(&a);

        let b = Event::send(cfg, None, ContentFrame::new("b", 800, 600));
        window.execute(b.clone());
        assert_eq!(window.pending(), Some(b.id()));

        window.in_transition_complete(&a);
        assert_eq!(window.phase(), Phase::Showing);

        let clear = surface.last();
        assert_eq!(clear.kind(), EventKind::Clear);
        window.out_transition_begin(&clear);
        window.out_transition_complete(&clear);
        assert_eq!(surface.last().id(), b.id());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn exiting_phase_delegates_without_waiting() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());

        let a = Event::send(cfg.clone(), None, ContentFrame::new("a", 800, 600));
        window.execute(a.clone());
        show(&window, &a);

        let clear = Event::clear(cfg.clone(), None);
        window.execute(clear.clone());
        window.out_transition_begin(&clear);

        let b = Event::send(cfg, None, ContentFrame::new("b", 400, 300));
        window.execute(b.clone());
        assert_eq!(window.pending(), None);
        assert_eq!(surface.last().id(), b.id());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stale_hold_is_a_no_op() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface.clone());
        let mut rx = window.subscribe_notices();

        let clear = Event::clear(cfg, None);
        window.hold_elapsed(42, clear.clone());

        assert!(surface.executed_ids().is_empty());
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.kind, NoticeKind::StaleHold);
        assert_eq!(notice.event, clear.id());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn out_of_order_completion_is_rejected_without_state_change() {
        let surface = Arc::new(ManualSurface::default());
        let (window, cfg) = floating_window(surface);
        let mut rx = window.subscribe_notices();

        let clear = Event::clear(cfg, None);
        window.out_transition_complete(&clear);

        assert_eq!(window.phase(), Phase::Clear);
        assert_eq!(rx.recv().await.unwrap().kind, NoticeKind::Rejected);
    }
}
