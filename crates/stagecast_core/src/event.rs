//! Event model.
//!
//! Events are immutable, created per request, and consumed exactly once
//! (executed or dropped). Each carries a process-unique [`EventId`] so
//! diagnostics and the hold timer can tell requests apart.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{PresentationEventConfiguration, WindowMode};
use crate::geometry::{required_geometry, Geometry};

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique event identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EventId(u64);

impl EventId {
    fn next() -> Self {
        Self(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque animation reference. The scheduler only strips or forwards it;
/// the surface interprets name and duration.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Animator {
    pub name: Cow<'static, str>,
    pub duration: Duration,
}

impl Animator {
    pub fn new(name: impl Into<Cow<'static, str>>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    pub fn fade(duration: Duration) -> Self {
        Self::new("fade", duration)
    }
}

/// The rendered frame being displayed. Opaque beyond its size and offset.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ContentFrame {
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Device-relative position for floating windows; ignored full-screen.
    pub offset: Option<(i32, i32)>,
}

impl ContentFrame {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            offset: None,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.offset = Some((x, y));
        self
    }
}

/// Discriminant of [`Event`], used by the phase tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Send,
    SendWaitClear,
    Clear,
}

impl EventKind {
    pub const fn id(self) -> u8 {
        match self {
            EventKind::Send => 1,
            EventKind::SendWaitClear => 2,
            EventKind::Clear => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EventKind::Send => "send",
            EventKind::SendWaitClear => "send-wait-clear",
            EventKind::Clear => "clear",
        }
    }
}

pub const ALL_EVENT_KINDS: [EventKind; 3] =
    [EventKind::Send, EventKind::SendWaitClear, EventKind::Clear];

/// Show content and remain.
#[derive(Debug, Clone, PartialEq)]
pub struct SendEvent {
    id: EventId,
    config: Arc<PresentationEventConfiguration>,
    in_animator: Option<Animator>,
    content: Arc<ContentFrame>,
}

/// Show content, hold it, then clear automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct SendWaitClearEvent {
    id: EventId,
    config: Arc<PresentationEventConfiguration>,
    in_animator: Option<Animator>,
    content: Arc<ContentFrame>,
    out_animator: Option<Animator>,
    hold: Duration,
}

impl SendWaitClearEvent {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn out_animator(&self) -> Option<&Animator> {
        self.out_animator.as_ref()
    }
}

/// Hide whatever is currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearEvent {
    id: EventId,
    config: Arc<PresentationEventConfiguration>,
    out_animator: Option<Animator>,
}

/// A requested operation on one output target.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Send(SendEvent),
    SendWaitClear(SendWaitClearEvent),
    Clear(ClearEvent),
}

impl Event {
    pub fn send(
        config: Arc<PresentationEventConfiguration>,
        in_animator: Option<Animator>,
        content: impl Into<Arc<ContentFrame>>,
    ) -> Self {
        Event::Send(SendEvent {
            id: EventId::next(),
            config,
            in_animator,
            content: content.into(),
        })
    }

    pub fn send_wait_clear(
        config: Arc<PresentationEventConfiguration>,
        in_animator: Option<Animator>,
        content: impl Into<Arc<ContentFrame>>,
        out_animator: Option<Animator>,
        hold: Duration,
    ) -> Self {
        Event::SendWaitClear(SendWaitClearEvent {
            id: EventId::next(),
            config,
            in_animator,
            content: content.into(),
            out_animator,
            hold,
        })
    }

    pub fn clear(
        config: Arc<PresentationEventConfiguration>,
        out_animator: Option<Animator>,
    ) -> Self {
        Event::Clear(ClearEvent {
            id: EventId::next(),
            config,
            out_animator,
        })
    }

    /// The clear a send-wait-clear schedules for itself once its hold elapses.
    pub fn clear_for(source: &SendWaitClearEvent) -> Self {
        Self::clear(Arc::clone(&source.config), source.out_animator.clone())
    }

    pub fn id(&self) -> EventId {
        match self {
            Event::Send(e) => e.id,
            Event::SendWaitClear(e) => e.id,
            Event::Clear(e) => e.id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Send(_) => EventKind::Send,
            Event::SendWaitClear(_) => EventKind::SendWaitClear,
            Event::Clear(_) => EventKind::Clear,
        }
    }

    pub fn config(&self) -> &Arc<PresentationEventConfiguration> {
        match self {
            Event::Send(e) => &e.config,
            Event::SendWaitClear(e) => &e.config,
            Event::Clear(e) => &e.config,
        }
    }

    /// Content to display; `None` for clears.
    pub fn content(&self) -> Option<&ContentFrame> {
        match self {
            Event::Send(e) => Some(&e.content),
            Event::SendWaitClear(e) => Some(&e.content),
            Event::Clear(_) => None,
        }
    }

    pub fn in_animator(&self) -> Option<&Animator> {
        match self {
            Event::Send(e) => e.in_animator.as_ref(),
            Event::SendWaitClear(e) => e.in_animator.as_ref(),
            Event::Clear(_) => None,
        }
    }

    pub fn out_animator(&self) -> Option<&Animator> {
        match self {
            Event::Send(_) => None,
            Event::SendWaitClear(e) => e.out_animator.as_ref(),
            Event::Clear(e) => e.out_animator.as_ref(),
        }
    }

    /// Hold period of a send-wait-clear.
    pub fn hold(&self) -> Option<Duration> {
        match self {
            Event::SendWaitClear(e) => Some(e.hold),
            _ => None,
        }
    }

    /// Same event (same id) with every animator removed: instant cuts.
    pub fn without_animators(self) -> Self {
        match self {
            Event::Send(mut e) => {
                e.in_animator = None;
                Event::Send(e)
            }
            Event::SendWaitClear(mut e) => {
                e.in_animator = None;
                e.out_animator = None;
                Event::SendWaitClear(e)
            }
            Event::Clear(mut e) => {
                e.out_animator = None;
                Event::Clear(e)
            }
        }
    }

    /// Device-relative geometry a window in `mode` needs to show this event's
    /// content on a device with the given bounds. `None` for clears.
    pub fn required_geometry(&self, mode: WindowMode, device: Geometry) -> Option<Geometry> {
        self.content()
            .map(|c| required_geometry(mode, device, c.width, c.height, c.offset))
    }

    /// Short label for logs: `send-wait-clear #12 (slide-3)`.
    pub fn label(&self) -> String {
        match self.content() {
            Some(c) => format!("{} {} ({})", self.kind().label(), self.id(), c.label),
            None => format!("{} {}", self.kind().label(), self.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Arc<PresentationEventConfiguration> {
        PresentationEventConfiguration::floating("beamer").build().unwrap()
    }

    #[test]
    fn ids_are_unique() {
        let a = Event::clear(cfg(), None);
        let b = Event::clear(cfg(), None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn without_animators_keeps_identity() {
        let fade = Animator::fade(Duration::from_millis(200));
        let ev = Event::send_wait_clear(
            cfg(),
            Some(fade.clone()),
            ContentFrame::new("slide", 400, 300),
            Some(fade),
            Duration::from_millis(500),
        );
        let id = ev.id();

        let stripped = ev.without_animators();
        assert_eq!(stripped.id(), id);
        assert!(stripped.in_animator().is_none());
        assert!(stripped.out_animator().is_none());
        assert_eq!(stripped.hold(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn clear_for_reuses_out_animator_and_config() {
        let out = Animator::new("wipe", Duration::from_millis(120));
        let ev = Event::send_wait_clear(
            cfg(),
            None,
            ContentFrame::new("note", 200, 100),
            Some(out.clone()),
            Duration::from_secs(2),
        );
        let Event::SendWaitClear(swc) = &ev else {
            panic!("expected send-wait-clear");
        };

        let clear = Event::clear_for(swc);
        assert_eq!(clear.kind(), EventKind::Clear);
        assert_eq!(clear.out_animator(), Some(&out));
        assert!(Arc::ptr_eq(clear.config(), ev.config()));
        assert_ne!(clear.id(), ev.id());
    }

    #[test]
    fn required_geometry_follows_the_given_mode() {
        let device = Geometry::new(0, 0, 1920, 1080);
        let content = ContentFrame::new("lower-third", 1920, 200).at(0, 880);

        // The event's own configuration mode does not enter into it.
        let full = PresentationEventConfiguration::fullscreen("beamer").build().unwrap();
        let ev = Event::send(full, None, content);
        assert_eq!(
            ev.required_geometry(WindowMode::Floating, device),
            Some(Geometry::new(0, 880, 1920, 200))
        );
        assert_eq!(
            ev.required_geometry(WindowMode::FullScreen, device),
            Some(Geometry::sized(1920, 1080))
        );

        let clear = Event::clear(cfg(), None);
        assert_eq!(clear.required_geometry(WindowMode::Floating, device), None);
    }
}
