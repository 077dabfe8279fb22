//! Simulated render surface.
//!
//! Serializes requests through a single worker task (FIFO), "animates" by
//! sleeping the animator duration (instant cut when there is none), and reports
//! lifecycle callbacks in contract order from the worker.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stagecast_core::error::{Domain, Result};
use stagecast_core::event::{Animator, Event, EventKind};
use stagecast_core::geometry::Geometry;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::current_runtime;
use crate::output::{LifecycleListener, RenderSurface};

struct Job {
    event: Event,
    listener: Arc<dyn LifecycleListener>,
}

#[derive(Default)]
struct SurfaceRecord {
    painted: Mutex<Vec<Event>>,
    geometry: Mutex<Option<Geometry>>,
    visible: AtomicBool,
    raised: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

pub struct SimulatedSurface {
    jobs: mpsc::UnboundedSender<Job>,
    record: Arc<SurfaceRecord>,
}

impl SimulatedSurface {
    /// Spawn the worker on the current tokio runtime.
    pub fn new() -> Result<Arc<Self>> {
        let runtime = current_runtime(Domain::Surface)?;
        let (jobs, rx) = mpsc::unbounded_channel();
        let record = Arc::new(SurfaceRecord::default());

        runtime.spawn(run_worker(rx, Arc::clone(&record)));

        Ok(Arc::new(Self { jobs, record }))
    }

    /// Make every event showing content labelled `label` fail to render.
    pub fn fail_content(&self, label: impl Into<String>) {
        lock(&self.record.failing).insert(label.into());
    }

    /// Events the worker actually painted, in order.
    pub fn painted(&self) -> Vec<Event> {
        lock(&self.record.painted).clone()
    }

    /// Last geometry set, absolute coordinates.
    pub fn geometry(&self) -> Option<Geometry> {
        *lock(&self.record.geometry)
    }

    pub fn is_visible(&self) -> bool {
        self.record.visible.load(Ordering::Acquire)
    }

    pub fn raise_count(&self) -> usize {
        self.record.raised.load(Ordering::Relaxed)
    }
}

impl RenderSurface for SimulatedSurface {
    fn execute(&self, event: Event, listener: Arc<dyn LifecycleListener>) {
        let label = event.label();
        if self.jobs.send(Job { event, listener }).is_err() {
            warn!(event = %label, "simulated surface worker gone; request lost");
        }
    }

    fn set_geometry(&self, geometry: Geometry) {
        *lock(&self.record.geometry) = Some(geometry);
    }

    fn set_visible(&self, visible: bool) {
        self.record.visible.store(visible, Ordering::Release);
    }

    fn raise_to_front(&self) {
        self.record.raised.fetch_add(1, Ordering::Relaxed);
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<Job>, record: Arc<SurfaceRecord>) {
    while let Some(Job { event, listener }) = rx.recv().await {
        let fails = event
            .content()
            .is_some_and(|c| lock(&record.failing).contains(&c.label));
        if fails {
            listener.event_dropped(&event);
            continue;
        }

        debug!(event = %event.label(), "painting");
        lock(&record.painted).push(event.clone());

        match event.kind() {
            EventKind::Send | EventKind::SendWaitClear => {
                listener.in_transition_begin(&event);
                animate(event.in_animator()).await;
                listener.in_transition_complete(&event);
            }
            EventKind::Clear => {
                listener.out_transition_begin(&event);
                animate(event.out_animator()).await;
                listener.out_transition_complete(&event);
            }
        }
    }
}

async fn animate(animator: Option<&Animator>) {
    if let Some(animator) = animator {
        if !animator.duration.is_zero() {
            tokio::time::sleep(animator.duration).await;
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}
