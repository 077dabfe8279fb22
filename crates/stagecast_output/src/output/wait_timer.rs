use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Single-shot, cancelable, restartable deferred callback.
///
/// - at most one outstanding callback: `start()` replaces any previous one
/// - `cancel()` is idempotent
/// - the callback runs at most once, on a runtime worker, never on the caller
///
/// The timer is plain data; the owner is expected to guard it with its own
/// lock together with whatever state the callback inspects.
pub struct WaitTimer {
    runtime: Handle,
    delay: Duration,
    armed: Option<Armed>,
}

struct Armed {
    task: JoinHandle<()>,
    callback: Arc<Mutex<Option<Callback>>>,
}

impl WaitTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            delay: Duration::ZERO,
            armed: None,
        }
    }

    /// Schedule `callback` after `delay`, replacing any outstanding callback.
    pub fn start<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.delay = delay;
        self.arm(Box::new(callback));
    }

    /// Drop the outstanding callback, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                armed.task.abort();
                take_callback(&armed.callback).is_some()
            }
            None => false,
        }
    }

    /// Delay used by the next `restart()`.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Re-schedule the outstanding callback with the current delay.
    ///
    /// Returns false when nothing is outstanding (never started, canceled, or
    /// already fired).
    pub fn restart(&mut self) -> bool {
        let Some(armed) = self.armed.take() else {
            return false;
        };
        armed.task.abort();

        match take_callback(&armed.callback) {
            Some(callback) => {
                self.arm(callback);
                true
            }
            None => false,
        }
    }

    /// True while a callback is scheduled and has not fired yet.
    pub fn is_active(&self) -> bool {
        self.armed.as_ref().is_some_and(|armed| {
            armed
                .callback
                .lock()
                .map(|slot| slot.is_some())
                .unwrap_or(false)
        })
    }

    fn arm(&mut self, callback: Callback) {
        let slot = Arc::new(Mutex::new(Some(callback)));
        let fire = Arc::clone(&slot);
        let delay = self.delay;

        let task = self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // Slot guard is released before the callback runs.
            if let Some(callback) = take_callback(&fire) {
                callback();
            }
        });

        self.armed = Some(Armed {
            task,
            callback: slot,
        });
    }
}

impl Drop for WaitTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for WaitTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitTimer")
            .field("delay", &self.delay)
            .field("active", &self.is_active())
            .finish()
    }
}

fn take_callback(slot: &Mutex<Option<Callback>>) -> Option<Callback> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poison) => poison.into_inner().take(),
    }
}
