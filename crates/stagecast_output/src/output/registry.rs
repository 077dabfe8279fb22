use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use stagecast_core::config::DeviceId;
use stagecast_core::error::{CoreError, Domain, ErrorKind, Payload, Result};
use stagecast_core::event::Event;
use tracing::warn;

use super::PresentationWindow;

/// Routes events to independent output targets by device id.
///
/// Each window keeps its own lock; the map lock is released before executing.
#[derive(Debug, Default)]
pub struct OutputRegistry {
    windows: Mutex<HashMap<DeviceId, Arc<PresentationWindow>>>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window. At most one window per device.
    pub fn register(&self, window: Arc<PresentationWindow>) -> Result<()> {
        let mut windows = self.lock();
        let id = window.device_id().clone();
        if windows.contains_key(&id) {
            return Err(CoreError::warn()
                .domain(Domain::Device)
                .kind(ErrorKind::InvalidArgument)
                .msg("output target already registered")
                .payload(Payload::Context {
                    key: "device",
                    value: id.as_str().to_string().into(),
                })
                .build());
        }
        windows.insert(id, window);
        Ok(())
    }

    pub fn get(&self, device: &DeviceId) -> Option<Arc<PresentationWindow>> {
        self.lock().get(device).cloned()
    }

    pub fn remove(&self, device: &DeviceId) -> Option<Arc<PresentationWindow>> {
        self.lock().remove(device)
    }

    /// Registered devices, sorted.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Execute `event` on the window of its configured device.
    pub fn execute(&self, event: Event) -> Result<()> {
        let device = event.config().device_id().clone();
        let window = self
            .get(&device)
            .ok_or_else(|| CoreError::unknown_device(device.as_str()))?;
        window.execute(event);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DeviceId, Arc<PresentationWindow>>> {
        match self.windows.lock() {
            Ok(guard) => guard,
            Err(poison) => {
                warn!("output registry mutex poisoned");
                poison.into_inner()
            }
        }
    }
}
