//! Collaborator seams consumed by the presentation window.
//!
//! - [`RenderSurface`]: paints events and reports lifecycle callbacks
//! - [`WindowPlacement`]: geometry control, chosen per window mode
//! - [`DeviceGeometry`]: physical bounds of an output device
//! - [`TransitionCapability`]: whether a device can animate transitions

use std::collections::HashMap;
use std::sync::Arc;

use stagecast_core::config::{DeviceId, WindowMode};
use stagecast_core::event::Event;
use stagecast_core::geometry::Geometry;

use super::LifecycleListener;

/// The output surface (projector window) an event is painted on.
pub trait RenderSurface: Send + Sync {
    /// Begin an animation or cut for `event`; report progress to `listener`.
    ///
    /// Must not block on the animation and must not call back into the
    /// listener before returning.
    fn execute(&self, event: Event, listener: Arc<dyn LifecycleListener>);

    /// Absolute (desktop) coordinates.
    fn set_geometry(&self, geometry: Geometry);
    fn set_visible(&self, visible: bool);
    fn raise_to_front(&self);
}

/// Geometry control for one window mode.
pub trait WindowPlacement: Send + Sync {
    /// Move/resize `surface` so that it covers `geometry` (device-relative) on `device`.
    fn place(&self, surface: &dyn RenderSurface, device: Geometry, geometry: Geometry);
}

/// Floating windows follow their content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatingPlacement;

impl WindowPlacement for FloatingPlacement {
    fn place(&self, surface: &dyn RenderSurface, device: Geometry, geometry: Geometry) {
        surface.set_geometry(geometry.to_absolute(device));
    }
}

/// Full-screen windows never move after creation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScreenPlacement;

impl WindowPlacement for FullScreenPlacement {
    fn place(&self, _surface: &dyn RenderSurface, _device: Geometry, _geometry: Geometry) {}
}

pub fn placement_for(mode: WindowMode) -> Box<dyn WindowPlacement> {
    match mode {
        WindowMode::FullScreen => Box::new(FullScreenPlacement),
        WindowMode::Floating => Box::new(FloatingPlacement),
    }
}

/// Physical bounds of output devices.
pub trait DeviceGeometry: Send + Sync {
    fn device_bounds(&self, device: &DeviceId) -> Option<Geometry>;
}

/// Whether a device supports animated transitions.
pub trait TransitionCapability: Send + Sync {
    fn supports_transitions(&self, device: &DeviceId) -> bool;
}

/// Same answer for every device.
#[derive(Debug, Clone, Copy)]
pub struct StaticCapability(pub bool);

impl TransitionCapability for StaticCapability {
    fn supports_transitions(&self, _device: &DeviceId) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeviceInfo {
    bounds: Geometry,
    transitions: bool,
}

/// In-memory device table; answers both geometry and capability queries.
#[derive(Debug, Clone, Default)]
pub struct DeviceTable {
    devices: HashMap<DeviceId, DeviceInfo>,
}

impl DeviceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(
        mut self,
        id: impl Into<DeviceId>,
        bounds: Geometry,
        transitions: bool,
    ) -> Self {
        self.devices
            .insert(id.into(), DeviceInfo { bounds, transitions });
        self
    }
}

impl DeviceGeometry for DeviceTable {
    fn device_bounds(&self, device: &DeviceId) -> Option<Geometry> {
        self.devices.get(device).map(|d| d.bounds)
    }
}

impl TransitionCapability for DeviceTable {
    fn supports_transitions(&self, device: &DeviceId) -> bool {
        self.devices.get(device).is_some_and(|d| d.transitions)
    }
}
