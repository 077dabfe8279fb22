use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, Domain, ErrorKind, Result};

/// Identifier of a physical output device (projector, secondary monitor).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeviceId(Arc<str>);

impl DeviceId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How the output window occupies its device.
///
/// - FullScreen: always the whole device, never resized, offsets ignored
/// - Floating: positioned and sized per content
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WindowMode {
    FullScreen,
    Floating,
}

impl WindowMode {
    pub const fn label(self) -> &'static str {
        match self {
            WindowMode::FullScreen => "fullscreen",
            WindowMode::Floating => "floating",
        }
    }
}

/// Render-quality hint handed through to the surface. The scheduler never reads it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum RenderQuality {
    Draft,
    #[default]
    Standard,
    High,
}

/// Immutable description of one output target and its behavioral options.
///
/// Built once per logical output target, then shared (behind `Arc`) by every
/// event sent to that target.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PresentationEventConfiguration {
    device_id: DeviceId,
    window_mode: WindowMode,
    wait_for_in_flight_transition: bool,
    quality: RenderQuality,
    transition_shortcuts: bool,
}

impl PresentationEventConfiguration {
    /// Start a builder for a full-screen target.
    pub fn fullscreen(device_id: impl Into<DeviceId>) -> ConfigBuilder {
        ConfigBuilder::new(device_id.into(), WindowMode::FullScreen)
    }

    /// Start a builder for a floating (overlay) target.
    pub fn floating(device_id: impl Into<DeviceId>) -> ConfigBuilder {
        ConfigBuilder::new(device_id.into(), WindowMode::Floating)
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    pub fn is_fullscreen(&self) -> bool {
        self.window_mode == WindowMode::FullScreen
    }

    pub fn wait_for_in_flight_transition(&self) -> bool {
        self.wait_for_in_flight_transition
    }

    pub fn quality(&self) -> RenderQuality {
        self.quality
    }

    /// Whether same-type content swaps may use a surface transition shortcut.
    pub fn transition_shortcuts(&self) -> bool {
        self.transition_shortcuts
    }
}

/// Consuming builder for [`PresentationEventConfiguration`].
/// Defaults:
/// - wait_for_in_flight_transition = true
/// - quality = Standard
/// - transition_shortcuts = false
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    device_id: DeviceId,
    window_mode: WindowMode,
    wait_for_in_flight_transition: bool,
    quality: RenderQuality,
    transition_shortcuts: bool,
}

impl ConfigBuilder {
    fn new(device_id: DeviceId, window_mode: WindowMode) -> Self {
        Self {
            device_id,
            window_mode,
            wait_for_in_flight_transition: true,
            quality: RenderQuality::default(),
            transition_shortcuts: false,
        }
    }

    pub fn wait_for_in_flight(mut self, wait: bool) -> Self {
        self.wait_for_in_flight_transition = wait;
        self
    }

    pub fn quality(mut self, quality: RenderQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn transition_shortcuts(mut self, enabled: bool) -> Self {
        self.transition_shortcuts = enabled;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<Arc<PresentationEventConfiguration>> {
        if self.device_id.as_str().trim().is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Config)
                .kind(ErrorKind::InvalidArgument)
                .msg("device id must not be empty")
                .build());
        }

        Ok(Arc::new(PresentationEventConfiguration {
            device_id: self.device_id,
            window_mode: self.window_mode,
            wait_for_in_flight_transition: self.wait_for_in_flight_transition,
            quality: self.quality,
            transition_shortcuts: self.transition_shortcuts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let cfg = PresentationEventConfiguration::floating("beamer").build().unwrap();
        assert_eq!(cfg.device_id().as_str(), "beamer");
        assert_eq!(cfg.window_mode(), WindowMode::Floating);
        assert!(cfg.wait_for_in_flight_transition());
        assert_eq!(cfg.quality(), RenderQuality::Standard);
        assert!(!cfg.transition_shortcuts());
    }

    #[test]
    fn empty_device_rejected() {
        let err = PresentationEventConfiguration::fullscreen("  ")
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.domain, Domain::Config);
    }

    #[test]
    fn overrides_apply() {
        let cfg = PresentationEventConfiguration::fullscreen("hdmi-1")
            .wait_for_in_flight(false)
            .quality(RenderQuality::High)
            .transition_shortcuts(true)
            .build()
            .unwrap();
        assert!(cfg.is_fullscreen());
        assert!(!cfg.wait_for_in_flight_transition());
        assert_eq!(cfg.quality(), RenderQuality::High);
        assert!(cfg.transition_shortcuts());
    }
}
