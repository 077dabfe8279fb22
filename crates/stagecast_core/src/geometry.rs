use crate::config::WindowMode;

/// Integer rectangle. Stored device-relative unless a method says otherwise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size anchored at the device origin.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Translate a device-relative rectangle into absolute coordinates of `device`.
    pub const fn to_absolute(self, device: Geometry) -> Geometry {
        Geometry::new(
            self.x.saturating_add(device.x),
            self.y.saturating_add(device.y),
            self.width,
            self.height,
        )
    }

    /// Inverse of [`Geometry::to_absolute`].
    pub const fn to_device_relative(self, device: Geometry) -> Geometry {
        Geometry::new(
            self.x.saturating_sub(device.x),
            self.y.saturating_sub(device.y),
            self.width,
            self.height,
        )
    }
}

/// Where a window must sit to show content of the given size.
///
/// Full-screen windows always cover the whole device and ignore the offset.
/// Floating windows take the content size at the content offset (origin if none).
pub fn required_geometry(
    mode: WindowMode,
    device: Geometry,
    width: u32,
    height: u32,
    offset: Option<(i32, i32)>,
) -> Geometry {
    match mode {
        WindowMode::FullScreen => Geometry::sized(device.width, device.height),
        WindowMode::Floating => {
            let (x, y) = offset.unwrap_or((0, 0));
            Geometry::new(x, y, width, height)
        }
    }
}
