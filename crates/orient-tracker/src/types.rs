use glam::{Quat, Vec3};
use std::fmt;

/// Raw device-orientation reading as delivered by the host.
///
/// Angles are in degrees using the device's intrinsic Z-X-Y convention:
/// `alpha` around Z, `beta` around X, `gamma` around Y. An axis the sensor
/// has not reported yet is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    pub alpha: Option<f32>,
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
    /// Whether the host reports the reading relative to the earth frame.
    pub absolute: bool,
}

impl OrientationSample {
    /// A relative (non-absolute) sample with all three axes present.
    pub fn new(alpha: f32, beta: f32, gamma: f32) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            absolute: false,
        }
    }

    /// Mark the sample as earth-referenced.
    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self
    }

    /// True when no axis has reported yet.
    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.beta.is_none() && self.gamma.is_none()
    }

    /// `(alpha, beta, gamma)` in radians. Absent or non-finite angles become 0.
    pub fn radians(&self) -> (f32, f32, f32) {
        (
            to_radians(self.alpha),
            to_radians(self.beta),
            to_radians(self.gamma),
        )
    }
}

fn to_radians(degrees: Option<f32>) -> f32 {
    degrees
        .filter(|d| d.is_finite())
        .map_or(0.0, f32::to_radians)
}

impl fmt::Display for OrientationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = |v: Option<f32>| v.map_or_else(|| "null".to_owned(), |v| format!("{v:.1}"));
        write!(
            f,
            "alpha: {} beta: {} gamma: {}",
            axis(self.alpha),
            axis(self.beta),
            axis(self.gamma)
        )
    }
}

/// Angle (degrees) by which screen content is rotated from the device's
/// natural orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenRotation(pub f32);

impl ScreenRotation {
    pub const PORTRAIT: Self = Self(0.0);
    pub const LANDSCAPE: Self = Self(90.0);
    pub const PORTRAIT_FLIPPED: Self = Self(180.0);
    pub const LANDSCAPE_FLIPPED: Self = Self(270.0);

    pub fn degrees(self) -> f32 {
        self.0
    }

    /// Rotation in radians; a non-finite angle counts as 0.
    pub fn radians(self) -> f32 {
        to_radians(Some(self.0))
    }
}

/// Event delivered by an orientation source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Orientation(OrientationSample),
    ScreenRotation(ScreenRotation),
}

/// Camera orientation produced for the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Scene-camera rotation as a unit quaternion.
    pub quaternion: Quat,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            quaternion: Quat::IDENTITY,
        }
    }
}

impl Orientation {
    pub fn from_quat(quaternion: Quat) -> Self {
        Self { quaternion }
    }

    /// Direction the camera looks along (scene cameras look down -Z).
    pub fn forward(&self) -> Vec3 {
        self.quaternion * Vec3::NEG_Z
    }

    /// Camera up direction.
    pub fn up(&self) -> Vec3 {
        self.quaternion * Vec3::Y
    }

    /// Angular distance to `other` in radians, in `[0, pi]`.
    ///
    /// Uses `atan2` so small angles stay accurate in f32.
    pub fn angle_to(&self, other: &Orientation) -> f32 {
        let delta = self.quaternion.conjugate() * other.quaternion;
        2.0 * delta.xyz().length().atan2(delta.w.abs())
    }
}
