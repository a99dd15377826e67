use glam::{Mat4, Quat, Vec3};
use orient_tracker::types::Orientation;

/// Scene camera for the AR overlay.
///
/// Position is fixed at the origin. Only orientation changes (from the
/// device-orientation sensor).
pub struct Camera {
    /// Device orientation, already mapped into scene space.
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane (meters).
    pub near: f32,
    /// Far clipping plane (meters).
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            fov_y_degrees: 75.0,
            aspect_ratio: 9.0 / 16.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Apply this frame's orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation.quaternion;
    }

    /// Match the render target after a resize or screen rotation.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Compass heading of the view direction in degrees, 0 along -Z and
    /// increasing toward -X.
    pub fn heading_degrees(&self) -> f32 {
        let f = self.forward();
        (-f.x).atan2(-f.z).to_degrees().rem_euclid(360.0)
    }

    /// View matrix (inverse of camera world transform).
    pub fn view_matrix(&self) -> Mat4 {
        // Camera is at origin, only rotated.
        Mat4::from_quat(self.orientation.conjugate())
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orient_tracker::mapping::target_orientation;
    use orient_tracker::types::{OrientationSample, ScreenRotation};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn camera_for(alpha: f32, beta: f32, gamma: f32) -> Camera {
        let mut camera = Camera::new();
        camera.set_orientation(target_orientation(
            &OrientationSample::new(alpha, beta, gamma),
            ScreenRotation::PORTRAIT,
            None,
        ));
        camera
    }

    #[test]
    fn view_matrix_undoes_orientation() {
        let camera = camera_for(30.0, 70.0, -10.0);
        let in_view = camera.view_matrix().transform_vector3(camera.forward());
        assert!(approx(in_view, Vec3::NEG_Z));
    }

    #[test]
    fn upright_device_faces_ahead() {
        let camera = camera_for(0.0, 90.0, 0.0);
        assert!(approx(camera.forward(), Vec3::NEG_Z));
        // Heading wraps at 0/360.
        let heading = camera.heading_degrees();
        assert!(heading < 1e-3 || heading > 360.0 - 1e-3, "heading {heading}");
    }

    #[test]
    fn alpha_turns_heading() {
        let camera = camera_for(90.0, 90.0, 0.0);
        assert!(approx(camera.forward(), Vec3::NEG_X));
        assert!((camera.heading_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn resize_ignores_empty_target() {
        let mut camera = Camera::new();
        camera.resize(1920, 1080);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.resize(0, 1080);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
