use crate::types::{Orientation, OrientationSample, ScreenRotation};
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

/// -90° about X. Turns the reference direction from "out of the screen" to
/// "out of the back of the device", where the camera lens points.
pub const BACK_CAMERA_CORRECTION: Quat =
    Quat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Map a device-orientation sample and screen rotation to a scene-camera
/// rotation.
///
/// The device reports alpha/beta/gamma as intrinsic Z-X-Y rotations. The scene
/// uses Y-X-Z, so the same angles are re-applied as `Ry(alpha) * Rx(beta) *
/// Rz(-gamma)` (gamma negated for handedness), then corrected for the
/// back-facing camera and for the screen rotation about world Z.
///
/// With `gimbal_epsilon` set, gamma is dropped while `|beta|` is within that
/// many radians of 90°, where it stops being well defined.
pub fn target_orientation(
    sample: &OrientationSample,
    screen: ScreenRotation,
    gimbal_epsilon: Option<f32>,
) -> Orientation {
    let (alpha, beta, mut gamma) = sample.radians();

    if let Some(epsilon) = gimbal_epsilon {
        if (beta.abs() - FRAC_PI_2).abs() < epsilon {
            gamma = 0.0;
        }
    }

    // Intrinsic Y-X-Z.
    let base = Quat::from_rotation_y(alpha)
        * Quat::from_rotation_x(beta)
        * Quat::from_rotation_z(-gamma);
    let screen_offset = Quat::from_axis_angle(Vec3::Z, -screen.radians());

    Orientation::from_quat((base * BACK_CAMERA_CORRECTION * screen_offset).normalize())
}

/// Move `previous` toward `target` by `factor` along the shortest arc.
///
/// A factor of 1.0 (or more) returns the target unchanged.
pub fn smooth(previous: &Orientation, target: &Orientation, factor: f32) -> Orientation {
    if factor >= 1.0 {
        return *target;
    }
    let q = previous.quaternion.slerp(target.quaternion, factor.max(0.0));
    Orientation::from_quat(q.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn same_rotation(a: Quat, b: Quat) -> bool {
        // q and -q encode the same rotation.
        a.dot(b).abs() > 1.0 - TOL
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn target(alpha: f32, beta: f32, gamma: f32, screen: f32) -> Quat {
        target_orientation(
            &OrientationSample::new(alpha, beta, gamma),
            ScreenRotation(screen),
            None,
        )
        .quaternion
    }

    #[test]
    fn correction_is_minus_90_about_x() {
        assert!(same_rotation(
            BACK_CAMERA_CORRECTION,
            Quat::from_rotation_x(-FRAC_PI_2)
        ));
    }

    #[test]
    fn unit_length_over_input_grid() {
        for alpha in (0..360).step_by(37) {
            for beta in (-180..180).step_by(29) {
                for gamma in (-90..90).step_by(23) {
                    for screen in [0.0, 90.0, 180.0, 270.0, -90.0] {
                        let q = target(alpha as f32, beta as f32, gamma as f32, screen);
                        assert!((q.length() - 1.0).abs() < TOL, "len {}", q.length());
                    }
                }
            }
        }
    }

    #[test]
    fn zero_angles_give_back_correction_only() {
        assert!(same_rotation(target(0.0, 0.0, 0.0, 0.0), BACK_CAMERA_CORRECTION));

        let empty =
            target_orientation(&OrientationSample::default(), ScreenRotation::PORTRAIT, None);
        assert!(same_rotation(empty.quaternion, BACK_CAMERA_CORRECTION));
    }

    #[test]
    fn screen_rotation_composes_about_z() {
        let sample = OrientationSample::new(30.0, 50.0, -20.0);
        for (rot, delta) in [(0.0_f32, 90.0_f32), (90.0, 90.0), (0.0, 270.0), (180.0, -45.0)] {
            let base = target_orientation(&sample, ScreenRotation(rot), None).quaternion;
            let rotated = target_orientation(&sample, ScreenRotation(rot + delta), None).quaternion;
            let expected = base * Quat::from_axis_angle(Vec3::Z, (-delta).to_radians());
            assert!(same_rotation(rotated, expected), "rot {rot} delta {delta}");
        }
    }

    #[test]
    fn null_axes_count_as_zero() {
        let partial = OrientationSample {
            alpha: None,
            beta: Some(45.0),
            gamma: None,
            absolute: false,
        };
        let full = OrientationSample::new(0.0, 45.0, 0.0);
        let a = target_orientation(&partial, ScreenRotation::PORTRAIT, None);
        let b = target_orientation(&full, ScreenRotation::PORTRAIT, None);
        assert_eq!(a.quaternion, b.quaternion);
    }

    #[test]
    fn non_finite_axes_count_as_zero() {
        let noisy = OrientationSample {
            alpha: Some(f32::NAN),
            beta: Some(10.0),
            gamma: Some(f32::INFINITY),
            absolute: true,
        };
        let clean = OrientationSample::new(0.0, 10.0, 0.0);
        let a = target_orientation(&noisy, ScreenRotation(f32::NAN), None);
        let b = target_orientation(&clean, ScreenRotation::PORTRAIT, None);
        assert_eq!(a.quaternion, b.quaternion);
    }

    #[test]
    fn alpha_turns_camera_about_vertical_axis() {
        let baseline = target(0.0, 0.0, 0.0, 0.0);
        let turned = target(90.0, 0.0, 0.0, 0.0);

        // Relative to the baseline, alpha = 90 is a 90° turn about scene Y.
        let relative = turned * baseline.inverse();
        assert!(same_rotation(relative, Quat::from_rotation_y(FRAC_PI_2)));

        // Held flat, the camera looks at the floor and its up vector points
        // away from the user (-Z). Turning by alpha swings it to -X.
        let base = Orientation::from_quat(baseline);
        let turned = Orientation::from_quat(turned);
        assert!(vec3_approx_eq(base.forward(), Vec3::NEG_Y));
        assert!(vec3_approx_eq(base.up(), Vec3::NEG_Z));
        assert!(vec3_approx_eq(turned.forward(), Vec3::NEG_Y));
        assert!(vec3_approx_eq(turned.up(), Vec3::NEG_X));
        assert!((base.angle_to(&turned) - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn upright_device_looks_at_horizon() {
        // beta = 90: device held upright, camera looks straight ahead.
        let upright = Orientation::from_quat(target(0.0, 90.0, 0.0, 0.0));
        assert!(vec3_approx_eq(upright.forward(), Vec3::NEG_Z));
        assert!(vec3_approx_eq(upright.up(), Vec3::Y));
    }

    #[test]
    fn gimbal_guard_drops_gamma_near_vertical() {
        let sample = OrientationSample::new(20.0, 88.0, 35.0);
        let no_gamma = OrientationSample::new(20.0, 88.0, 0.0);

        let guarded = target_orientation(&sample, ScreenRotation::PORTRAIT, Some(0.1));
        let expected = target_orientation(&no_gamma, ScreenRotation::PORTRAIT, None);
        assert_eq!(guarded.quaternion, expected.quaternion);

        // Guard disabled: gamma still contributes.
        let unguarded = target_orientation(&sample, ScreenRotation::PORTRAIT, None);
        assert!(!same_rotation(unguarded.quaternion, expected.quaternion));

        // Far from vertical the guard has no effect.
        let tilted = OrientationSample::new(20.0, 45.0, 35.0);
        let a = target_orientation(&tilted, ScreenRotation::PORTRAIT, Some(0.1));
        let b = target_orientation(&tilted, ScreenRotation::PORTRAIT, None);
        assert_eq!(a.quaternion, b.quaternion);
    }

    #[test]
    fn gimbal_guard_applies_below_minus_90() {
        let sample = OrientationSample::new(0.0, -91.0, 60.0);
        let no_gamma = OrientationSample::new(0.0, -91.0, 0.0);
        let guarded = target_orientation(&sample, ScreenRotation::PORTRAIT, Some(0.1));
        let expected = target_orientation(&no_gamma, ScreenRotation::PORTRAIT, None);
        assert_eq!(guarded.quaternion, expected.quaternion);
    }

    #[test]
    fn smoothing_converges_to_target() {
        let goal = Orientation::from_quat(target(120.0, 60.0, -30.0, 90.0));
        let mut current = Orientation::default();
        let mut distance = current.angle_to(&goal);
        assert!(distance > 0.5);

        for _ in 0..3 {
            current = smooth(&current, &goal, 0.99);
            let next = current.angle_to(&goal);
            assert!(next < distance || distance < 1e-5, "{next} !< {distance}");
            assert!((current.quaternion.length() - 1.0).abs() < TOL);
            distance = next;
        }
        assert!(distance < 1e-3, "still {distance} rad away");
    }

    #[test]
    fn smoothing_takes_shortest_arc() {
        let goal = Orientation::from_quat(Quat::from_rotation_y(0.2));
        // Same rotation as identity, opposite hemisphere.
        let previous = Orientation::from_quat(-Quat::IDENTITY);
        let next = smooth(&previous, &goal, 0.5);
        assert!((next.angle_to(&Orientation::default()) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn full_factor_assigns_directly() {
        let goal = Orientation::from_quat(target(10.0, 20.0, 30.0, 0.0));
        let next = smooth(&Orientation::default(), &goal, 1.0);
        assert_eq!(next, goal);
    }
}
