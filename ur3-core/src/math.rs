use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

pub trait FrameRotation {
    /// Create a rotation about the local x axis.
    fn about_x(angle: f32) -> Self;
    /// Create a rotation about the local y (vertical) axis.
    fn about_y(angle: f32) -> Self;
}

impl FrameRotation for UnitQuaternion<f32> {
    #[inline]
    fn about_x(angle: f32) -> Self {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle)
    }

    #[inline]
    fn about_y(angle: f32) -> Self {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
    }
}

/// Calculate the center point between two points.
#[inline]
pub fn midpoint(a: &Point3<f32>, b: &Point3<f32>) -> Point3<f32> {
    nalgebra::center(a, b)
}

/// Unit direction from `to` towards `from`.
///
/// Returns `None` when both points coincide, the direction is undefined then.
pub fn axis_between(from: &Point3<f32>, to: &Point3<f32>) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new(from - to, f32::EPSILON)
}

/// Rotate a point by `theta` radians about `axis` through `pivot`.
///
/// Positive angles follow the right-hand rule about the axis.
pub fn rotate_point_about(
    point: &Point3<f32>,
    pivot: &Point3<f32>,
    axis: &Unit<Vector3<f32>>,
    theta: f32,
) -> Point3<f32> {
    let rotation = UnitQuaternion::from_axis_angle(axis, theta);

    *pivot + rotation * (point - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_midpoint() {
        let center = midpoint(&Point3::new(0.12, 0.15, 0.0), &Point3::new(0.12, 0.15, 0.24));

        assert!((center - Point3::new(0.12, 0.15, 0.12)).norm() < EPSILON);
    }

    #[test]
    fn test_axis_between() {
        let axis = axis_between(&Point3::new(0.0, 0.15, 0.0), &Point3::new(0.12, 0.15, 0.0));

        assert!((axis.unwrap().into_inner() - Vector3::new(-1.0, 0.0, 0.0)).norm() < EPSILON);
        assert!(axis_between(&Point3::new(1.0, 2.0, 3.0), &Point3::new(1.0, 2.0, 3.0)).is_none());
    }

    #[test]
    fn test_rotate_point_about() {
        let point = rotate_point_about(
            &Point3::new(2.0, 1.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            &Vector3::z_axis(),
            std::f32::consts::FRAC_PI_2,
        );

        assert!((point - Point3::new(1.0, 2.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_frame_rotation() {
        let q = UnitQuaternion::about_y(std::f32::consts::FRAC_PI_2);
        let r = UnitQuaternion::about_x(std::f32::consts::FRAC_PI_2);

        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!((q * v - Vector3::new(0.0, 0.0, -1.0)).norm() < EPSILON);
        assert!((r * Vector3::y() - Vector3::z()).norm() < EPSILON);
    }
}
