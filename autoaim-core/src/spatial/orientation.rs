use std::fmt;
use std::marker::PhantomData;

use nalgebra::{Matrix3, UnitQuaternion, UnitVector3, Vector3};

use crate::error::CoreError;

use super::Frame;

/// A unit quaternion tagged with the frame it is expressed in.
///
/// `from_euler_angles`/`as_euler_angles` use the intrinsic rotating Z-Y-X
/// (yaw-pitch-roll) convention: `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub struct Orientation<F: Frame> {
    inner: UnitQuaternion<f64>,
    _frame: PhantomData<F>,
}

impl<F: Frame> Orientation<F> {
    pub fn identity() -> Self {
        Orientation {
            inner: UnitQuaternion::identity(),
            _frame: PhantomData,
        }
    }

    pub fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Self {
        let q = nalgebra::Quaternion::new(w, x, y, z);
        Orientation {
            inner: UnitQuaternion::from_quaternion(q),
            _frame: PhantomData,
        }
    }

    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        Orientation {
            inner: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
            _frame: PhantomData,
        }
    }

    /// Returns `(roll, pitch, yaw)`.
    pub fn as_euler_angles(&self) -> (f64, f64, f64) {
        self.inner.euler_angles()
    }

    pub fn from_axis_angle(axis: (f64, f64, f64), angle: f64) -> Result<Self, CoreError> {
        let v = Vector3::new(axis.0, axis.1, axis.2);
        let unit = UnitVector3::try_new(v, 1e-12).ok_or(CoreError::ZeroRotationAxis)?;
        Ok(Orientation {
            inner: UnitQuaternion::from_axis_angle(&unit, angle),
            _frame: PhantomData,
        })
    }

    pub fn wxyz(&self) -> (f64, f64, f64, f64) {
        let q = self.inner.quaternion();
        (q.w, q.i, q.j, q.k)
    }

    /// The rotation taken by [`Transform::apply_to_vector`] and
    /// [`Transform::apply_to_position`]: the conjugate of the stored
    /// rotation, i.e. the rotation of coordinates when the frame itself
    /// rotates by the stored rotation.
    pub fn conjugate(&self) -> Self {
        Orientation {
            inner: self.inner.conjugate(),
            _frame: PhantomData,
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.inner.to_rotation_matrix().into_inner()
    }

    pub(crate) fn rotate_vector(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.inner.transform_vector(&v)
    }

    pub(crate) fn compose_raw(&self, other: &Self) -> Self {
        Orientation {
            inner: self.inner * other.inner,
            _frame: PhantomData,
        }
    }
}

impl<F: Frame> Clone for Orientation<F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<F: Frame> Copy for Orientation<F> {}

impl<F: Frame> fmt::Debug for Orientation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, x, y, z) = self.wxyz();
        write!(f, "Orientation<{}>(w={w}, x={x}, y={y}, z={z})", F::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::World;
    use approx::assert_relative_eq;

    #[test]
    fn unit_norm_after_construction() {
        let o: Orientation<World> = Orientation::from_wxyz(1.0, 2.0, 3.0, 4.0);
        let (w, x, y, z) = o.wxyz();
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn euler_round_trip() {
        let o: Orientation<World> = Orientation::from_euler_angles(0.3, -0.2, 1.1);
        let (roll, pitch, yaw) = o.as_euler_angles();
        assert_relative_eq!(roll, 0.3, epsilon = 1e-9);
        assert_relative_eq!(pitch, -0.2, epsilon = 1e-9);
        assert_relative_eq!(yaw, 1.1, epsilon = 1e-9);
    }

    #[test]
    fn zero_axis_angle_is_rejected() {
        let result: Result<Orientation<World>, _> = Orientation::from_axis_angle((0.0, 0.0, 0.0), 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn conjugate_is_inverse_for_unit_quaternion() {
        let o: Orientation<World> = Orientation::from_euler_angles(0.1, 0.2, 0.3);
        let v = Vector3::new(1.0, 0.0, 0.0);
        let rotated = o.rotate_vector(v);
        let back = o.conjugate().rotate_vector(rotated);
        assert_relative_eq!(back.x, v.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-9);
        assert_relative_eq!(back.z, v.z, epsilon = 1e-9);
    }
}
