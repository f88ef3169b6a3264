use std::fmt;
use std::marker::PhantomData;

use super::{Frame, LinearUncertainty, MeasuredPosition, Orientation, Position, Vector};

/// `translation` is `Dst`'s origin expressed in `Src`; `rotation` is the
/// rotation taking `Src`'s axes to `Dst`'s axes.
pub struct Transform<Src: Frame, Dst: Frame> {
    pub translation: Position<Src>,
    pub rotation: Orientation<Src>,
    _dst: PhantomData<Dst>,
}

impl<Src: Frame, Dst: Frame> Transform<Src, Dst> {
    pub fn new(translation: Position<Src>, rotation: Orientation<Src>) -> Self {
        Transform {
            translation,
            rotation,
            _dst: PhantomData,
        }
    }

    pub fn identity() -> Self {
        Self::new(Position::of_origin(), Orientation::identity())
    }

    /// Translate then rotate by the conjugate of the stored rotation.
    pub fn apply_to_position(&self, p: Position<Src>) -> Position<Dst> {
        let v = p - self.translation;
        let rotated = self.rotation.conjugate().rotate_vector(v.inner);
        Position::from_nalgebra(rotated)
    }

    /// Rotate by the conjugate of the stored rotation; translation does not
    /// affect free vectors.
    pub fn apply_to_vector(&self, v: Vector<Src>) -> Vector<Dst> {
        let rotated = self.rotation.conjugate().rotate_vector(v.inner);
        Vector::from_nalgebra(rotated)
    }

    /// `R C R^T` where `R` is the stored rotation's matrix (not its
    /// conjugate, unlike the position/vector transforms above); translation
    /// is ignored.
    pub fn apply_to_linear_uncertainty(&self, c: LinearUncertainty<Src>) -> LinearUncertainty<Dst> {
        let r = self.rotation.rotation_matrix();
        LinearUncertainty::from_matrix(c.rotate(&r))
    }

    pub fn apply_to_measured_position(&self, m: MeasuredPosition<Src>) -> MeasuredPosition<Dst> {
        MeasuredPosition::new(
            self.apply_to_position(m.position),
            self.apply_to_linear_uncertainty(m.uncertainty),
        )
    }

    /// Translation: negate the stored translation then rotate it by the
    /// conjugate rotation. Rotation: conjugate.
    pub fn inverse(&self) -> Transform<Dst, Src> {
        let negated = -(self.translation - Position::of_origin());
        let rotated = self.rotation.conjugate().rotate_vector(negated.inner);
        Transform::new(Position::from_nalgebra(rotated), self.rotation.conjugate())
    }

    /// `self: Src->Dst`, `other: Dst->New`. Produces `Src->New`.
    pub fn compose<New: Frame>(&self, other: &Transform<Dst, New>) -> Transform<Src, New> {
        let new_translation = self.inverse().apply_to_position(other.translation);
        let new_rotation = self.rotation.compose_raw(&other.rotation);
        Transform::new(new_translation, new_rotation)
    }
}

impl<Src: Frame, Dst: Frame> Clone for Transform<Src, Dst> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<Src: Frame, Dst: Frame> Copy for Transform<Src, Dst> {}

impl<Src: Frame, Dst: Frame> fmt::Debug for Transform<Src, Dst> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transform<{}, {}>(translation={:?}, rotation={:?})",
            Src::NAME,
            Dst::NAME,
            self.translation,
            self.rotation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{ColorCamera, World};
    use approx::assert_relative_eq;

    #[test]
    fn inverse_round_trips_position() {
        let t: Transform<World, ColorCamera> = Transform::new(
            Position::new(1.0, 2.0, 3.0),
            Orientation::from_euler_angles(0.2, 0.1, -0.3),
        );
        let p: Position<World> = Position::new(5.0, -1.0, 2.0);
        let round_tripped = t.inverse().apply_to_position(t.apply_to_position(p));
        assert_relative_eq!(round_tripped.x(), p.x(), epsilon = 1e-9);
        assert_relative_eq!(round_tripped.y(), p.y(), epsilon = 1e-9);
        assert_relative_eq!(round_tripped.z(), p.z(), epsilon = 1e-9);
    }

    #[test]
    fn apply_to_vector_preserves_magnitude() {
        let t: Transform<World, ColorCamera> = Transform::new(
            Position::new(1.0, 2.0, 3.0),
            Orientation::from_euler_angles(0.2, 0.1, -0.3),
        );
        let v: Vector<World> = Vector::new(1.0, 2.0, 2.0);
        let transformed = t.apply_to_vector(v);
        assert_relative_eq!(transformed.magnitude(), v.magnitude(), epsilon = 1e-9);
    }

    #[test]
    fn identity_compose_is_noop() {
        let t: Transform<World, ColorCamera> = Transform::new(
            Position::new(1.0, 2.0, 3.0),
            Orientation::from_euler_angles(0.2, 0.1, -0.3),
        );
        let identity: Transform<ColorCamera, ColorCamera> = Transform::identity();
        let composed = t.compose(&identity);
        assert_relative_eq!(composed.translation.x(), t.translation.x(), epsilon = 1e-9);
        assert_relative_eq!(composed.translation.y(), t.translation.y(), epsilon = 1e-9);
        assert_relative_eq!(composed.translation.z(), t.translation.z(), epsilon = 1e-9);
    }

    #[test]
    fn linear_uncertainty_transform_is_symmetric_psd() {
        let t: Transform<World, ColorCamera> = Transform::new(
            Position::new(0.0, 0.0, 0.0),
            Orientation::from_euler_angles(0.5, -0.4, 0.9),
        );
        let c: LinearUncertainty<World> = LinearUncertainty::from_variances(1.0, 2.0, 3.0);
        let transformed = t.apply_to_linear_uncertainty(c);
        let m = transformed.matrix();
        assert_relative_eq!(m[(0, 1)], m[(1, 0)], epsilon = 1e-9);
        assert_relative_eq!(m[(0, 2)], m[(2, 0)], epsilon = 1e-9);
        assert_relative_eq!(m[(1, 2)], m[(2, 1)], epsilon = 1e-9);
        assert!(m[(0, 0)] >= 0.0 && m[(1, 1)] >= 0.0 && m[(2, 2)] >= 0.0);
    }
}
