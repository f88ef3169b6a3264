use std::fmt;
use std::marker::PhantomData;

use nalgebra::Vector3;

use super::{Frame, Vector};

/// A point `(x, y, z)` tagged with the frame it is expressed in.
pub struct Position<F: Frame> {
    pub(crate) inner: Vector3<f64>,
    _frame: PhantomData<F>,
}

impl<F: Frame> Position<F> {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position {
            inner: Vector3::new(x, y, z),
            _frame: PhantomData,
        }
    }

    pub fn of_origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.inner.x
    }
    pub fn y(&self) -> f64 {
        self.inner.y
    }
    pub fn z(&self) -> f64 {
        self.inner.z
    }

    pub fn distance(a: &Self, b: &Self) -> f64 {
        (a.inner - b.inner).norm()
    }

    /// Linear interpolation: `alpha=0` yields `a`, `alpha=1` yields `b`.
    pub fn interpolate(alpha: f64, a: &Self, b: &Self) -> Self {
        Position::from_nalgebra(a.inner * (1.0 - alpha) + b.inner * alpha)
    }

    pub(crate) fn from_nalgebra(v: Vector3<f64>) -> Self {
        Position {
            inner: v,
            _frame: PhantomData,
        }
    }
}

impl<F: Frame> Clone for Position<F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<F: Frame> Copy for Position<F> {}

impl<F: Frame> fmt::Debug for Position<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position<{}>({}, {}, {})",
            F::NAME,
            self.inner.x,
            self.inner.y,
            self.inner.z
        )
    }
}

impl<F: Frame> PartialEq for Position<F> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<F: Frame> std::ops::Add<Vector<F>> for Position<F> {
    type Output = Position<F>;
    fn add(self, rhs: Vector<F>) -> Position<F> {
        Position::from_nalgebra(self.inner + rhs.inner)
    }
}

impl<F: Frame> std::ops::Sub<Vector<F>> for Position<F> {
    type Output = Position<F>;
    fn sub(self, rhs: Vector<F>) -> Position<F> {
        Position::from_nalgebra(self.inner - rhs.inner)
    }
}

impl<F: Frame> std::ops::Sub<Position<F>> for Position<F> {
    type Output = Vector<F>;
    fn sub(self, rhs: Position<F>) -> Vector<F> {
        Vector::from_nalgebra(self.inner - rhs.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::World;

    #[test]
    fn interpolate_midpoint() {
        let a: Position<World> = Position::new(0.0, 0.0, 0.0);
        let b: Position<World> = Position::new(0.1, 0.0, 0.0);
        let mid = Position::interpolate(0.5, &a, &b);
        assert_eq!(mid, Position::new(0.05, 0.0, 0.0));
    }

    #[test]
    fn distance_matches_euclidean_norm() {
        let a: Position<World> = Position::new(0.0, 0.0, 0.0);
        let b: Position<World> = Position::new(3.0, 4.0, 0.0);
        assert_eq!(Position::distance(&a, &b), 5.0);
    }
}
