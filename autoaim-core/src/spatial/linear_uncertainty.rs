use std::fmt;
use std::marker::PhantomData;

use nalgebra::Matrix3;

use super::Frame;

/// A 3x3 covariance matrix tagged with the frame it is expressed in. Backed
/// by a fixed `Matrix3`, so the "must be 3x3" invariant from the source is
/// enforced at compile time rather than checked at construction.
pub struct LinearUncertainty<F: Frame> {
    inner: Matrix3<f64>,
    _frame: PhantomData<F>,
}

impl<F: Frame> LinearUncertainty<F> {
    pub fn from_matrix(inner: Matrix3<f64>) -> Self {
        LinearUncertainty {
            inner,
            _frame: PhantomData,
        }
    }

    pub fn from_variances(var_x: f64, var_y: f64, var_z: f64) -> Self {
        Self::from_matrix(Matrix3::from_diagonal(&nalgebra::Vector3::new(
            var_x, var_y, var_z,
        )))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.inner
    }

    pub fn variances(&self) -> (f64, f64, f64) {
        (self.inner[(0, 0)], self.inner[(1, 1)], self.inner[(2, 2)])
    }

    pub(crate) fn rotate(&self, r: &Matrix3<f64>) -> Matrix3<f64> {
        r * self.inner * r.transpose()
    }
}

impl<F: Frame> Clone for LinearUncertainty<F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<F: Frame> Copy for LinearUncertainty<F> {}

impl<F: Frame> fmt::Debug for LinearUncertainty<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinearUncertainty<{}>({:?})", F::NAME, self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::World;

    #[test]
    fn from_variances_is_diagonal() {
        let c: LinearUncertainty<World> = LinearUncertainty::from_variances(1.0, 2.0, 3.0);
        assert_eq!(c.variances(), (1.0, 2.0, 3.0));
        assert_eq!(c.matrix()[(0, 1)], 0.0);
    }
}
