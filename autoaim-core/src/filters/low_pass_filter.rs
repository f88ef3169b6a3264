use crate::error::CoreError;
use crate::time::{Duration, TimeDomain, Timestamp};

/// An exponential low-pass filter generic over any value type with a
/// caller-supplied linear interpolation function (`float_interpolation` for
/// scalars, [`crate::spatial::Position::interpolate`] for positions).
pub struct LowPassFilter<D: TimeDomain, V> {
    lambda: f64,
    value: V,
    latest_update_timestamp: Timestamp<D>,
    interp: fn(f64, &V, &V) -> V,
}

/// Linear interpolation for plain scalars: `alpha=0` yields `x0`.
pub fn float_interpolation(alpha: f64, x0: &f64, x1: &f64) -> f64 {
    (1.0 - alpha) * x0 + alpha * x1
}

impl<D: TimeDomain, V: Clone> LowPassFilter<D, V> {
    /// `interpolation_coefficient` is the canonical one-second blend
    /// coefficient; must lie strictly within `(0, 1)`.
    pub fn new(
        interpolation_coefficient: f64,
        initial_value: V,
        initial_timestamp: Timestamp<D>,
        interp: fn(f64, &V, &V) -> V,
    ) -> Result<Self, CoreError> {
        if !(interpolation_coefficient > 0.0 && interpolation_coefficient < 1.0) {
            return Err(CoreError::InvalidInterpolationCoefficient(
                interpolation_coefficient,
            ));
        }
        let lambda = -(1.0 - interpolation_coefficient).ln();
        Ok(LowPassFilter {
            lambda,
            value: initial_value,
            latest_update_timestamp: initial_timestamp,
            interp,
        })
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn latest_update_timestamp(&self) -> Timestamp<D> {
        self.latest_update_timestamp
    }

    pub fn update(&mut self, new_value: V, current_time: Timestamp<D>) {
        let elapsed = (current_time - self.latest_update_timestamp)
            .as_secs_f64()
            .max(0.0);
        let alpha = 1.0 - (-self.lambda * elapsed).exp();
        self.value = (self.interp)(alpha, &self.value, &new_value);
        self.latest_update_timestamp = current_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Local;
    use approx::assert_relative_eq;

    fn ts(micros: i64) -> Timestamp<Local> {
        Timestamp::from_micros(micros)
    }

    #[test]
    fn rejects_out_of_range_coefficient() {
        let result = LowPassFilter::<Local, f64>::new(
            0.0,
            0.0,
            ts(0),
            float_interpolation,
        );
        assert!(result.is_err());
    }

    #[test]
    fn converges_toward_target_over_time() {
        let mut lpf = LowPassFilter::new(0.5, 0.0, ts(0), float_interpolation).unwrap();
        lpf.update(1.0, ts(Duration::from_secs_f64(1.0).micros()));
        assert_relative_eq!(*lpf.value(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn zero_elapsed_time_does_not_move_value() {
        let mut lpf = LowPassFilter::new(0.5, 0.0, ts(0), float_interpolation).unwrap();
        lpf.update(1.0, ts(0));
        assert_relative_eq!(*lpf.value(), 0.0, epsilon = 1e-9);
    }
}
