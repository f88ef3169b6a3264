use crate::filters::{float_interpolation, LowPassFilter};
use crate::time::{Local, Timestamp};

use super::BeybladeConfig;

/// Two low-pass filters on the spin-input boolean, one slow (enter) and one
/// fast (exit). Reads `true` only once both filters clear the threshold.
pub struct BeybladeIndicator {
    enter: LowPassFilter<Local, f64>,
    exit: LowPassFilter<Local, f64>,
    threshold: f64,
}

impl BeybladeIndicator {
    pub fn new(config: &BeybladeConfig, initial_timestamp: Timestamp<Local>) -> Self {
        BeybladeIndicator {
            enter: LowPassFilter::new(
                config.enter_interpolation_coefficient,
                0.0,
                initial_timestamp,
                float_interpolation,
            )
            .expect("beyblade config validated at load time"),
            exit: LowPassFilter::new(
                config.exit_interpolation_coefficient,
                0.0,
                initial_timestamp,
                float_interpolation,
            )
            .expect("beyblade config validated at load time"),
            threshold: config.indicator_threshold,
        }
    }

    pub fn value(&self) -> bool {
        *self.enter.value() >= self.threshold && *self.exit.value() >= self.threshold
    }

    pub fn update(&mut self, spinning: bool, timestamp: Timestamp<Local>) {
        let input = if spinning { 1.0 } else { 0.0 };
        self.enter.update(input, timestamp);
        self.exit.update(input, timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;

    fn config() -> BeybladeConfig {
        BeybladeConfig {
            enter_interpolation_coefficient: 0.05,
            exit_interpolation_coefficient: 0.5,
            indicator_threshold: 0.6,
            max_association_radius: 0.3,
            relative_velocity_magnitude_threshold: 1.0,
        }
    }

    fn ts(micros: i64) -> Timestamp<Local> {
        Timestamp::from_micros(micros)
    }

    #[test]
    fn asymmetric_hysteresis_slow_in_fast_out() {
        let cfg = config();
        let mut indicator = BeybladeIndicator::new(&cfg, ts(0));
        let frame = Duration::from_secs_f64(1.0 / 60.0).micros();
        let mut t = 0i64;
        for _ in 0..10 {
            t += frame;
            indicator.update(true, ts(t));
        }
        // slow filter has not caught up in 10 frames at 60Hz with a 0.05 coefficient
        assert!(!indicator.value());

        t += frame;
        indicator.update(false, ts(t));
        t += frame;
        indicator.update(false, ts(t));
        // fast filter drops below threshold quickly, keeping indicator false
        assert!(!indicator.value());
    }
}
