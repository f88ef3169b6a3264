use crate::spatial::{LinearUncertainty, MeasuredPosition, Position, Vector, World};
use crate::time::{Local, Timestamp};

use super::config::{TrackerConfig, INITIAL_POSITION_VARIANCE};
use super::estimators::{self, slot, Covariance, State};
use super::tracked_target::TrackedTarget;

/// In-house constant-acceleration-per-axis Kalman filter, generalized from a
/// tensor-shaped predict/update pair down to the concrete 9-state/3-measurement
/// shape this system always uses.
#[derive(Clone)]
pub struct KalmanTrackedTarget {
    instance_id: u64,
    state: State,
    covariance: Covariance,
    latest_update_timestamp: Timestamp<Local>,
    latest_observed_timestamp: Timestamp<Local>,
    latest_observed_position: Position<World>,
    ode_coefficients: [f64; 2],
    intrinsic_noise: [f64; 3],
}

impl KalmanTrackedTarget {
    pub fn new(
        instance_id: u64,
        measurement: MeasuredPosition<World>,
        timestamp: Timestamp<Local>,
        config: &TrackerConfig,
    ) -> Self {
        let mut state = State::zeros();
        let mut covariance = Covariance::from_diagonal_element(INITIAL_POSITION_VARIANCE);
        for axis in 0..3 {
            state[slot(axis, 0)] = [
                measurement.position.x(),
                measurement.position.y(),
                measurement.position.z(),
            ][axis];
            for derivative in 1..3 {
                covariance[(slot(axis, derivative), slot(axis, derivative))] =
                    config.initial_derivative_variance[derivative - 1];
            }
        }
        let mut target = KalmanTrackedTarget {
            instance_id,
            state,
            covariance,
            latest_update_timestamp: timestamp,
            latest_observed_timestamp: timestamp,
            latest_observed_position: measurement.position,
            ode_coefficients: [0.0, 0.0],
            intrinsic_noise: config.intrinsic_noise,
        };
        target.apply_measurement(measurement);
        target
    }

    fn predict_to(&self, t: Timestamp<Local>) -> (State, Covariance) {
        let dt = (t - self.latest_update_timestamp).as_secs_f64();
        let result = estimators::predict(
            &self.state,
            &self.covariance,
            dt,
            self.ode_coefficients,
            self.intrinsic_noise,
        );
        (result.state, result.covariance)
    }

    fn apply_measurement(&mut self, measurement: MeasuredPosition<World>) {
        let z = estimators::Measurement::new(
            measurement.position.x(),
            measurement.position.y(),
            measurement.position.z(),
        );
        let r = estimators::MeasurementCovariance::from_diagonal(&nalgebra::Vector3::new(
            measurement.uncertainty.variances().0,
            measurement.uncertainty.variances().1,
            measurement.uncertainty.variances().2,
        ));
        let result = estimators::update(&self.state, &self.covariance, &z, &r);
        self.state = result.state;
        self.covariance = result.covariance;
        estimators::warn_if_covariance_excessive(&self.covariance, self.instance_id);
    }

    fn position_from_state(state: &State) -> Position<World> {
        Position::new(
            state[slot(0, 0)],
            state[slot(1, 0)],
            state[slot(2, 0)],
        )
    }

    fn velocity_from_state(state: &State) -> Vector<World> {
        Vector::new(
            state[slot(0, 1)],
            state[slot(1, 1)],
            state[slot(2, 1)],
        )
    }
}

impl TrackedTarget for KalmanTrackedTarget {
    fn instance_id(&self) -> u64 {
        self.instance_id
    }

    fn latest_estimated_position(&self) -> Position<World> {
        Self::position_from_state(&self.state)
    }

    fn latest_estimated_velocity(&self) -> Vector<World> {
        Self::velocity_from_state(&self.state)
    }

    fn latest_uncertainty(&self) -> Vector<World> {
        Vector::new(
            self.covariance[(slot(0, 0), slot(0, 0))],
            self.covariance[(slot(1, 0), slot(1, 0))],
            self.covariance[(slot(2, 0), slot(2, 0))],
        )
    }

    fn latest_update_timestamp(&self) -> Timestamp<Local> {
        self.latest_update_timestamp
    }

    fn latest_observed_timestamp(&self) -> Timestamp<Local> {
        self.latest_observed_timestamp
    }

    fn latest_observed_position(&self) -> Position<World> {
        self.latest_observed_position
    }

    fn extrapolate_position(&self, t: Timestamp<Local>) -> Position<World> {
        let (state, _) = self.predict_to(t);
        Self::position_from_state(&state)
    }

    fn update_from_measurement(&mut self, measurement: MeasuredPosition<World>, t: Timestamp<Local>) {
        let (state, covariance) = self.predict_to(t);
        self.state = state;
        self.covariance = covariance;
        self.apply_measurement(measurement);
        self.latest_update_timestamp = t;
        self.latest_observed_timestamp = t;
        self.latest_observed_position = measurement.position;
    }

    fn update_from_extrapolation(&mut self, t: Timestamp<Local>) {
        let (state, covariance) = self.predict_to(t);
        self.state = state;
        self.covariance = covariance;
        estimators::warn_if_covariance_excessive(&self.covariance, self.instance_id);
        self.latest_update_timestamp = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::LinearUncertainty;
    use crate::time::Duration;

    fn config() -> TrackerConfig {
        TrackerConfig {
            max_distance: 0.5,
            max_staleness: Duration::from_secs_f64(0.1),
            initial_derivative_variance: [10.0, 100.0],
            intrinsic_noise: [0.01, 0.1, 1.0],
        }
    }

    fn ts(micros: i64) -> Timestamp<Local> {
        Timestamp::from_micros(micros)
    }

    fn measured(x: f64, y: f64, z: f64) -> MeasuredPosition<World> {
        MeasuredPosition::new(
            Position::new(x, y, z),
            LinearUncertainty::from_variances(0.01, 0.01, 0.01),
        )
    }

    #[test]
    fn converges_toward_repeated_measurements_with_positive_velocity() {
        let cfg = config();
        let mut target = KalmanTrackedTarget::new(1, measured(10.0, 0.0, 0.0), ts(0), &cfg);
        target.update_from_measurement(measured(10.1, 0.0, 0.0), ts(16_000));
        target.update_from_measurement(measured(10.2, 0.0, 0.0), ts(32_000));

        let pos = target.latest_estimated_position();
        assert!((pos.x() - 10.2).abs() < 0.1);
        let vel = target.latest_estimated_velocity();
        assert!(vel.x() > 0.0);
        assert_eq!(target.instance_id(), 1);
    }
}
