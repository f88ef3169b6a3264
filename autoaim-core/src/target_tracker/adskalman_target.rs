use adskalman::{KalmanFilterNoControl, ObservationModel, StateAndCovariance, TransitionModelLinearNoControl};
use nalgebra::{Const, OMatrix, OVector};

use crate::spatial::{LinearUncertainty, MeasuredPosition, Position, Vector, World};
use crate::time::{Local, Timestamp};

use super::config::{TrackerConfig, INITIAL_POSITION_VARIANCE};
use super::estimators::slot;
use super::tracked_target::TrackedTarget;

type SS = Const<9>;
type OS = Const<3>;
type State9 = OVector<f64, SS>;
type Cov9 = OMatrix<f64, SS, SS>;

/// A no-op transition model (`F = I`, `Q = 0`) used only to drive
/// `adskalman`'s combined predict+update `step` for the measurement-update
/// half of the cycle; the actual time evolution already happened in
/// `predict_to`, via the same math the in-house filter uses.
struct IdentityModel {
    f: Cov9,
    q: Cov9,
}

impl IdentityModel {
    fn new() -> Self {
        IdentityModel {
            f: Cov9::identity(),
            q: Cov9::zeros(),
        }
    }
}

impl TransitionModelLinearNoControl<f64, SS> for IdentityModel {
    fn F(&self) -> &Cov9 {
        &self.f
    }
    fn Q(&self) -> &Cov9 {
        &self.q
    }
}

struct PositionObservationModel {
    h: OMatrix<f64, OS, SS>,
    r: OMatrix<f64, OS, OS>,
}

impl PositionObservationModel {
    fn new(measurement: &MeasuredPosition<World>) -> Self {
        let h = super::estimators::measurement_map();
        let (vx, vy, vz) = measurement.uncertainty.variances();
        let r = OMatrix::<f64, OS, OS>::from_diagonal(&OVector::<f64, OS>::new(vx, vy, vz));
        PositionObservationModel { h, r }
    }
}

impl ObservationModel<f64, SS, OS> for PositionObservationModel {
    fn H(&self) -> &OMatrix<f64, OS, SS> {
        &self.h
    }
    fn HT(&self) -> OMatrix<f64, SS, OS> {
        self.h.transpose()
    }
    fn R(&self) -> &OMatrix<f64, OS, OS> {
        &self.r
    }
}

/// Second concrete `TrackedTarget` implementation: adapts the `adskalman`
/// crate's predict/update pair to the same 9-state constant-acceleration
/// model used by [`super::KalmanTrackedTarget`], rather than reimplementing
/// the linear algebra in-house.
#[derive(Clone)]
pub struct AdsKalmanTrackedTarget {
    instance_id: u64,
    estimate: StateAndCovariance<f64, SS>,
    latest_update_timestamp: Timestamp<Local>,
    latest_observed_timestamp: Timestamp<Local>,
    latest_observed_position: Position<World>,
    intrinsic_noise: [f64; 3],
}

impl AdsKalmanTrackedTarget {
    pub fn new(
        instance_id: u64,
        measurement: MeasuredPosition<World>,
        timestamp: Timestamp<Local>,
        config: &TrackerConfig,
    ) -> Self {
        let mut state = State9::zeros();
        let mut covariance = Cov9::from_diagonal_element(INITIAL_POSITION_VARIANCE);
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
        let estimate = StateAndCovariance::new(state, covariance);
        let mut target = AdsKalmanTrackedTarget {
            instance_id,
            estimate,
            latest_update_timestamp: timestamp,
            latest_observed_timestamp: timestamp,
            latest_observed_position: measurement.position,
            intrinsic_noise: config.intrinsic_noise,
        };
        target.apply_measurement(measurement);
        target
    }

    /// Predicts ahead using the same evolution math as the in-house filter
    /// (shared via `estimators::predict`); only the measurement-update step
    /// below goes through `adskalman` itself.
    fn predict_to(&self, t: Timestamp<Local>) -> StateAndCovariance<f64, SS> {
        let dt = (t - self.latest_update_timestamp).as_secs_f64();
        let result = super::estimators::predict(
            self.estimate.state(),
            self.estimate.covariance(),
            dt,
            [0.0, 0.0],
            self.intrinsic_noise,
        );
        StateAndCovariance::new(result.state, result.covariance)
    }

    fn apply_measurement(&mut self, measurement: MeasuredPosition<World>) {
        let transition = IdentityModel::new();
        let observation = PositionObservationModel::new(&measurement);
        let kf = KalmanFilterNoControl::new(&transition, &observation);
        let z = OVector::<f64, OS>::new(
            measurement.position.x(),
            measurement.position.y(),
            measurement.position.z(),
        );
        match kf.step(&self.estimate, &z) {
            Ok(updated) => self.estimate = updated,
            Err(err) => {
                tracing::warn!(instance_id = self.instance_id, %err, "adskalman update rejected");
            }
        }
    }

    fn position_from_state(state: &State9) -> Position<World> {
        Position::new(state[slot(0, 0)], state[slot(1, 0)], state[slot(2, 0)])
    }

    fn velocity_from_state(state: &State9) -> Vector<World> {
        Vector::new(state[slot(0, 1)], state[slot(1, 1)], state[slot(2, 1)])
    }
}

impl TrackedTarget for AdsKalmanTrackedTarget {
    fn instance_id(&self) -> u64 {
        self.instance_id
    }

    fn latest_estimated_position(&self) -> Position<World> {
        Self::position_from_state(self.estimate.state())
    }

    fn latest_estimated_velocity(&self) -> Vector<World> {
        Self::velocity_from_state(self.estimate.state())
    }

    fn latest_uncertainty(&self) -> Vector<World> {
        let c = self.estimate.covariance();
        Vector::new(
            c[(slot(0, 0), slot(0, 0))],
            c[(slot(1, 0), slot(1, 0))],
            c[(slot(2, 0), slot(2, 0))],
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
        Self::position_from_state(self.predict_to(t).state())
    }

    fn update_from_measurement(&mut self, measurement: MeasuredPosition<World>, t: Timestamp<Local>) {
        self.estimate = self.predict_to(t);
        self.apply_measurement(measurement);
        self.latest_update_timestamp = t;
        self.latest_observed_timestamp = t;
        self.latest_observed_position = measurement.position;
    }

    fn update_from_extrapolation(&mut self, t: Timestamp<Local>) {
        self.estimate = self.predict_to(t);
        self.latest_update_timestamp = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn tracks_toward_measurements_same_as_in_house_filter() {
        let cfg = config();
        let mut target = AdsKalmanTrackedTarget::new(7, measured(10.0, 0.0, 0.0), ts(0), &cfg);
        target.update_from_measurement(measured(10.1, 0.0, 0.0), ts(16_000));
        target.update_from_measurement(measured(10.2, 0.0, 0.0), ts(32_000));

        let pos = target.latest_estimated_position();
        assert!((pos.x() - 10.2).abs() < 0.1);
        assert_eq!(target.instance_id(), 7);
    }
}
