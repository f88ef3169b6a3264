use crate::spatial::{MeasuredPosition, Position, Vector, World};
use crate::time::{Local, Timestamp};

/// Capability exposed by any target-tracking implementation, independent of
/// which underlying filter it is built on. Two implementations exist:
/// [`super::KalmanTrackedTarget`] (in-house tensor filter) and
/// [`super::AdsKalmanTrackedTarget`] (wraps the `adskalman` crate).
pub trait TrackedTarget {
    fn instance_id(&self) -> u64;

    fn latest_estimated_position(&self) -> Position<World>;
    fn latest_estimated_velocity(&self) -> Vector<World>;
    /// Per-axis variance of the estimated position.
    fn latest_uncertainty(&self) -> Vector<World>;

    fn latest_update_timestamp(&self) -> Timestamp<Local>;
    fn latest_observed_timestamp(&self) -> Timestamp<Local>;
    fn latest_observed_position(&self) -> Position<World>;

    /// Pure; does not mutate filter state.
    fn extrapolate_position(&self, t: Timestamp<Local>) -> Position<World>;

    fn update_from_measurement(&mut self, measurement: MeasuredPosition<World>, t: Timestamp<Local>);
    fn update_from_extrapolation(&mut self, t: Timestamp<Local>);
}
