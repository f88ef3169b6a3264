use serde::{Deserialize, Serialize};

/// Configuration for [`super::BeybladeIdentifier`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BeybladeConfig {
    /// Time constant of the filter used when the indicator is trying to
    /// enter the spinning state (slow: hard to start considering a robot a
    /// beyblade).
    pub enter_interpolation_coefficient: f64,
    /// Time constant of the filter used when the indicator is trying to
    /// leave the spinning state (fast: quick to stop considering a robot a
    /// beyblade).
    pub exit_interpolation_coefficient: f64,
    /// Both filters must reach this value for the indicator to read `true`.
    pub indicator_threshold: f64,
    /// A plate farther than this from every robot is not associated with
    /// any robot.
    pub max_association_radius: f64,
    /// Mean relative-velocity magnitude, in m/s, above which a robot's
    /// instantaneous spin input is considered `true`.
    pub relative_velocity_magnitude_threshold: f64,
}
