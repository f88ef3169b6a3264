use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub turret_distance_weight: f64,
    pub turret_rotation_difference_weight: f64,
    pub max_turret_distance: f64,
    /// Targets scoring at or above this are rejected outright, if set.
    pub maximum_score_threshold: Option<f64>,
    /// Plates farther than this from the selected robot are not considered
    /// for plate selection.
    pub plate_selection_radius: f64,
}
