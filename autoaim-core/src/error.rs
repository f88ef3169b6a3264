use thiserror::Error;

/// Errors produced by the targeting core.
///
/// Recoverable-within-a-frame conditions (odometry miss, invalid depth region,
/// covariance excursion) are logged via `tracing` at their call site rather than
/// represented here; this enum covers conditions a caller must branch on.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("timestamp {0} is not newer than the buffer's newest entry")]
    EntryTooOld(i64),

    #[error("axis-angle rotation requires a nonzero axis")]
    ZeroRotationAxis,

    #[error("kalman filter configuration shapes do not match: {0}")]
    ShapeMismatch(String),

    #[error("measurement dimension {measurement} does not match filter configuration {expected}")]
    MeasurementShapeMismatch { measurement: usize, expected: usize },

    #[error("low-pass filter interpolation coefficient must lie in (0, 1), got {0}")]
    InvalidInterpolationCoefficient(f64),

    #[error("duration string {0:?} is not a valid us|ms|s|m value")]
    InvalidDurationString(String),
}
