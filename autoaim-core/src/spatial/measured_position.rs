use super::{Frame, LinearUncertainty, Position};

/// A position paired with its covariance, both in the same frame.
#[derive(Clone, Copy, Debug)]
pub struct MeasuredPosition<F: Frame> {
    pub position: Position<F>,
    pub uncertainty: LinearUncertainty<F>,
}

impl<F: Frame> MeasuredPosition<F> {
    pub fn new(position: Position<F>, uncertainty: LinearUncertainty<F>) -> Self {
        MeasuredPosition {
            position,
            uncertainty,
        }
    }
}
