//! The linear-algebra core of the in-house Kalman filter: a 9-dimensional
//! state (position, velocity, acceleration, one triple per world axis) with
//! a 3-dimensional position measurement.

use nalgebra::{SMatrix, SVector, SymmetricEigen};

use crate::target_tracker::config::COVARIANCE_WARNING_THRESHOLD;

pub type State = SVector<f64, 9>;
pub type Covariance = SMatrix<f64, 9, 9>;
pub type Measurement = SVector<f64, 3>;
pub type MeasurementCovariance = SMatrix<f64, 3, 3>;
pub type MeasurementMap = SMatrix<f64, 3, 9>;

/// Index of the position/velocity/acceleration slot for axis `axis` (0=x,
/// 1=y, 2=z).
pub fn slot(axis: usize, derivative: usize) -> usize {
    axis * 3 + derivative
}

pub fn measurement_map() -> MeasurementMap {
    let mut h = MeasurementMap::zeros();
    for axis in 0..3 {
        h[(axis, slot(axis, 0))] = 1.0;
    }
    h
}

/// Per-axis evolution block. Rows 0 and 1 (position, velocity) follow the
/// natural Taylor expansion; row 2 (acceleration) is overlaid by
/// `ode_coefficients` (its self term is always zero), so with the all-zero
/// default the deterministic acceleration prediction resets to zero and all
/// of its evolution comes from process noise.
fn axis_block(dt: f64, ode_coefficients: [f64; 2]) -> SMatrix<f64, 3, 3> {
    SMatrix::<f64, 3, 3>::new(
        1.0,
        dt,
        dt * dt / 2.0,
        0.0,
        1.0,
        dt,
        ode_coefficients[0],
        ode_coefficients[1],
        0.0,
    )
}

pub fn evolution_operator(dt: f64, ode_coefficients: [f64; 2]) -> Covariance {
    let block = axis_block(dt, ode_coefficients);
    let mut f = Covariance::zeros();
    for axis in 0..3 {
        for i in 0..3 {
            for j in 0..3 {
                f[(slot(axis, i), slot(axis, j))] = block[(i, j)];
            }
        }
    }
    f
}

pub fn evolution_noise(f: &Covariance, intrinsic_noise: [f64; 3]) -> Covariance {
    let mut q_diag = SVector::<f64, 9>::zeros();
    for axis in 0..3 {
        for d in 0..3 {
            q_diag[slot(axis, d)] = intrinsic_noise[d];
        }
    }
    let q = Covariance::from_diagonal(&q_diag);
    f * q * f.transpose()
}

/// Symmetrizes, then projects onto the PSD cone by clamping eigenvalues to
/// be non-negative; applied twice to absorb numeric drift from the first
/// pass.
pub fn nearest_valid_covariance(p: Covariance) -> Covariance {
    let once = project_psd(p);
    project_psd(once)
}

fn project_psd(p: Covariance) -> Covariance {
    let sym = (p + p.transpose()) * 0.5;
    let eig = SymmetricEigen::new(sym);
    let clamped = eig.eigenvalues.map(|v| v.max(0.0));
    let reconstructed = &eig.eigenvectors * Covariance::from_diagonal(&clamped) * eig.eigenvectors.transpose();
    (reconstructed + reconstructed.transpose()) * 0.5
}

pub fn warn_if_covariance_excessive(p: &Covariance, target_id: u64) {
    let max_entry = p.iter().cloned().fold(f64::MIN, f64::max);
    if max_entry > COVARIANCE_WARNING_THRESHOLD {
        tracing::warn!(target_id, max_entry, "tracked target covariance excursion");
    }
}

pub struct PredictResult {
    pub state: State,
    pub covariance: Covariance,
}

pub fn predict(
    state: &State,
    covariance: &Covariance,
    dt: f64,
    ode_coefficients: [f64; 2],
    intrinsic_noise: [f64; 3],
) -> PredictResult {
    let f = evolution_operator(dt, ode_coefficients);
    let q = evolution_noise(&f, intrinsic_noise);
    let new_state = f * state;
    let new_covariance = nearest_valid_covariance(f * covariance * f.transpose() + q);
    PredictResult {
        state: new_state,
        covariance: new_covariance,
    }
}

pub struct UpdateResult {
    pub state: State,
    pub covariance: Covariance,
}

pub fn update(
    state: &State,
    covariance: &Covariance,
    measurement: &Measurement,
    measurement_noise: &MeasurementCovariance,
) -> UpdateResult {
    let h = measurement_map();
    let innovation = measurement - h * state;
    let s = h * covariance * h.transpose() + measurement_noise;
    let s_inv = s
        .try_inverse()
        .unwrap_or_else(MeasurementCovariance::identity);
    let gain = covariance * h.transpose() * s_inv;
    let new_state = state + gain * innovation;
    let new_covariance = nearest_valid_covariance(covariance - gain * h * covariance);
    UpdateResult {
        state: new_state,
        covariance: new_covariance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evolution_operator_is_identity_at_zero_dt() {
        let f = evolution_operator(0.0, [0.0, 0.0]);
        for axis in 0..3 {
            assert_eq!(f[(slot(axis, 0), slot(axis, 0))], 1.0);
            assert_eq!(f[(slot(axis, 0), slot(axis, 1))], 0.0);
        }
    }

    #[test]
    fn nearest_valid_covariance_is_symmetric_and_psd() {
        let mut p = Covariance::identity();
        p[(0, 1)] = 5.0; // break symmetry and PSD-ness on purpose
        let fixed = nearest_valid_covariance(p);
        assert_eq!(fixed[(0, 1)], fixed[(1, 0)]);
        let eig = SymmetricEigen::new(fixed);
        assert!(eig.eigenvalues.iter().all(|&v| v >= -1e-9));
    }
}
