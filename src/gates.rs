//! Gate matrices and their action on a state vector
//!
//! Single-qubit gates are 2x2 unitaries applied by pairing amplitudes
//! that differ only in the target bit; CNOT is applied directly as a
//! conditional bit flip.

use ndarray::{arr2, Array2};
use num_complex::Complex64;

use crate::state::QuantumState;

// =============================================================================
// Rotation Matrices
// =============================================================================

/// Rotation around the X axis: RX(θ) = exp(-iθX/2)
pub fn rx(theta: f64) -> Array2<Complex64> {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    arr2(&[[c, s], [s, c]])
}

/// Rotation around the Y axis: RY(θ) = exp(-iθY/2)
pub fn ry(theta: f64) -> Array2<Complex64> {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    arr2(&[[c, -s], [s, c]])
}

/// Rotation around the Z axis: RZ(θ) = exp(-iθZ/2)
pub fn rz(theta: f64) -> Array2<Complex64> {
    let zero = Complex64::new(0.0, 0.0);
    let e_neg = Complex64::new(0.0, -theta / 2.0).exp();
    let e_pos = Complex64::new(0.0, theta / 2.0).exp();
    arr2(&[[e_neg, zero], [zero, e_pos]])
}

// =============================================================================
// Application
// =============================================================================

/// Apply a 2x2 unitary to one qubit of the state vector
pub fn apply_1q(state: &mut QuantumState, qubit: usize, gate: &Array2<Complex64>) {
    let dim = state.dimension();
    let bit = 1usize << qubit;

    let u00 = gate[[0, 0]];
    let u01 = gate[[0, 1]];
    let u10 = gate[[1, 0]];
    let u11 = gate[[1, 1]];

    for i in 0..dim {
        if i & bit != 0 {
            continue;
        }
        let j = i | bit;
        let alpha = state.amplitudes[i];
        let beta = state.amplitudes[j];
        state.amplitudes[i] = u00 * alpha + u01 * beta;
        state.amplitudes[j] = u10 * alpha + u11 * beta;
    }
}

/// Apply CNOT: flip `target` where `control` is |1>
pub fn apply_cnot(state: &mut QuantumState, control: usize, target: usize) {
    let dim = state.dimension();
    let c_bit = 1usize << control;
    let t_bit = 1usize << target;

    for i in 0..dim {
        // Visit each swapped pair once, from its target=0 member
        if i & c_bit != 0 && i & t_bit == 0 {
            let j = i | t_bit;
            state.amplitudes.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rx_pi_flips() {
        let mut state = QuantumState::zero(1);
        apply_1q(&mut state, 0, &rx(PI));
        assert_abs_diff_eq!(state.probability(1), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ry_half_pi_superposes() {
        let mut state = QuantumState::zero(1);
        apply_1q(&mut state, 0, &ry(PI / 2.0));
        assert_abs_diff_eq!(state.probability(0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(state.probability(1), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rz_preserves_probabilities() {
        let mut state = QuantumState::zero(2);
        apply_1q(&mut state, 0, &ry(0.7));
        let p0 = state.probability(0);
        apply_1q(&mut state, 0, &rz(1.3));
        assert_abs_diff_eq!(state.probability(0), p0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.total_probability(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cnot_flips_on_set_control() {
        // |01> (qubit 0 set) -> |11>
        let mut state = QuantumState::hartree_fock(2, 1);
        apply_cnot(&mut state, 0, 1);
        assert_abs_diff_eq!(state.probability(0b11), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cnot_identity_on_clear_control() {
        let mut state = QuantumState::zero(2);
        apply_cnot(&mut state, 0, 1);
        assert_abs_diff_eq!(state.probability(0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rotations_are_unitary() {
        let mut state = QuantumState::zero(3);
        apply_1q(&mut state, 0, &ry(0.31));
        apply_1q(&mut state, 1, &rx(1.1));
        apply_1q(&mut state, 2, &rz(2.4));
        apply_cnot(&mut state, 0, 2);
        assert_abs_diff_eq!(state.total_probability(), 1.0, epsilon = 1e-12);
    }
}
