//! State-vector representation of the quantum register
//!
//! A [`QuantumState`] holds the 2^n complex amplitudes over the
//! computational basis. States are created fresh per circuit
//! evaluation, owned by the simulator for that evaluation, and
//! discarded once the expectation value is extracted.

use ndarray::Array1;
use num_complex::Complex64;

/// Amplitudes over the computational basis of an n-qubit register.
/// Qubit q corresponds to bit q of the basis index (LSB first).
#[derive(Debug, Clone)]
pub struct QuantumState {
    num_qubits: usize,
    pub(crate) amplitudes: Array1<Complex64>,
}

impl QuantumState {
    /// |0...0> on `num_qubits` qubits
    pub fn zero(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut amplitudes = Array1::<Complex64>::zeros(dim);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// A computational basis state with the `occupied` lowest-index
    /// qubits set to |1> (the Hartree-Fock-like reference occupation).
    pub fn hartree_fock(num_qubits: usize, occupied: usize) -> Self {
        debug_assert!(occupied <= num_qubits);
        let dim = 1usize << num_qubits;
        let index = (1usize << occupied) - 1;
        let mut amplitudes = Array1::<Complex64>::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Probability of measuring basis state `index`
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }

    /// Sum of all basis probabilities (1 for a normalized state)
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_state() {
        let state = QuantumState::zero(3);
        assert_eq!(state.dimension(), 8);
        assert_abs_diff_eq!(state.probability(0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.total_probability(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_hartree_fock_occupation() {
        // 2 electrons on 4 qubits -> |0011> = index 3
        let state = QuantumState::hartree_fock(4, 2);
        assert_abs_diff_eq!(state.probability(0b0011), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.probability(0), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_hartree_fock_empty_occupation_is_zero_state() {
        let state = QuantumState::hartree_fock(2, 0);
        assert_abs_diff_eq!(state.probability(0), 1.0, epsilon = 1e-15);
    }
}
