//! Qubit-space Hamiltonians
//!
//! A [`QubitHamiltonian`] is an immutable weighted sum of Pauli strings
//! acting on a fixed register size. It is produced by the Hamiltonian
//! builder, consumed by the circuit simulator, and convertible to and
//! from the (coefficient, "X0 Z2 Y3") representation for serialization
//! and cross-checking.

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::{MolVqeError, Result};
use crate::pauli::{Pauli, PauliTerm, PauliTermRepr};

/// Coefficients smaller than this are dropped during construction
pub const COEFFICIENT_CUTOFF: f64 = 1e-12;

/// Largest register for which dense diagonalization is attempted
const MAX_DENSE_QUBITS: usize = 10;

/// A finite weighted sum of Pauli strings on `qubit_count` qubits.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitHamiltonian {
    qubit_count: usize,
    terms: Vec<PauliTerm>,
}

impl QubitHamiltonian {
    /// Build from a term list, validating that every term spans exactly
    /// `qubit_count` qubits. Terms with negligible coefficients are
    /// dropped; identical Pauli strings are not merged (builders are
    /// expected to emit each string once).
    pub fn new(qubit_count: usize, terms: Vec<PauliTerm>) -> Result<Self> {
        for term in &terms {
            if term.qubit_count() != qubit_count {
                return Err(MolVqeError::CircuitSize {
                    qubit: term.qubit_count().saturating_sub(1),
                    register: qubit_count,
                });
            }
            if !term.coefficient.is_finite() {
                return Err(MolVqeError::InvalidMolecule(
                    "Hamiltonian term has a non-finite coefficient".to_string(),
                ));
            }
        }
        let terms = terms
            .into_iter()
            .filter(|t| t.coefficient.abs() > COEFFICIENT_CUTOFF)
            .collect();
        Ok(Self { qubit_count, terms })
    }

    /// Minimum register size required
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Terms in construction order
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Coefficient of the identity string (constant energy offset)
    pub fn constant_term(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    // -------------------------------------------------------------------------
    // Serializable Representation
    // -------------------------------------------------------------------------

    /// Export as (coefficient, operator-string) pairs
    pub fn to_repr(&self) -> Vec<PauliTermRepr> {
        self.terms
            .iter()
            .map(|t| PauliTermRepr {
                coefficient: t.coefficient,
                operators: t.operator_string(),
            })
            .collect()
    }

    /// Reconstruct from the representation produced by [`to_repr`]
    pub fn from_repr(qubit_count: usize, repr: &[PauliTermRepr]) -> Result<Self> {
        let terms = repr
            .iter()
            .map(|r| PauliTerm::from_operator_string(&r.operators, qubit_count, r.coefficient))
            .collect::<Result<Vec<_>>>()?;
        Self::new(qubit_count, terms)
    }

    // -------------------------------------------------------------------------
    // Dense Form
    // -------------------------------------------------------------------------

    /// Assemble the dense 2^n × 2^n matrix of the operator
    pub fn to_matrix(&self) -> Result<DMatrix<Complex64>> {
        if self.qubit_count > MAX_DENSE_QUBITS {
            return Err(MolVqeError::CircuitSize {
                qubit: self.qubit_count,
                register: MAX_DENSE_QUBITS,
            });
        }
        let dim = 1usize << self.qubit_count;
        let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);

        for term in &self.terms {
            let mut x_mask = 0usize;
            for (q, &p) in term.ops.iter().enumerate() {
                if matches!(p, Pauli::X | Pauli::Y) {
                    x_mask |= 1 << q;
                }
            }
            for col in 0..dim {
                let row = col ^ x_mask;
                let mut phase = Complex64::new(term.coefficient, 0.0);
                for (q, &p) in term.ops.iter().enumerate() {
                    let bit = (col >> q) & 1;
                    match p {
                        Pauli::Y => {
                            // Y|0> = i|1>, Y|1> = -i|0>
                            phase *= Complex64::new(0.0, if bit == 0 { 1.0 } else { -1.0 });
                        }
                        Pauli::Z => {
                            if bit == 1 {
                                phase = -phase;
                            }
                        }
                        Pauli::I | Pauli::X => {}
                    }
                }
                matrix[(row, col)] += phase;
            }
        }
        Ok(matrix)
    }

    /// Exact ground-state energy by dense diagonalization.
    ///
    /// The Hermitian complex matrix H = A + iB is embedded as the real
    /// symmetric matrix [[A, -B], [B, A]], whose spectrum is that of H
    /// with every eigenvalue doubled, so the minimum carries over.
    pub fn exact_ground_state(&self) -> Result<f64> {
        let h = self.to_matrix()?;
        let dim = h.nrows();

        let mut embedded = DMatrix::<f64>::zeros(2 * dim, 2 * dim);
        for i in 0..dim {
            for j in 0..dim {
                let v = h[(i, j)];
                embedded[(i, j)] = v.re;
                embedded[(i + dim, j + dim)] = v.re;
                embedded[(i, j + dim)] = -v.im;
                embedded[(i + dim, j)] = v.im;
            }
        }

        let eigen = embedded.symmetric_eigen();
        let min = eigen
            .eigenvalues
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        Ok(min)
    }
}

impl std::fmt::Display for QubitHamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "QubitHamiltonian ({} qubits, {} terms)",
            self.qubit_count,
            self.terms.len()
        )?;
        for term in &self.terms {
            writeln!(f, "  {}", term)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_z() -> QubitHamiltonian {
        QubitHamiltonian::new(1, vec![PauliTerm::z(0, 1, 1.0)]).unwrap()
    }

    #[test]
    fn test_qubit_count_validation() {
        let result = QubitHamiltonian::new(2, vec![PauliTerm::z(0, 3, 1.0)]);
        assert!(matches!(result, Err(MolVqeError::CircuitSize { .. })));
    }

    #[test]
    fn test_tiny_coefficients_dropped() {
        let ham = QubitHamiltonian::new(
            2,
            vec![
                PauliTerm::z(0, 2, 0.5),
                PauliTerm::z(1, 2, 1e-15),
            ],
        )
        .unwrap();
        assert_eq!(ham.num_terms(), 1);
    }

    #[test]
    fn test_constant_term() {
        let ham = QubitHamiltonian::new(
            2,
            vec![
                PauliTerm::identity(2, -1.5),
                PauliTerm::z(0, 2, 0.3),
            ],
        )
        .unwrap();
        assert_abs_diff_eq!(ham.constant_term(), -1.5, epsilon = 1e-15);
    }

    #[test]
    fn test_repr_round_trip() {
        let ham = QubitHamiltonian::new(
            3,
            vec![
                PauliTerm::identity(3, -0.75),
                PauliTerm::z(1, 3, 0.25),
                PauliTerm::from_operator_string("X0 Y2", 3, 0.125).unwrap(),
            ],
        )
        .unwrap();

        let repr = ham.to_repr();
        let rebuilt = QubitHamiltonian::from_repr(3, &repr).unwrap();
        assert_eq!(rebuilt, ham);
    }

    #[test]
    fn test_z_matrix() {
        let m = single_z().to_matrix().unwrap();
        assert_abs_diff_eq!(m[(0, 0)].re, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m[(1, 1)].re, -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m[(0, 1)].norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_x_matrix_off_diagonal() {
        let ham =
            QubitHamiltonian::new(1, vec![PauliTerm::from_operator_string("X0", 1, 2.0).unwrap()])
                .unwrap();
        let m = ham.to_matrix().unwrap();
        assert_abs_diff_eq!(m[(0, 1)].re, 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m[(1, 0)].re, 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m[(0, 0)].norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_y_matrix_is_hermitian() {
        let ham =
            QubitHamiltonian::new(1, vec![PauliTerm::from_operator_string("Y0", 1, 1.0).unwrap()])
                .unwrap();
        let m = ham.to_matrix().unwrap();
        // Y = [[0, -i], [i, 0]]
        assert_abs_diff_eq!(m[(0, 1)].im, -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m[(1, 0)].im, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_exact_ground_state_of_z() {
        let energy = single_z().exact_ground_state().unwrap();
        assert_abs_diff_eq!(energy, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_exact_ground_state_transverse_field() {
        // H = Z0 + X0 has eigenvalues ±sqrt(2)
        let ham = QubitHamiltonian::new(
            1,
            vec![
                PauliTerm::z(0, 1, 1.0),
                PauliTerm::from_operator_string("X0", 1, 1.0).unwrap(),
            ],
        )
        .unwrap();
        let energy = ham.exact_ground_state().unwrap();
        assert_abs_diff_eq!(energy, -(2.0f64.sqrt()), epsilon = 1e-10);
    }
}
