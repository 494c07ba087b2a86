//! Circuit records and the state-vector simulator
//!
//! A circuit is an explicit, inspectable ordered list of [`GateOp`]
//! records produced by the ansatz layer; the simulator only executes
//! them. Keeping the two apart makes the simulator swappable (e.g. for
//! a hardware backend) without touching the ansatz or the optimizer.
//!
//! Expectation evaluation is a pure function of (ops, Hamiltonian):
//! the state vector is created fresh per call, initialized to the
//! Hartree-Fock-like reference occupation, transformed gate by gate,
//! and discarded after the expectation value is read off.

use num_complex::Complex64;

use crate::error::{MolVqeError, Result};
use crate::gates::{apply_1q, apply_cnot, rx, ry, rz};
use crate::hamiltonian::QubitHamiltonian;
use crate::pauli::{Pauli, PauliTerm};
use crate::state::QuantumState;

/// Expectation values whose imaginary residue exceeds this fail hard
pub const IMAG_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Gate Operations
// =============================================================================

/// One gate application in an ansatz circuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOp {
    /// X rotation by `theta` on `qubit`
    Rx { qubit: usize, theta: f64 },
    /// Y rotation by `theta` on `qubit`
    Ry { qubit: usize, theta: f64 },
    /// Z rotation by `theta` on `qubit`
    Rz { qubit: usize, theta: f64 },
    /// Controlled-NOT
    Cnot { control: usize, target: usize },
}

impl GateOp {
    /// Largest qubit index this gate touches
    pub fn max_qubit(&self) -> usize {
        match *self {
            GateOp::Rx { qubit, .. } | GateOp::Ry { qubit, .. } | GateOp::Rz { qubit, .. } => qubit,
            GateOp::Cnot { control, target } => control.max(target),
        }
    }
}

// =============================================================================
// Simulator
// =============================================================================

/// Reference state-vector simulator.
///
/// The register size is implied by the Hamiltonian passed to
/// [`expectation`]; the simulator itself only carries the reference
/// occupation (number of lowest-index qubits prepared in |1>).
#[derive(Debug, Clone, Copy, Default)]
pub struct CircuitSimulator {
    occupied: usize,
}

impl CircuitSimulator {
    /// Simulator starting from |0...0>
    pub fn new() -> Self {
        Self { occupied: 0 }
    }

    /// Start each evaluation from the Hartree-Fock occupation of
    /// `occupied` electrons
    pub fn with_occupation(occupied: usize) -> Self {
        Self { occupied }
    }

    pub fn occupation(&self) -> usize {
        self.occupied
    }

    /// Execute the gate list on a fresh register of `qubit_count`
    /// qubits and return the final state.
    pub fn run(&self, ops: &[GateOp], qubit_count: usize) -> Result<QuantumState> {
        if self.occupied > qubit_count {
            return Err(MolVqeError::CircuitSize {
                qubit: self.occupied.saturating_sub(1),
                register: qubit_count,
            });
        }
        for op in ops {
            if op.max_qubit() >= qubit_count {
                return Err(MolVqeError::CircuitSize {
                    qubit: op.max_qubit(),
                    register: qubit_count,
                });
            }
        }

        let mut state = QuantumState::hartree_fock(qubit_count, self.occupied);
        for op in ops {
            match *op {
                GateOp::Rx { qubit, theta } => apply_1q(&mut state, qubit, &rx(theta)),
                GateOp::Ry { qubit, theta } => apply_1q(&mut state, qubit, &ry(theta)),
                GateOp::Rz { qubit, theta } => apply_1q(&mut state, qubit, &rz(theta)),
                GateOp::Cnot { control, target } => apply_cnot(&mut state, control, target),
            }
        }
        Ok(state)
    }

    /// Evaluate ⟨ψ(ops)| H |ψ(ops)⟩.
    ///
    /// The result is real by construction (H is Hermitian); the
    /// imaginary residue is verified against [`IMAG_TOLERANCE`] and
    /// discarded, never silently returned.
    pub fn expectation(&self, ops: &[GateOp], hamiltonian: &QubitHamiltonian) -> Result<f64> {
        let state = self.run(ops, hamiltonian.qubit_count())?;

        let mut energy = Complex64::new(0.0, 0.0);
        for term in hamiltonian.terms() {
            energy += pauli_expectation(&state, term);
        }

        if energy.im.abs() > IMAG_TOLERANCE {
            return Err(MolVqeError::NonHermitian(energy.im));
        }
        Ok(energy.re)
    }
}

/// ⟨ψ| c·P |ψ⟩ for one weighted Pauli string.
///
/// P maps basis state |i⟩ to phase(i)·|i ^ x_mask⟩, where x_mask flips
/// the X and Y positions; the expectation is the sum of
/// conj(ψ[i ^ x_mask]) · phase(i) · ψ[i].
fn pauli_expectation(state: &QuantumState, term: &PauliTerm) -> Complex64 {
    let dim = state.amplitudes.len();
    let mut x_mask = 0usize;
    for (q, &p) in term.ops.iter().enumerate() {
        if matches!(p, Pauli::X | Pauli::Y) {
            x_mask |= 1 << q;
        }
    }

    let mut total = Complex64::new(0.0, 0.0);
    for i in 0..dim {
        let amp = state.amplitudes[i];
        if amp.norm_sqr() < 1e-300 {
            continue;
        }
        let mut phase = Complex64::new(1.0, 0.0);
        for (q, &p) in term.ops.iter().enumerate() {
            let bit = (i >> q) & 1;
            match p {
                Pauli::Y => {
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
        total += state.amplitudes[i ^ x_mask].conj() * phase * amp;
    }
    total * term.coefficient
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn z0_hamiltonian(qubits: usize) -> QubitHamiltonian {
        QubitHamiltonian::new(qubits, vec![PauliTerm::z(0, qubits, 1.0)]).unwrap()
    }

    #[test]
    fn test_z_expectation_on_reference_states() {
        let ham = z0_hamiltonian(1);
        // |0>: <Z> = +1
        let e = CircuitSimulator::new().expectation(&[], &ham).unwrap();
        assert_abs_diff_eq!(e, 1.0, epsilon = 1e-12);
        // |1>: <Z> = -1
        let e = CircuitSimulator::with_occupation(1)
            .expectation(&[], &ham)
            .unwrap();
        assert_abs_diff_eq!(e, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_x_expectation_after_rotation() {
        // RY(π/2)|0> = (|0> + |1>)/√2, an X eigenstate
        let ham =
            QubitHamiltonian::new(1, vec![PauliTerm::from_operator_string("X0", 1, 1.0).unwrap()])
                .unwrap();
        let ops = [GateOp::Ry {
            qubit: 0,
            theta: PI / 2.0,
        }];
        let e = CircuitSimulator::new().expectation(&ops, &ham).unwrap();
        assert_abs_diff_eq!(e, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_expectation_after_rotation() {
        // RX(-π/2)|0> = (|0> + i|1>)/√2, a +1 eigenstate of Y
        let ham =
            QubitHamiltonian::new(1, vec![PauliTerm::from_operator_string("Y0", 1, 1.0).unwrap()])
                .unwrap();
        let ops = [GateOp::Rx {
            qubit: 0,
            theta: -PI / 2.0,
        }];
        let e = CircuitSimulator::new().expectation(&ops, &ham).unwrap();
        assert_abs_diff_eq!(e, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bell_state_correlations() {
        // RY(π/2) then CNOT prepares (|00> + |11>)/√2;
        // <X0 X1> = <Z0 Z1> = 1
        let ham = QubitHamiltonian::new(
            2,
            vec![
                PauliTerm::from_operator_string("X0 X1", 2, 1.0).unwrap(),
                PauliTerm::zz(0, 1, 2, 1.0),
            ],
        )
        .unwrap();
        let ops = [
            GateOp::Ry {
                qubit: 0,
                theta: PI / 2.0,
            },
            GateOp::Cnot {
                control: 0,
                target: 1,
            },
        ];
        let e = CircuitSimulator::new().expectation(&ops, &ham).unwrap();
        assert_abs_diff_eq!(e, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expectation_is_deterministic() {
        let ham = QubitHamiltonian::new(
            2,
            vec![
                PauliTerm::identity(2, -0.5),
                PauliTerm::z(0, 2, 0.3),
                PauliTerm::from_operator_string("X0 Y1", 2, 0.2).unwrap(),
            ],
        )
        .unwrap();
        let ops = [
            GateOp::Ry {
                qubit: 0,
                theta: 0.37,
            },
            GateOp::Rz {
                qubit: 1,
                theta: 1.21,
            },
            GateOp::Cnot {
                control: 0,
                target: 1,
            },
        ];
        let sim = CircuitSimulator::with_occupation(1);
        let first = sim.expectation(&ops, &ham).unwrap();
        let second = sim.expectation(&ops, &ham).unwrap();
        assert_abs_diff_eq!(first, second, epsilon = 1e-15);
    }

    #[test]
    fn test_gate_out_of_range() {
        let ham = z0_hamiltonian(2);
        let ops = [GateOp::Ry {
            qubit: 2,
            theta: 0.1,
        }];
        let result = CircuitSimulator::new().expectation(&ops, &ham);
        assert!(matches!(
            result,
            Err(MolVqeError::CircuitSize { qubit: 2, register: 2 })
        ));
    }

    #[test]
    fn test_cnot_out_of_range() {
        let ham = z0_hamiltonian(2);
        let ops = [GateOp::Cnot {
            control: 0,
            target: 5,
        }];
        let result = CircuitSimulator::new().expectation(&ops, &ham);
        assert!(matches!(result, Err(MolVqeError::CircuitSize { .. })));
    }

    #[test]
    fn test_identity_term_offsets_energy() {
        let ham = QubitHamiltonian::new(
            1,
            vec![PauliTerm::identity(1, -2.5), PauliTerm::z(0, 1, 1.0)],
        )
        .unwrap();
        let e = CircuitSimulator::new().expectation(&[], &ham).unwrap();
        assert_abs_diff_eq!(e, -1.5, epsilon = 1e-12);
    }
}
