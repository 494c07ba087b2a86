//! Error types for the molecular VQE pipeline
//!
//! All errors propagate immediately to the caller; there is no internal
//! recovery or retry logic. The caller decides whether to restart with
//! different inputs (e.g. a different random seed) or abort.

use thiserror::Error;

/// Result type alias for molvqe operations
pub type Result<T> = std::result::Result<T, MolVqeError>;

/// Error type covering the full pipeline, from geometry validation
/// through Hamiltonian construction to circuit evaluation and
/// optimization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MolVqeError {
    // ==========================================================================
    // Molecule / Geometry Errors
    // ==========================================================================
    /// Charge and spin multiplicity are inconsistent with the electron count
    #[error("invalid molecule: {0}")]
    InvalidMolecule(String),

    /// No basis parameters available for an element
    #[error("unsupported element: no basis data for '{0}'")]
    UnsupportedElement(String),

    /// Malformed geometry (non-finite coordinates, coincident atoms)
    #[error("malformed geometry: {0}")]
    Geometry(String),

    // ==========================================================================
    // Circuit Errors
    // ==========================================================================
    /// A gate or observable references a qubit outside the register
    #[error("circuit size mismatch: qubit {qubit} outside register of {register} qubits")]
    CircuitSize { qubit: usize, register: usize },

    /// Parameter vector length does not match the ansatz shape
    #[error("parameter shape mismatch: got {got} parameters, ansatz requires {expected}")]
    ParameterShape { got: usize, expected: usize },

    /// A serialized Pauli-string term could not be decoded
    #[error("invalid Pauli-string encoding: {0}")]
    Encoding(String),

    /// An expectation value or operator retained a non-negligible
    /// imaginary component
    #[error("non-Hermitian result: imaginary residue {0:.3e} exceeds tolerance")]
    NonHermitian(f64),

    // ==========================================================================
    // Optimization Errors
    // ==========================================================================
    /// An evaluated energy became non-finite during optimization
    #[error("optimization diverged at step {step}: energy is not finite")]
    OptimizationDiverged { step: usize },
}
