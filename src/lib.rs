//! Molecular VQE pipeline: geometry in, ground-state estimate out.
//!
//! The crate goes from a 3D molecular geometry to a qubit Hamiltonian
//! (valence model + Jordan-Wigner), runs a variational quantum
//! eigensolver against a state-vector simulator, and puts the result
//! next to an exact diagonalization and a classical force-field
//! baseline.

pub mod ansatz; // Parameterized circuit templates
pub mod basis; // Valence basis parameters with caching provider
pub mod circuit; // Gate records and the state-vector simulator
pub mod error;
pub mod forcefield; // Classical UFF-style energy baseline
pub mod gates;
pub mod hamiltonian; // Qubit operator, dense matrix, exact ground state
pub mod molecule;
pub mod optimizer; // Parameter-shift gradient descent driver
pub mod pauli;
pub mod qchem; // Valence model -> Jordan-Wigner qubit Hamiltonian
pub mod report;
pub mod state;

pub use ansatz::{Ansatz, AnsatzForm};
pub use basis::{BasisCacheStats, BasisParams, BasisProvider, BuiltinBasis, CachedBasis};
pub use circuit::{CircuitSimulator, GateOp, IMAG_TOLERANCE};
pub use error::{MolVqeError, Result};
pub use forcefield::{
    ClassicalEnergy, ClassicalEnergyEstimator, UffEstimator, KCAL_PER_MOL_PER_HARTREE,
};
pub use hamiltonian::QubitHamiltonian;
pub use molecule::{atomic_number, Atom, Molecule};
pub use optimizer::{CancelToken, VqeConfig, VqeOptimizer, VqeResult};
pub use pauli::{Pauli, PauliTerm, PauliTermRepr};
pub use qchem::{HamiltonianBuilder, MolecularHamiltonian};
pub use report::EnergyComparison;
pub use state::QuantumState;
