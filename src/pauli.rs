//! Pauli operators and Pauli-string terms
//!
//! A qubit Hamiltonian is a weighted sum of tensor products of
//! single-qubit Pauli operators. Terms are stored dense (one operator
//! per qubit) and expose the string encoding "X0 Z2 Y3" used for
//! serialization and cross-checking against reference chemistry
//! packages.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{MolVqeError, Result};

// =============================================================================
// Single-Qubit Paulis
// =============================================================================

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// Operator product `self * other`, returned as (phase, operator).
    ///
    /// Follows the Pauli algebra XY = iZ, YZ = iX, ZX = iY (and the
    /// conjugate orderings with phase -i); equal operators square to I.
    pub fn product(self, other: Pauli) -> (Complex64, Pauli) {
        use Pauli::*;
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match (self, other) {
            (I, p) | (p, I) => (one, p),
            (X, X) | (Y, Y) | (Z, Z) => (one, I),
            (X, Y) => (i, Z),
            (Y, X) => (-i, Z),
            (Y, Z) => (i, X),
            (Z, Y) => (-i, X),
            (Z, X) => (i, Y),
            (X, Z) => (-i, Y),
        }
    }

    fn letter(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    fn from_letter(c: char) -> Option<Pauli> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

// =============================================================================
// Pauli Terms
// =============================================================================

/// One weighted Pauli string: a real coefficient and one operator per
/// qubit position.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliTerm {
    /// Real coefficient (the Hamiltonian is Hermitian)
    pub coefficient: f64,
    /// Operators indexed by qubit, length = register size
    pub ops: Vec<Pauli>,
}

impl PauliTerm {
    pub fn new(coefficient: f64, ops: Vec<Pauli>) -> Self {
        Self { coefficient, ops }
    }

    /// Identity term on `qubit_count` qubits
    pub fn identity(qubit_count: usize, coefficient: f64) -> Self {
        Self::new(coefficient, vec![Pauli::I; qubit_count])
    }

    /// Single Z term
    pub fn z(qubit: usize, qubit_count: usize, coefficient: f64) -> Self {
        let mut ops = vec![Pauli::I; qubit_count];
        ops[qubit] = Pauli::Z;
        Self::new(coefficient, ops)
    }

    /// ZZ term on two qubits
    pub fn zz(q1: usize, q2: usize, qubit_count: usize, coefficient: f64) -> Self {
        let mut ops = vec![Pauli::I; qubit_count];
        ops[q1] = Pauli::Z;
        ops[q2] = Pauli::Z;
        Self::new(coefficient, ops)
    }

    pub fn qubit_count(&self) -> usize {
        self.ops.len()
    }

    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|&p| p == Pauli::I)
    }

    /// Encode the operator part as "X0 Z2 Y3"; the identity encodes as "I"
    pub fn operator_string(&self) -> String {
        let parts: Vec<String> = self
            .ops
            .iter()
            .enumerate()
            .filter(|(_, &p)| p != Pauli::I)
            .map(|(q, &p)| format!("{}{}", p.letter(), q))
            .collect();
        if parts.is_empty() {
            "I".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Decode an operator string produced by [`operator_string`]
    pub fn from_operator_string(
        encoded: &str,
        qubit_count: usize,
        coefficient: f64,
    ) -> Result<Self> {
        let mut ops = vec![Pauli::I; qubit_count];
        let trimmed = encoded.trim();
        if trimmed == "I" || trimmed.is_empty() {
            return Ok(Self::new(coefficient, ops));
        }
        for token in trimmed.split_whitespace() {
            let mut chars = token.chars();
            let letter = chars
                .next()
                .and_then(Pauli::from_letter)
                .ok_or_else(|| MolVqeError::Encoding(format!("bad Pauli token '{}'", token)))?;
            let qubit: usize = chars.as_str().parse().map_err(|_| {
                MolVqeError::Encoding(format!("bad qubit index in token '{}'", token))
            })?;
            if qubit >= qubit_count {
                return Err(MolVqeError::CircuitSize {
                    qubit,
                    register: qubit_count,
                });
            }
            ops[qubit] = letter;
        }
        Ok(Self::new(coefficient, ops))
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.6} {}", self.coefficient, self.operator_string())
    }
}

/// Serializable form of one Hamiltonian term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTermRepr {
    pub coefficient: f64,
    pub operators: String,
}

// =============================================================================
// Complex-Phase Terms (operator algebra)
// =============================================================================

/// A Pauli string with a complex coefficient, used as the working
/// representation while multiplying out ladder-operator products during
/// the fermion-to-qubit transform. Final Hamiltonians keep only the
/// real part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PhasedTerm {
    pub coeff: Complex64,
    pub ops: Vec<Pauli>,
}

impl PhasedTerm {
    pub fn identity(qubit_count: usize, coeff: Complex64) -> Self {
        Self {
            coeff,
            ops: vec![Pauli::I; qubit_count],
        }
    }

    /// Qubit-wise operator product, accumulating the algebra phase
    pub fn mul(&self, other: &PhasedTerm) -> PhasedTerm {
        debug_assert_eq!(self.ops.len(), other.ops.len());
        let mut coeff = self.coeff * other.coeff;
        let mut ops = Vec::with_capacity(self.ops.len());
        for (&a, &b) in self.ops.iter().zip(other.ops.iter()) {
            let (phase, p) = a.product(b);
            coeff *= phase;
            ops.push(p);
        }
        PhasedTerm { coeff, ops }
    }
}
