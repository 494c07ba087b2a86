//! Molecular geometry
//!
//! A molecule is an ordered list of (element symbol, position) pairs in
//! Ångström, plus a net charge and spin multiplicity. Geometry is
//! expected to come from an external provider (hydrogens added,
//! force-field relaxed) and is immutable once validated here.

use nalgebra::Vector3;

use crate::error::{MolVqeError, Result};

// =============================================================================
// Physical Constants
// =============================================================================

/// Bohr radius in Ångström
pub const BOHR_TO_ANGSTROM: f64 = 0.529177249;

/// Ångström to Bohr conversion
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGSTROM;

/// Two atoms closer than this (Ångström) are considered coincident
pub const MIN_ATOM_SEPARATION: f64 = 1e-6;

/// Atomic numbers for the elements this crate knows about
const ATOMIC_NUMBERS: &[(&str, u32)] = &[
    ("H", 1),
    ("He", 2),
    ("Li", 3),
    ("Be", 4),
    ("B", 5),
    ("C", 6),
    ("N", 7),
    ("O", 8),
    ("F", 9),
    ("Ne", 10),
    ("Na", 11),
    ("Mg", 12),
    ("P", 15),
    ("S", 16),
    ("Cl", 17),
];

/// Look up the atomic number for an element symbol
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ATOMIC_NUMBERS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, z)| *z)
}

// =============================================================================
// Atom
// =============================================================================

/// An atom in 3D space
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol, e.g. "O"
    pub symbol: String,
    /// Atomic number
    pub atomic_number: u32,
    /// Position in Ångström
    pub position: Vector3<f64>,
}

// =============================================================================
// Molecule
// =============================================================================

/// An immutable molecular geometry with net charge and spin multiplicity
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    charge: i32,
    multiplicity: u32,
}

impl Molecule {
    /// Build a molecule from parallel symbol and coordinate lists
    /// (Ångström). Validates the geometry and the consistency of charge
    /// and multiplicity with the total electron count.
    pub fn new(
        symbols: &[&str],
        coords: &[[f64; 3]],
        charge: i32,
        multiplicity: u32,
    ) -> Result<Self> {
        if symbols.is_empty() {
            return Err(MolVqeError::Geometry("molecule has no atoms".to_string()));
        }
        if symbols.len() != coords.len() {
            return Err(MolVqeError::Geometry(format!(
                "{} symbols but {} coordinates",
                symbols.len(),
                coords.len()
            )));
        }

        let mut atoms = Vec::with_capacity(symbols.len());
        for (symbol, xyz) in symbols.iter().zip(coords.iter()) {
            let z = atomic_number(symbol)
                .ok_or_else(|| MolVqeError::UnsupportedElement(symbol.to_string()))?;
            atoms.push(Atom {
                symbol: symbol.to_string(),
                atomic_number: z,
                position: Vector3::new(xyz[0], xyz[1], xyz[2]),
            });
        }

        let molecule = Self {
            atoms,
            charge,
            multiplicity,
        };
        molecule.validate_geometry()?;
        molecule.validate_electron_count()?;
        Ok(molecule)
    }

    fn validate_geometry(&self) -> Result<()> {
        for atom in &self.atoms {
            if !atom.position.iter().all(|c| c.is_finite()) {
                return Err(MolVqeError::Geometry(format!(
                    "non-finite coordinate on atom '{}'",
                    atom.symbol
                )));
            }
        }
        for i in 0..self.atoms.len() {
            for j in (i + 1)..self.atoms.len() {
                let d = (self.atoms[i].position - self.atoms[j].position).norm();
                if d < MIN_ATOM_SEPARATION {
                    return Err(MolVqeError::Geometry(format!(
                        "atoms {} and {} coincide (distance {:.2e} A)",
                        i, j, d
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_electron_count(&self) -> Result<()> {
        if self.multiplicity < 1 {
            return Err(MolVqeError::InvalidMolecule(
                "multiplicity must be >= 1".to_string(),
            ));
        }
        let nuclear: i64 = self.atoms.iter().map(|a| a.atomic_number as i64).sum();
        let electrons = nuclear - self.charge as i64;
        if electrons < 1 {
            return Err(MolVqeError::InvalidMolecule(format!(
                "charge {} leaves {} electrons",
                self.charge, electrons
            )));
        }
        // Unpaired electrons (multiplicity - 1) must have the same parity
        // as the electron count and cannot exceed it.
        let unpaired = (self.multiplicity - 1) as i64;
        if unpaired % 2 != electrons % 2 {
            return Err(MolVqeError::InvalidMolecule(format!(
                "multiplicity {} is inconsistent with {} electrons",
                self.multiplicity, electrons
            )));
        }
        if unpaired > electrons {
            return Err(MolVqeError::InvalidMolecule(format!(
                "multiplicity {} requires more unpaired electrons than the {} available",
                self.multiplicity, electrons
            )));
        }
        Ok(())
    }

    /// Atoms in input order
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of atoms
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Net charge
    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Spin multiplicity (2S + 1)
    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Total number of electrons
    pub fn num_electrons(&self) -> usize {
        let nuclear: i64 = self.atoms.iter().map(|a| a.atomic_number as i64).sum();
        (nuclear - self.charge as i64) as usize
    }

    /// Interatomic distance in Ångström
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        (self.atoms[i].position - self.atoms[j].position).norm()
    }

    /// H₂ at the equilibrium bond length (0.7414 Å)
    pub fn h2() -> Self {
        Self::new(
            &["H", "H"],
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 0.7414]],
            0,
            1,
        )
        .expect("H2 reference geometry is valid")
    }

    /// Water at the standard experimental geometry
    /// (O-H 0.9584 Å, H-O-H 104.45°)
    pub fn water() -> Self {
        Self::new(
            &["O", "H", "H"],
            &[
                [0.0, 0.0, 0.0],
                [0.0, 0.7572, 0.5865],
                [0.0, -0.7572, 0.5865],
            ],
            0,
            1,
        )
        .expect("water reference geometry is valid")
    }
}
