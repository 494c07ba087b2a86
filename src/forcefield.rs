//! Classical force-field energy baseline
//!
//! # Theory
//!
//! A cheap molecular-mechanics estimate to put next to the quantum
//! result. Two terms:
//!
//! - Bond stretch: harmonic, E = ½·k·(r − r₀)², over every pair closer
//!   than 1.2× the sum of covalent radii. Natural length r₀ is the sum
//!   of covalent radii.
//! - Van der Waals: Lennard-Jones 12-6 in the UFF form
//!   D·[(x/r)¹² − 2·(x/r)⁶], over every pair that is not bonded.
//!
//! Force-field energies are relative to a different zero than
//! electronic-structure energies (unbound atoms at rest vs. bare
//! nuclei and electrons at infinity), so the two are comparable in
//! scale, not subtractable. The report layer deals with that.

use rustc_hash::FxHashSet;

use crate::error::{MolVqeError, Result};
use crate::molecule::Molecule;

/// Hartree to kcal/mol
pub const KCAL_PER_MOL_PER_HARTREE: f64 = 627.509;

/// Bonded when r < BOND_TOLERANCE · (r_cov_i + r_cov_j)
const BOND_TOLERANCE: f64 = 1.2;

/// Harmonic stretch force constant, kcal/mol/Å²
const STRETCH_FORCE_CONSTANT: f64 = 700.0;

// =============================================================================
// Parameters
// =============================================================================

/// Per-element force-field parameters
#[derive(Debug, Clone, Copy)]
struct FieldParams {
    /// Covalent radius, Å
    covalent_radius: f64,
    /// Lennard-Jones minimum distance x, Å
    vdw_distance: f64,
    /// Lennard-Jones well depth D, kcal/mol
    well_depth: f64,
}

const FIELD_PARAMS: &[(&str, FieldParams)] = &[
    ("H", FieldParams { covalent_radius: 0.31, vdw_distance: 2.886, well_depth: 0.044 }),
    ("C", FieldParams { covalent_radius: 0.76, vdw_distance: 3.851, well_depth: 0.105 }),
    ("N", FieldParams { covalent_radius: 0.71, vdw_distance: 3.660, well_depth: 0.069 }),
    ("O", FieldParams { covalent_radius: 0.66, vdw_distance: 3.500, well_depth: 0.060 }),
    ("F", FieldParams { covalent_radius: 0.57, vdw_distance: 3.364, well_depth: 0.050 }),
    ("S", FieldParams { covalent_radius: 1.05, vdw_distance: 4.035, well_depth: 0.274 }),
    ("Cl", FieldParams { covalent_radius: 1.02, vdw_distance: 3.947, well_depth: 0.227 }),
];

fn field_params(symbol: &str) -> Option<FieldParams> {
    FIELD_PARAMS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, p)| *p)
}

// =============================================================================
// Estimator
// =============================================================================

/// Classical single-point energy with its term breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicalEnergy {
    /// Harmonic bond-stretch contribution, kcal/mol
    pub stretch: f64,
    /// Lennard-Jones contribution over non-bonded pairs, kcal/mol
    pub van_der_waals: f64,
    /// Detected bonds
    pub bond_count: usize,
}

impl ClassicalEnergy {
    /// Total energy, kcal/mol
    pub fn total_kcal(&self) -> f64 {
        self.stretch + self.van_der_waals
    }

    /// Total energy, Hartree
    pub fn total_hartree(&self) -> f64 {
        self.total_kcal() / KCAL_PER_MOL_PER_HARTREE
    }
}

/// A source of classical single-point energies for a geometry
pub trait ClassicalEnergyEstimator {
    fn estimate(&self, molecule: &Molecule) -> Result<ClassicalEnergy>;
}

/// UFF-style two-term force field (stretch + Lennard-Jones)
#[derive(Debug, Clone, Copy, Default)]
pub struct UffEstimator;

impl UffEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Indices of pairs within bonding distance
    pub fn detect_bonds(&self, molecule: &Molecule) -> Result<Vec<(usize, usize)>> {
        let atoms = molecule.atoms();
        let mut bonds = Vec::new();
        for i in 0..atoms.len() {
            let pi = field_params(&atoms[i].symbol)
                .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[i].symbol.clone()))?;
            for j in (i + 1)..atoms.len() {
                let pj = field_params(&atoms[j].symbol)
                    .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[j].symbol.clone()))?;
                let natural = pi.covalent_radius + pj.covalent_radius;
                if molecule.distance(i, j) < BOND_TOLERANCE * natural {
                    bonds.push((i, j));
                }
            }
        }
        Ok(bonds)
    }
}

impl ClassicalEnergyEstimator for UffEstimator {
    fn estimate(&self, molecule: &Molecule) -> Result<ClassicalEnergy> {
        let atoms = molecule.atoms();
        let bonds = self.detect_bonds(molecule)?;
        let bonded: FxHashSet<(usize, usize)> = bonds.iter().copied().collect();

        let mut stretch = 0.0;
        for &(i, j) in &bonds {
            let ri = field_params(&atoms[i].symbol)
                .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[i].symbol.clone()))?;
            let rj = field_params(&atoms[j].symbol)
                .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[j].symbol.clone()))?;
            let delta = molecule.distance(i, j) - (ri.covalent_radius + rj.covalent_radius);
            stretch += 0.5 * STRETCH_FORCE_CONSTANT * delta * delta;
        }

        let mut van_der_waals = 0.0;
        for i in 0..atoms.len() {
            for j in (i + 1)..atoms.len() {
                if bonded.contains(&(i, j)) {
                    continue;
                }
                let pi = field_params(&atoms[i].symbol)
                    .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[i].symbol.clone()))?;
                let pj = field_params(&atoms[j].symbol)
                    .ok_or_else(|| MolVqeError::UnsupportedElement(atoms[j].symbol.clone()))?;
                // UFF combination rules: geometric means
                let x = (pi.vdw_distance * pj.vdw_distance).sqrt();
                let d = (pi.well_depth * pj.well_depth).sqrt();
                let ratio6 = (x / molecule.distance(i, j)).powi(6);
                van_der_waals += d * (ratio6 * ratio6 - 2.0 * ratio6);
            }
        }

        Ok(ClassicalEnergy {
            stretch,
            van_der_waals,
            bond_count: bonds.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_water_bond_detection() {
        let water = Molecule::water();
        let bonds = UffEstimator::new().detect_bonds(&water).unwrap();
        // Both O-H pairs bond, the H-H pair does not
        assert_eq!(bonds, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_water_energy_terms() {
        let energy = UffEstimator::new().estimate(&Molecule::water()).unwrap();
        assert_eq!(energy.bond_count, 2);
        // The 1-3 H...H pair sits deep on the repulsive wall
        assert!(energy.van_der_waals > 0.0);
        assert!(energy.stretch >= 0.0);
        assert!(energy.total_kcal().is_finite());
        assert_abs_diff_eq!(
            energy.total_hartree() * KCAL_PER_MOL_PER_HARTREE,
            energy.total_kcal(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_h2_at_natural_length_has_no_stretch() {
        let h2 = Molecule::new(&["H", "H"], &[[0.0; 3], [0.0, 0.0, 0.62]], 0, 1).unwrap();
        let energy = UffEstimator::new().estimate(&h2).unwrap();
        assert_eq!(energy.bond_count, 1);
        assert_abs_diff_eq!(energy.stretch, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(energy.van_der_waals, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stretch_grows_with_displacement() {
        let near = Molecule::new(&["H", "H"], &[[0.0; 3], [0.0, 0.0, 0.65]], 0, 1).unwrap();
        let far = Molecule::new(&["H", "H"], &[[0.0; 3], [0.0, 0.0, 0.72]], 0, 1).unwrap();
        let est = UffEstimator::new();
        let e_near = est.estimate(&near).unwrap().stretch;
        let e_far = est.estimate(&far).unwrap().stretch;
        assert!(e_far > e_near);
    }

    #[test]
    fn test_distant_atoms_only_interact_through_lj() {
        let pair = Molecule::new(&["H", "H"], &[[0.0; 3], [0.0, 0.0, 3.2]], 0, 1).unwrap();
        let energy = UffEstimator::new().estimate(&pair).unwrap();
        assert_eq!(energy.bond_count, 0);
        assert_eq!(energy.stretch, 0.0);
        // Just outside the LJ minimum at 2.886 Angstrom: attractive
        assert!(energy.van_der_waals < 0.0);
    }

    #[test]
    fn test_unsupported_element() {
        assert!(field_params("Fe").is_none());
        assert!(field_params("h").is_none());
        assert!(field_params("Cl").is_some());
    }
}
