//! Cross-method energy comparison
//!
//! Gathers the variational result, the exact ground state (when the
//! register is small enough to diagonalize), and the classical
//! force-field baseline into one report. The quantum and classical
//! numbers share a scale but not a zero, so the report presents them
//! side by side rather than differencing them.

use crate::forcefield::{ClassicalEnergy, KCAL_PER_MOL_PER_HARTREE};
use crate::optimizer::VqeResult;
use crate::qchem::MolecularHamiltonian;

/// VQE, exact, and classical energies for one geometry
#[derive(Debug, Clone)]
pub struct EnergyComparison {
    /// Variational energy, Hartree (frozen-core constant included)
    pub vqe_energy: f64,
    /// Exact ground-state energy of the same qubit operator, Hartree.
    /// None when the register is too large for dense diagonalization.
    pub exact_energy: Option<f64>,
    /// Force-field baseline
    pub classical: ClassicalEnergy,
    /// Updates the optimizer applied
    pub steps_taken: usize,
    /// True when the variational run was stopped early
    pub cancelled: bool,
}

impl EnergyComparison {
    /// Build the report, diagonalizing exactly when feasible
    pub fn new(
        molecular: &MolecularHamiltonian,
        vqe: &VqeResult,
        classical: ClassicalEnergy,
    ) -> Self {
        let exact_energy = molecular.hamiltonian.exact_ground_state().ok();
        Self {
            vqe_energy: vqe.final_energy,
            exact_energy,
            classical,
            steps_taken: vqe.steps_taken,
            cancelled: vqe.cancelled,
        }
    }

    /// Variational error against the exact ground state, Hartree
    pub fn vqe_error(&self) -> Option<f64> {
        self.exact_energy.map(|exact| self.vqe_energy - exact)
    }

    /// Variational energy, kcal/mol
    pub fn vqe_kcal(&self) -> f64 {
        self.vqe_energy * KCAL_PER_MOL_PER_HARTREE
    }

    pub fn print_summary(&self) {
        println!("=== Energy Comparison ===");
        println!(
            "VQE energy:        {:.8} Ha ({:.4} kcal/mol)",
            self.vqe_energy,
            self.vqe_kcal()
        );
        match self.exact_energy {
            Some(exact) => {
                println!("Exact ground state: {:.8} Ha", exact);
                if let Some(err) = self.vqe_error() {
                    println!("Variational error:  {:.2e} Ha", err);
                }
            }
            None => println!("Exact ground state: register too large to diagonalize"),
        }
        println!(
            "Classical (UFF):    {:.8} Ha ({:.4} kcal/mol, {} bonds)",
            self.classical.total_hartree(),
            self.classical.total_kcal(),
            self.classical.bond_count
        );
        println!("Optimizer steps:    {}", self.steps_taken);
        if self.cancelled {
            println!("Variational run was cancelled early");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Molecule;
    use crate::optimizer::{VqeConfig, VqeOptimizer};
    use crate::qchem::HamiltonianBuilder;
    use crate::forcefield::{ClassicalEnergyEstimator, UffEstimator};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_water_comparison_report() {
        let water = Molecule::water();
        let molecular = HamiltonianBuilder::new().build(&water).unwrap();
        let vqe = VqeOptimizer::new(VqeConfig::new().with_step_count(25))
            .run(&molecular)
            .unwrap();
        let classical = UffEstimator::new().estimate(&water).unwrap();

        let report = EnergyComparison::new(&molecular, &vqe, classical);

        // 4 qubits diagonalizes, so exact is available and bounds VQE
        let exact = report.exact_energy.unwrap();
        assert!(report.vqe_energy >= exact - 1e-9);
        assert!(report.vqe_error().unwrap() >= -1e-9);
        assert_abs_diff_eq!(
            report.vqe_kcal(),
            report.vqe_energy * KCAL_PER_MOL_PER_HARTREE,
            epsilon = 1e-9
        );
        assert!(!report.cancelled);
    }
}
