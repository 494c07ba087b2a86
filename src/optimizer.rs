//! Gradient-descent VQE driver
//!
//! # Theory
//!
//! The energy E(θ) = ⟨ψ(θ)|H|ψ(θ)⟩ is minimized by plain gradient
//! descent. Each partial derivative is evaluated exactly with the
//! parameter-shift rule:
//!
//!   ∂E/∂θ_k = (E(θ + π/2·e_k) − E(θ − π/2·e_k)) / 2
//!
//! which holds for circuits built from Pauli rotations. No finite
//! differencing, no step-size tuning per parameter.
//!
//! The run is fully deterministic for a fixed seed: initial parameters
//! come from a seeded generator, and the gradient evaluations (serial
//! or parallel) are collected in positional order before any update.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::ansatz::{Ansatz, AnsatzForm};
use crate::circuit::CircuitSimulator;
use crate::error::{MolVqeError, Result};
use crate::hamiltonian::QubitHamiltonian;
use crate::qchem::MolecularHamiltonian;

// =============================================================================
// Cancellation
// =============================================================================

/// Shared flag for stopping a run between optimization steps.
///
/// Cancellation is cooperative: the step in flight finishes, the
/// partial result comes back with `cancelled = true`. It is never an
/// error.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// VQE run configuration with builder-style setters
#[derive(Debug, Clone)]
pub struct VqeConfig {
    /// Circuit template and depth
    pub ansatz: Ansatz,
    /// Number of gradient-descent updates
    pub step_count: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// Seed for the initial parameter draw
    pub seed: u64,
    /// Evaluate the parameter-shift pairs on a thread pool
    pub parallel_gradient: bool,
    /// Optional cooperative stop flag
    pub cancel: Option<CancelToken>,
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            ansatz: Ansatz::new(AnsatzForm::RotationChain, 1),
            step_count: 100,
            learning_rate: 0.4,
            seed: 42,
            parallel_gradient: false,
            cancel: None,
        }
    }
}

impl VqeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ansatz(mut self, form: AnsatzForm, layer_count: usize) -> Self {
        self.ansatz = Ansatz::new(form, layer_count);
        self
    }

    pub fn with_step_count(mut self, step_count: usize) -> Self {
        self.step_count = step_count;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel_gradient(mut self, parallel: bool) -> Self {
        self.parallel_gradient = parallel;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

// =============================================================================
// Result
// =============================================================================

/// Outcome of a VQE run
#[derive(Debug, Clone)]
pub struct VqeResult {
    /// Final parameter vector
    pub parameters: Vec<f64>,
    /// Energy at the final parameters (Hartree)
    pub final_energy: f64,
    /// (step, energy) pairs; entry k is the energy after k updates,
    /// so entry 0 is the initial energy
    pub trajectory: Vec<(usize, f64)>,
    /// Updates actually applied (equals the configured step count
    /// unless the run was cancelled)
    pub steps_taken: usize,
    /// True if a cancel token stopped the run early
    pub cancelled: bool,
}

impl VqeResult {
    /// Energy before the first update
    pub fn initial_energy(&self) -> f64 {
        self.trajectory[0].1
    }

    /// Total energy lowering achieved by the optimization
    pub fn energy_improvement(&self) -> f64 {
        self.initial_energy() - self.final_energy
    }

    pub fn print_summary(&self) {
        println!("=== VQE Optimization Summary ===");
        println!("Steps taken:      {}", self.steps_taken);
        println!("Initial energy:   {:.8} Ha", self.initial_energy());
        println!("Final energy:     {:.8} Ha", self.final_energy);
        println!("Improvement:      {:.8} Ha", self.energy_improvement());
        if self.cancelled {
            println!("Run cancelled before completion");
        }
    }
}

// =============================================================================
// Optimizer
// =============================================================================

/// Gradient-descent VQE optimizer
#[derive(Debug, Clone)]
pub struct VqeOptimizer {
    config: VqeConfig,
}

impl VqeOptimizer {
    pub fn new(config: VqeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VqeConfig {
        &self.config
    }

    /// Run on a molecular Hamiltonian, taking the Hartree-Fock
    /// reference occupation from its active electron count.
    pub fn run(&self, molecular: &MolecularHamiltonian) -> Result<VqeResult> {
        self.run_on(
            &molecular.hamiltonian,
            molecular.active_electrons,
            None,
        )
    }

    /// Run on a bare qubit Hamiltonian.
    ///
    /// `occupied` qubits start in |1>; `initial` overrides the seeded
    /// random parameter draw when given.
    pub fn run_on(
        &self,
        hamiltonian: &QubitHamiltonian,
        occupied: usize,
        initial: Option<&[f64]>,
    ) -> Result<VqeResult> {
        let qubit_count = hamiltonian.qubit_count();
        let expected = self.config.ansatz.parameter_count(qubit_count);

        let mut params = match initial {
            Some(given) => {
                if given.len() != expected {
                    return Err(MolVqeError::ParameterShape {
                        got: given.len(),
                        expected,
                    });
                }
                given.to_vec()
            }
            None => {
                let mut rng = StdRng::seed_from_u64(self.config.seed);
                (0..expected).map(|_| rng.gen_range(0.0..TAU)).collect()
            }
        };

        let simulator = CircuitSimulator::with_occupation(occupied);
        let evaluate = |p: &[f64]| -> Result<f64> {
            let ops = self.config.ansatz.build_ops(p, qubit_count)?;
            simulator.expectation(&ops, hamiltonian)
        };

        let mut energy = evaluate(&params)?;
        if !energy.is_finite() {
            return Err(MolVqeError::OptimizationDiverged { step: 0 });
        }
        let mut trajectory = Vec::with_capacity(self.config.step_count + 1);
        trajectory.push((0, energy));

        let mut steps_taken = 0;
        let mut cancelled = false;

        for step in 1..=self.config.step_count {
            if let Some(token) = &self.config.cancel {
                if token.is_cancelled() {
                    cancelled = true;
                    break;
                }
            }

            let gradient = self.gradient(&params, &evaluate)?;
            for (p, g) in params.iter_mut().zip(&gradient) {
                *p -= self.config.learning_rate * g;
            }

            energy = evaluate(&params)?;
            if !energy.is_finite() {
                return Err(MolVqeError::OptimizationDiverged { step });
            }
            trajectory.push((step, energy));
            steps_taken = step;
        }

        Ok(VqeResult {
            parameters: params,
            final_energy: energy,
            trajectory,
            steps_taken,
            cancelled,
        })
    }

    /// Full gradient via the parameter-shift rule.
    ///
    /// Each component needs two expectation evaluations; the pairs are
    /// independent, so the parallel path fans them out over rayon and
    /// collects in index order.
    fn gradient<F>(&self, params: &[f64], evaluate: &F) -> Result<Vec<f64>>
    where
        F: Fn(&[f64]) -> Result<f64> + Sync,
    {
        let shift_pair = |k: usize| -> Result<f64> {
            let mut shifted = params.to_vec();
            shifted[k] = params[k] + FRAC_PI_2;
            let plus = evaluate(&shifted)?;
            shifted[k] = params[k] - FRAC_PI_2;
            let minus = evaluate(&shifted)?;
            Ok((plus - minus) / 2.0)
        };

        if self.config.parallel_gradient {
            (0..params.len()).into_par_iter().map(shift_pair).collect()
        } else {
            (0..params.len()).map(shift_pair).collect()
        }
    }
}
