//! Molecular Hamiltonian construction
//!
//! Maps (atomic symbols, 3D coordinates, charge, multiplicity) to a
//! qubit-space Hamiltonian through a fixed, deterministic pipeline:
//!
//! 1. One s-type Gaussian valence orbital per atom (parameters from the
//!    basis provider, memoized per symbol).
//! 2. Extended-Hückel one-electron matrix over those orbitals,
//!    symmetrically orthogonalized and diagonalized for molecular
//!    orbitals and energies.
//! 3. A frontier active space (HOMO/LUMO pair where both exist), with
//!    Pariser-Parr style two-electron integrals transformed into it.
//! 4. Second quantization over the active spin orbitals and a
//!    Jordan-Wigner transform to Pauli strings.
//!
//! The qubit count is twice the number of active spatial orbitals, so
//! it depends only on (symbols, charge, multiplicity), never on the
//! geometry numerics. Spin orbitals interleave: spatial orbital p maps
//! to qubits 2p (up) and 2p+1 (down), which puts the Hartree-Fock
//! occupation on the lowest-index qubits.

use nalgebra::DMatrix;
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::basis::{BasisParams, BasisProvider, BuiltinBasis, CachedBasis};
use crate::error::{MolVqeError, Result};
use crate::hamiltonian::QubitHamiltonian;
use crate::molecule::{Molecule, ANGSTROM_TO_BOHR};
use crate::pauli::{Pauli, PauliTerm, PhasedTerm};

// =============================================================================
// Constants
// =============================================================================

/// Wolfsberg-Helmholz proportionality constant for off-diagonal
/// one-electron elements
pub const HUCKEL_K: f64 = 1.75;

/// Jordan-Wigner coefficients below this magnitude are discarded
const TERM_CUTOFF: f64 = 1e-10;

/// Residual imaginary parts above this indicate a broken transform
const IMAG_TOLERANCE: f64 = 1e-9;

/// Overlap eigenvalues below this mean (near-)linearly dependent orbitals
const OVERLAP_EPSILON: f64 = 1e-8;

// =============================================================================
// Result Type
// =============================================================================

/// A molecular Hamiltonian in qubit form, with the bookkeeping the VQE
/// layer needs.
#[derive(Debug, Clone)]
pub struct MolecularHamiltonian {
    /// Qubit-space operator
    pub hamiltonian: QubitHamiltonian,
    /// Electrons in the active space (sets the Hartree-Fock reference
    /// occupation)
    pub active_electrons: usize,
    /// Molecular-orbital energies of the full valence space, ascending
    /// (Hartree)
    pub orbital_energies: Vec<f64>,
    /// Constant energy folded into the identity term: core-charge
    /// nuclear repulsion plus doubly occupied non-active orbitals
    pub frozen_energy: f64,
}

impl MolecularHamiltonian {
    /// Register size required by the Hamiltonian
    pub fn qubit_count(&self) -> usize {
        self.hamiltonian.qubit_count()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds qubit Hamiltonians from molecular geometry.
///
/// Holds the (cached) basis-parameter source; everything else is pure
/// computation per call.
#[derive(Debug)]
pub struct HamiltonianBuilder<P: BasisProvider = CachedBasis<BuiltinBasis>> {
    basis: P,
}

impl Default for HamiltonianBuilder<CachedBasis<BuiltinBasis>> {
    fn default() -> Self {
        Self::new()
    }
}

impl HamiltonianBuilder<CachedBasis<BuiltinBasis>> {
    /// Builder over the built-in basis table, memoized per symbol
    pub fn new() -> Self {
        Self {
            basis: CachedBasis::default(),
        }
    }
}

impl<P: BasisProvider> HamiltonianBuilder<P> {
    /// Builder over a custom basis source
    pub fn with_basis(basis: P) -> Self {
        Self { basis }
    }

    /// Access the underlying basis source (e.g. for cache statistics)
    pub fn basis(&self) -> &P {
        &self.basis
    }

    /// Map a validated molecule to its qubit Hamiltonian
    pub fn build(&self, molecule: &Molecule) -> Result<MolecularHamiltonian> {
        let params = self.atom_params(molecule)?;
        let n_orb = params.len();

        // Valence electrons in the model; the molecule's net charge is
        // assumed to be drawn from (or added to) the valence shell.
        let raw_valence: i64 = params.iter().map(|p| p.valence_electrons as i64).sum();
        let n_valence = raw_valence - molecule.charge() as i64;
        if n_valence < 0 || n_valence > 2 * n_orb as i64 {
            return Err(MolVqeError::InvalidMolecule(format!(
                "charge {} leaves {} valence electrons for {} valence orbitals",
                molecule.charge(),
                n_valence,
                n_orb
            )));
        }
        let n_valence = n_valence as usize;

        let (orbital_energies, coeffs) = self.molecular_orbitals(molecule, &params)?;

        // Frontier active space: HOMO and LUMO where both exist,
        // otherwise the single frontier orbital.
        let n_occ = n_valence.div_ceil(2);
        let lo = n_occ.saturating_sub(1).min(n_orb - 1);
        let hi = n_occ.min(n_orb - 1);
        let active: Vec<usize> = (lo..=hi).collect();
        let n_active = active.len();
        let active_electrons = n_valence - 2 * lo;

        let frozen_energy = self.core_nuclear_repulsion(molecule, &params)
            + 2.0 * orbital_energies[..lo].iter().sum::<f64>();

        // One-electron integrals are diagonal in the MO basis.
        let h_one: Vec<f64> = active.iter().map(|&p| orbital_energies[p]).collect();

        // Two-electron integrals (pq|rs) over active MOs, zero
        // differential overlap over Lowdin-orthogonalized atomic sites.
        let gamma = self.site_repulsion(molecule, &params);
        let h_two = mo_two_electron(&coeffs, &gamma, &active);

        let hamiltonian = jordan_wigner(n_active, &h_one, &h_two, frozen_energy)?;

        Ok(MolecularHamiltonian {
            hamiltonian,
            active_electrons,
            orbital_energies,
            frozen_energy,
        })
    }

    fn atom_params(&self, molecule: &Molecule) -> Result<Vec<BasisParams>> {
        molecule
            .atoms()
            .iter()
            .map(|atom| {
                self.basis
                    .lookup(&atom.symbol)
                    .ok_or_else(|| MolVqeError::UnsupportedElement(atom.symbol.clone()))
            })
            .collect()
    }

    /// Solve the extended-Hückel eigenproblem in the symmetrically
    /// orthogonalized basis. Returns (energies ascending, coefficient
    /// matrix with MO columns over Lowdin atomic orbitals).
    fn molecular_orbitals(
        &self,
        molecule: &Molecule,
        params: &[BasisParams],
    ) -> Result<(Vec<f64>, DMatrix<f64>)> {
        let n = params.len();

        let mut overlap = DMatrix::<f64>::identity(n, n);
        let mut h = DMatrix::<f64>::zeros(n, n);
        for i in 0..n {
            h[(i, i)] = -params[i].ionization;
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let r = molecule.distance(i, j) * ANGSTROM_TO_BOHR;
                let s = gaussian_overlap(params[i].exponent, params[j].exponent, r);
                overlap[(i, j)] = s;
                overlap[(j, i)] = s;
                let hij = 0.5 * HUCKEL_K * s * (h[(i, i)] + h[(j, j)]);
                h[(i, j)] = hij;
                h[(j, i)] = hij;
            }
        }

        // S^{-1/2} via the overlap eigendecomposition
        let s_eigen = overlap.symmetric_eigen();
        if s_eigen.eigenvalues.iter().any(|&v| v < OVERLAP_EPSILON) {
            return Err(MolVqeError::Geometry(
                "valence orbitals are (near-)linearly dependent".to_string(),
            ));
        }
        let mut s_inv_sqrt = DMatrix::<f64>::zeros(n, n);
        for k in 0..n {
            let scale = 1.0 / s_eigen.eigenvalues[k].sqrt();
            let col = s_eigen.eigenvectors.column(k);
            for i in 0..n {
                for j in 0..n {
                    s_inv_sqrt[(i, j)] += scale * col[i] * col[j];
                }
            }
        }

        let h_orth = &s_inv_sqrt * h * &s_inv_sqrt;
        let eigen = h_orth.symmetric_eigen();

        // nalgebra does not order the spectrum; sort ascending.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let energies: Vec<f64> = order.iter().map(|&k| eigen.eigenvalues[k]).collect();
        let mut coeffs = DMatrix::<f64>::zeros(n, n);
        for (new_col, &k) in order.iter().enumerate() {
            coeffs.set_column(new_col, &eigen.eigenvectors.column(k));
        }
        Ok((energies, coeffs))
    }

    /// Mataga-Nishimoto site-pair repulsion matrix (Hartree)
    fn site_repulsion(&self, molecule: &Molecule, params: &[BasisParams]) -> DMatrix<f64> {
        let n = params.len();
        let mut gamma = DMatrix::<f64>::zeros(n, n);
        for a in 0..n {
            gamma[(a, a)] = params[a].hardness;
            for b in (a + 1)..n {
                let r = molecule.distance(a, b) * ANGSTROM_TO_BOHR;
                let g = 1.0 / (r + 2.0 / (params[a].hardness + params[b].hardness));
                gamma[(a, b)] = g;
                gamma[(b, a)] = g;
            }
        }
        gamma
    }

    /// Repulsion between the screened valence cores (charge = number of
    /// valence electrons the neutral atom contributes)
    fn core_nuclear_repulsion(&self, molecule: &Molecule, params: &[BasisParams]) -> f64 {
        let n = params.len();
        let mut energy = 0.0;
        for a in 0..n {
            for b in (a + 1)..n {
                let r = molecule.distance(a, b) * ANGSTROM_TO_BOHR;
                energy += params[a].valence_electrons as f64 * params[b].valence_electrons as f64
                    / r;
            }
        }
        energy
    }
}

// =============================================================================
// Integrals
// =============================================================================

/// Overlap of two normalized s-type Gaussians separated by `r` Bohr
fn gaussian_overlap(a: f64, b: f64, r: f64) -> f64 {
    let p = a + b;
    (2.0 * (a * b).sqrt() / p).powf(1.5) * (-a * b / p * r * r).exp()
}

/// Transform site repulsions to active-MO two-electron integrals
/// (pq|rs), chemists' notation, under zero differential overlap
fn mo_two_electron(coeffs: &DMatrix<f64>, gamma: &DMatrix<f64>, active: &[usize]) -> Vec<f64> {
    let n_sites = gamma.nrows();
    let n_act = active.len();
    let mut integrals = vec![0.0; n_act * n_act * n_act * n_act];
    for (p, &mp) in active.iter().enumerate() {
        for (q, &mq) in active.iter().enumerate() {
            for (r, &mr) in active.iter().enumerate() {
                for (s, &ms) in active.iter().enumerate() {
                    let mut value = 0.0;
                    for site_a in 0..n_sites {
                        let da = coeffs[(site_a, mp)] * coeffs[(site_a, mq)];
                        if da == 0.0 {
                            continue;
                        }
                        for site_b in 0..n_sites {
                            let db = coeffs[(site_b, mr)] * coeffs[(site_b, ms)];
                            value += da * gamma[(site_a, site_b)] * db;
                        }
                    }
                    integrals[((p * n_act + q) * n_act + r) * n_act + s] = value;
                }
            }
        }
    }
    integrals
}

// =============================================================================
// Jordan-Wigner Transform
// =============================================================================

/// Ladder operator a†_p (dagger) or a_p as a two-term Pauli sum:
/// (X_p ∓ iY_p)/2 with a Z chain on every lower-index qubit.
fn ladder(p: usize, dagger: bool, n_qubits: usize) -> [PhasedTerm; 2] {
    let mut x_part = PhasedTerm::identity(n_qubits, Complex64::new(0.5, 0.0));
    let y_sign = if dagger { -0.5 } else { 0.5 };
    let mut y_part = PhasedTerm::identity(n_qubits, Complex64::new(0.0, y_sign));
    for q in 0..p {
        x_part.ops[q] = Pauli::Z;
        y_part.ops[q] = Pauli::Z;
    }
    x_part.ops[p] = Pauli::X;
    y_part.ops[p] = Pauli::Y;
    [x_part, y_part]
}

/// Multiply out a product of ladder operators into Pauli terms
fn ladder_product(factors: &[(usize, bool)], n_qubits: usize) -> Vec<PhasedTerm> {
    let mut expansion = vec![PhasedTerm::identity(n_qubits, Complex64::new(1.0, 0.0))];
    for &(p, dagger) in factors {
        let ops = ladder(p, dagger, n_qubits);
        let mut next = Vec::with_capacity(expansion.len() * 2);
        for term in &expansion {
            for factor in &ops {
                next.push(term.mul(factor));
            }
        }
        expansion = next;
    }
    expansion
}

/// Assemble the second-quantized active-space Hamiltonian and map it to
/// Pauli strings.
///
/// `h_one[p]` are the (diagonal) one-electron MO integrals, `h_two` the
/// (pq|rs) chemists'-notation array from [`mo_two_electron`], and
/// `offset` the constant energy folded into the identity.
fn jordan_wigner(
    n_active: usize,
    h_one: &[f64],
    h_two: &[f64],
    offset: f64,
) -> Result<QubitHamiltonian> {
    let n_qubits = 2 * n_active;
    let mut accum: FxHashMap<Vec<Pauli>, Complex64> = FxHashMap::default();

    let mut add_terms = |terms: Vec<PhasedTerm>, weight: f64| {
        for term in terms {
            let entry = accum
                .entry(term.ops)
                .or_insert_with(|| Complex64::new(0.0, 0.0));
            *entry += term.coeff * weight;
        }
    };

    add_terms(
        vec![PhasedTerm::identity(n_qubits, Complex64::new(1.0, 0.0))],
        offset,
    );

    // Spatial orbital p, spin s -> qubit 2p + s
    let so = |p: usize, spin: usize| 2 * p + spin;

    // One-electron part: sum_{p,sigma} h_pp a†_{p sigma} a_{p sigma}
    for (p, &h) in h_one.iter().enumerate() {
        if h == 0.0 {
            continue;
        }
        for spin in 0..2 {
            let q = so(p, spin);
            add_terms(ladder_product(&[(q, true), (q, false)], n_qubits), h);
        }
    }

    // Two-electron part:
    // 1/2 sum_{pqrs,sigma tau} (pq|rs) a†_{p sigma} a†_{r tau} a_{s tau} a_{q sigma}
    let idx = |p: usize, q: usize, r: usize, s: usize| {
        ((p * n_active + q) * n_active + r) * n_active + s
    };
    for p in 0..n_active {
        for q in 0..n_active {
            for r in 0..n_active {
                for s in 0..n_active {
                    let g = h_two[idx(p, q, r, s)];
                    if g.abs() < TERM_CUTOFF {
                        continue;
                    }
                    for sigma in 0..2 {
                        for tau in 0..2 {
                            let ops = [
                                (so(p, sigma), true),
                                (so(r, tau), true),
                                (so(s, tau), false),
                                (so(q, sigma), false),
                            ];
                            add_terms(ladder_product(&ops, n_qubits), 0.5 * g);
                        }
                    }
                }
            }
        }
    }

    // The operator is Hermitian by construction; any imaginary residue
    // beyond tolerance means the transform itself is broken.
    let mut terms = Vec::with_capacity(accum.len());
    for (ops, coeff) in accum {
        if coeff.im.abs() > IMAG_TOLERANCE {
            return Err(MolVqeError::NonHermitian(coeff.im));
        }
        if coeff.re.abs() > TERM_CUTOFF {
            terms.push(PauliTerm::new(coeff.re, ops));
        }
    }
    terms.sort_by(|a, b| a.ops.cmp(&b.ops));

    QubitHamiltonian::new(n_qubits, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::BasisProvider;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gaussian_overlap_limits() {
        assert_abs_diff_eq!(gaussian_overlap(0.5, 0.5, 0.0), 1.0, epsilon = 1e-12);
        assert!(gaussian_overlap(0.5, 0.5, 20.0) < 1e-8);
        // Symmetric in the exponents
        assert_abs_diff_eq!(
            gaussian_overlap(0.3, 1.1, 1.7),
            gaussian_overlap(1.1, 0.3, 1.7),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_h2_qubit_count() {
        let built = HamiltonianBuilder::new().build(&Molecule::h2()).unwrap();
        assert_eq!(built.qubit_count(), 4);
        assert_eq!(built.active_electrons, 2);
        assert_eq!(built.orbital_energies.len(), 2);
        // Bonding orbital below antibonding
        assert!(built.orbital_energies[0] < built.orbital_energies[1]);
    }

    #[test]
    fn test_water_qubit_count() {
        let built = HamiltonianBuilder::new().build(&Molecule::water()).unwrap();
        // Two frontier spatial orbitals -> 4 spin orbitals
        assert_eq!(built.qubit_count(), 4);
        assert_eq!(built.active_electrons, 2);
        assert_eq!(built.orbital_energies.len(), 3);
    }

    #[test]
    fn test_single_atom_active_space() {
        let h = Molecule::new(&["H"], &[[0.0, 0.0, 0.0]], 0, 2).unwrap();
        let built = HamiltonianBuilder::new().build(&h).unwrap();
        assert_eq!(built.qubit_count(), 2);
        assert_eq!(built.active_electrons, 1);
    }

    #[test]
    fn test_coefficients_finite() {
        let built = HamiltonianBuilder::new().build(&Molecule::water()).unwrap();
        assert!(built.hamiltonian.num_terms() > 1);
        for term in built.hamiltonian.terms() {
            assert!(term.coefficient.is_finite());
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = HamiltonianBuilder::new();
        let first = builder.build(&Molecule::water()).unwrap();
        let second = builder.build(&Molecule::water()).unwrap();
        assert_eq!(first.qubit_count(), second.qubit_count());
        assert_eq!(first.hamiltonian, second.hamiltonian);
    }

    #[test]
    fn test_basis_cache_reused_across_builds() {
        let builder = HamiltonianBuilder::new();
        builder.build(&Molecule::water()).unwrap();
        let misses_after_first = builder.basis().stats().misses;
        builder.build(&Molecule::water()).unwrap();
        // No new fetches on the second build
        assert_eq!(builder.basis().stats().misses, misses_after_first);
    }

    #[test]
    fn test_unsupported_element() {
        // Mg is in the element table; fake a provider without it
        struct NoMg;
        impl BasisProvider for NoMg {
            fn lookup(&self, symbol: &str) -> Option<crate::basis::BasisParams> {
                if symbol == "Mg" {
                    None
                } else {
                    crate::basis::BuiltinBasis.lookup(symbol)
                }
            }
        }
        let mg = Molecule::new(&["Mg"], &[[0.0, 0.0, 0.0]], 0, 1).unwrap();
        let result = HamiltonianBuilder::with_basis(NoMg).build(&mg);
        assert!(matches!(result, Err(MolVqeError::UnsupportedElement(_))));
    }

    #[test]
    fn test_number_operator_expansion() {
        // a†_0 a_0 = (I - Z_0) / 2
        let terms = ladder_product(&[(0, true), (0, false)], 2);
        let mut accum: FxHashMap<Vec<Pauli>, Complex64> = FxHashMap::default();
        for t in terms {
            *accum.entry(t.ops).or_insert(Complex64::new(0.0, 0.0)) += t.coeff;
        }
        let identity = vec![Pauli::I, Pauli::I];
        let z0 = vec![Pauli::Z, Pauli::I];
        assert_abs_diff_eq!(accum[&identity].re, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(accum[&z0].re, -0.5, epsilon = 1e-15);
        for (_, c) in accum {
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_double_creation_vanishes() {
        // a†_1 a†_1 = 0; the Pauli expansion must cancel exactly
        let terms = ladder_product(&[(1, true), (1, true)], 2);
        let mut accum: FxHashMap<Vec<Pauli>, Complex64> = FxHashMap::default();
        for t in terms {
            *accum.entry(t.ops).or_insert(Complex64::new(0.0, 0.0)) += t.coeff;
        }
        for (_, c) in accum {
            assert_abs_diff_eq!(c.norm(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_h2_ground_state_below_identity_offset() {
        let built = HamiltonianBuilder::new().build(&Molecule::h2()).unwrap();
        let exact = built.hamiltonian.exact_ground_state().unwrap();
        assert!(exact.is_finite());
        // Ground state sits below the bare constant offset
        assert!(exact < built.hamiltonian.constant_term());
    }
}
