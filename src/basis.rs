//! Valence basis parameters
//!
//! Each element contributes one normalized s-type Gaussian valence
//! orbital to the electronic-structure model, parameterized by an
//! orbital exponent, a valence ionization energy, the number of
//! electrons in that orbital, and an on-site Coulomb repulsion.
//!
//! Parameter lookup is treated as an external, cacheable data source:
//! [`CachedBasis`] memoizes results per symbol so repeated Hamiltonian
//! builds in one process never re-fetch, and the cache is safe for
//! concurrent readers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use rustc_hash::FxHashMap;

// =============================================================================
// Parameters
// =============================================================================

/// Valence-orbital parameters for one element (atomic units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisParams {
    /// Gaussian orbital exponent (Bohr⁻²)
    pub exponent: f64,
    /// Valence-orbital ionization energy (Hartree, positive)
    pub ionization: f64,
    /// Electrons in the valence s orbital (1 or 2)
    pub valence_electrons: u32,
    /// On-site Coulomb repulsion (Hartree)
    pub hardness: f64,
}

/// Built-in parameter table. Exponents follow Slater-rule ζ values
/// mapped to a single best-fit Gaussian; ionization energies are
/// valence-orbital ionization energies; hardness is the Pariser-Parr
/// IP − EA estimate.
const BUILTIN_PARAMS: &[(&str, BasisParams)] = &[
    ("H", BasisParams { exponent: 0.4166, ionization: 0.500, valence_electrons: 1, hardness: 0.472 }),
    ("He", BasisParams { exponent: 0.7739, ionization: 0.904, valence_electrons: 2, hardness: 0.900 }),
    ("Li", BasisParams { exponent: 0.1110, ionization: 0.198, valence_electrons: 1, hardness: 0.175 }),
    ("Be", BasisParams { exponent: 0.2580, ionization: 0.343, valence_electrons: 2, hardness: 0.245 }),
    ("B", BasisParams { exponent: 0.4890, ionization: 0.515, valence_electrons: 2, hardness: 0.320 }),
    ("C", BasisParams { exponent: 0.7156, ionization: 0.713, valence_electrons: 2, hardness: 0.408 }),
    ("N", BasisParams { exponent: 1.0300, ionization: 0.941, valence_electrons: 2, hardness: 0.441 }),
    ("O", BasisParams { exponent: 1.4020, ionization: 1.187, valence_electrons: 2, hardness: 0.478 }),
    ("F", BasisParams { exponent: 1.8310, ionization: 1.477, valence_electrons: 2, hardness: 0.525 }),
    ("Ne", BasisParams { exponent: 2.3180, ionization: 1.780, valence_electrons: 2, hardness: 0.600 }),
    ("Na", BasisParams { exponent: 0.1890, ionization: 0.189, valence_electrons: 1, hardness: 0.169 }),
    ("Mg", BasisParams { exponent: 0.2530, ionization: 0.281, valence_electrons: 2, hardness: 0.220 }),
    ("P", BasisParams { exponent: 0.7000, ionization: 0.684, valence_electrons: 2, hardness: 0.360 }),
    ("S", BasisParams { exponent: 0.8000, ionization: 0.735, valence_electrons: 2, hardness: 0.380 }),
    ("Cl", BasisParams { exponent: 0.9500, ionization: 0.930, valence_electrons: 2, hardness: 0.430 }),
];

// =============================================================================
// Provider
// =============================================================================

/// Source of per-element basis parameters
pub trait BasisProvider: Sync {
    /// Look up the valence parameters for an element symbol.
    /// Returns `None` when no data is available for that element.
    fn lookup(&self, symbol: &str) -> Option<BasisParams>;
}

/// The built-in parameter table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBasis;

impl BasisProvider for BuiltinBasis {
    fn lookup(&self, symbol: &str) -> Option<BasisParams> {
        BUILTIN_PARAMS
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, p)| *p)
    }
}

// =============================================================================
// Memoizing Cache
// =============================================================================

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasisCacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizing wrapper around a [`BasisProvider`].
///
/// Negative results are cached too, so an unsupported element is
/// fetched from the underlying source at most once per process.
#[derive(Debug)]
pub struct CachedBasis<P: BasisProvider> {
    inner: P,
    cache: RwLock<FxHashMap<String, Option<BasisParams>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: BasisProvider> CachedBasis<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Hit/miss counts since construction
    pub fn stats(&self) -> BasisCacheStats {
        BasisCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for CachedBasis<BuiltinBasis> {
    fn default() -> Self {
        Self::new(BuiltinBasis)
    }
}

impl<P: BasisProvider> BasisProvider for CachedBasis<P> {
    fn lookup(&self, symbol: &str) -> Option<BasisParams> {
        {
            let cache = self.cache.read().expect("basis cache lock poisoned");
            if let Some(cached) = cache.get(symbol) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return *cached;
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let fetched = self.inner.lookup(symbol);
        let mut cache = self.cache.write().expect("basis cache lock poisoned");
        cache.insert(symbol.to_string(), fetched);
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let basis = BuiltinBasis;
        let h = basis.lookup("H").unwrap();
        assert_eq!(h.valence_electrons, 1);
        assert!(h.ionization > 0.0);

        let o = basis.lookup("O").unwrap();
        assert_eq!(o.valence_electrons, 2);
        assert!(o.exponent > h.exponent);

        assert!(basis.lookup("Uuo").is_none());
    }

    #[test]
    fn test_cache_memoizes() {
        let cached = CachedBasis::new(BuiltinBasis);
        assert_eq!(cached.stats(), BasisCacheStats { hits: 0, misses: 0 });

        let first = cached.lookup("O");
        let second = cached.lookup("O");
        assert_eq!(first, second);

        let stats = cached.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_cache_memoizes_negative_results() {
        let cached = CachedBasis::new(BuiltinBasis);
        assert!(cached.lookup("Xq").is_none());
        assert!(cached.lookup("Xq").is_none());

        let stats = cached.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_cache_shared_across_threads() {
        use std::sync::Arc;

        let cached = Arc::new(CachedBasis::new(BuiltinBasis));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&cached);
                std::thread::spawn(move || c.lookup("C").unwrap())
            })
            .collect();
        for handle in handles {
            let params = handle.join().unwrap();
            assert_eq!(params.valence_electrons, 2);
        }
    }
}
