//! Seeded random number construction and sampling helpers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a seeded random number generator.
///
/// The same seed always produces the same stream, which is what makes a
/// solver run reproducible: a solver seeded identically, with operators and
/// parameters registered in the same order, follows the same trajectory.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Selects `n` distinct indices into `elements`, uniformly at random.
///
/// If `n` is zero the result is empty; if `n` is greater than or equal to
/// the number of elements, every index `0..elements.len()` is returned in
/// order.
pub fn random_element_indices<T, R: Rng + ?Sized>(
    rng: &mut R,
    elements: &[T],
    n: usize,
) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    if n >= elements.len() {
        return (0..elements.len()).collect();
    }
    rand::seq::index::sample(rng, elements.len(), n).into_vec()
}
