//! Uniform sampling without replacement

use rand::Rng;

/// Pick `min(k, items.len())` distinct elements uniformly at random
///
/// Partial Fisher-Yates shuffle over a copy of `items`.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
    let mut pool = items.to_vec();
    let count = k.min(pool.len());
    for i in 0..count {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
