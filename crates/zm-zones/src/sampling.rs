//! Depth-biased selection from node pools.
//!
//! Pools of part-entry candidates are kept ordered by creation depth. Sampling
//! an index from a truncated exponential distribution favours nodes close to
//! the maze origin: with the default factor of 3.0 the first node is picked
//! with probability `1 - e^(-1/3)`, about 28%, and each later slot is
//! `e^(-1/3)` times as likely as the one before it.

use rand::Rng;

/// Default decay factor for entry-node selection.
pub const DEFAULT_WEIGHT_FACTOR: f64 = 3.0;

/// Map a uniform draw `u` in `[0, 1)` to an index in `0..pool_size`.
///
/// The distribution is exponential with mean `decay_factor`, truncated to the
/// pool so no draw is rejected. Returns 0 for pools of size 0 or 1.
pub fn decayed_index(pool_size: usize, decay_factor: f64, u: f64) -> usize {
    if pool_size <= 1 {
        return 0;
    }
    let mass = 1.0 - (-(pool_size as f64) / decay_factor).exp();
    let x = -decay_factor * (1.0 - u.clamp(0.0, 1.0) * mass).ln();
    (x.floor().max(0.0) as usize).min(pool_size - 1)
}

/// Probability that `decayed_index` returns `index`.
pub fn decayed_probability(index: usize, pool_size: usize, decay_factor: f64) -> f64 {
    if index >= pool_size {
        return 0.0;
    }
    if pool_size == 1 {
        return 1.0;
    }
    let mass = 1.0 - (-(pool_size as f64) / decay_factor).exp();
    let lo = (-(index as f64) / decay_factor).exp();
    let hi = (-((index + 1) as f64) / decay_factor).exp();
    (lo - hi) / mass
}

/// Draw a depth-biased index from `rng`.
pub fn sample_decayed_index<R>(rng: &mut R, pool_size: usize, decay_factor: f64) -> usize
where
    R: Rng + ?Sized,
{
    decayed_index(pool_size, decay_factor, rng.r#gen::<f64>())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn index_stays_in_pool(pool in 1_usize..500, factor in 0.1_f64..20.0, u in 0.0_f64..1.0) {
            prop_assert!(decayed_index(pool, factor, u) < pool);
        }
    }
}
