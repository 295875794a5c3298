//! Ready-made strategy building blocks.
//!
//! Small, domain-agnostic operators that a [`Strategies`](crate::Strategies)
//! implementation can delegate to. All of them draw from the RNG handed in
//! by the engine.
//!
//! # Selection
//!
//! - [`random_pair`]: two distinct pool members, uniformly at random
//! - [`tournament_pair`]: two independent k-way tournaments
//!
//! # Crossover
//!
//! - [`one_point_crossover`]: swap tails after a random cut point
//!
//! # Mutation
//!
//! - [`bit_flip`]: flip one random position of a bit string

use crate::error::SelectionError;
use crate::types::Direction;
use rand::{Rng, RngCore};

/// Draws two distinct indices from a pool of `len` genomes.
pub fn random_pair(len: usize, rng: &mut dyn RngCore) -> Result<(usize, usize), SelectionError> {
    if len < 2 {
        return Err(SelectionError::PoolTooSmall { len });
    }
    let first = rng.random_range(0..len);
    // Draw from the remaining len - 1 slots and skip over `first`.
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    Ok((first, second))
}

/// Runs two tournaments of size `k` over `scores`.
///
/// Each tournament samples `k` indices with replacement and keeps the best
/// one under `direction`. `k = 0` is treated as 1 (uniform pick).
pub fn tournament_pair(
    scores: &[f64],
    k: usize,
    direction: Direction,
    rng: &mut dyn RngCore,
) -> Result<(usize, usize), SelectionError> {
    let len = scores.len();
    if len < 2 {
        return Err(SelectionError::PoolTooSmall { len });
    }
    let first = tournament(scores, k, direction, rng);
    let second = tournament(scores, k, direction, rng);
    Ok((first, second))
}

fn tournament(scores: &[f64], k: usize, direction: Direction, rng: &mut dyn RngCore) -> usize {
    let n = scores.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if direction.is_better(scores[idx], scores[best]) {
            best = idx;
        }
    }
    best
}

/// Single-point crossover on equal-length sequences.
///
/// Picks a cut point in `1..len` and swaps the tails:
/// `child1 = a[..p] + b[p..]`, `child2 = b[..p] + a[p..]`.
/// Parents shorter than 2 elements (or of unequal length) come back as
/// clones, since there is no interior cut point to use.
pub fn one_point_crossover<T: Clone>(
    a: &[T],
    b: &[T],
    rng: &mut dyn RngCore,
) -> (Vec<T>, Vec<T>) {
    let n = a.len();
    if n < 2 || n != b.len() {
        return (a.to_vec(), b.to_vec());
    }
    let point = rng.random_range(1..n);

    let mut child1 = Vec::with_capacity(n);
    child1.extend_from_slice(&a[..point]);
    child1.extend_from_slice(&b[point..]);

    let mut child2 = Vec::with_capacity(n);
    child2.extend_from_slice(&b[..point]);
    child2.extend_from_slice(&a[point..]);

    (child1, child2)
}

/// Flips one uniformly chosen bit. Empty genomes are returned unchanged.
pub fn bit_flip(mut genome: Vec<bool>, rng: &mut dyn RngCore) -> Vec<bool> {
    if !genome.is_empty() {
        let idx = rng.random_range(0..genome.len());
        genome[idx] = !genome[idx];
    }
    genome
}
