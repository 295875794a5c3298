//! Core contract between the engine and a problem domain.
//!
//! The engine never looks inside a genome. It creates, scores, selects,
//! recombines, and mutates genomes only through a [`Strategies`]
//! implementation, and compares scores only through a [`Direction`].

use crate::tracker::GenerationRecord;
use rand::RngCore;
use std::cmp::Ordering;

/// Optimization direction.
///
/// Derived once from [`EngineConfig::minimize`](crate::EngineConfig::minimize)
/// and used for ranking, the elitism cut, and best-so-far tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Higher scores are better.
    #[default]
    Maximize,
    /// Lower scores are better.
    Minimize,
}

impl Direction {
    /// Builds the direction from a `minimize` flag.
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Direction::Minimize
        } else {
            Direction::Maximize
        }
    }

    /// Best-first ordering of two scores.
    ///
    /// `Ordering::Less` means `a` ranks ahead of `b`. NaN ranks behind every
    /// other score in both directions, and two NaNs compare equal.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                Direction::Maximize => b.total_cmp(&a),
                Direction::Minimize => a.total_cmp(&b),
            },
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// The sentinel every real score improves upon.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        }
    }
}

/// The strategy set supplied by a problem domain.
///
/// Implementations decide what a genome means; the engine only drives the
/// generational loop. Every randomized hook receives the engine's RNG so that
/// a fixed seed replays the whole run.
///
/// # Contract
///
/// - [`select`](Strategies::select) returns two indices into `pool`; the same
///   index twice is allowed. `scores[i]` is the score of `pool[i]`.
/// - [`crossover`](Strategies::crossover) borrows its parents and must return
///   fresh children.
/// - [`mutate`](Strategies::mutate) takes ownership of the genome it changes,
///   so genomes still referenced elsewhere are never altered.
///
/// # Thread Safety
///
/// `Strategies` must be `Send + Sync` because the engine may evaluate a
/// population in parallel (`parallel` feature).
///
/// # Example
///
/// ```
/// use rand::{Rng, RngCore};
/// use u_evolve::{operators, SelectionError, Strategies};
///
/// struct OneMax {
///     len: usize,
/// }
///
/// impl Strategies for OneMax {
///     type Genome = Vec<bool>;
///     type Error = SelectionError;
///
///     fn create(&self, rng: &mut dyn RngCore) -> Result<Vec<bool>, Self::Error> {
///         Ok((0..self.len).map(|_| rng.random_bool(0.5)).collect())
///     }
///
///     fn fitness(&self, genome: &Vec<bool>) -> Result<f64, Self::Error> {
///         Ok(genome.iter().filter(|&&b| b).count() as f64)
///     }
///
///     fn select(
///         &self,
///         pool: &[Vec<bool>],
///         _scores: &[f64],
///         rng: &mut dyn RngCore,
///     ) -> Result<(usize, usize), Self::Error> {
///         operators::random_pair(pool.len(), rng)
///     }
///
///     fn crossover(
///         &self,
///         a: &Vec<bool>,
///         b: &Vec<bool>,
///         rng: &mut dyn RngCore,
///     ) -> Result<(Vec<bool>, Vec<bool>), Self::Error> {
///         Ok(operators::one_point_crossover(a, b, rng))
///     }
///
///     fn mutate(&self, genome: Vec<bool>, rng: &mut dyn RngCore) -> Result<Vec<bool>, Self::Error> {
///         Ok(operators::bit_flip(genome, rng))
///     }
/// }
/// ```
pub trait Strategies: Send + Sync {
    /// Candidate solution type. Cloned only for elites and best-so-far
    /// snapshots, and for parents that pass through without crossover.
    type Genome: Clone + Send + Sync;

    /// Error raised by any strategy hook.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates one new genome. Called `population_size` times at start-up.
    fn create(&self, rng: &mut dyn RngCore) -> Result<Self::Genome, Self::Error>;

    /// Scores a genome. Must be a pure function of its argument.
    ///
    /// A NaN score is accepted but ranks as the worst possible score, so it
    /// never wins elitism or becomes the best-so-far over a real score.
    fn fitness(&self, genome: &Self::Genome) -> Result<f64, Self::Error>;

    /// Picks two parents from `pool`, returned as indices into it.
    fn select(
        &self,
        pool: &[Self::Genome],
        scores: &[f64],
        rng: &mut dyn RngCore,
    ) -> Result<(usize, usize), Self::Error>;

    /// Recombines two parents into two children.
    fn crossover(
        &self,
        a: &Self::Genome,
        b: &Self::Genome,
        rng: &mut dyn RngCore,
    ) -> Result<(Self::Genome, Self::Genome), Self::Error>;

    /// Perturbs a genome.
    fn mutate(
        &self,
        genome: Self::Genome,
        rng: &mut dyn RngCore,
    ) -> Result<Self::Genome, Self::Error>;

    /// Called after each evaluated generation, including generation 0.
    ///
    /// Useful for progress reporting or external logging. The default
    /// implementation is a no-op.
    fn on_generation(&self, _record: &GenerationRecord<Self::Genome>) {}
}
