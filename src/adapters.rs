//! Closure-based strategy sets.
//!
//! [`FnStrategies`] bundles five plain closures into a
//! [`Strategies`] implementation, so a single hook can be swapped out
//! without writing a new type.

use crate::types::Strategies;
use rand::RngCore;
use std::fmt;
use std::marker::PhantomData;

/// A [`Strategies`] implementation assembled from closures.
///
/// # Examples
///
/// ```
/// use rand::{Rng, RngCore};
/// use u_evolve::{operators, EngineConfig, EvolutionEngine, FnStrategies, SelectionError};
///
/// let strategies = FnStrategies::new(
///     |rng: &mut dyn RngCore| Ok::<_, SelectionError>(rng.random_range(0..100i64)),
///     |g: &i64| Ok(*g as f64),
///     |pool: &[i64], _scores: &[f64], rng: &mut dyn RngCore| operators::random_pair(pool.len(), rng),
///     |a: &i64, b: &i64, _rng: &mut dyn RngCore| Ok((*a.max(b), *a.min(b))),
///     |g: i64, rng: &mut dyn RngCore| Ok(g + rng.random_range(-3i64..=3)),
/// );
///
/// let config = EngineConfig::default().with_population_size(20).with_seed(1);
/// let mut engine = EvolutionEngine::new(strategies, config).unwrap();
/// let (best, score) = engine.run(10, false).unwrap();
/// assert_eq!(best as f64, score);
/// ```
pub struct FnStrategies<G, E, C, F, S, X, M> {
    create: C,
    fitness: F,
    select: S,
    crossover: X,
    mutate: M,
    _marker: PhantomData<fn() -> (G, E)>,
}

impl<G, E, C, F, S, X, M> FnStrategies<G, E, C, F, S, X, M>
where
    C: Fn(&mut dyn RngCore) -> Result<G, E>,
    F: Fn(&G) -> Result<f64, E>,
    S: Fn(&[G], &[f64], &mut dyn RngCore) -> Result<(usize, usize), E>,
    X: Fn(&G, &G, &mut dyn RngCore) -> Result<(G, G), E>,
    M: Fn(G, &mut dyn RngCore) -> Result<G, E>,
{
    /// Bundles the five strategy closures.
    pub fn new(create: C, fitness: F, select: S, crossover: X, mutate: M) -> Self {
        Self {
            create,
            fitness,
            select,
            crossover,
            mutate,
            _marker: PhantomData,
        }
    }

    /// Replaces the selection closure.
    pub fn with_select<S2>(self, select: S2) -> FnStrategies<G, E, C, F, S2, X, M>
    where
        S2: Fn(&[G], &[f64], &mut dyn RngCore) -> Result<(usize, usize), E>,
    {
        FnStrategies {
            create: self.create,
            fitness: self.fitness,
            select,
            crossover: self.crossover,
            mutate: self.mutate,
            _marker: PhantomData,
        }
    }

    /// Replaces the crossover closure.
    pub fn with_crossover<X2>(self, crossover: X2) -> FnStrategies<G, E, C, F, S, X2, M>
    where
        X2: Fn(&G, &G, &mut dyn RngCore) -> Result<(G, G), E>,
    {
        FnStrategies {
            create: self.create,
            fitness: self.fitness,
            select: self.select,
            crossover,
            mutate: self.mutate,
            _marker: PhantomData,
        }
    }

    /// Replaces the mutation closure.
    pub fn with_mutate<M2>(self, mutate: M2) -> FnStrategies<G, E, C, F, S, X, M2>
    where
        M2: Fn(G, &mut dyn RngCore) -> Result<G, E>,
    {
        FnStrategies {
            create: self.create,
            fitness: self.fitness,
            select: self.select,
            crossover: self.crossover,
            mutate,
            _marker: PhantomData,
        }
    }
}

impl<G, E, C, F, S, X, M> fmt::Debug for FnStrategies<G, E, C, F, S, X, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategies").finish_non_exhaustive()
    }
}

impl<G, E, C, F, S, X, M> Strategies for FnStrategies<G, E, C, F, S, X, M>
where
    G: Clone + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
    C: Fn(&mut dyn RngCore) -> Result<G, E> + Send + Sync,
    F: Fn(&G) -> Result<f64, E> + Send + Sync,
    S: Fn(&[G], &[f64], &mut dyn RngCore) -> Result<(usize, usize), E> + Send + Sync,
    X: Fn(&G, &G, &mut dyn RngCore) -> Result<(G, G), E> + Send + Sync,
    M: Fn(G, &mut dyn RngCore) -> Result<G, E> + Send + Sync,
{
    type Genome = G;
    type Error = E;

    fn create(&self, rng: &mut dyn RngCore) -> Result<G, E> {
        (self.create)(rng)
    }

    fn fitness(&self, genome: &G) -> Result<f64, E> {
        (self.fitness)(genome)
    }

    fn select(
        &self,
        pool: &[G],
        scores: &[f64],
        rng: &mut dyn RngCore,
    ) -> Result<(usize, usize), E> {
        (self.select)(pool, scores, rng)
    }

    fn crossover(&self, a: &G, b: &G, rng: &mut dyn RngCore) -> Result<(G, G), E> {
        (self.crossover)(a, b, rng)
    }

    fn mutate(&self, genome: G, rng: &mut dyn RngCore) -> Result<G, E> {
        (self.mutate)(genome, rng)
    }
}
