//! Generational loop execution.
//!
//! [`EvolutionEngine`] drives the whole process:
//! initialization → evaluation → ranking → elitism → selection →
//! crossover → mutation → evaluation → repeat.

use crate::config::EngineConfig;
use crate::error::{ConfigError, EvolutionError, SelectionError};
use crate::population::Population;
use crate::tracker::FitnessTracker;
use crate::types::{Direction, Strategies};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

type Genome<S> = <S as Strategies>::Genome;
type RunError<S> = EvolutionError<<S as Strategies>::Error>;

/// Evolutionary search engine.
///
/// Holds the strategy set, the validated configuration, one RNG, and the
/// state of the current run: population, scores, and best-so-far tracker.
///
/// # Usage
///
/// ```ignore
/// let config = EngineConfig::default().with_seed(42);
/// let mut engine = EvolutionEngine::new(MyStrategies::new(), config)?;
/// let (best, score) = engine.run(50, true)?;
/// ```
///
/// Runs can also be driven one generation at a time with
/// [`initialize`](Self::initialize), [`start_from`](Self::start_from) and
/// [`step_generation`](Self::step_generation); stopping between steps is the
/// only form of cancellation.
pub struct EvolutionEngine<S: Strategies, R = StdRng> {
    strategies: S,
    config: EngineConfig,
    direction: Direction,
    rng: R,
    population: Population<S::Genome>,
    scores: Vec<f64>,
    tracker: FitnessTracker<S::Genome>,
}

impl<S: Strategies> EvolutionEngine<S, StdRng> {
    /// Builds an engine seeded from [`EngineConfig::seed`].
    ///
    /// A missing seed draws a random one.
    pub fn new(strategies: S, config: EngineConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_rng(strategies, config, StdRng::seed_from_u64(seed))
    }
}

impl<S: Strategies, R: RngCore> EvolutionEngine<S, R> {
    /// Builds an engine around an explicit RNG.
    ///
    /// [`EngineConfig::seed`] is ignored; the given RNG is the only entropy
    /// source for the run.
    pub fn with_rng(strategies: S, config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "engine configured: population={}, elitism={}, explorative={}, crossover={}, mutation={}, minimize={}",
            config.population_size,
            config.elitism_count,
            config.explorative_elitism,
            config.crossover_rate,
            config.mutation_rate,
            config.minimize,
        );
        let direction = config.direction();
        Ok(Self {
            strategies,
            config,
            direction,
            rng,
            population: Population::default(),
            scores: Vec::new(),
            tracker: FitnessTracker::new(direction),
        })
    }

    /// Runs a full optimization of `generations` generations.
    ///
    /// Creates and evaluates generation 0, then steps `generations` times.
    /// Returns the best genome of the whole run with its score. `verbose`
    /// only controls the per-generation `info` log lines.
    ///
    /// Any strategy failure aborts the run and is returned unchanged as
    /// [`EvolutionError::Strategy`].
    pub fn run(
        &mut self,
        generations: usize,
        verbose: bool,
    ) -> Result<(Genome<S>, f64), RunError<S>> {
        let population = self.initialize()?;
        self.start_from(population)?;
        if verbose {
            log::info!(
                "Generation 0: best fitness = {}",
                self.tracker.global_best_score()
            );
        }

        for _ in 0..generations {
            self.step_generation()?;
            if verbose {
                log::info!(
                    "Generation {}: best current fitness = {}",
                    self.tracker.generation(),
                    self.tracker.current_best_score()
                );
            }
        }

        let score = self.tracker.global_best_score();
        let best = self
            .tracker
            .global_best()
            .cloned()
            .ok_or(ConfigError::EmptyPopulation)?;
        if verbose {
            log::info!("Optimization finished: best global fitness = {score}");
        }
        Ok((best, score))
    }

    /// Creates a fresh population with `population_size` calls to
    /// [`Strategies::create`].
    ///
    /// Does not touch the engine's current state.
    pub fn initialize(&mut self) -> Result<Population<Genome<S>>, RunError<S>> {
        (0..self.config.population_size)
            .map(|_| {
                self.strategies
                    .create(&mut self.rng)
                    .map_err(EvolutionError::Strategy)
            })
            .collect()
    }

    /// Scores every genome, preserving index order.
    ///
    /// With the `parallel` feature and [`EngineConfig::parallel`] set, the
    /// fitness calls run on the rayon pool; the first failure aborts the
    /// whole evaluation.
    pub fn evaluate(&self, population: &[Genome<S>]) -> Result<Vec<f64>, RunError<S>> {
        evaluate_population(&self.strategies, population, self.config.parallel)
            .map_err(EvolutionError::Strategy)
    }

    /// Makes `population` generation 0 of a new run.
    ///
    /// Evaluates it, resets the tracker, and records it. Useful for
    /// starting from known solutions instead of [`initialize`](Self::initialize).
    /// The population must hold exactly `population_size` genomes.
    pub fn start_from(&mut self, population: Population<Genome<S>>) -> Result<(), RunError<S>> {
        if population.len() != self.config.population_size {
            let err = ConfigError::PopulationSizeMismatch {
                expected: self.config.population_size,
                actual: population.len(),
            };
            return Err(err.into());
        }
        let scores = self.evaluate(population.as_slice())?;
        self.population = population;
        self.scores = scores;
        self.tracker = FitnessTracker::new(self.direction);
        self.record();
        Ok(())
    }

    /// Advances the current run by one generation.
    ///
    /// Breeds the next population from the current one, evaluates it, and
    /// records it. Starts a new run first if none is in progress. On error
    /// the generation being built is dropped and the engine holds no current
    /// population until the next run starts.
    pub fn step_generation(&mut self) -> Result<(), RunError<S>> {
        if self.population.is_empty() {
            let population = self.initialize()?;
            self.start_from(population)?;
        }

        let population = std::mem::take(&mut self.population);
        let scores = std::mem::take(&mut self.scores);

        let next = self.breed(population, scores)?;
        let next_scores = self.evaluate(next.as_slice())?;

        self.population = next;
        self.scores = next_scores;
        self.record();
        Ok(())
    }

    /// Builds the next population from a scored one.
    ///
    /// 1. Ranks genomes best-first with a stable sort, so ties keep their
    ///    original order.
    /// 2. Clones the top `elitism_count` genomes into the new population.
    /// 3. Breeds the remaining slots from the selection pool: the whole
    ///    ranked population, or only the non-elites with explorative elitism.
    ///
    /// `scores[i]` must be the score of `population[i]`, and both must hold
    /// exactly `population_size` entries. The result is not evaluated.
    pub fn breed(
        &mut self,
        population: Population<Genome<S>>,
        scores: Vec<f64>,
    ) -> Result<Population<Genome<S>>, RunError<S>> {
        let size = self.config.population_size;
        for actual in [population.len(), scores.len()] {
            if actual != size {
                let err = ConfigError::PopulationSizeMismatch {
                    expected: size,
                    actual,
                };
                return Err(err.into());
            }
        }
        let direction = self.direction;

        let mut ranked: Vec<(Genome<S>, f64)> = population.into_iter().zip(scores).collect();
        ranked.sort_by(|a, b| direction.compare(a.1, b.1));
        let (ranked, ranked_scores): (Vec<Genome<S>>, Vec<f64>) = ranked.into_iter().unzip();

        let elite_count = self.config.elitism_count.min(ranked.len());
        let mut next: Vec<Genome<S>> = Vec::with_capacity(size);
        next.extend(ranked[..elite_count].iter().cloned());

        let needed = self.config.offspring_count();
        if needed > 0 {
            let start = if self.config.explorative_elitism {
                elite_count
            } else {
                0
            };
            let pool = &ranked[start..];
            if pool.len() < 2 {
                return Err(ConfigError::SelectionPoolTooSmall {
                    pool_size: pool.len(),
                }
                .into());
            }
            log::trace!("breeding {needed} offspring from a pool of {}", pool.len());
            let offspring = self.breed_offspring(pool, &ranked_scores[start..], needed)?;
            next.extend(offspring);
        }

        next.truncate(size);
        Ok(Population::new(next))
    }

    /// Produces exactly `needed` children.
    ///
    /// Children always come in pairs; when a single slot remains, the
    /// second child of the last pair is discarded.
    fn breed_offspring(
        &mut self,
        pool: &[Genome<S>],
        pool_scores: &[f64],
        needed: usize,
    ) -> Result<Vec<Genome<S>>, RunError<S>> {
        let mut children = Vec::with_capacity(needed);

        while children.len() < needed {
            let (i, j) = self
                .strategies
                .select(pool, pool_scores, &mut self.rng)
                .map_err(EvolutionError::Strategy)?;
            let parent_a = parent_at(pool, i)?;
            let parent_b = parent_at(pool, j)?;

            let (mut child_a, mut child_b) =
                if self.rng.random_range(0.0..1.0) < self.config.crossover_rate {
                    self.strategies
                        .crossover(parent_a, parent_b, &mut self.rng)
                        .map_err(EvolutionError::Strategy)?
                } else {
                    (parent_a.clone(), parent_b.clone())
                };

            if self.rng.random_range(0.0..1.0) < self.config.mutation_rate {
                child_a = self
                    .strategies
                    .mutate(child_a, &mut self.rng)
                    .map_err(EvolutionError::Strategy)?;
            }
            if self.rng.random_range(0.0..1.0) < self.config.mutation_rate {
                child_b = self
                    .strategies
                    .mutate(child_b, &mut self.rng)
                    .map_err(EvolutionError::Strategy)?;
            }

            children.push(child_a);
            if children.len() < needed {
                children.push(child_b);
            }
        }

        Ok(children)
    }

    fn record(&mut self) {
        self.tracker.record(self.population.as_slice(), &self.scores);
        if let Some(record) = self.tracker.snapshot() {
            self.strategies.on_generation(&record);
        }
    }

    /// Current population.
    pub fn population(&self) -> &Population<Genome<S>> {
        &self.population
    }

    /// Scores of the current population, index-aligned with it.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Index of the current generation.
    pub fn generation(&self) -> usize {
        self.tracker.generation()
    }

    /// Best-so-far bookkeeping for the current run.
    pub fn tracker(&self) -> &FitnessTracker<Genome<S>> {
        &self.tracker
    }

    /// Best genome of the current run and its score.
    pub fn best(&self) -> Option<(&Genome<S>, f64)> {
        self.tracker
            .global_best()
            .map(|g| (g, self.tracker.global_best_score()))
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The optimization direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The strategy set.
    pub fn strategies(&self) -> &S {
        &self.strategies
    }
}

fn parent_at<G>(pool: &[G], index: usize) -> Result<&G, SelectionError> {
    pool.get(index).ok_or(SelectionError::IndexOutOfPool {
        index,
        len: pool.len(),
    })
}

/// Evaluate all genomes in order.
fn evaluate_population<S: Strategies>(
    strategies: &S,
    population: &[S::Genome],
    parallel: bool,
) -> Result<Vec<f64>, S::Error> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return population
            .par_iter()
            .map(|genome| strategies.fitness(genome))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population
        .iter()
        .map(|genome| strategies.fitness(genome))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators;
    use crate::tracker::GenerationRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ---- Integer genomes with scripted selection ----

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("unlucky genome {0}")]
    struct Unlucky(i64);

    /// `fitness(x) = x`, except 13 which fails. Crossover tags children with
    /// +100 / +200; mutation flips the lowest bit.
    struct Scripted {
        pick: (usize, usize),
        select_calls: AtomicUsize,
        crossover_calls: AtomicUsize,
        pools: Mutex<Vec<(Vec<i64>, Vec<f64>)>>,
    }

    impl Scripted {
        fn picking(a: usize, b: usize) -> Self {
            Self {
                pick: (a, b),
                select_calls: AtomicUsize::new(0),
                crossover_calls: AtomicUsize::new(0),
                pools: Mutex::new(Vec::new()),
            }
        }
    }

    impl Strategies for Scripted {
        type Genome = i64;
        type Error = Unlucky;

        fn create(&self, rng: &mut dyn RngCore) -> Result<i64, Unlucky> {
            Ok(rng.random_range(0..10))
        }

        fn fitness(&self, genome: &i64) -> Result<f64, Unlucky> {
            if *genome == 13 {
                Err(Unlucky(13))
            } else {
                Ok(*genome as f64)
            }
        }

        fn select(
            &self,
            pool: &[i64],
            scores: &[f64],
            _rng: &mut dyn RngCore,
        ) -> Result<(usize, usize), Unlucky> {
            self.select_calls.fetch_add(1, Ordering::Relaxed);
            self.pools
                .lock()
                .unwrap()
                .push((pool.to_vec(), scores.to_vec()));
            Ok(self.pick)
        }

        fn crossover(
            &self,
            a: &i64,
            b: &i64,
            _rng: &mut dyn RngCore,
        ) -> Result<(i64, i64), Unlucky> {
            self.crossover_calls.fetch_add(1, Ordering::Relaxed);
            Ok((a + 100, b + 200))
        }

        fn mutate(&self, genome: i64, _rng: &mut dyn RngCore) -> Result<i64, Unlucky> {
            Ok(genome ^ 1)
        }
    }

    fn config(size: usize, elites: usize) -> EngineConfig {
        EngineConfig::default()
            .with_population_size(size)
            .with_elitism_count(elites)
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_seed(42)
    }

    fn engine(
        strategies: Scripted,
        config: EngineConfig,
        start: Vec<i64>,
    ) -> EvolutionEngine<Scripted> {
        let mut engine = EvolutionEngine::new(strategies, config).unwrap();
        engine.start_from(Population::new(start)).unwrap();
        engine
    }

    #[test]
    fn test_pass_through_scenario() {
        // Ranked pool is [5, 3, 2, 1]; selecting (0, 0) always picks 5.
        let mut engine = engine(Scripted::picking(0, 0), config(4, 1), vec![1, 5, 3, 2]);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.tracker().global_best_score(), 5.0);

        engine.step_generation().unwrap();

        assert_eq!(engine.population().as_slice(), &[5, 5, 5, 5]);
        assert_eq!(engine.scores(), &[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(engine.tracker().global_best_score(), 5.0);
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.strategies().crossover_calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_odd_remainder_discards_second_child() {
        let config = config(4, 1).with_crossover_rate(1.0);
        let mut engine = engine(Scripted::picking(1, 2), config, vec![1, 5, 3, 2]);
        engine.step_generation().unwrap();

        // Ranked [5, 3, 2, 1]; parents are 3 and 2 every time.
        // 3 offspring: pair 1 -> (103, 202), pair 2 -> (103, <dropped>)
        assert_eq!(engine.population().as_slice(), &[5, 103, 202, 103]);
        assert_eq!(engine.strategies().select_calls.load(Ordering::Relaxed), 2);
        assert_eq!(engine.strategies().crossover_calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_even_remainder_uses_full_pairs() {
        let config = config(5, 1).with_crossover_rate(1.0);
        let mut engine = engine(Scripted::picking(0, 1), config, vec![1, 5, 3, 2, 4]);
        engine.step_generation().unwrap();

        // Ranked [5, 4, 3, 2, 1]; 4 offspring from 2 full pairs.
        assert_eq!(engine.population().as_slice(), &[5, 105, 204, 105, 204]);
        assert_eq!(engine.strategies().select_calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_elites_lead_next_generation_minimize() {
        let config = config(6, 3).with_minimize(true);
        let mut engine = engine(Scripted::picking(5, 5), config, vec![7, 2, 9, 2, 4, 1]);
        engine.step_generation().unwrap();

        // Ascending: [1, 2, 2, 4, 7, 9]; elites are the first three.
        assert_eq!(&engine.population().as_slice()[..3], &[1, 2, 2]);
        // Offspring are clones of pool[5] == 9.
        assert_eq!(&engine.population().as_slice()[3..], &[9, 9, 9]);
        assert_eq!(engine.tracker().global_best_score(), 1.0);
        assert_eq!(engine.tracker().current_best_score(), 1.0);
    }

    #[test]
    fn test_stable_ranking_on_ties() {
        #[derive(Clone, Debug, PartialEq)]
        struct Tagged(&'static str, i64);

        struct ByValue;

        impl Strategies for ByValue {
            type Genome = Tagged;
            type Error = Unlucky;

            fn create(&self, _rng: &mut dyn RngCore) -> Result<Tagged, Unlucky> {
                Ok(Tagged("new", 0))
            }
            fn fitness(&self, g: &Tagged) -> Result<f64, Unlucky> {
                Ok(g.1 as f64)
            }
            fn select(
                &self,
                _pool: &[Tagged],
                _scores: &[f64],
                _rng: &mut dyn RngCore,
            ) -> Result<(usize, usize), Unlucky> {
                Ok((0, 1))
            }
            fn crossover(
                &self,
                a: &Tagged,
                b: &Tagged,
                _rng: &mut dyn RngCore,
            ) -> Result<(Tagged, Tagged), Unlucky> {
                Ok((a.clone(), b.clone()))
            }
            fn mutate(&self, g: Tagged, _rng: &mut dyn RngCore) -> Result<Tagged, Unlucky> {
                Ok(g)
            }
        }

        let config = config(4, 2);
        let mut engine = EvolutionEngine::new(ByValue, config).unwrap();
        engine
            .start_from(Population::new(vec![
                Tagged("a", 1),
                Tagged("b", 3),
                Tagged("c", 3),
                Tagged("d", 3),
            ]))
            .unwrap();
        assert_eq!(engine.tracker().global_best(), Some(&Tagged("b", 3)));

        engine.step_generation().unwrap();
        assert_eq!(
            &engine.population().as_slice()[..2],
            &[Tagged("b", 3), Tagged("c", 3)]
        );
        // Tie with the stored best does not replace it.
        assert_eq!(engine.tracker().global_best(), Some(&Tagged("b", 3)));
    }

    #[test]
    fn test_explorative_pool_excludes_elites() {
        let config = config(5, 2).with_explorative_elitism(true);
        let mut engine = engine(Scripted::picking(0, 1), config, vec![4, 8, 1, 6, 3]);
        engine.step_generation().unwrap();

        let pools = engine.strategies().pools.lock().unwrap();
        let (pool, scores) = &pools[0];
        assert_eq!(pool, &vec![4, 3, 1]);
        assert_eq!(scores, &vec![4.0, 3.0, 1.0]);
        drop(pools);

        assert_eq!(engine.population().as_slice(), &[8, 6, 4, 3, 4]);
    }

    #[test]
    fn test_exploitative_pool_is_full_ranking() {
        let mut engine = engine(Scripted::picking(0, 1), config(5, 2), vec![4, 8, 1, 6, 3]);
        engine.step_generation().unwrap();

        let pools = engine.strategies().pools.lock().unwrap();
        assert_eq!(pools[0].0, vec![8, 6, 4, 3, 1]);
        assert_eq!(pools[0].1, vec![8.0, 6.0, 4.0, 3.0, 1.0]);
    }

    #[test]
    fn test_mutation_always_applies() {
        let config = config(4, 0).with_mutation_rate(1.0);
        let mut engine = engine(Scripted::picking(0, 0), config, vec![4, 4, 4, 4]);
        engine.step_generation().unwrap();
        assert_eq!(engine.population().as_slice(), &[5, 5, 5, 5]);

        engine.step_generation().unwrap();
        assert_eq!(engine.population().as_slice(), &[4, 4, 4, 4]);
        // Best of the run is still the earlier 5.
        assert_eq!(engine.tracker().global_best_score(), 5.0);
        assert_eq!(engine.tracker().current_best_score(), 4.0);
    }

    #[test]
    fn test_elites_are_independent_copies() {
        let config = config(3, 1).with_mutation_rate(1.0);
        let mut engine = engine(Scripted::picking(0, 0), config, vec![8, 2, 6]);
        engine.step_generation().unwrap();
        // Elite 8 is untouched; both offspring are mutated clones of it.
        assert_eq!(engine.population().as_slice(), &[8, 9, 9]);
    }

    #[test]
    fn test_selection_out_of_pool() {
        let mut engine = engine(Scripted::picking(0, 9), config(4, 1), vec![1, 2, 3, 4]);
        let err = engine.step_generation().unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Selection(SelectionError::IndexOutOfPool { index: 9, len: 4 })
        ));
        assert!(engine.population().is_empty());
    }

    #[test]
    fn test_strategy_error_aborts_run() {
        // The elite 12 is cloned and mutated into 13, whose fitness fails.
        let config = config(4, 1).with_mutation_rate(1.0);
        let mut engine = engine(Scripted::picking(0, 0), config, vec![12, 1, 2, 3]);
        let err = engine.step_generation().unwrap_err();

        assert_eq!(err.strategy(), Some(&Unlucky(13)));
        assert!(engine.population().is_empty());
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.tracker().global_best_score(), 12.0);
    }

    #[test]
    fn test_strategy_error_in_initial_evaluation() {
        let mut engine = EvolutionEngine::new(Scripted::picking(0, 0), config(4, 0)).unwrap();
        let err = engine
            .start_from(Population::new(vec![1, 13, 2, 3]))
            .unwrap_err();
        assert_eq!(err.strategy(), Some(&Unlucky(13)));
    }

    #[test]
    fn test_start_from_rejects_wrong_size() {
        let mut engine = EvolutionEngine::new(Scripted::picking(0, 1), config(4, 1)).unwrap();
        let err = engine.start_from(Population::new(vec![1, 2])).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Config(ConfigError::PopulationSizeMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_breed_rejects_mismatched_lengths() {
        let mut engine = EvolutionEngine::new(Scripted::picking(0, 1), config(5, 3)).unwrap();

        let err = engine
            .breed(Population::new(vec![1, 2]), vec![1.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Config(ConfigError::PopulationSizeMismatch {
                expected: 5,
                actual: 2
            })
        ));

        // Short scores must not silently drop genomes.
        let err = engine
            .breed(Population::new(vec![1, 2, 3, 4, 5]), vec![1.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Config(ConfigError::PopulationSizeMismatch {
                expected: 5,
                actual: 2
            })
        ));

        let next = engine
            .breed(
                Population::new(vec![1, 2, 3, 4, 5]),
                vec![1.0, 2.0, 3.0, 4.0, 5.0],
            )
            .unwrap();
        assert_eq!(next.len(), 5);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = config(3, 2).with_explorative_elitism(true);
        let err = EvolutionEngine::new(Scripted::picking(0, 1), config).err();
        assert_eq!(err, Some(ConfigError::SelectionPoolTooSmall { pool_size: 1 }));
    }

    #[test]
    fn test_all_elite_generation_needs_no_selection() {
        let mut engine = engine(Scripted::picking(0, 1), config(3, 3), vec![3, 1, 2]);
        engine.step_generation().unwrap();
        assert_eq!(engine.population().as_slice(), &[3, 2, 1]);
        assert_eq!(engine.strategies().select_calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_step_without_start_initializes() {
        let mut engine = EvolutionEngine::new(Scripted::picking(0, 1), config(6, 1)).unwrap();
        engine.step_generation().unwrap();
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.population().len(), 6);
        assert_eq!(engine.tracker().history().len(), 2);
    }

    // ---- OneMax: maximize the number of true bits ----

    #[derive(Debug, thiserror::Error)]
    #[error("never fails")]
    struct NeverFails;

    struct OneMax {
        len: usize,
        tournament: Option<usize>,
        records: Mutex<Vec<GenerationRecord<Vec<bool>>>>,
    }

    impl OneMax {
        fn new(len: usize, tournament: Option<usize>) -> Self {
            Self {
                len,
                tournament,
                records: Mutex::new(Vec::new()),
            }
        }
    }

    impl Strategies for OneMax {
        type Genome = Vec<bool>;
        type Error = NeverFails;

        fn create(&self, rng: &mut dyn RngCore) -> Result<Vec<bool>, NeverFails> {
            Ok((0..self.len).map(|_| rng.random_bool(0.5)).collect())
        }

        fn fitness(&self, genome: &Vec<bool>) -> Result<f64, NeverFails> {
            Ok(genome.iter().filter(|&&b| b).count() as f64)
        }

        fn select(
            &self,
            pool: &[Vec<bool>],
            scores: &[f64],
            rng: &mut dyn RngCore,
        ) -> Result<(usize, usize), NeverFails> {
            let picked = match self.tournament {
                Some(k) => operators::tournament_pair(scores, k, Direction::Maximize, rng),
                None => operators::random_pair(pool.len(), rng),
            };
            Ok(picked.unwrap_or((0, 0)))
        }

        fn crossover(
            &self,
            a: &Vec<bool>,
            b: &Vec<bool>,
            rng: &mut dyn RngCore,
        ) -> Result<(Vec<bool>, Vec<bool>), NeverFails> {
            Ok(operators::one_point_crossover(a, b, rng))
        }

        fn mutate(&self, genome: Vec<bool>, rng: &mut dyn RngCore) -> Result<Vec<bool>, NeverFails> {
            Ok(operators::bit_flip(genome, rng))
        }

        fn on_generation(&self, record: &GenerationRecord<Vec<bool>>) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn onemax_config() -> EngineConfig {
        EngineConfig::default()
            .with_population_size(50)
            .with_elitism_count(2)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.2)
            .with_seed(42)
    }

    #[test]
    fn test_onemax_convergence() {
        let mut engine = EvolutionEngine::new(OneMax::new(20, Some(3)), onemax_config()).unwrap();
        let (best, score) = engine.run(100, false).unwrap();

        assert_eq!(best.iter().filter(|&&b| b).count() as f64, score);
        assert!(
            score >= 16.0,
            "expected fitness >= 16 for 20-bit OneMax, got {score}"
        );
    }

    #[test]
    fn test_global_best_is_monotone() {
        let mut engine = EvolutionEngine::new(OneMax::new(30, None), onemax_config()).unwrap();
        engine.run(40, false).unwrap();

        let history = engine.tracker().history();
        assert_eq!(history.len(), 41);
        for window in history.windows(2) {
            assert!(
                window[1] >= window[0],
                "global best should never decrease: {} < {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let mut engine = EvolutionEngine::new(OneMax::new(10, None), onemax_config()).unwrap();
        engine.run(5, false).unwrap();

        let records = engine.strategies().records.lock().unwrap();
        let generations: Vec<usize> = records.iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
        for record in records.iter() {
            assert!(record.global_best_score >= record.current_best_score);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut first = EvolutionEngine::new(OneMax::new(24, Some(2)), onemax_config()).unwrap();
        let mut second = EvolutionEngine::new(OneMax::new(24, Some(2)), onemax_config()).unwrap();

        let a = first.run(20, true).unwrap();
        let b = second.run(20, false).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.population(), second.population());
        assert_eq!(first.tracker().history(), second.tracker().history());
    }

    #[test]
    fn test_pass_through_offspring_come_from_parents() {
        let config = onemax_config().with_crossover_rate(0.0).with_mutation_rate(0.0);
        let mut engine = EvolutionEngine::new(OneMax::new(16, None), config).unwrap();
        let initial = engine.initialize().unwrap();
        engine.start_from(initial).unwrap();

        for _ in 0..10 {
            let previous = engine.population().clone();
            engine.step_generation().unwrap();
            for genome in engine.population() {
                assert!(previous.iter().any(|p| p == genome));
            }
        }
    }

    #[test]
    fn test_run_restarts_state() {
        let mut engine = EvolutionEngine::new(OneMax::new(12, None), onemax_config()).unwrap();
        engine.run(8, false).unwrap();
        assert_eq!(engine.generation(), 8);
        engine.run(3, false).unwrap();
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.tracker().history().len(), 4);
    }

    #[test]
    fn test_injected_rng() {
        let rng = StdRng::seed_from_u64(5);
        let config = onemax_config();
        let mut engine = EvolutionEngine::with_rng(OneMax::new(8, None), config.clone(), rng).unwrap();
        let injected = engine.run(5, false).unwrap();

        let mut seeded = EvolutionEngine::new(OneMax::new(8, None), config.with_seed(5)).unwrap();
        assert_eq!(injected, seeded.run(5, false).unwrap());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_evaluation_keeps_order() {
        let config = config(64, 1).with_parallel(true);
        let engine = EvolutionEngine::new(Scripted::picking(0, 1), config).unwrap();
        // 13 is the unlucky genome; swap it out for the happy path.
        let genomes: Vec<i64> = (0..64).map(|x| if x == 13 { 64 } else { x }).collect();
        let scores = engine.evaluate(&genomes).unwrap();
        let expected: Vec<f64> = genomes.iter().map(|&x| x as f64).collect();
        assert_eq!(scores, expected);

        let failing: Vec<i64> = (0..64).map(|x| if x == 40 { 13 } else { x }).collect();
        let err = engine.evaluate(&failing).unwrap_err();
        assert_eq!(err.strategy(), Some(&Unlucky(13)));
    }

    // ---- Properties ----

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn population_size_is_invariant(
                size in 2usize..30,
                elite_frac in 0.0f64..1.0,
                explorative in any::<bool>(),
                crossover in 0.0f64..=1.0,
                mutation in 0.0f64..=1.0,
                minimize in any::<bool>(),
                seed in any::<u64>(),
            ) {
                let mut elites = (size as f64 * elite_frac) as usize;
                if explorative {
                    elites = elites.min(size - 2);
                }
                let config = EngineConfig::default()
                    .with_population_size(size)
                    .with_elitism_count(elites)
                    .with_explorative_elitism(explorative)
                    .with_crossover_rate(crossover)
                    .with_mutation_rate(mutation)
                    .with_minimize(minimize)
                    .with_seed(seed);
                let mut engine = EvolutionEngine::new(OneMax::new(9, None), config).unwrap();
                engine.run(0, false).unwrap();

                let direction = engine.direction();
                let mut last = engine.tracker().global_best_score();
                for _ in 0..8 {
                    engine.step_generation().unwrap();
                    prop_assert_eq!(engine.population().len(), size);
                    prop_assert_eq!(engine.scores().len(), size);
                    let now = engine.tracker().global_best_score();
                    prop_assert!(!direction.is_better(last, now));
                    last = now;
                }
            }
        }
    }
}
