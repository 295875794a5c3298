//! Engine configuration.
//!
//! [`EngineConfig`] holds every parameter that controls the generational
//! loop. It is validated once, when the engine is built.

use crate::error::ConfigError;
use crate::types::Direction;

/// Configuration for the evolution engine.
///
/// # Defaults
///
/// ```
/// use u_evolve::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.elitism_count, 1);
/// assert!(!config.minimize);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_population_size(50)
///     .with_elitism_count(2)
///     .with_explorative_elitism(true)
///     .with_mutation_rate(0.05)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of genomes in every generation.
    pub population_size: usize,

    /// Probability of recombining a selected pair (0.0–1.0).
    ///
    /// When crossover is skipped, both parents pass through as clones.
    pub crossover_rate: f64,

    /// Probability of mutating each child, drawn independently (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of best genomes copied unchanged into the next generation.
    pub elitism_count: usize,

    /// Excludes the elites from the pool used to breed offspring.
    ///
    /// `false` exploits the elites as parents as well; `true` favours
    /// exploration of the rest of the population.
    pub explorative_elitism: bool,

    /// Treats lower scores as better when `true`.
    pub minimize: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to evaluate fitness in parallel.
    ///
    /// Only takes effect with the `parallel` feature enabled.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elitism_count: 1,
            explorative_elitism: false,
            minimize: false,
            seed: None,
            parallel: false,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of elites.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Enables or disables explorative elitism.
    pub fn with_explorative_elitism(mut self, explorative: bool) -> Self {
        self.explorative_elitism = explorative;
        self
    }

    /// Sets the optimization direction.
    pub fn with_minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The comparison direction derived from [`minimize`](Self::minimize).
    pub fn direction(&self) -> Direction {
        Direction::from_minimize(self.minimize)
    }

    /// Number of children bred each generation.
    pub fn offspring_count(&self) -> usize {
        self.population_size.saturating_sub(self.elitism_count)
    }

    /// Size of the pool handed to `select`.
    pub fn selection_pool_size(&self) -> usize {
        if self.explorative_elitism {
            self.offspring_count()
        } else {
            self.population_size
        }
    }

    /// Validates the configuration.
    ///
    /// The selection pool is only checked when at least one offspring has
    /// to be bred; a generation made entirely of elites never selects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        if self.elitism_count > self.population_size {
            return Err(ConfigError::ElitismExceedsPopulation {
                elitism_count: self.elitism_count,
                population_size: self.population_size,
            });
        }
        let pool_size = self.selection_pool_size();
        if self.offspring_count() > 0 && pool_size < 2 {
            return Err(ConfigError::SelectionPoolTooSmall { pool_size });
        }
        Ok(())
    }
}
