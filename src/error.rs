//! Error taxonomy for the evolution engine.
//!
//! Every failure is terminal: configuration problems are caught before the
//! first generation, and strategy failures abort the run as they occur.

/// Invalid [`EngineConfig`](crate::EngineConfig) parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("{name} must lie in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("elitism_count ({elitism_count}) exceeds population_size ({population_size})")]
    ElitismExceedsPopulation {
        elitism_count: usize,
        population_size: usize,
    },

    #[error("expected a population of {expected} genomes, got {actual}")]
    PopulationSizeMismatch { expected: usize, actual: usize },

    #[error("selection pool holds {pool_size} genome(s); at least 2 are required to breed offspring")]
    SelectionPoolTooSmall { pool_size: usize },
}

/// Violation of the selection contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("cannot select two parents from a pool of {len}")]
    PoolTooSmall { len: usize },

    #[error("selected index {index} is outside the pool of {len}")]
    IndexOutOfPool { index: usize, len: usize },
}

/// Error returned by an evolution run.
///
/// `E` is the strategy set's own error type; strategy failures are passed
/// through as [`EvolutionError::Strategy`] without modification.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError<E>
where
    E: std::error::Error + 'static,
{
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("strategy failed: {0}")]
    Strategy(#[source] E),
}

impl<E> EvolutionError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the strategy error, if this is one.
    pub fn strategy(&self) -> Option<&E> {
        match self {
            EvolutionError::Strategy(e) => Some(e),
            _ => None,
        }
    }
}
