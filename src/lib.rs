//! Domain-agnostic evolutionary search engine.
//!
//! The engine knows nothing about what a solution means. A problem domain
//! plugs in through [`Strategies`]: how to create, score, select, recombine,
//! and mutate genomes. The engine supplies the generational loop:
//!
//! - **Initialization**: `population_size` independent `create` calls
//! - **Evaluation**: one score per genome, index-aligned, optionally parallel
//! - **Elitism**: the best genomes are carried over unchanged
//! - **Breeding**: selection → crossover (or pass-through cloning) → mutation
//! - **Tracking**: current-generation and all-time best, never worsening
//!
//! # Key Types
//!
//! - [`EngineConfig`]: Run parameters (population, rates, elitism, direction)
//! - [`EvolutionEngine`]: Executes the generational loop
//! - [`FitnessTracker`] / [`GenerationRecord`]: Best-so-far bookkeeping
//! - [`FnStrategies`]: Strategy set assembled from closures
//! - [`operators`]: Ready-made selection, crossover, and mutation helpers
//!
//! # Randomness
//!
//! One RNG per engine, threaded through every strategy call in a strict
//! sequential order, so a fixed seed replays a run exactly.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (1975), *An Analysis of the Behavior of a Class of Genetic Adaptive Systems* (elitism)

mod adapters;
mod config;
mod engine;
mod error;
pub mod operators;
mod population;
mod tracker;
mod types;

pub use adapters::FnStrategies;
pub use config::EngineConfig;
pub use engine::EvolutionEngine;
pub use error::{ConfigError, EvolutionError, SelectionError};
pub use population::Population;
pub use tracker::{FitnessTracker, GenerationRecord};
pub use types::{Direction, Strategies};
