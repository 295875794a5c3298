//! Best-so-far bookkeeping.
//!
//! [`FitnessTracker`] keeps the best genome of the latest generation and the
//! best genome of the whole run. Both are stored as independent clones, so
//! replacing or mutating the population afterwards never affects them.

use crate::types::Direction;

/// Snapshot of one evaluated generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRecord<G> {
    /// Generation index; 0 is the initial population.
    pub generation: usize,

    /// Best genome of this generation.
    pub current_best: G,

    /// Score of [`current_best`](Self::current_best).
    pub current_best_score: f64,

    /// Best genome seen so far in the run.
    pub global_best: G,

    /// Score of [`global_best`](Self::global_best).
    pub global_best_score: f64,
}

/// Tracks per-generation and all-time best genomes.
#[derive(Debug, Clone)]
pub struct FitnessTracker<G> {
    direction: Direction,
    current: Option<(G, f64)>,
    global: Option<(G, f64)>,
    generation: usize,
    history: Vec<f64>,
}

impl<G: Clone> FitnessTracker<G> {
    /// Creates an empty tracker for the given direction.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            current: None,
            global: None,
            generation: 0,
            history: Vec::new(),
        }
    }

    /// Records one evaluated generation.
    ///
    /// The first call is generation 0; each further call advances the
    /// generation counter by one. On tied scores the earliest index wins,
    /// and the all-time best is only replaced by a strictly better score.
    /// An empty population is ignored.
    pub fn record(&mut self, population: &[G], scores: &[f64]) {
        let Some(best_idx) = best_index(self.direction, scores) else {
            return;
        };
        let Some(genome) = population.get(best_idx) else {
            return;
        };
        let score = scores[best_idx];

        if !self.history.is_empty() {
            self.generation += 1;
        }

        let improved = match &self.global {
            Some((_, global_score)) => self.direction.is_better(score, *global_score),
            None => true,
        };
        if improved {
            self.global = Some((genome.clone(), score));
            log::trace!("generation {}: new global best {score}", self.generation);
        }
        self.current = Some((genome.clone(), score));

        let global_score = self.global_best_score();
        self.history.push(global_score);
    }

    /// Builds the record for the latest generation, if any was recorded.
    pub fn snapshot(&self) -> Option<GenerationRecord<G>> {
        let (current_best, current_best_score) = self.current.clone()?;
        let (global_best, global_best_score) = self.global.clone()?;
        Some(GenerationRecord {
            generation: self.generation,
            current_best,
            current_best_score,
            global_best,
            global_best_score,
        })
    }
}

impl<G> FitnessTracker<G> {
    /// Optimization direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Best genome of the latest generation.
    pub fn current_best(&self) -> Option<&G> {
        self.current.as_ref().map(|(g, _)| g)
    }

    /// Score of the latest generation's best genome, or the direction's
    /// worst value before anything was recorded.
    pub fn current_best_score(&self) -> f64 {
        self.current
            .as_ref()
            .map_or(self.direction.worst(), |(_, s)| *s)
    }

    /// Best genome of the whole run.
    pub fn global_best(&self) -> Option<&G> {
        self.global.as_ref().map(|(g, _)| g)
    }

    /// Score of the best genome of the whole run, or the direction's worst
    /// value before anything was recorded.
    pub fn global_best_score(&self) -> f64 {
        self.global
            .as_ref()
            .map_or(self.direction.worst(), |(_, s)| *s)
    }

    /// Index of the latest recorded generation.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Global best score after each recorded generation.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Consumes the tracker, returning the all-time best genome and score.
    pub fn into_global_best(self) -> Option<(G, f64)> {
        self.global
    }
}

/// Index of the best score, taking the first one on ties.
pub(crate) fn best_index(direction: Direction, scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some(b) if !direction.is_better(score, scores[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}
