//! One generation's genomes.

use std::ops::Index;

/// An ordered, fixed-size collection of genomes.
///
/// The engine replaces the whole population every generation; a
/// `Population` is never resized in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<G> {
    genomes: Vec<G>,
}

impl<G> Population<G> {
    /// Wraps an existing genome vector.
    pub fn new(genomes: Vec<G>) -> Self {
        Self { genomes }
    }

    /// Number of genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Returns `true` if the population holds no genomes.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Genome at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&G> {
        self.genomes.get(index)
    }

    /// Iterates over the genomes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, G> {
        self.genomes.iter()
    }

    /// Borrows the genomes as a slice.
    pub fn as_slice(&self) -> &[G] {
        &self.genomes
    }

    /// Unwraps into the underlying vector.
    pub fn into_vec(self) -> Vec<G> {
        self.genomes
    }
}

impl<G> Default for Population<G> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<G> From<Vec<G>> for Population<G> {
    fn from(genomes: Vec<G>) -> Self {
        Self::new(genomes)
    }
}

impl<G> FromIterator<G> for Population<G> {
    fn from_iter<T: IntoIterator<Item = G>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<G> Index<usize> for Population<G> {
    type Output = G;

    fn index(&self, index: usize) -> &G {
        &self.genomes[index]
    }
}

impl<'a, G> IntoIterator for &'a Population<G> {
    type Item = &'a G;
    type IntoIter = std::slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.iter()
    }
}

impl<G> IntoIterator for Population<G> {
    type Item = G;
    type IntoIter = std::vec::IntoIter<G>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.into_iter()
    }
}
