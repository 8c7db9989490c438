use serde::{Deserialize, Serialize};

use super::Histogram;

/// Plain histogram backed by a count vector.
///
/// Indexing is by topic id in `[0, K)`; counts are 64-bit because the
/// global topic histogram aggregates the whole corpus. Decrements may
/// transiently drive a count negative when a signed diff model is being
/// accumulated; the primary model never holds negatives between sampler
/// steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseHistogram(Vec<i64>);

impl DenseHistogram {
    /// Creates a zeroed histogram over `dim` topics.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self(vec![0; dim])
    }

    /// Iterates `(topic, count)` in topic order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }
}

impl Histogram for DenseHistogram {
    fn at(&self, topic: usize) -> i64 {
        self.0[topic]
    }

    fn inc(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        self.0[topic] = self.0[topic]
            .checked_add(count)
            .unwrap_or_else(|| panic!("count of topic {topic} overflows i64"));
    }

    fn dec(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        self.0[topic] -= count;
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn for_each<F: FnMut(usize, i64)>(&self, mut f: F) {
        for (topic, &count) in self.0.iter().enumerate() {
            f(topic, count);
        }
    }
}

impl From<Vec<i64>> for DenseHistogram {
    fn from(counts: Vec<i64>) -> Self {
        Self(counts)
    }
}
