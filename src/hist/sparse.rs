use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Histogram;

/// Sparse histogram backed by an ordered topic→count map.
///
/// Word topic histograms are sparse in practice: most tokens occur in a
/// handful of topics. Entries that reach zero are removed, so `len()`
/// is the number of non-zeros. The map is ordered so that iteration —
/// and therefore the inverse-CDF walk in the sampler — is a pure
/// function of the histogram's content, not of hasher state.
///
/// Counts are 32-bit; an increment past `i32::MAX` panics. Decrements
/// below zero are permitted (the entry stays), which is what lets a
/// diff model record signed deltas; the primary model's non-negativity
/// is the sampler's invariant, not this type's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseHistogram(BTreeMap<usize, i32>);

impl SparseHistogram {
    /// Creates an empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Iterates `(topic, count)` in ascending topic order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.0.iter().map(|(&t, &c)| (t, i64::from(c)))
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.0.values().map(|&c| i64::from(c)).sum()
    }
}

impl Histogram for SparseHistogram {
    fn at(&self, topic: usize) -> i64 {
        i64::from(self.0.get(&topic).copied().unwrap_or(0))
    }

    fn inc(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        if count == 0 {
            return;
        }
        let delta = i32::try_from(count)
            .unwrap_or_else(|_| panic!("count ({count}) larger than i32::MAX"));
        let entry = self.0.entry(topic).or_insert(0);
        *entry = entry
            .checked_add(delta)
            .unwrap_or_else(|| panic!("count of topic {topic} overflows i32"));
    }

    fn dec(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        if count == 0 {
            return;
        }
        let delta = i32::try_from(count)
            .unwrap_or_else(|_| panic!("count ({count}) larger than i32::MAX"));
        let entry = self.0.entry(topic).or_insert(0);
        *entry -= delta;
        if *entry == 0 {
            self.0.remove(&topic);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn for_each<F: FnMut(usize, i64)>(&self, mut f: F) {
        for (&topic, &count) in &self.0 {
            f(topic, i64::from(count));
        }
    }
}

impl FromIterator<(usize, i32)> for SparseHistogram {
    fn from_iter<I: IntoIterator<Item = (usize, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
