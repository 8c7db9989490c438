use std::fmt;

use super::Histogram;

/// Sparse histogram as parallel topic/count arrays sorted by count.
///
/// The invariant: `counts` is non-increasing and zero entries are
/// absent ([`from_histogram`](Self::from_histogram) additionally breaks
/// ties by ascending topic id). Document topic histograms use this form
/// so that probability-mass scans (the sampler's document-topic bucket,
/// top-word truncation) can walk entries from heaviest to lightest and
/// stop early.
///
/// `inc` and `dec` relocate the touched entry by adjacent swaps, which
/// is O(non-zeros) but cheap in practice: a resampled topic's count
/// changes by one, so the entry rarely moves far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSparseHistogram {
    topics: Vec<usize>,
    counts: Vec<i32>,
}

impl OrderedSparseHistogram {
    /// Creates an empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty histogram with reserved capacity.
    ///
    /// A document topic histogram has at most `min(num_topics, doc_len)`
    /// non-zeros, so callers that know the bound can avoid reallocation.
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            topics: Vec::with_capacity(cap),
            counts: Vec::with_capacity(cap),
        }
    }

    /// Builds an ordered histogram representing `h`.
    #[must_use]
    pub fn from_histogram<H: Histogram>(h: &H) -> Self {
        let mut pairs: Vec<(usize, i32)> = Vec::with_capacity(h.len());
        h.for_each(|topic, count| {
            if count != 0 {
                pairs.push((topic, count as i32));
            }
        });
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Self {
            topics: pairs.iter().map(|p| p.0).collect(),
            counts: pairs.iter().map(|p| p.1).collect(),
        }
    }

    /// Topic ids in rank order (heaviest first).
    #[must_use]
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    /// Counts in rank order, parallel to [`topics`](Self::topics).
    #[must_use]
    pub fn counts(&self) -> &[i32] {
        &self.counts
    }

    /// Iterates `(topic, count)` in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.topics
            .iter()
            .zip(self.counts.iter())
            .map(|(&t, &c)| (t, i64::from(c)))
    }

    /// Truncates to the first `len` entries.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.topics.truncate(len);
        self.counts.truncate(len);
    }
}

impl Histogram for OrderedSparseHistogram {
    fn at(&self, topic: usize) -> i64 {
        for (i, &t) in self.topics.iter().enumerate() {
            if t == topic {
                return i64::from(self.counts[i]);
            }
        }
        0
    }

    fn inc(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        if count == 0 {
            return;
        }
        let delta = i32::try_from(count)
            .unwrap_or_else(|_| panic!("count ({count}) larger than i32::MAX"));

        // Increase an existing non-zero or append one.
        let mut i = 0;
        while i < self.topics.len() && self.topics[i] != topic {
            i += 1;
        }
        if i < self.topics.len() {
            self.counts[i] = self.counts[i]
                .checked_add(delta)
                .unwrap_or_else(|| panic!("count of topic {topic} overflows i32"));
        } else {
            self.topics.push(topic);
            self.counts.push(delta);
        }

        // Restore descending order by bubbling the entry up.
        let c = self.counts[i];
        while i > 0 && c > self.counts[i - 1] {
            self.topics[i] = self.topics[i - 1];
            self.counts[i] = self.counts[i - 1];
            i -= 1;
        }
        self.topics[i] = topic;
        self.counts[i] = c;
    }

    fn dec(&mut self, topic: usize, count: i64) {
        assert!(count >= 0, "count ({count}) is negative");
        if count == 0 {
            return;
        }
        let delta = i32::try_from(count)
            .unwrap_or_else(|_| panic!("count ({count}) larger than i32::MAX"));

        let mut i = 0;
        while i < self.topics.len() && self.topics[i] != topic {
            i += 1;
        }
        assert!(i < self.topics.len(), "topic {topic} does not exist");
        assert!(
            self.counts[i] >= delta,
            "existing count ({}) < delta count ({delta})",
            self.counts[i]
        );
        self.counts[i] -= delta;

        // Bubble the entry down, then drop it if it reached zero.
        let c = self.counts[i];
        while i + 1 < self.topics.len() && c < self.counts[i + 1] {
            self.topics[i] = self.topics[i + 1];
            self.counts[i] = self.counts[i + 1];
            i += 1;
        }
        self.topics[i] = topic;
        self.counts[i] = c;

        if c == 0 {
            self.truncate(i);
        }
    }

    fn len(&self) -> usize {
        self.topics.len()
    }

    fn for_each<F: FnMut(usize, i64)>(&self, mut f: F) {
        for i in 0..self.topics.len() {
            f(self.topics[i], i64::from(self.counts[i]));
        }
    }
}

impl fmt::Display for OrderedSparseHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, &topic) in self.topics.iter().enumerate() {
            write!(f, "{}:{} ", topic, self.counts[i])?;
        }
        write!(f, "]")
    }
}
