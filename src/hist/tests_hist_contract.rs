// =========================================================================
// FALSIFY-OH: OrderedSparseHistogram contract (temas hist)
//
// The sampler's document-topic bucket and the top-word truncation both
// assume the ordered histogram's parallel arrays stay sorted by
// non-increasing count with zero entries removed, under any interleaving
// of inc/dec. These tests try to falsify that assumption.
// =========================================================================

use proptest::prelude::*;

use super::*;

fn assert_contract(o: &OrderedSparseHistogram, reference: &SparseHistogram) {
    // Non-increasing counts.
    for w in o.counts().windows(2) {
        assert!(
            w[0] >= w[1],
            "FALSIFIED OH: counts not descending: {w:?}"
        );
    }
    // No zero entries, length equals the number of distinct topics.
    assert!(o.counts().iter().all(|&c| c > 0), "FALSIFIED OH: zero entry kept");
    assert_eq!(
        o.len(),
        reference.len(),
        "FALSIFIED OH: len != distinct non-zero topics"
    );
    // Entry-wise agreement with the reference map.
    reference.for_each(|t, c| {
        assert_eq!(o.at(t), c, "FALSIFIED OH: count mismatch at topic {t}");
    });
}

proptest! {
    /// Any inc/dec interleaving leaves the parallel arrays sorted, free of
    /// zeros, and equal to a reference map.
    #[test]
    fn prop_ordered_matches_reference_map(
        ops in prop::collection::vec((0_usize..8, 1_i64..5, any::<bool>()), 0..64)
    ) {
        let mut o = OrderedSparseHistogram::new();
        let mut reference = SparseHistogram::new();

        for (topic, count, is_inc) in ops {
            if is_inc {
                o.inc(topic, count);
                reference.inc(topic, count);
            } else {
                // Only decrement what is actually present.
                let available = reference.at(topic);
                if available > 0 {
                    let count = count.min(available);
                    o.dec(topic, count);
                    reference.dec(topic, count);
                }
            }
            assert_contract(&o, &reference);
        }
    }

    /// from_histogram is canonical: descending count, ties ascending topic.
    #[test]
    fn prop_from_histogram_canonical(
        pairs in prop::collection::btree_map(0_usize..16, 1_i32..100, 0..12)
    ) {
        let s: SparseHistogram = pairs.into_iter().collect();
        let o = OrderedSparseHistogram::from_histogram(&s);
        for i in 1..o.len() {
            let (pc, pt) = (o.counts()[i - 1], o.topics()[i - 1]);
            let (cc, ct) = (o.counts()[i], o.topics()[i]);
            prop_assert!(pc > cc || (pc == cc && pt < ct));
        }
        assert_contract(&o, &s);
    }
}
