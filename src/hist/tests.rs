use super::*;

fn sparse(pairs: &[(usize, i32)]) -> SparseHistogram {
    pairs.iter().copied().collect()
}

#[test]
fn test_dense_inc_dec_at() {
    let mut d = DenseHistogram::new(3);
    assert_eq!(d.len(), 3);
    d.inc(0, 1);
    d.inc(1, 2);
    d.dec(1, 1);
    assert_eq!(d.at(0), 1);
    assert_eq!(d.at(1), 1);
    assert_eq!(d.at(2), 0);
    assert_eq!(d.total(), 2);
}

#[test]
fn test_dense_for_each_in_topic_order() {
    let mut d = DenseHistogram::new(2);
    d.inc(0, 1);
    d.inc(1, 2);
    let mut seen = Vec::new();
    d.for_each(|t, c| seen.push((t, c)));
    assert_eq!(seen, vec![(0, 1), (1, 2)]);
}

#[test]
fn test_dense_clone_is_deep() {
    let mut d = DenseHistogram::new(2);
    d.inc(1, 5);
    let mut c = d.clone();
    c.inc(1, 1);
    assert_eq!(d.at(1), 5);
    assert_eq!(c.at(1), 6);
}

#[test]
#[should_panic(expected = "negative")]
fn test_dense_inc_negative_panics() {
    let mut d = DenseHistogram::new(2);
    d.inc(0, -1);
}

#[test]
#[should_panic(expected = "overflows")]
fn test_dense_inc_overflow_panics() {
    let mut d = DenseHistogram::new(1);
    d.inc(0, i64::MAX);
    d.inc(0, 1);
}

#[test]
fn test_sparse_inc_dec_removes_on_zero() {
    let mut s = SparseHistogram::new();
    s.inc(2, 10);
    assert_eq!(s.len(), 1);
    assert_eq!(s.at(2), 10);

    s.dec(2, 5);
    assert_eq!(s.at(2), 5);

    s.dec(2, 5);
    assert_eq!(s.len(), 0);
    assert_eq!(s.at(2), 0);
}

#[test]
fn test_sparse_dec_below_zero_keeps_signed_entry() {
    // Diff models record signed deltas through dec.
    let mut s = SparseHistogram::new();
    s.dec(4, 1);
    assert_eq!(s.at(4), -1);
    s.inc(4, 1);
    assert_eq!(s.len(), 0);
}

#[test]
fn test_sparse_equality_and_clone() {
    let s = sparse(&[(1, 2), (3, 4)]);
    let c = s.clone();
    assert_eq!(s, c);
    assert_ne!(s, SparseHistogram::new());
}

#[test]
fn test_sparse_iter_is_topic_ordered() {
    let s = sparse(&[(3, 1), (0, 7), (2, 2)]);
    let seen: Vec<_> = s.iter().collect();
    assert_eq!(seen, vec![(0, 7), (2, 2), (3, 1)]);
}

#[test]
#[should_panic(expected = "overflows")]
fn test_sparse_inc_overflow_panics() {
    let mut s = SparseHistogram::new();
    s.inc(0, i64::from(i32::MAX));
    s.inc(0, 1);
}

#[test]
fn test_ordered_from_histogram_sorts_desc_ties_asc() {
    let o = OrderedSparseHistogram::from_histogram(&sparse(&[(0, 7), (1, 2), (2, 1), (3, 10)]));
    assert_eq!(format!("{o}"), "[ 3:10 0:7 1:2 2:1 ]");

    let empty = OrderedSparseHistogram::from_histogram(&SparseHistogram::new());
    assert_eq!(format!("{empty}"), "[ ]");
}

#[test]
fn test_ordered_at() {
    let o = OrderedSparseHistogram::from_histogram(&sparse(&[(1, 2), (2, 1)]));
    assert_eq!(o.at(1), 2);
    assert_eq!(o.at(2), 1);
    assert_eq!(o.at(0), 0);
}

#[test]
fn test_ordered_inc_keeps_descending_order() {
    for reserved in 0..3 {
        let mut o = OrderedSparseHistogram::with_capacity(reserved);
        let nonzero = 2 * reserved + 1;
        for t in 0..nonzero {
            o.inc(t, t as i64 + 1);
            o.inc(t, t as i64 + 1); // increase an existing non-zero
        }
        for i in 0..nonzero {
            assert_eq!(o.topics()[i], nonzero - 1 - i);
            assert_eq!(o.counts()[i], 2 * (nonzero - i) as i32);
        }
    }
}

#[test]
fn test_ordered_dec_relocates_and_removes() {
    let mut o = OrderedSparseHistogram::from_histogram(&sparse(&[(0, 1), (1, 2)]));
    o.dec(1, 1);
    assert_eq!(format!("{o}"), "[ 1:1 0:1 ]");
    o.dec(0, 1);
    assert_eq!(format!("{o}"), "[ 1:1 ]");
    o.dec(1, 1);
    assert_eq!(format!("{o}"), "[ ]");

    // In another order of non-zeros.
    let mut o = OrderedSparseHistogram::from_histogram(&sparse(&[(0, 1), (1, 2)]));
    o.dec(1, 2);
    o.dec(0, 1);
    assert_eq!(format!("{o}"), "[ ]");
}

#[test]
#[should_panic(expected = "does not exist")]
fn test_ordered_dec_missing_topic_panics() {
    let mut o = OrderedSparseHistogram::new();
    o.dec(0, 1);
}

#[test]
#[should_panic(expected = "delta count")]
fn test_ordered_dec_underflow_panics() {
    let mut o = OrderedSparseHistogram::from_histogram(&sparse(&[(0, 1)]));
    o.dec(0, 2);
}

#[test]
fn test_ordered_clone_is_deep() {
    let o = OrderedSparseHistogram::from_histogram(&sparse(&[(0, 1), (1, 2), (3, 5), (2, 8)]));
    let c = o.clone();
    assert_eq!(format!("{c}"), "[ 2:8 3:5 1:2 0:1 ]");

    let c = OrderedSparseHistogram::new().clone();
    assert_eq!(c.len(), 0);
}

#[test]
fn test_capability_set_is_uniform() {
    fn exercise<H: Histogram>(h: &mut H) -> Vec<(usize, i64)> {
        h.inc(0, 1);
        h.inc(1, 2);
        let mut seen = Vec::new();
        h.for_each(|t, c| {
            if c != 0 {
                seen.push((t, c));
            }
        });
        seen.sort_unstable();
        seen
    }

    let expected = vec![(0, 1), (1, 2)];
    assert_eq!(exercise(&mut DenseHistogram::new(2)), expected);
    assert_eq!(exercise(&mut SparseHistogram::new()), expected);
    assert_eq!(exercise(&mut OrderedSparseHistogram::new()), expected);
}
