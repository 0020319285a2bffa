//! Distribution sorts. Each pass computes the target order off to the side
//! and then realizes it position by position with swaps, so the working
//! array is a permutation of the input at every snapshot.

use std::collections::BTreeMap;

use crate::snapshot::Recorder;

const RADIX: u128 = 10;

/// Counts per distinct value; every placed position is final immediately.
pub(crate) fn counting(r: &mut Recorder) {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for i in 0..r.len() {
        r.probe(i);
        *counts.entry(r.get(i)).or_default() += 1;
    }

    let mut k = 0;
    for (value, count) in counts {
        for _ in 0..count {
            r.place(k, value);
            r.settle([k]);
            k += 1;
        }
    }
}

/// LSD radix sort in base 10 over keys offset by the minimum value, so
/// negative inputs sort correctly.
pub(crate) fn radix(r: &mut Recorder) {
    let Some(&min) = r.values().iter().min() else {
        return;
    };
    let key = |v: i64| (i128::from(v) - i128::from(min)) as u128;
    let max_key = r.values().iter().map(|&v| key(v)).max().unwrap_or(0);

    let mut exp: u128 = 1;
    while max_key / exp > 0 {
        let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); RADIX as usize];
        for i in 0..r.len() {
            r.probe(i);
            let v = r.get(i);
            buckets[((key(v) / exp) % RADIX) as usize].push(v);
        }
        for (k, value) in buckets.into_iter().flatten().enumerate() {
            r.place(k, value);
        }
        exp *= RADIX;
    }
}
