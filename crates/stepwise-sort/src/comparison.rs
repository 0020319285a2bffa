//! Comparison sorts. All work in place on the recorder's array.

use crate::snapshot::Recorder;

pub(crate) fn bubble(r: &mut Recorder) {
    let n = r.len();
    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - pass - 1 {
            r.compare(j, j + 1);
            if r.get(j) > r.get(j + 1) {
                r.swap(j, j + 1);
            }
        }
        r.settle([n - 1 - pass]);
    }
}

/// Bubble passes alternating direction; each pass fixes one end.
pub(crate) fn cocktail(r: &mut Recorder) {
    let (mut lo, mut hi) = (0, r.len());
    while lo + 1 < hi {
        let mut swapped = false;
        for j in lo..hi - 1 {
            r.compare(j, j + 1);
            if r.get(j) > r.get(j + 1) {
                r.swap(j, j + 1);
                swapped = true;
            }
        }
        hi -= 1;
        r.settle([hi]);
        if !swapped || lo + 1 >= hi {
            break;
        }

        swapped = false;
        for j in (lo..hi - 1).rev() {
            r.compare(j, j + 1);
            if r.get(j) > r.get(j + 1) {
                r.swap(j, j + 1);
                swapped = true;
            }
        }
        r.settle([lo]);
        lo += 1;
        if !swapped {
            break;
        }
    }
}

/// Key selection is shown as a single-index probe; shifting right is done
/// with adjacent swaps so every snapshot stays a permutation of the input.
pub(crate) fn insertion(r: &mut Recorder) {
    for i in 1..r.len() {
        r.probe(i);
        let mut j = i;
        while j > 0 && r.get(j - 1) > r.get(j) {
            r.compare(j - 1, j);
            r.swap(j - 1, j);
            j -= 1;
        }
        r.settle(0..=i);
    }
}

pub(crate) fn selection(r: &mut Recorder) {
    let n = r.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            r.compare(j, min);
            if r.get(j) < r.get(min) {
                min = j;
            }
        }
        if min != i {
            r.swap(i, min);
        }
        r.settle([i]);
    }
}

/// Gap sequence n/2, n/4, ..., 1.
pub(crate) fn shell(r: &mut Recorder) {
    let n = r.len();
    let mut gap = n / 2;
    while gap > 0 {
        for i in gap..n {
            let mut j = i;
            while j >= gap {
                r.compare(j - gap, j);
                if r.get(j - gap) <= r.get(j) {
                    break;
                }
                r.swap(j - gap, j);
                j -= gap;
            }
        }
        gap /= 2;
    }
}

/// Lomuto quicksort. Subranges are half-open and kept on an explicit stack
/// with the low side on top, which replays the recursive order.
pub(crate) fn quick(r: &mut Recorder) {
    let mut pending = vec![(0, r.len())];
    while let Some((lo, hi)) = pending.pop() {
        match hi.saturating_sub(lo) {
            0 => {}
            1 => r.settle([lo]),
            _ => {
                let p = partition(r, lo, hi);
                r.settle([p]);
                pending.push((p + 1, hi));
                pending.push((lo, p));
            }
        }
    }
}

fn partition(r: &mut Recorder, lo: usize, hi: usize) -> usize {
    let pivot_at = hi - 1;
    let pivot = r.get(pivot_at);
    let mut store = lo;
    for j in lo..pivot_at {
        r.compare(j, pivot_at);
        if r.get(j) < pivot {
            r.swap(store, j);
            store += 1;
        }
    }
    r.swap(store, pivot_at);
    store
}

/// Top-down merge sort; merges happen in place by rotating the smaller
/// right-hand element down with adjacent swaps.
pub(crate) fn merge(r: &mut Recorder) {
    let n = r.len();
    merge_range(r, 0, n);
}

fn merge_range(r: &mut Recorder, lo: usize, hi: usize) {
    if hi - lo < 2 {
        return;
    }
    let mid = lo + (hi - lo) / 2;
    merge_range(r, lo, mid);
    merge_range(r, mid, hi);

    let (mut i, mut mid) = (lo, mid);
    while i < mid && mid < hi {
        r.compare(i, mid);
        if r.get(i) <= r.get(mid) {
            i += 1;
            continue;
        }
        for k in (i..mid).rev() {
            r.swap(k, k + 1);
        }
        i += 1;
        mid += 1;
    }
}

/// Max-heap build followed by repeated root extraction to the tail.
pub(crate) fn heap(r: &mut Recorder) {
    let n = r.len();
    for root in (0..n / 2).rev() {
        sift_down(r, root, n);
    }
    for end in (1..n).rev() {
        r.swap(0, end);
        r.settle([end]);
        sift_down(r, 0, end);
    }
}

fn sift_down(r: &mut Recorder, mut root: usize, end: usize) {
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return;
        }
        let mut largest = root;
        r.compare(left, largest);
        if r.get(left) > r.get(largest) {
            largest = left;
        }
        let right = left + 1;
        if right < end {
            r.compare(right, largest);
            if r.get(right) > r.get(largest) {
                largest = right;
            }
        }
        if largest == root {
            return;
        }
        r.swap(root, largest);
        root = largest;
    }
}
