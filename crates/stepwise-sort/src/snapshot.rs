//! Sort snapshots and the recorder that emits them.

use std::collections::BTreeSet;

/// State of the working array at one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSnapshot {
    pub array: Vec<i64>,
    pub comparing: BTreeSet<usize>,
    pub swapping: BTreeSet<usize>,
    /// Settled indices: final positions, or the ordered prefix for
    /// insertion sort. Never shrinks within a run.
    pub sorted: BTreeSet<usize>,
    pub step_index: usize,
    /// Set on the last snapshot of a sequence only.
    pub complete: bool,
}

/// Mutates the working array in place and records a snapshot at every
/// emission point.
#[derive(Debug)]
pub(crate) struct Recorder {
    array: Vec<i64>,
    sorted: BTreeSet<usize>,
    steps: Vec<SortSnapshot>,
}

impl Recorder {
    pub(crate) fn new(array: Vec<i64>) -> Self {
        Self {
            array,
            sorted: BTreeSet::new(),
            steps: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.array.len()
    }

    pub(crate) fn get(&self, i: usize) -> i64 {
        self.array[i]
    }

    pub(crate) fn values(&self) -> &[i64] {
        &self.array
    }

    /// Emit a comparing snapshot over `i` and `j`.
    pub(crate) fn compare(&mut self, i: usize, j: usize) {
        self.emit(BTreeSet::from([i, j]), BTreeSet::new());
    }

    /// Emit a comparing snapshot over a single probed index.
    pub(crate) fn probe(&mut self, i: usize) {
        self.emit(BTreeSet::from([i]), BTreeSet::new());
    }

    /// Swap two positions and emit a swapping snapshot.
    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        self.array.swap(i, j);
        self.emit(BTreeSet::new(), BTreeSet::from([i, j]));
    }

    /// Bring `value` to position `k` by swapping it in from the unsettled
    /// tail. No-op if it is already there.
    pub(crate) fn place(&mut self, k: usize, value: i64) {
        if let Some(p) = (k..self.len()).find(|&p| self.array[p] == value) {
            if p != k {
                self.swap(k, p);
            }
        }
    }

    /// Mark indices as final and emit a sorted snapshot.
    pub(crate) fn settle(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.sorted.extend(indices);
        self.emit(BTreeSet::new(), BTreeSet::new());
    }

    /// Mark every index sorted and emit the terminal snapshot.
    pub(crate) fn finish(mut self) -> Vec<SortSnapshot> {
        self.sorted.extend(0..self.array.len());
        self.emit(BTreeSet::new(), BTreeSet::new());
        if let Some(last) = self.steps.last_mut() {
            last.complete = true;
        }
        self.steps
    }

    fn emit(&mut self, comparing: BTreeSet<usize>, swapping: BTreeSet<usize>) {
        self.steps.push(SortSnapshot {
            array: self.array.clone(),
            comparing,
            swapping,
            sorted: self.sorted.clone(),
            step_index: self.steps.len(),
            complete: false,
        });
    }
}
