//! Playback cursor over a pre-generated snapshot sequence.

use crate::generator::generate;
use crate::snapshot::SortSnapshot;
use crate::SortAlgorithm;

/// A fully unrolled sort, handed out one snapshot per [`Timeline::advance`].
///
/// The cursor starts before the first snapshot; the input array is shown
/// until the first advance.
#[derive(Debug, Clone)]
pub struct Timeline {
    algorithm: SortAlgorithm,
    initial: Vec<i64>,
    snapshots: Vec<SortSnapshot>,
    cursor: usize,
}

impl Timeline {
    /// Generate the full sequence for `initial` up front.
    pub fn new(initial: Vec<i64>, algorithm: SortAlgorithm) -> Self {
        let snapshots = generate(&initial, algorithm);
        Self {
            algorithm,
            initial,
            snapshots,
            cursor: 0,
        }
    }

    /// Algorithm that produced the sequence.
    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    /// Input array as supplied.
    pub fn initial(&self) -> &[i64] {
        &self.initial
    }

    /// Hand out the next snapshot, or `None` once every snapshot was shown.
    pub fn advance(&mut self) -> Option<&SortSnapshot> {
        let next = self.snapshots.get(self.cursor)?;
        self.cursor += 1;
        Some(next)
    }

    /// Snapshot most recently handed out.
    pub fn current(&self) -> Option<&SortSnapshot> {
        self.cursor.checked_sub(1).and_then(|i| self.snapshots.get(i))
    }

    /// Whether the terminal snapshot has been handed out.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.snapshots.len()
    }

    /// Snapshots handed out so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Length of the whole sequence.
    pub fn total_frames(&self) -> usize {
        self.snapshots.len()
    }

    /// Every generated snapshot.
    pub fn snapshots(&self) -> &[SortSnapshot] {
        &self.snapshots
    }

    /// Fraction of the sequence shown, 0.0 - 1.0.
    pub fn progress(&self) -> f64 {
        if self.snapshots.is_empty() {
            0.0
        } else {
            self.cursor as f64 / self.snapshots.len() as f64
        }
    }
}
