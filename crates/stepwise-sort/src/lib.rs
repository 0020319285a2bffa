//! Stepwise Sorting
//!
//! Unrolls sorting algorithms into a complete, ordered sequence of
//! [`SortSnapshot`]s before playback starts, and plays that sequence back
//! one snapshot at a time through a [`Timeline`].
//!
//! # Emission points
//!
//! Every algorithm mutates a working copy of the input in place and records a
//! snapshot at each externally visible event:
//!
//! - **comparing**: two indices are compared (or one index is probed)
//! - **swapping**: two indices were just exchanged
//! - **sorted**: one or more indices became settled
//!
//! The final snapshot marks every index sorted and is the only one with
//! `complete` set. Swaps are the only mutation, so each snapshot's array is a
//! permutation of the input.

mod comparison;
mod distribution;
mod error;
mod generator;
mod snapshot;
mod timeline;

use std::fmt;
use std::str::FromStr;

pub use error::{Error, Result};
pub use generator::generate;
pub use snapshot::SortSnapshot;
pub use timeline::Timeline;

/// Sorting algorithm ids accepted from the editor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Selection,
    Merge,
    Quick,
    Heap,
    Shell,
    Radix,
    Counting,
    Cocktail,
}

impl SortAlgorithm {
    /// All sorting algorithms, in menu order.
    pub const ALL: [SortAlgorithm; 10] = [
        Self::Bubble,
        Self::Insertion,
        Self::Selection,
        Self::Merge,
        Self::Quick,
        Self::Heap,
        Self::Shell,
        Self::Radix,
        Self::Counting,
        Self::Cocktail,
    ];

    /// Wire id.
    pub fn id(&self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Heap => "heap",
            SortAlgorithm::Shell => "shell",
            SortAlgorithm::Radix => "radix",
            SortAlgorithm::Counting => "counting",
            SortAlgorithm::Cocktail => "cocktail",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.id() == lowered)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_ids_parse() {
        for algorithm in SortAlgorithm::ALL {
            assert_eq!(algorithm.id().parse::<SortAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!(" Quick ".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Quick);
        assert!("bogo".parse::<SortAlgorithm>().is_err());
    }
}
