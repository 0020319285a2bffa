//! Unrolls a sort into its complete snapshot sequence.

use tracing::debug;

use crate::snapshot::{Recorder, SortSnapshot};
use crate::{comparison, distribution, SortAlgorithm};

/// Run `algorithm` over a copy of `initial` and return every snapshot it
/// emits, ending with a terminal snapshot that marks all indices sorted.
///
/// Equal inputs always produce equal sequences. Empty input yields exactly
/// one terminal snapshot.
pub fn generate(initial: &[i64], algorithm: SortAlgorithm) -> Vec<SortSnapshot> {
    let mut recorder = Recorder::new(initial.to_vec());
    match algorithm {
        SortAlgorithm::Bubble => comparison::bubble(&mut recorder),
        SortAlgorithm::Insertion => comparison::insertion(&mut recorder),
        SortAlgorithm::Selection => comparison::selection(&mut recorder),
        SortAlgorithm::Merge => comparison::merge(&mut recorder),
        SortAlgorithm::Quick => comparison::quick(&mut recorder),
        SortAlgorithm::Heap => comparison::heap(&mut recorder),
        SortAlgorithm::Shell => comparison::shell(&mut recorder),
        SortAlgorithm::Radix => distribution::radix(&mut recorder),
        SortAlgorithm::Counting => distribution::counting(&mut recorder),
        SortAlgorithm::Cocktail => comparison::cocktail(&mut recorder),
    }
    let steps = recorder.finish();
    debug!(%algorithm, len = initial.len(), steps = steps.len(), "generated sort timeline");
    steps
}
