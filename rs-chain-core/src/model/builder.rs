use log::debug;

use crate::error::{ChainError, Result};
use super::label::{Label, StateLength};
use super::state_index::StateIndex;
use super::transition_matrix::TransitionMatrix;

/// Builds the index/matrix pair for one `fit` or `load` call.
///
/// Work happens on a private copy; the chain only swaps it in through
/// `finish` once every step succeeded.
///
/// # Invariants
/// - `matrix.size() == index.len()` after `prepare`
/// - The matrix always starts zeroed, in both replace and extend mode
pub(crate) struct ChainBuilder<S: Label> {
	index: StateIndex<S>,
	matrix: TransitionMatrix,
}

impl<S: Label> ChainBuilder<S> {
	/// Sets up the vocabulary and a zeroed matrix.
	///
	/// - Replace mode (`extend == false`): the vocabulary is `states` if
	///   given, else the distinct `observed` labels.
	/// - Extend mode: `current` is kept and grown with `states` if given,
	///   else with the unknown `observed` labels. Previous weights are not
	///   carried over.
	pub(crate) fn prepare<'a, I>(current: &StateIndex<S>, observed: I, states: Option<&[S]>, extend: bool) -> Self
	where
		I: IntoIterator<Item = &'a S>,
		S: 'a,
	{
		let index = if extend {
			let mut index = current.clone();
			let added = match states {
				Some(states) => index.extend(states.iter().cloned()),
				None => index.extend(observed.into_iter().cloned()),
			};
			debug!("extended vocabulary by {} states to {}", added, index.len());
			index
		} else {
			let index = match states {
				Some(states) => StateIndex::from_labels(states.iter().cloned()),
				None => StateIndex::from_labels(observed.into_iter().cloned()),
			};
			debug!("reset vocabulary to {} states", index.len());
			index
		};

		let matrix = TransitionMatrix::zeroed(index.len());
		Self { index, matrix }
	}

	/// Counts every consecutive pair `(observations[k - 1], observations[k])`.
	pub(crate) fn count(mut self, observations: &[S]) -> Result<Self> {
		for pair in observations.windows(2) {
			let from = self.index.slot_of(&pair[0])?;
			let to = self.index.slot_of(&pair[1])?;
			self.matrix.accumulate(from, to)?;
		}
		debug!("counted {} transitions over {} states", observations.len().saturating_sub(1), self.index.len());
		Ok(self)
	}

	/// Assigns explicit weights, scaled by the destination length when
	/// `weighted` is set.
	///
	/// # Errors
	/// - `UnknownState` if a source or destination is not in the vocabulary
	/// - `InvalidWeight` for negative, NaN or infinite weights
	pub(crate) fn assign(mut self, transitions: &[(S, Vec<(S, f64)>)], weighted: bool) -> Result<Self>
	where
		S: StateLength,
	{
		let mut assigned = 0;
		for (from, destinations) in transitions {
			let i = self.index.slot_of(from)?;
			for (to, weight) in destinations {
				let j = self.index.slot_of(to)?;
				if !weight.is_finite() || *weight < 0.0 {
					return Err(ChainError::InvalidWeight {
						from: format!("{from:?}"),
						to: format!("{to:?}"),
						weight: *weight,
					});
				}
				let scale = if weighted { to.state_len() as f64 } else { 1.0 };
				self.matrix.assign(i, j, weight * scale)?;
				assigned += 1;
			}
		}
		debug!("loaded {} weights over {} states", assigned, self.index.len());
		Ok(self)
	}

	pub(crate) fn finish(self) -> (StateIndex<S>, TransitionMatrix) {
		(self.index, self.matrix)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prepare_replace_uses_observed_labels() {
		let current = StateIndex::from_labels(["old"]);
		let (index, matrix) = ChainBuilder::prepare(&current, &["x", "y", "x"], None, false).finish();

		assert_eq!(index.labels(), &["x", "y"]);
		assert_eq!(matrix.size(), 2);
	}

	#[test]
	fn prepare_prefers_explicit_states() {
		let current = StateIndex::new();
		let states = ["z", "y", "x"];
		let (index, _) = ChainBuilder::prepare(&current, &["x", "y"], Some(&states[..]), false).finish();

		assert_eq!(index.labels(), &["z", "y", "x"]);
	}

	#[test]
	fn prepare_extend_appends_new_labels() {
		let current = StateIndex::from_labels(["a", "b"]);
		let (index, matrix) = ChainBuilder::prepare(&current, &["c", "a"], None, true).finish();

		assert_eq!(index.labels(), &["a", "b", "c"]);
		assert_eq!(matrix, TransitionMatrix::zeroed(3));
	}

	#[test]
	fn count_rejects_labels_missing_from_explicit_states() {
		let states = ["a"];
		let result = ChainBuilder::prepare(&StateIndex::new(), &["a", "b"], Some(&states[..]), false).count(&["a", "b"]);

		assert!(matches!(result, Err(ChainError::UnknownState(_))));
	}

	#[test]
	fn assign_rejects_negative_weights() {
		let transitions = vec![("a", vec![("a", -0.5)])];
		let result = ChainBuilder::prepare(&StateIndex::new(), transitions.iter().map(|(from, _)| from), None, false)
			.assign(&transitions, true);

		assert!(matches!(result, Err(ChainError::InvalidWeight { weight, .. }) if weight == -0.5));
	}
}
