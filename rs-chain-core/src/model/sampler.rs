use log::trace;
use rand::Rng;
use thiserror::Error;

use crate::error::Result;
use super::label::Label;
use super::state_index::StateIndex;
use super::transition_matrix::TransitionMatrix;

/// Reasons a weight row cannot produce a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
	#[error("row has no transitions")]
	EmptyRow,

	#[error("row has no positive weight")]
	NoPositiveWeight,

	#[error("row weights do not sum to a finite total")]
	NonFiniteTotal,
}

/// Outcome of a forward walk.
///
/// `states` holds the drawn labels (the start label excluded). When the walk
/// stopped early, `dead_end` is the state whose row could not be sampled
/// together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk<S> {
	pub states: Vec<S>,
	pub dead_end: Option<(S, SampleError)>,
}

impl<S> Walk<S> {
	/// True when the walk stopped before the requested length.
	pub fn is_truncated(&self) -> bool {
		self.dead_end.is_some()
	}
}

/// Draws a slot with probability proportional to its weight.
///
/// Weights need not sum to 1. Zero, negative and NaN weights are never
/// selected.
///
/// This method performs:
/// - an O(n) pass building cumulative weights
/// - a binary search over the cumulative weights
pub fn choose_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> std::result::Result<usize, SampleError> {
	if weights.is_empty() {
		return Err(SampleError::EmptyRow);
	}

	let mut total = 0.0_f64;
	let cumulative: Vec<f64> = weights
		.iter()
		.map(|weight| {
			if *weight > 0.0 {
				total += *weight;
			}
			total
		})
		.collect();

	if !total.is_finite() {
		return Err(SampleError::NonFiniteTotal);
	}
	if total <= 0.0 {
		return Err(SampleError::NoPositiveWeight);
	}

	let r = rng.random_range(0.0..total);
	let slot = cumulative.partition_point(|bound| *bound <= r);
	if slot < weights.len() {
		return Ok(slot);
	}

	// Rounding pushed r past the last bound: take the last usable slot.
	weights
		.iter()
		.rposition(|weight| *weight > 0.0)
		.ok_or(SampleError::NoPositiveWeight)
}

/// Walks at most `length` steps from `start`.
///
/// Stops early, without error, on a row that cannot be sampled; the
/// returned `Walk` records where.
///
/// # Errors
/// `UnknownState` if `start` is not in the index.
pub(crate) fn walk<S, R>(
	index: &StateIndex<S>,
	matrix: &TransitionMatrix,
	start: &S,
	length: usize,
	rng: &mut R,
) -> Result<Walk<S>>
where
	S: Label,
	R: Rng + ?Sized,
{
	let mut previous = index.slot_of(start)?;
	// `length` is only an upper bound; a dead end can stop the walk at any step.
	let mut states = Vec::new();

	for _ in 0..length {
		let current = match choose_weighted(matrix.row(previous)?, rng) {
			Ok(slot) => slot,
			Err(reason) => {
				let state = index.label_of(previous)?.clone();
				trace!("dead end at {:?} after {} steps: {}", state, states.len(), reason);
				return Ok(Walk { states, dead_end: Some((state, reason)) });
			}
		};
		let label = index.label_of(current)?;
		trace!("step {} -> {:?}", states.len(), label);
		states.push(label.clone());
		previous = current;
	}

	Ok(Walk { states, dead_end: None })
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn empty_row_cannot_be_sampled() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(choose_weighted(&[], &mut rng), Err(SampleError::EmptyRow));
	}

	#[test]
	fn non_positive_row_is_a_dead_end() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(choose_weighted(&[0.0, 0.0], &mut rng), Err(SampleError::NoPositiveWeight));
		assert_eq!(choose_weighted(&[-1.0, 0.0], &mut rng), Err(SampleError::NoPositiveWeight));
	}

	#[test]
	fn infinite_total_is_rejected() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(choose_weighted(&[f64::INFINITY, 1.0], &mut rng), Err(SampleError::NonFiniteTotal));
	}

	#[test]
	fn zero_and_negative_slots_are_never_drawn() {
		let mut rng = StdRng::seed_from_u64(7);
		let weights = [0.0, 3.0, -2.0, 0.5, 0.0];
		for _ in 0..2_000 {
			let slot = choose_weighted(&weights, &mut rng).unwrap();
			assert!(slot == 1 || slot == 3, "drew slot {slot}");
		}
	}

	#[test]
	fn single_positive_weight_is_always_drawn() {
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..100 {
			assert_eq!(choose_weighted(&[0.0, 0.0, 1e-9], &mut rng), Ok(2));
		}
	}

	#[test]
	fn draws_follow_relative_weights() {
		let mut rng = StdRng::seed_from_u64(42);
		let weights = [1.0, 3.0];
		let draws = 20_000;
		let ones = (0..draws).filter(|_| choose_weighted(&weights, &mut rng) == Ok(1)).count();
		let frequency = ones as f64 / draws as f64;

		assert!((frequency - 0.75).abs() < 0.02, "frequency {frequency}");
	}

	#[test]
	fn walk_stops_on_dead_end() {
		let index = StateIndex::from_labels(["a", "b"]);
		let mut matrix = TransitionMatrix::zeroed(2);
		matrix.accumulate(0, 1).unwrap();
		let mut rng = StdRng::seed_from_u64(5);

		let walk = walk(&index, &matrix, &"a", 4, &mut rng).unwrap();

		assert_eq!(walk.states, vec!["b"]);
		assert_eq!(walk.dead_end, Some(("b", SampleError::NoPositiveWeight)));
		assert!(walk.is_truncated());
	}

	#[test]
	fn walk_with_unbounded_length_stops_on_dead_end() {
		let index = StateIndex::from_labels(["x", "y"]);
		let mut matrix = TransitionMatrix::zeroed(2);
		matrix.accumulate(0, 1).unwrap();
		let mut rng = StdRng::seed_from_u64(11);

		let from_dead_end = walk(&index, &matrix, &"y", usize::MAX, &mut rng).unwrap();
		assert!(from_dead_end.states.is_empty());
		assert_eq!(from_dead_end.dead_end, Some(("y", SampleError::NoPositiveWeight)));

		let from_start = walk(&index, &matrix, &"x", usize::MAX, &mut rng).unwrap();
		assert_eq!(from_start.states, vec!["y"]);
	}
}
