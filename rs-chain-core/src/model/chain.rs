use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};
use super::builder::ChainBuilder;
use super::label::{Label, StateLength};
use super::sampler::{self, Walk};
use super::state_index::StateIndex;
use super::transition_matrix::TransitionMatrix;

/// A weighted first-order Markov chain over labels of type `S`.
///
/// The chain is either empty (no states, zero-sized matrix) or built
/// (at least one state and an `n x n` matrix).
///
/// # Responsibilities
/// - Learn transition counts from an observed sequence (`fit`)
/// - Load explicit transition weights (`load`)
/// - Generate new sequences by weighted random walk (`forward`, `walk`)
///
/// # Invariants
/// - `matrix.size() == index.len()` at all times
/// - `built()` depends only on the vocabulary size
///
/// Cloning produces a fully independent chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(bound(
	serialize = "S: Label + Serialize",
	deserialize = "S: Label + Deserialize<'de>"
))]
pub struct Chain<S: Label> {
	index: StateIndex<S>,
	transitions: TransitionMatrix,
}

impl<S: Label> Default for Chain<S> {
	fn default() -> Self {
		Self { index: StateIndex::new(), transitions: TransitionMatrix::zeroed(0) }
	}
}

impl<S: Label> Chain<S> {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a chain from a prebuilt index and matrix.
	///
	/// # Errors
	/// `DimensionMismatch` if the matrix is not sized to the index.
	pub fn from_parts(index: StateIndex<S>, transitions: TransitionMatrix) -> Result<Self> {
		if index.len() != transitions.size() {
			return Err(ChainError::DimensionMismatch { states: index.len(), rows: transitions.size() });
		}
		Ok(Self { index, transitions })
	}

	/// True iff at least one state is known.
	pub fn built(&self) -> bool {
		!self.index.is_empty()
	}

	pub fn is_empty(&self) -> bool {
		!self.built()
	}

	/// Number of known states.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Known states, in slot order.
	pub fn states(&self) -> &[S] {
		self.index.labels()
	}

	pub fn contains(&self, state: &S) -> bool {
		self.index.contains(state)
	}

	pub fn index(&self) -> &StateIndex<S> {
		&self.index
	}

	pub fn transitions(&self) -> &TransitionMatrix {
		&self.transitions
	}

	/// Stored weight of the transition `from -> to`.
	pub fn weight(&self, from: &S, to: &S) -> Result<f64> {
		self.transitions.get(self.index.slot_of(from)?, self.index.slot_of(to)?)
	}

	/// Outgoing weights of `state`, indexed like `states()`.
	pub fn row(&self, state: &S) -> Result<&[f64]> {
		self.transitions.row(self.index.slot_of(state)?)
	}

	/// Trains the chain on an observed sequence.
	///
	/// Counts each consecutive pair `(observations[k - 1], observations[k])`
	/// once, in that direction. An empty sequence is a no-op.
	///
	/// # Parameters
	/// - `states`: explicit vocabulary (and slot order) to use instead of
	///   the observed labels.
	/// - `extend`: keep the current slots and only add new labels. The
	///   matrix is still rebuilt from zero.
	///
	/// # Errors
	/// `UnknownState` if an observation is missing from explicit `states`.
	/// The chain is left unchanged on error.
	pub fn fit(&mut self, observations: &[S], states: Option<&[S]>, extend: bool) -> Result<()> {
		if observations.is_empty() {
			return Ok(());
		}

		let (index, transitions) = ChainBuilder::prepare(&self.index, observations, states, extend)
			.count(observations)?
			.finish();
		self.index = index;
		self.transitions = transitions;
		Ok(())
	}

	/// Loads explicit weights from a `source -> [(destination, weight)]` mapping.
	///
	/// The vocabulary is prepared from the source labels (or `states`).
	/// Destinations must be sources too, or be supplied through `states` or
	/// an existing vocabulary in extend mode.
	///
	/// When `weighted` is set, each weight is multiplied by the length of its
	/// destination label.
	///
	/// # Errors
	/// - `UnknownState` for an unresolvable source or destination
	/// - `InvalidWeight` for negative, NaN or infinite weights
	///
	/// The chain is left unchanged on error.
	pub fn load<I, D>(&mut self, transitions: I, states: Option<&[S]>, extend: bool, weighted: bool) -> Result<()>
	where
		S: StateLength,
		I: IntoIterator<Item = (S, D)>,
		D: IntoIterator<Item = (S, f64)>,
	{
		let transitions: Vec<(S, Vec<(S, f64)>)> = transitions
			.into_iter()
			.map(|(from, destinations)| (from, destinations.into_iter().collect()))
			.collect();

		let (index, matrix) = ChainBuilder::prepare(&self.index, transitions.iter().map(|(from, _)| from), states, extend)
			.assign(&transitions, weighted)?
			.finish();
		self.index = index;
		self.transitions = matrix;
		Ok(())
	}

	/// Generates up to `length` states starting after `start`.
	///
	/// Uses the thread-local random generator.
	///
	/// # Parameters
	/// - `adjust`: on a dead end, return the states drawn so far instead of
	///   failing.
	///
	/// # Errors
	/// - `UnknownState` if `start` is unknown
	/// - `SamplingDeadEnd` on a dead end when `adjust` is false
	pub fn forward(&self, start: &S, length: usize, adjust: bool) -> Result<Vec<S>> {
		self.forward_with_rng(start, length, adjust, &mut rand::rng())
	}

	/// Same as `forward`, drawing from `rng`.
	pub fn forward_with_rng<R: Rng + ?Sized>(&self, start: &S, length: usize, adjust: bool, rng: &mut R) -> Result<Vec<S>> {
		let walk = self.walk_with_rng(start, length, rng)?;
		match walk.dead_end {
			Some((state, reason)) if !adjust => Err(ChainError::SamplingDeadEnd {
				state: format!("{state:?}"),
				source: reason,
			}),
			_ => Ok(walk.states),
		}
	}

	/// Walks up to `length` steps from `start`, reporting any dead end in
	/// the returned `Walk` instead of failing.
	pub fn walk(&self, start: &S, length: usize) -> Result<Walk<S>> {
		self.walk_with_rng(start, length, &mut rand::rng())
	}

	pub fn walk_with_rng<R: Rng + ?Sized>(&self, start: &S, length: usize, rng: &mut R) -> Result<Walk<S>> {
		sampler::walk(&self.index, &self.transitions, start, length, rng)
	}

	/// Returns a uniformly random known state, `None` if the chain is empty.
	pub fn random_state(&self) -> Option<&S> {
		self.index.labels().choose(&mut rand::rng())
	}

	/// Discards every state and weight.
	pub fn clear(&mut self) {
		debug!("clearing chain of {} states", self.index.len());
		self.index.clear();
		self.transitions = TransitionMatrix::zeroed(0);
	}

	/// Returns an independent deep copy.
	pub fn copy(&self) -> Self {
		self.clone()
	}
}
