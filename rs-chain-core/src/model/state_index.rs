use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};
use super::label::Label;

/// Bidirectional mapping between state labels and dense slots.
///
/// Slots are the contiguous integers `0..len()`. `labels[slot]` is the
/// inverse of `slots[label]`.
///
/// # Invariants
/// - Exactly one entry per known label in each direction
/// - A slot, once assigned, never changes until the next `reset`
/// - `label_of(slot_of(x)) == x` for every known `x`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(bound(
	serialize = "S: Label + Serialize",
	deserialize = "S: Label + Deserialize<'de>"
))]
pub struct StateIndex<S: Label> {
	/// Label to slot.
	slots: HashMap<S, usize>,
	/// Slot to label, in slot order.
	labels: Vec<S>,
}

impl<S: Label> Default for StateIndex<S> {
	fn default() -> Self {
		Self { slots: HashMap::new(), labels: Vec::new() }
	}
}

impl<S: Label> StateIndex<S> {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds an index over the distinct labels, in first-appearance order.
	pub fn from_labels<I: IntoIterator<Item = S>>(labels: I) -> Self {
		let mut index = Self::new();
		index.extend(labels);
		index
	}

	/// Discards every slot and assigns `0..n` to the distinct labels.
	///
	/// Duplicates keep the slot of their first appearance.
	pub fn reset<I: IntoIterator<Item = S>>(&mut self, labels: I) {
		self.clear();
		self.extend(labels);
	}

	/// Appends a slot for every label not already known.
	///
	/// Existing slots are never reused or reordered. Returns the number of
	/// labels added.
	pub fn extend<I: IntoIterator<Item = S>>(&mut self, labels: I) -> usize {
		let before = self.labels.len();
		for label in labels {
			self.insert(label);
		}
		self.labels.len() - before
	}

	/// Returns the slot of `label`, adding it at the end if needed.
	pub fn insert(&mut self, label: S) -> usize {
		if let Some(slot) = self.slots.get(&label) {
			return *slot;
		}
		let slot = self.labels.len();
		self.slots.insert(label.clone(), slot);
		self.labels.push(label);
		slot
	}

	/// Returns the slot of a known label.
	///
	/// # Errors
	/// `UnknownState` if the label was never registered.
	pub fn slot_of(&self, label: &S) -> Result<usize> {
		self.slots.get(label).copied().ok_or_else(|| ChainError::unknown(label))
	}

	/// Returns the label stored at `slot`.
	///
	/// # Errors
	/// `InvalidSlot` if `slot >= len()`.
	pub fn label_of(&self, slot: usize) -> Result<&S> {
		self.labels.get(slot).ok_or(ChainError::InvalidSlot { slot, size: self.labels.len() })
	}

	pub fn contains(&self, label: &S) -> bool {
		self.slots.contains_key(label)
	}

	/// Labels in slot order.
	pub fn labels(&self) -> &[S] {
		&self.labels
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn clear(&mut self) {
		self.slots.clear();
		self.labels.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reset_assigns_dense_slots_in_order() {
		let mut index = StateIndex::new();
		index.reset(["b", "a", "b", "c"]);

		assert_eq!(index.labels(), &["b", "a", "c"]);
		assert_eq!(index.slot_of(&"b"), Ok(0));
		assert_eq!(index.slot_of(&"a"), Ok(1));
		assert_eq!(index.slot_of(&"c"), Ok(2));
	}

	#[test]
	fn reset_discards_previous_slots() {
		let mut index = StateIndex::from_labels(["x", "y"]);
		index.reset(["y", "z"]);

		assert_eq!(index.len(), 2);
		assert_eq!(index.slot_of(&"y"), Ok(0));
		assert!(!index.contains(&"x"));
	}

	#[test]
	fn extend_keeps_existing_slots() {
		let mut index = StateIndex::from_labels(["a", "b"]);
		let added = index.extend(["c", "a", "d"]);

		assert_eq!(added, 2);
		assert_eq!(index.slot_of(&"a"), Ok(0));
		assert_eq!(index.slot_of(&"b"), Ok(1));
		assert_eq!(index.slot_of(&"c"), Ok(2));
		assert_eq!(index.slot_of(&"d"), Ok(3));
	}

	#[test]
	fn lookups_are_inverse() {
		let index = StateIndex::from_labels(vec!['q', 'r', 's']);
		for label in ['q', 'r', 's'] {
			let slot = index.slot_of(&label).unwrap();
			assert_eq!(index.label_of(slot), Ok(&label));
		}
	}

	#[test]
	fn unknown_label_and_slot_fail() {
		let index = StateIndex::from_labels(["a"]);

		assert_eq!(index.slot_of(&"zz"), Err(ChainError::UnknownState("\"zz\"".to_owned())));
		assert_eq!(index.label_of(1), Err(ChainError::InvalidSlot { slot: 1, size: 1 }));
	}
}
