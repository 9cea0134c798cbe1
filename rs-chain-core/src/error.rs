//! Error types for chain operations.

use thiserror::Error;

use crate::model::sampler::SampleError;

/// Main error type for chain operations.
///
/// Labels are generic, so they are carried in their `Debug` rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
	#[error("Unknown state: {0}")]
	UnknownState(String),

	#[error("Slot {slot} out of range for {size} states")]
	InvalidSlot { slot: usize, size: usize },

	#[error("Dead end at state {state}: {source}")]
	SamplingDeadEnd {
		state: String,
		#[source]
		source: SampleError,
	},

	#[error("Invalid weight {weight} for transition {from} -> {to}")]
	InvalidWeight { from: String, to: String, weight: f64 },

	#[error("Dimension mismatch: {states} states but a {rows}x{rows} matrix")]
	DimensionMismatch { states: usize, rows: usize },
}

impl ChainError {
	pub(crate) fn unknown<S: std::fmt::Debug>(label: &S) -> Self {
		ChainError::UnknownState(format!("{label:?}"))
	}
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
