//! Top-level module for the Markov chain engine.
//!
//! - Label capabilities (`Label`, `StateLength`)
//! - Dense label/slot mapping (`StateIndex`)
//! - Dense weight storage (`TransitionMatrix`)
//! - Vocabulary and weight construction (`ChainBuilder`)
//! - Weighted forward generation (`sampler`)
//! - The externally visible aggregate (`Chain`)

/// High-level chain facade.
///
/// Owns one index and one matrix; exposes fit, load, forward, clear and copy.
pub mod chain;

/// Capability bounds required from state labels.
pub mod label;

/// Bidirectional mapping between labels and dense slots.
pub mod state_index;

/// Dense `n x n` transition weight table.
pub mod transition_matrix;

/// Builds a new index/matrix pair from observations or explicit weights.
///
/// Used internally by `Chain::fit` and `Chain::load`.
mod builder;

/// Weighted categorical draws and forward walks.
pub mod sampler;
