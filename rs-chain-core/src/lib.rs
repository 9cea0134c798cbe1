//! Weighted first-order Markov chain over an arbitrary discrete alphabet.
//!
//! This crate provides:
//! - A dense, stable state index (label <-> slot)
//! - A dense transition weight matrix
//! - Training from observed sequences (frequency counting)
//! - Loading from explicit nested weight mappings
//! - Stochastic forward generation with dead-end handling
//!
//! The high-level entry point is [`model::chain::Chain`].

/// Error types shared by every chain operation.
pub mod error;

/// Chain model: index, matrix, builder, sampler and facade.
pub mod model;

pub use error::{ChainError, Result};
pub use model::chain::Chain;
pub use model::label::{Label, StateLength};
pub use model::sampler::{SampleError, Walk};
