use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// Dense `n x n` table of transition weights, stored row-major.
///
/// Cell `(i, j)` is the unnormalized weight of moving from slot `i` to
/// slot `j`. Rows are not required to sum to 1.
///
/// A row with no positive weight is a dead end.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TransitionMatrix {
	size: usize,
	weights: Vec<f64>,
}

impl TransitionMatrix {
	/// Creates an `n x n` matrix filled with zeros.
	pub fn zeroed(n: usize) -> Self {
		Self { size: n, weights: vec![0.0; n * n] }
	}

	/// Builds a matrix from rows.
	///
	/// # Errors
	/// `DimensionMismatch` if the rows do not form a square matrix.
	pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
		let size = rows.len();
		let mut weights = Vec::with_capacity(size * size);
		for row in rows {
			if row.len() != size {
				return Err(ChainError::DimensionMismatch { states: row.len(), rows: size });
			}
			weights.extend(row);
		}
		Ok(Self { size, weights })
	}

	/// Number of rows (and columns).
	pub fn size(&self) -> usize {
		self.size
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Increments cell `(i, j)` by one observation.
	pub fn accumulate(&mut self, i: usize, j: usize) -> Result<()> {
		let cell = self.cell(i, j)?;
		self.weights[cell] += 1.0;
		Ok(())
	}

	/// Overwrites cell `(i, j)` with `weight`.
	pub fn assign(&mut self, i: usize, j: usize, weight: f64) -> Result<()> {
		let cell = self.cell(i, j)?;
		self.weights[cell] = weight;
		Ok(())
	}

	pub fn get(&self, i: usize, j: usize) -> Result<f64> {
		Ok(self.weights[self.cell(i, j)?])
	}

	/// Outgoing weights of slot `i`, indexed by destination slot.
	pub fn row(&self, i: usize) -> Result<&[f64]> {
		self.check(i)?;
		Ok(&self.weights[i * self.size..(i + 1) * self.size])
	}

	/// Iterates over the rows in slot order.
	pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
		// chunks(0) panics
		self.weights.chunks(self.size.max(1))
	}

	fn check(&self, slot: usize) -> Result<()> {
		if slot < self.size {
			Ok(())
		} else {
			Err(ChainError::InvalidSlot { slot, size: self.size })
		}
	}

	fn cell(&self, i: usize, j: usize) -> Result<usize> {
		self.check(i)?;
		self.check(j)?;
		Ok(i * self.size + j)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zeroed_is_square() {
		let matrix = TransitionMatrix::zeroed(3);

		assert_eq!(matrix.size(), 3);
		assert_eq!(matrix.rows().count(), 3);
		assert!(matrix.rows().all(|row| row == [0.0, 0.0, 0.0]));
	}

	#[test]
	fn empty_matrix_has_no_rows() {
		let matrix = TransitionMatrix::zeroed(0);

		assert!(matrix.is_empty());
		assert_eq!(matrix.rows().count(), 0);
		assert_eq!(matrix.row(0), Err(ChainError::InvalidSlot { slot: 0, size: 0 }));
	}

	#[test]
	fn accumulate_is_additive() {
		let mut matrix = TransitionMatrix::zeroed(2);
		matrix.accumulate(0, 1).unwrap();
		matrix.accumulate(0, 1).unwrap();
		matrix.accumulate(1, 0).unwrap();

		assert_eq!(matrix.row(0).unwrap(), &[0.0, 2.0]);
		assert_eq!(matrix.row(1).unwrap(), &[1.0, 0.0]);
	}

	#[test]
	fn assign_overwrites() {
		let mut matrix = TransitionMatrix::zeroed(2);
		matrix.accumulate(1, 1).unwrap();
		matrix.assign(1, 1, 0.25).unwrap();

		assert_eq!(matrix.get(1, 1), Ok(0.25));
	}

	#[test]
	fn out_of_range_cells_fail() {
		let mut matrix = TransitionMatrix::zeroed(2);

		assert_eq!(matrix.accumulate(2, 0), Err(ChainError::InvalidSlot { slot: 2, size: 2 }));
		assert_eq!(matrix.assign(0, 5, 1.0), Err(ChainError::InvalidSlot { slot: 5, size: 2 }));
	}

	#[test]
	fn from_rows_rejects_ragged_input() {
		let matrix = TransitionMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
		assert_eq!(matrix.get(1, 0), Ok(2.0));

		let ragged = TransitionMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0]]);
		assert_eq!(ragged, Err(ChainError::DimensionMismatch { states: 1, rows: 2 }));
	}
}
