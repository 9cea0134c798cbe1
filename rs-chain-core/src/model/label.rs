use std::fmt::Debug;
use std::hash::Hash;

/// Capability bound for chain states.
///
/// Any equality-comparable, hashable, cloneable type is a label.
/// `Debug` is required so errors can name the offending label.
pub trait Label: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Label for T {}

/// Length of a label, used to scale weights in weighted loading.
///
/// Strings count Unicode scalar values, sequences count elements.
pub trait StateLength {
	fn state_len(&self) -> usize;
}

impl StateLength for str {
	fn state_len(&self) -> usize {
		self.chars().count()
	}
}

impl StateLength for String {
	fn state_len(&self) -> usize {
		self.as_str().state_len()
	}
}

impl StateLength for char {
	fn state_len(&self) -> usize {
		1
	}
}

impl<T> StateLength for [T] {
	fn state_len(&self) -> usize {
		self.len()
	}
}

impl<T> StateLength for Vec<T> {
	fn state_len(&self) -> usize {
		self.len()
	}
}

impl<T, const N: usize> StateLength for [T; N] {
	fn state_len(&self) -> usize {
		N
	}
}

impl<T: StateLength + ?Sized> StateLength for &T {
	fn state_len(&self) -> usize {
		(**self).state_len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn string_length_counts_chars() {
		assert_eq!("abc".state_len(), 3);
		assert_eq!(String::from("été").state_len(), 3);
		assert_eq!(&"bbb".state_len(), &3);
	}

	#[test]
	fn sequence_length_counts_elements() {
		assert_eq!(vec![1, 2].state_len(), 2);
		assert_eq!(['A', 'T', 'G'].state_len(), 3);
		assert_eq!('x'.state_len(), 1);
	}
}
