use std::collections::BTreeMap;

use crate::error::{PersistenceError, Result, SeedError};
use super::stats::ModelStats;

/// Character-level n-gram transition model.
///
/// Maps every key of exactly `n` characters to the characters observed
/// right after it in the training text.
///
/// # Responsibilities
/// - Hold the transition table built by the `Trainer`
/// - Expose read access for the `Generator` and the `store`
/// - Validate tables coming from storage
///
/// # Invariants
/// - `n` is always >= 1
/// - Every key has exactly `n` characters (not bytes)
/// - Successor lists keep observation order; duplicates encode frequency
/// - Successor lists are non-empty after training. A loaded model may hold
///   empty lists, the generator treats them as dead ends
///
/// The table is a `BTreeMap` so that key iteration order, and with it every
/// random draw indexed over keys, does not depend on the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionModel {
	/// Window width.
	n: usize,

	/// Key (n characters) -> observed successors.
	table: BTreeMap<String, Vec<char>>,
}

impl TransitionModel {
	/// Creates an empty model with window width `n`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `n == 0`.
	pub fn new(n: usize) -> Result<Self> {
		if n == 0 {
			log::error!("Model creation failed: n must be a positive integer");
			return Err(SeedError::InvalidArgument("n must be a positive integer".to_owned()));
		}
		Ok(Self { n, table: BTreeMap::new() })
	}

	/// Builds a model from a decoded table, checking the key-length invariant.
	///
	/// This is the single validation path used by every storage encoding.
	///
	/// # Errors
	/// - `InvalidArgument` if `n == 0`
	/// - `Persistence(InvalidLayout)` if a key does not have exactly `n` characters
	pub fn from_table(n: usize, table: BTreeMap<String, Vec<char>>) -> Result<Self> {
		let mut model = Self::new(n)?;
		if let Some(bad) = table.keys().find(|key| key.chars().count() != n) {
			return Err(PersistenceError::InvalidLayout(format!(
				"key {:?} has {} characters, expected {}",
				bad,
				bad.chars().count(),
				n
			))
			.into());
		}
		model.table = table;
		Ok(model)
	}

	/// Window width.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Read-only view of the transition table.
	pub fn table(&self) -> &BTreeMap<String, Vec<char>> {
		&self.table
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// `true` when no key has been recorded.
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Successors observed after `key`, `None` if the key is unknown.
	pub fn successors(&self, key: &str) -> Option<&[char]> {
		self.table.get(key).map(Vec::as_slice)
	}

	/// Keys with at least one successor, in table order.
	pub fn usable_keys(&self) -> Vec<&str> {
		self.table
			.iter()
			.filter(|(_, successors)| !successors.is_empty())
			.map(|(key, _)| key.as_str())
			.collect()
	}

	/// Computes diagnostics over the current table.
	pub fn stats(&self) -> ModelStats {
		ModelStats::from_table(&self.table)
	}

	/// Clears every recorded transition. `n` is kept.
	pub fn reset(&mut self) {
		self.table.clear();
		log::info!("Model reset");
	}

	/// Records one observation of `next` following `key`.
	///
	/// `key` must already hold exactly `n` characters.
	pub(crate) fn observe(&mut self, key: String, next: char) {
		self.table.entry(key).or_default().push(next);
	}

	/// Appends another table's observations after the existing ones, per key.
	pub(crate) fn append_table(&mut self, other: BTreeMap<String, Vec<char>>) {
		for (key, successors) in other {
			self.table.entry(key).or_default().extend(successors);
		}
	}
}
