use std::collections::BTreeMap;
use std::fmt;

/// Summary of a transition table.
///
/// Useful to check a corpus produced enough transitions before
/// generating, and to spot dead ends after loading a model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelStats {
	/// Number of keys.
	pub ngrams: usize,
	/// Sum of all successor list lengths.
	pub total_transitions: usize,
	/// `total_transitions / ngrams`, 0.0 for an empty table.
	pub avg_transitions: f64,
	/// Longest successor list.
	pub max_transitions: usize,
	/// Shortest successor list, `None` for an empty table.
	pub min_transitions: Option<usize>,
	/// Keys with an empty successor list.
	pub dead_ends: usize,
}

impl ModelStats {
	pub(crate) fn from_table(table: &BTreeMap<String, Vec<char>>) -> Self {
		let mut stats = Self {
			ngrams: table.len(),
			total_transitions: 0,
			avg_transitions: 0.0,
			max_transitions: 0,
			min_transitions: None,
			dead_ends: 0,
		};

		for successors in table.values() {
			let count = successors.len();
			stats.total_transitions += count;
			stats.max_transitions = stats.max_transitions.max(count);
			stats.min_transitions = Some(stats.min_transitions.map_or(count, |min| min.min(count)));
			if count == 0 {
				stats.dead_ends += 1;
			}
		}

		if stats.ngrams > 0 {
			stats.avg_transitions = stats.total_transitions as f64 / stats.ngrams as f64;
		}

		stats
	}
}

impl fmt::Display for ModelStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "N-grams: {}", self.ngrams)?;
		writeln!(f, "Total transitions: {}", self.total_transitions)?;
		writeln!(f, "Average transitions: {:.2}", self.avg_transitions)?;
		writeln!(f, "Max transitions: {}", self.max_transitions)?;
		match self.min_transitions {
			Some(min) => writeln!(f, "Min transitions: {}", min)?,
			None => writeln!(f, "Min transitions: -")?,
		}
		writeln!(f, "Dead ends: {}", self.dead_ends)?;
		Ok(())
	}
}
