use std::collections::BTreeMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use crate::error::{PersistenceError, Result, SeedError};
use crate::io::read_text;
use crate::normalize::{normalize, strip_control};
use super::transition_model::TransitionModel;

/// Default log target of a `Trainer`.
pub const TRAINER_LOG_TARGET: &str = "markov_seed::trainer";

/// Chunks per CPU for parallel training.
const CHUNK_FACTOR: usize = 8;

/// Below this many windows per chunk, threads cost more than they save.
const MIN_WINDOWS_PER_CHUNK: usize = 64;

/// Builds and extends `TransitionModel`s from text.
///
/// # Responsibilities
/// - Normalize the corpus (and optionally strip control characters)
/// - Validate the corpus is long enough for the requested transitions
/// - Append every observed `key -> next` transition to the model
///
/// Training is append-only: calling `extend` several times accumulates
/// statistics from every corpus.
#[derive(Clone, Debug)]
pub struct Trainer {
	/// Target used for every log record emitted by this trainer.
	log_target: String,

	/// Remove control characters before normalizing.
	pub strip_control: bool,
}

impl Default for Trainer {
	fn default() -> Self {
		Self { log_target: TRAINER_LOG_TARGET.to_owned(), strip_control: false }
	}
}

impl Trainer {
	/// Creates a trainer logging under `TRAINER_LOG_TARGET`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Routes this trainer's log records to `target`.
	pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
		self.log_target = target.into();
		self
	}

	/// Adds the transitions of `text` to `model`.
	///
	/// For each start index `i` of the normalized text, the key is the
	/// `n` characters starting at `i` and the successor is the character
	/// at `i + n`.
	///
	/// # Errors
	/// - `InvalidArgument` if the normalized text is empty
	/// - `InvalidArgument` if it has fewer than `n + min_transitions` characters
	pub fn extend(&self, model: &mut TransitionModel, text: &str, min_transitions: usize) -> Result<()> {
		let chars = self.prepare(model.n(), text, min_transitions)?;
		let n = model.n();

		for i in 0..chars.len() - n {
			let key: String = chars[i..i + n].iter().collect();
			model.observe(key, chars[i + n]);
		}

		self.log_trained(model);
		Ok(())
	}

	/// Adds the transitions of several lines, joined by a single space.
	///
	/// Equivalent to training on the lines joined by newlines, since the
	/// normalizer collapses line breaks anyway.
	pub fn extend_lines<S: AsRef<str>>(
		&self,
		model: &mut TransitionModel,
		lines: &[S],
		min_transitions: usize,
	) -> Result<()> {
		let text = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
		self.extend(model, &text, min_transitions)
	}

	/// Reads a corpus file and trains on it with `extend_parallel`.
	///
	/// # Errors
	/// - `Persistence(Io)` if the file cannot be read
	/// - Same validation errors as `extend`
	pub fn extend_from_file<P: AsRef<Path>>(
		&self,
		model: &mut TransitionModel,
		path: P,
		min_transitions: usize,
	) -> Result<()> {
		let path = path.as_ref();
		log::info!(target: self.log_target.as_str(), "Training from file: {}", path.display());
		let text = read_text(path).map_err(|e| {
			log::error!(target: self.log_target.as_str(), "Training failed: cannot read {}: {}", path.display(), e);
			SeedError::from(PersistenceError::from(e))
		})?;
		self.extend_parallel(model, &text, min_transitions)
	}

	/// Same result as `extend`, with the windows split across threads.
	///
	/// # Behavior
	/// - Splits the window range into `cpus * CHUNK_FACTOR` chunks.
	/// - Each thread builds a partial table for its chunk.
	/// - Partial tables come back over a channel tagged with their chunk
	///   index and are appended in chunk order, so successor order per key
	///   is the same as a sequential build.
	/// - Small corpora are built on the calling thread.
	pub fn extend_parallel(&self, model: &mut TransitionModel, text: &str, min_transitions: usize) -> Result<()> {
		let chars = self.prepare(model.n(), text, min_transitions)?;
		let n = model.n();
		let windows = chars.len() - n;

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		if windows < chunks * MIN_WINDOWS_PER_CHUNK {
			model.append_table(observe_windows(&chars, n));
		} else {
			model.append_table(self.observe_chunked(&chars, n, chunks));
		}

		self.log_trained(model);
		Ok(())
	}

	/// Builds the table of every window of `chars` on `chunks` threads.
	///
	/// Partial tables are appended in chunk order, so the result equals
	/// `observe_windows(chars, n)`.
	fn observe_chunked(&self, chars: &[char], n: usize, chunks: usize) -> BTreeMap<String, Vec<char>> {
		let windows = chars.len().saturating_sub(n);
		if windows == 0 || chunks == 0 {
			return BTreeMap::new();
		}

		let chunk_size = windows.div_ceil(chunks);
		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (index, start) in (0..windows).step_by(chunk_size).enumerate() {
			let end = (start + chunk_size).min(windows);
			// A chunk owns its windows plus the n trailing successor characters
			let slice: Vec<char> = chars[start..end + n].to_vec();
			let tx = tx.clone();

			thread::spawn(move || {
				let partial = observe_windows(&slice, n);
				// The receiver only goes away if training already gave up
				let _ = tx.send((index, partial));
			});
			spawned += 1;
		}
		drop(tx);

		let mut partials: Vec<(usize, BTreeMap<String, Vec<char>>)> = rx.iter().collect();
		if partials.len() != spawned {
			log::warn!(
				target: self.log_target.as_str(),
				"Parallel training lost {} of {} chunks, retrying sequentially",
				spawned - partials.len(),
				spawned
			);
			return observe_windows(chars, n);
		}

		partials.sort_by_key(|(index, _)| *index);
		let mut table: BTreeMap<String, Vec<char>> = BTreeMap::new();
		for (_, partial) in partials {
			for (key, successors) in partial {
				table.entry(key).or_default().extend(successors);
			}
		}
		table
	}

	/// Cleans and validates a corpus, returning its characters.
	fn prepare(&self, n: usize, text: &str, min_transitions: usize) -> Result<Vec<char>> {
		let cleaned = if self.strip_control { strip_control(text) } else { text.to_owned() };
		let chars: Vec<char> = normalize(&cleaned).chars().collect();

		if chars.is_empty() {
			log::error!(target: self.log_target.as_str(), "Training failed: input text is empty");
			return Err(SeedError::InvalidArgument("training text cannot be empty".to_owned()));
		}

		let required = n + min_transitions;
		if chars.len() < required {
			log::error!(
				target: self.log_target.as_str(),
				"Training failed: text (len={}) is shorter than n + min_transitions ({})",
				chars.len(),
				required
			);
			return Err(SeedError::InvalidArgument(format!(
				"text has {} characters, at least {} required (n={}, min_transitions={})",
				chars.len(),
				required,
				n,
				min_transitions
			)));
		}

		Ok(chars)
	}

	fn log_trained(&self, model: &TransitionModel) {
		log::info!(target: self.log_target.as_str(), "Model trained. Keys: {}", model.len());
	}
}

/// Builds the table of every window of `chars`.
fn observe_windows(chars: &[char], n: usize) -> BTreeMap<String, Vec<char>> {
	let mut table: BTreeMap<String, Vec<char>> = BTreeMap::new();
	for window in chars.windows(n + 1) {
		let key: String = window[..n].iter().collect();
		table.entry(key).or_default().push(window[n]);
	}
	table
}

#[cfg(test)]
mod tests {
	use super::*;

	fn model(n: usize) -> TransitionModel {
		TransitionModel::new(n).unwrap()
	}

	#[test]
	fn repeating_pattern_has_single_successors() {
		let mut m = model(2);
		Trainer::new().extend(&mut m, "abcabcabcabc", 0).unwrap();
		assert!(m.successors("ab").unwrap().iter().all(|&c| c == 'c'));
		assert!(m.successors("bc").unwrap().iter().all(|&c| c == 'a'));
		assert!(m.successors("ca").unwrap().iter().all(|&c| c == 'b'));
		assert_eq!(m.len(), 3);
	}

	#[test]
	fn minimal_corpus_yields_one_transition() {
		let mut m = model(3);
		Trainer::new().extend(&mut m, "abcd", 0).unwrap();
		assert_eq!(m.len(), 1);
		assert_eq!(m.successors("abc"), Some(&['d'][..]));
	}

	#[test]
	fn text_of_exactly_n_is_accepted_without_transitions() {
		let mut m = model(3);
		Trainer::new().extend(&mut m, "abc", 0).unwrap();
		assert!(m.is_empty());
	}

	#[test]
	fn empty_text_is_rejected() {
		let mut m = model(2);
		let err = Trainer::new().extend(&mut m, " \n\t ", 0).unwrap_err();
		assert!(matches!(err, SeedError::InvalidArgument(_)));
	}

	#[test]
	fn short_text_is_rejected_with_min_transitions() {
		let mut m = model(3);
		let err = Trainer::new().extend(&mut m, "abcdef", 5).unwrap_err();
		assert!(matches!(err, SeedError::InvalidArgument(_)));
		assert!(m.is_empty());
	}

	#[test]
	fn training_normalizes_input() {
		let mut m = model(2);
		Trainer::new().extend(&mut m, "AB\n\n  CD", 0).unwrap();
		assert_eq!(m.successors("ab"), Some(&[' '][..]));
		assert_eq!(m.successors("b "), Some(&['c'][..]));
		assert_eq!(m.successors(" c"), Some(&['d'][..]));
	}

	#[test]
	fn strip_control_removes_control_characters() {
		let mut m = model(2);
		let trainer = Trainer { strip_control: true, ..Trainer::default() };
		trainer.extend(&mut m, "a\u{1}bc", 0).unwrap();
		assert_eq!(m.successors("ab"), Some(&['c'][..]));
	}

	#[test]
	fn extend_accumulates() {
		let mut m = model(1);
		let trainer = Trainer::new();
		trainer.extend(&mut m, "ab", 0).unwrap();
		trainer.extend(&mut m, "ac", 0).unwrap();
		assert_eq!(m.successors("a"), Some(&['b', 'c'][..]));
	}

	#[test]
	fn extend_lines_joins_with_space() {
		let mut m = model(1);
		Trainer::new().extend_lines(&mut m, &["ab", "c"], 0).unwrap();
		assert_eq!(m.successors("b"), Some(&[' '][..]));
		assert_eq!(m.successors(" "), Some(&['c'][..]));
	}

	#[test]
	fn parallel_matches_sequential() {
		let corpus = "the quick brown fox jumps over the lazy dog. ".repeat(2_000);
		let trainer = Trainer::new();

		let mut sequential = model(3);
		trainer.extend(&mut sequential, &corpus, 0).unwrap();

		let mut parallel = model(3);
		trainer.extend_parallel(&mut parallel, &corpus, 0).unwrap();

		assert_eq!(sequential, parallel);
	}

	#[test]
	fn chunked_build_matches_sequential_for_any_chunk_count() {
		let chars: Vec<char> = normalize("abracadabra alakazam abracadabra hocus pocus").chars().collect();
		let trainer = Trainer::new();
		for n in 1..=3 {
			let expected = observe_windows(&chars, n);
			for chunks in [1, 2, 3, 7, 64] {
				assert_eq!(trainer.observe_chunked(&chars, n, chunks), expected, "n={} chunks={}", n, chunks);
			}
		}
	}

	#[test]
	fn chunked_build_of_short_input_is_empty() {
		assert!(Trainer::new().observe_chunked(&['a', 'b'], 2, 4).is_empty());
	}

	#[test]
	fn observe_windows_skips_short_input() {
		assert!(observe_windows(&['a', 'b'], 2).is_empty());
	}
}
