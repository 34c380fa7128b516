use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SeedError};
use super::generation_input::{FallbackPolicy, GenerationInput};
use super::transition_model::TransitionModel;

/// Default log target of a `Generator`.
pub const GENERATOR_LOG_TARGET: &str = "markov_seed::generator";

/// Random walk over a `TransitionModel`.
///
/// Each generator owns its random source and its log target, so several
/// generators with distinct seeds and sinks can coexist.
///
/// # Draw order
/// All randomness comes from the owned `rng`, consumed in this order:
/// - per attempt, one draw choosing the seed key (skipped with a start key)
/// - per step, one draw choosing a successor
/// - on a dead end, one draw per retried key, followed by one successor
///   draw when the key has successors
///
/// Two generators seeded alike produce identical output for equal models
/// and inputs.
#[derive(Debug)]
pub struct Generator<R: Rng = StdRng> {
	rng: R,
	log_target: String,
}

impl Default for Generator<StdRng> {
	fn default() -> Self {
		Self::new()
	}
}

impl Generator<StdRng> {
	/// Creates a generator seeded from OS entropy.
	pub fn new() -> Self {
		Self::with_rng(StdRng::from_os_rng())
	}

	/// Creates a reproducible generator.
	pub fn seeded(seed: u64) -> Self {
		Self::with_rng(StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Generator<R> {
	/// Creates a generator drawing from `rng`.
	pub fn with_rng(rng: R) -> Self {
		Self { rng, log_target: GENERATOR_LOG_TARGET.to_owned() }
	}

	/// Routes this generator's log records to `target`.
	pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
		self.log_target = target.into();
		self
	}

	/// Generates one seed of `input.length` characters.
	///
	/// # Behavior
	/// - Runs up to `input.max_attempts()` attempts. Each attempt picks a
	///   seed key, then walks `length - n` steps, applying
	///   `input.fallback_policy` on dead ends.
	/// - The first attempt accepted by `input.acceptance_policy()` wins and
	///   is truncated to `length` characters.
	/// - When `length <= n` the seed key itself (truncated) is returned.
	///
	/// # Returns
	/// - `Ok(Some(seed))` on success
	/// - `Ok(None)` when every attempt was rejected
	///
	/// # Errors
	/// Returns `ModelUntrained` if no key of `model` has a successor.
	pub fn generate(&mut self, model: &TransitionModel, input: &GenerationInput) -> Result<Option<String>> {
		let usable = model.usable_keys();
		if usable.is_empty() {
			log::error!(target: self.log_target.as_str(), "Generation failed: model is untrained");
			return Err(SeedError::ModelUntrained);
		}
		let keys: Vec<&str> = model.table().keys().map(String::as_str).collect();

		let start = match input.start_key.as_deref() {
			Some(key) if usable.contains(&key) => Some(key),
			Some(key) => {
				log::warn!(
					target: self.log_target.as_str(),
					"Start key {:?} has no transitions, using a random key",
					key
				);
				None
			}
			None => None,
		};

		for attempt in 1..=input.max_attempts() {
			let seed = match start {
				Some(key) => key,
				None => usable[self.rng.random_range(0..usable.len())],
			};

			let buffer = self.walk(model, input, seed, &keys);
			if input.acceptance_policy().accepts(buffer.len(), input.length) {
				let generated: String = buffer.into_iter().take(input.length).collect();
				log::info!(target: self.log_target.as_str(), "Generated seed: {}", generated);
				return Ok(Some(generated));
			}

			log::debug!(
				target: self.log_target.as_str(),
				"Attempt {} rejected: {} of {} characters",
				attempt,
				buffer.len(),
				input.length
			);
		}

		log::error!(
			target: self.log_target.as_str(),
			"Generation failed after {} attempts",
			input.max_attempts()
		);
		Ok(None)
	}

	/// Generates up to `count` seeds, skipping exhausted attempts.
	///
	/// # Errors
	/// Returns `ModelUntrained` if no key of `model` has a successor.
	pub fn generate_many(
		&mut self,
		model: &TransitionModel,
		input: &GenerationInput,
		count: usize,
	) -> Result<Vec<String>> {
		let mut seeds = Vec::with_capacity(count);
		for _ in 0..count {
			if let Some(seed) = self.generate(model, input)? {
				seeds.push(seed);
			}
		}
		Ok(seeds)
	}

	/// Runs the step loop of one attempt and returns its buffer.
	fn walk(&mut self, model: &TransitionModel, input: &GenerationInput, seed: &str, keys: &[&str]) -> Vec<char> {
		let n = model.n();
		let mut buffer: Vec<char> = seed.chars().collect();

		for _ in 0..input.length.saturating_sub(n) {
			let window: String = buffer[buffer.len() - n..].iter().collect();

			match model.successors(&window) {
				Some(successors) if !successors.is_empty() => {
					let next = successors[self.rng.random_range(0..successors.len())];
					log::debug!(target: self.log_target.as_str(), "{:?} -> {:?}", window, next);
					buffer.push(next);
				}
				_ => {
					log::warn!(target: self.log_target.as_str(), "Dead end: no transitions for key {:?}", window);
					match self.fallback(model, input, keys) {
						Some(next) => buffer.push(next),
						None => break,
					}
				}
			}
		}

		buffer
	}

	/// Produces the character that replaces a missing transition,
	/// or `None` when the walk must stop.
	fn fallback(&mut self, model: &TransitionModel, input: &GenerationInput, keys: &[&str]) -> Option<char> {
		if input.fallback_policy == FallbackPolicy::StopOnDeadEnd {
			return None;
		}

		for _ in 0..input.max_attempts() {
			let key = keys[self.rng.random_range(0..keys.len())];
			if let Some(successors) = model.successors(key) {
				if !successors.is_empty() {
					return Some(successors[self.rng.random_range(0..successors.len())]);
				}
			}
		}

		match input.fallback_policy {
			FallbackPolicy::FallbackCharacter => {
				log::warn!(
					target: self.log_target.as_str(),
					"No key with transitions found, using fallback character {:?}",
					input.fallback_char
				);
				Some(input.fallback_char)
			}
			_ => None,
		}
	}
}
