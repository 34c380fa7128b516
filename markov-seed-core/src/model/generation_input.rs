use crate::error::{Result, SeedError};

/// What the generator does when the current window has no successor.
///
/// # Variants
/// - `StopOnDeadEnd`: end the walk; the attempt is judged on what it has.
/// - `RetryRandomKey`: draw up to `max_attempts` random keys and continue
///   from the first one with successors; end the walk if none is found.
/// - `FallbackCharacter`: like `RetryRandomKey`, but append the fallback
///   character when no key is found, so the buffer keeps growing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
	StopOnDeadEnd,
	RetryRandomKey,
	#[default]
	FallbackCharacter,
}

/// When a finished attempt is accepted.
///
/// # Variants
/// - `ExactLength`: the buffer must reach the requested length.
/// - `Threshold(ratio)`: the buffer must reach `ratio * length` characters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AcceptancePolicy {
	ExactLength,
	Threshold(f64),
}

impl Default for AcceptancePolicy {
	fn default() -> Self {
		AcceptancePolicy::Threshold(DEFAULT_ACCEPT_RATIO)
	}
}

impl AcceptancePolicy {
	/// Returns whether a buffer of `produced` characters satisfies the policy.
	pub fn accepts(&self, produced: usize, length: usize) -> bool {
		match self {
			AcceptancePolicy::ExactLength => produced >= length,
			AcceptancePolicy::Threshold(ratio) => produced as f64 >= length as f64 * ratio,
		}
	}
}

/// Share of the requested length an attempt must reach by default.
pub const DEFAULT_ACCEPT_RATIO: f64 = 0.8;

/// Parameters of a `Generator::generate` call.
///
/// # Invariants
/// - `max_attempts` is always >= 1
/// - A `Threshold` ratio is always in `(0.0, 1.0]`
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInput {
	/// Number of characters of the produced seed.
	pub length: usize,

	/// Character appended by `FallbackPolicy::FallbackCharacter`
	/// when no random key can be found.
	pub fallback_char: char,

	/// Dead-end behavior.
	pub fallback_policy: FallbackPolicy,

	/// Optional key to start from instead of a random one.
	/// Ignored (with a warning) when it is not a key with successors.
	pub start_key: Option<String>,

	/// Bound of both the attempt loop and the dead-end key retries.
	max_attempts: usize,

	/// Attempt acceptance rule.
	acceptance_policy: AcceptancePolicy,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			length: 12,
			fallback_char: ' ',
			fallback_policy: FallbackPolicy::default(),
			start_key: None,
			max_attempts: 10,
			acceptance_policy: AcceptancePolicy::default(),
		}
	}
}

impl GenerationInput {
	/// Default input for seeds of `length` characters.
	pub fn new(length: usize) -> Self {
		Self { length, ..Self::default() }
	}

	/// Returns the attempt bound.
	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	/// Returns the acceptance rule.
	pub fn acceptance_policy(&self) -> AcceptancePolicy {
		self.acceptance_policy
	}

	/// Sets the attempt bound.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_attempts == 0`.
	pub fn set_max_attempts(&mut self, max_attempts: usize) -> Result<()> {
		if max_attempts == 0 {
			return Err(SeedError::InvalidArgument("max_attempts must be >= 1".to_owned()));
		}
		self.max_attempts = max_attempts;
		Ok(())
	}

	/// Sets the acceptance rule.
	///
	/// # Errors
	/// Returns `InvalidArgument` if a threshold ratio is outside `(0.0, 1.0]`.
	pub fn set_acceptance_policy(&mut self, policy: AcceptancePolicy) -> Result<()> {
		if let AcceptancePolicy::Threshold(ratio) = policy {
			if !(ratio > 0.0 && ratio <= 1.0) {
				return Err(SeedError::InvalidArgument(format!(
					"acceptance ratio must be in (0.0, 1.0], got {}",
					ratio
				)));
			}
		}
		self.acceptance_policy = policy;
		Ok(())
	}
}
