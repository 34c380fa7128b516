use thiserror::Error;

/// Errors raised by training, generation and persistence.
///
/// An exhausted generation (no attempt reached the acceptance threshold)
/// is not an error: `Generator::generate` reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum SeedError {
	/// A caller-supplied value is outside its valid domain
	/// (`n == 0`, empty or too short training text, bad generation parameters).
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// Generation was requested against a model without any key
	/// that has a recorded successor.
	#[error("model is untrained: no key has a recorded successor")]
	ModelUntrained,

	/// Saving or loading a model failed.
	#[error(transparent)]
	Persistence(#[from] PersistenceError),
}

/// Failures at the `store` boundary.
#[derive(Error, Debug)]
pub enum PersistenceError {
	#[error("model I/O failed: {0}")]
	Io(#[from] std::io::Error),

	#[error("model JSON encoding failed: {0}")]
	Json(#[from] serde_json::Error),

	#[error("model binary encoding failed: {0}")]
	Binary(#[from] postcard::Error),

	/// The input does not start with the binary model tag.
	/// Usually a text-encoded file loaded as binary.
	#[error("not a binary model (bad magic bytes)")]
	BadMagic,

	/// The decoded mapping does not satisfy the model invariants.
	#[error("invalid model layout: {0}")]
	InvalidLayout(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeedError>;
