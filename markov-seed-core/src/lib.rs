//! Character-level n-gram seed generation library.
//!
//! Trains a transition model on a corpus and walks it at random to produce
//! short pseudo-random strings ("seeds") for test fixtures, non-secret
//! identifiers or synthetic data.
//!
//! **Not cryptographically secure.**
//!
//! This crate provides:
//! - Text normalization shared by training and lookup
//! - An append-only transition model and its trainer
//! - A seeded generator with configurable fallback and acceptance policies
//! - JSON and binary persistence of trained models

/// Error taxonomy and crate `Result` alias.
pub mod error;

/// Core model, training and generation.
pub mod model;

/// Text canonicalization applied before windowing.
pub mod normalize;

/// Save / load of trained models.
pub mod store;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{PersistenceError, Result, SeedError};
pub use model::generation_input::{AcceptancePolicy, FallbackPolicy, GenerationInput};
pub use model::generator::Generator;
pub use model::stats::ModelStats;
pub use model::trainer::Trainer;
pub use model::transition_model::TransitionModel;
pub use store::Encoding;
