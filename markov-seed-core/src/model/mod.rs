//! Top-level module for the seed generation system.
//!
//! This module provides:
//! - The character n-gram transition table (`TransitionModel`)
//! - Corpus ingestion (`Trainer`)
//! - Model diagnostics (`ModelStats`)
//! - Generation parameters (`GenerationInput`)
//! - The randomized walk (`Generator`)

/// Random walk over a trained model, with dead-end fallback
/// and whole-attempt retry.
pub mod generator;

/// Generation parameters: length, attempt bound, fallback and
/// acceptance policies.
pub mod generation_input;

/// Diagnostics over a transition table.
pub mod stats;

/// Builds and extends models from text, strings or files.
pub mod trainer;

/// Fixed-width n-gram key → observed successors.
pub mod transition_model;
