//! End-to-end properties of training and generation.

use std::io::Write;

use markov_seed_core::{GenerationInput, Generator, SeedError, Trainer, TransitionModel};
use tempfile::NamedTempFile;

const CORPUS: &str = "
	abcdefghijklmnopqrstuvwxyz
	ABCDEFGHIJKLMNOPQRSTUVWXYZ
	0123456789!@#$%^&*()
	Lorem ipsum dolor sit amet
	The quick brown fox jumps
";

#[test]
fn every_key_has_n_characters() {
	for n in 1..=5 {
		let mut model = TransitionModel::new(n).unwrap();
		Trainer::new().extend(&mut model, CORPUS, 3).unwrap();
		assert!(model.table().keys().all(|key| key.chars().count() == n));
		assert!(model.table().values().all(|successors| !successors.is_empty()));
	}
}

#[test]
fn generated_seeds_have_exact_length() {
	let mut model = TransitionModel::new(3).unwrap();
	Trainer::new().extend(&mut model, CORPUS, 3).unwrap();

	let mut generator = Generator::seeded(2024);
	let input = GenerationInput::new(16);
	for seed in generator.generate_many(&model, &input, 20).unwrap() {
		assert_eq!(seed.chars().count(), 16);
	}
}

#[test]
fn independent_generators_are_reproducible() {
	let mut model = TransitionModel::new(2).unwrap();
	Trainer::new().extend(&mut model, CORPUS, 0).unwrap();
	let input = GenerationInput::new(24);

	let mut a = Generator::seeded(1).with_log_target("seeds::a");
	let mut b = Generator::seeded(2).with_log_target("seeds::b");
	let mut a_again = Generator::seeded(1);

	let from_a: Vec<_> = (0..5).map(|_| a.generate(&model, &input).unwrap()).collect();
	let _ = b.generate(&model, &input).unwrap();
	let from_a_again: Vec<_> = (0..5).map(|_| a_again.generate(&model, &input).unwrap()).collect();

	assert_eq!(from_a, from_a_again);
}

#[test]
fn extend_twice_equals_extend_once_per_key_multiset() {
	let first = "hello there general kenobi";
	let second = "you are a bold one indeed";

	let trainer = Trainer::new();
	let mut split = TransitionModel::new(2).unwrap();
	trainer.extend(&mut split, first, 0).unwrap();
	trainer.extend(&mut split, second, 0).unwrap();

	let mut separate_a = TransitionModel::new(2).unwrap();
	trainer.extend(&mut separate_a, first, 0).unwrap();
	let mut separate_b = TransitionModel::new(2).unwrap();
	trainer.extend(&mut separate_b, second, 0).unwrap();

	for (key, successors) in split.table() {
		let mut expected: Vec<char> = separate_a.successors(key).unwrap_or_default().to_vec();
		expected.extend_from_slice(separate_b.successors(key).unwrap_or_default());
		let mut actual = successors.clone();
		expected.sort_unstable();
		actual.sort_unstable();
		assert_eq!(actual, expected, "key {:?}", key);
	}
	assert_eq!(split.stats().total_transitions, separate_a.stats().total_transitions + separate_b.stats().total_transitions);
}

#[test]
fn generate_before_training_is_untrained() {
	let model = TransitionModel::new(3).unwrap();
	let err = Generator::new().generate(&model, &GenerationInput::default()).unwrap_err();
	assert!(matches!(err, SeedError::ModelUntrained));
}

#[test]
fn reset_then_generate_is_untrained() {
	let mut model = TransitionModel::new(2).unwrap();
	Trainer::new().extend(&mut model, CORPUS, 0).unwrap();
	model.reset();
	let err = Generator::seeded(0).generate(&model, &GenerationInput::default()).unwrap_err();
	assert!(matches!(err, SeedError::ModelUntrained));
}

#[test]
fn training_from_file_matches_training_from_text() {
	let mut file = NamedTempFile::new().unwrap();
	write!(file, "{}", CORPUS.repeat(50)).unwrap();

	let trainer = Trainer::new();
	let mut from_file = TransitionModel::new(3).unwrap();
	trainer.extend_from_file(&mut from_file, file.path(), 0).unwrap();

	let mut from_text = TransitionModel::new(3).unwrap();
	trainer.extend(&mut from_text, &CORPUS.repeat(50), 0).unwrap();

	assert_eq!(from_file, from_text);
}

#[test]
fn training_from_missing_file_fails() {
	let mut model = TransitionModel::new(3).unwrap();
	let err = Trainer::new().extend_from_file(&mut model, "/nonexistent/corpus.txt", 0).unwrap_err();
	assert!(matches!(err, SeedError::Persistence(_)));
}
