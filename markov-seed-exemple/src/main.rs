use env_logger::Env;
use markov_seed_core::store::{self, Encoding};
use markov_seed_core::{FallbackPolicy, GenerationInput, Generator, Trainer, TransitionModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr, "info" unless RUST_LOG says otherwise
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let training_text = "
        ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>/?
        The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs.
        Lorem ipsum dolor sit amet
    ";

    // Write the corpus to disk, models are saved next to it
    let corpus_path = std::env::temp_dir().join("markov_corpus.txt");
    std::fs::write(&corpus_path, training_text)?;

    // Window width: each key is 3 characters long
    let mut model = TransitionModel::new(3)?;

    // Require the corpus to provide at least 3 transitions
    Trainer::new().extend_from_file(&mut model, &corpus_path, 3)?;

    println!("Model statistics:\n{}", model.stats());

    // Fixed seed: the same run prints the same seeds
    let mut generator = Generator::seeded(42);

    // 16 characters, at most 10 attempts, space as fallback character
    let mut input = GenerationInput::new(16);
    input.set_max_attempts(10)?;
    input.fallback_policy = FallbackPolicy::FallbackCharacter;

    // An exhausted generation is not an error, just no seed
    for i in 0..5 {
        match generator.generate(&model, &input)? {
            Some(seed) => println!("Seed {}: {:?}", i + 1, seed),
            None => log::warn!("Seed {}: no seed produced", i + 1),
        }
    }

    // Start from a known key
    input.start_key = Some("the".to_owned());
    if let Some(seed) = generator.generate(&model, &input)? {
        println!("Seeded generation: {:?}", seed);
    }
    input.start_key = None;

    // Save in both encodings ("markov_corpus.json" / "markov_corpus.bin"), then reload
    for encoding in [Encoding::InterchangeText, Encoding::NativeBinary] {
        let path = store::model_path_for(&corpus_path, encoding)?;
        store::save(&model, &path, encoding)?;

        model.reset();
        store::load_into(&mut model, &path, encoding)?;

        match generator.generate(&model, &input)? {
            Some(seed) => println!("Reloaded ({:?}) model generated: {:?}", encoding, seed),
            None => log::warn!("Reloaded ({:?}) model produced no seed", encoding),
        }
    }

    Ok(())
}
