use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads a whole text file into memory.
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Swaps the extension of `input_path`, keeping its directory and stem.
///
/// Example:
/// `data/corpus.txt` + `"json"` → `data/corpus.json`
pub(crate) fn build_output_path<P: AsRef<Path>>(input_path: P, extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();
	if input_path.file_stem().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"));
	}
	Ok(input_path.with_extension(extension))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_swaps_extension() {
		let path = build_output_path("data/corpus.txt", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/corpus.bin"));
	}

	#[test]
	fn output_path_without_filename_fails() {
		assert!(build_output_path("/", "bin").is_err());
	}
}
