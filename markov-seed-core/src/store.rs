use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use crate::io::build_output_path;
use crate::model::transition_model::TransitionModel;

/// Leading bytes of a `NativeBinary` model.
const BINARY_MAGIC: &[u8; 4] = b"MKSD";

/// Canonical representation shared by every encoding.
///
/// Serializes as the bare mapping, so the JSON document is a plain object
/// of key → array of one-character strings.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct StoredTable<'a>(Cow<'a, BTreeMap<String, Vec<char>>>);

/// On-disk encoding of a `TransitionModel`.
///
/// Both encodings carry the same mapping, key → successor characters,
/// and decode into the same canonical table before validation.
///
/// # Variants
/// - `InterchangeText`: pretty JSON object of key → array of one-character strings.
/// - `NativeBinary`: `postcard` encoding prefixed with a 4-byte tag.
///   Compact, but only readable by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
	InterchangeText,
	NativeBinary,
}

impl Encoding {
	/// File extension conventionally used by this encoding.
	pub fn extension(&self) -> &'static str {
		match self {
			Encoding::InterchangeText => "json",
			Encoding::NativeBinary => "bin",
		}
	}

	/// Picks the encoding from a path extension (`json` or `bin`).
	pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
		match path.as_ref().extension()?.to_str()? {
			"json" => Some(Encoding::InterchangeText),
			"bin" => Some(Encoding::NativeBinary),
			_ => None,
		}
	}
}

/// Builds the model path next to a corpus file.
///
/// Example:
/// `data/corpus.txt` + `NativeBinary` → `data/corpus.bin`
pub fn model_path_for<P: AsRef<Path>>(corpus_path: P, encoding: Encoding) -> Result<PathBuf> {
	let path = build_output_path(corpus_path, encoding.extension()).map_err(PersistenceError::from)?;
	Ok(path)
}

/// Serializes the table of `model` in memory.
pub fn encode(model: &TransitionModel, encoding: Encoding) -> Result<Vec<u8>> {
	let stored = StoredTable(Cow::Borrowed(model.table()));
	let bytes = match encoding {
		Encoding::InterchangeText => serde_json::to_vec_pretty(&stored).map_err(PersistenceError::from)?,
		Encoding::NativeBinary => {
			let mut bytes = BINARY_MAGIC.to_vec();
			bytes.extend(postcard::to_stdvec(&stored).map_err(PersistenceError::from)?);
			bytes
		}
	};
	Ok(bytes)
}

/// Decodes a table without checking the model invariants.
///
/// Use `load` / `load_into` (or `TransitionModel::from_table`) to obtain
/// a validated model.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<BTreeMap<String, Vec<char>>> {
	let stored: StoredTable = match encoding {
		Encoding::InterchangeText => serde_json::from_slice(bytes).map_err(PersistenceError::from)?,
		Encoding::NativeBinary => {
			let payload = bytes.strip_prefix(BINARY_MAGIC.as_slice()).ok_or(PersistenceError::BadMagic)?;
			let (stored, rest) = postcard::take_from_bytes(payload).map_err(PersistenceError::from)?;
			if !rest.is_empty() {
				return Err(PersistenceError::InvalidLayout(format!(
					"{} trailing bytes after binary model",
					rest.len()
				))
				.into());
			}
			stored
		}
	};
	Ok(stored.0.into_owned())
}

/// Writes `model` to `path`.
///
/// # Errors
/// Returns `Persistence` on encoding or I/O failure.
pub fn save<P: AsRef<Path>>(model: &TransitionModel, path: P, encoding: Encoding) -> Result<()> {
	let path = path.as_ref();
	let bytes = encode(model, encoding)?;
	fs::write(path, bytes).map_err(|e| {
		log::error!("Failed to save model to {}: {}", path.display(), e);
		PersistenceError::from(e)
	})?;
	log::info!("Model saved to {} ({} keys)", path.display(), model.len());
	Ok(())
}

/// Reads a model from `path`, inferring `n` from the key length.
///
/// # Errors
/// - `Persistence` on I/O or decoding failure, or encoding mismatch
/// - `Persistence(InvalidLayout)` if keys differ in length, or if the
///   mapping is empty (`n` cannot be inferred; use `load_into`)
pub fn load<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<TransitionModel> {
	let path = path.as_ref();
	let table = read_table(path, encoding)?;

	let n = match table.keys().next() {
		Some(key) => key.chars().count(),
		None => {
			return Err(PersistenceError::InvalidLayout(
				"empty mapping, the window width cannot be inferred".to_owned(),
			)
			.into());
		}
	};

	let model = TransitionModel::from_table(n, table)?;
	log::info!("Model loaded from {} (n={}, {} keys)", path.display(), n, model.len());
	Ok(model)
}

/// Replaces the table of `model` with the one stored at `path`.
///
/// Keys must match the window width of `model`; an empty mapping is accepted.
/// On failure `model` is left untouched.
pub fn load_into<P: AsRef<Path>>(model: &mut TransitionModel, path: P, encoding: Encoding) -> Result<()> {
	let path = path.as_ref();
	let table = read_table(path, encoding)?;
	*model = TransitionModel::from_table(model.n(), table)?;

	log::info!("Model loaded from {} ({} keys)", path.display(), model.len());
	Ok(())
}

fn read_table(path: &Path, encoding: Encoding) -> Result<BTreeMap<String, Vec<char>>> {
	let bytes = fs::read(path).map_err(|e| {
		log::error!("Failed to read model from {}: {}", path.display(), e);
		PersistenceError::from(e)
	})?;
	decode(&bytes, encoding)
}
