use std::{fs::File, io::Read, path::Path};

use color_eyre::Result;
use cuimap_domain::tokens::Morpheme;
use vibrato::{Dictionary, Tokenizer};

/// Part-of-speech tag given to every whitespace token.
pub const WHITESPACE_POS: &str = "名詞";

/// Morphological analyzer backed by a MeCab-compatible vibrato dictionary.
pub struct VibratoAnalyzer {
	tokenizer: Tokenizer,
}
impl VibratoAnalyzer {
	/// Loads a compiled dictionary; `.zst` files are decompressed on the fly.
	pub fn load(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "zst") {
			Box::new(zstd::Decoder::new(file)?)
		} else {
			Box::new(file)
		};
		let dict = Dictionary::read(reader)?;

		tracing::info!(path = %path.display(), "Loaded morphological dictionary.");

		Ok(Self { tokenizer: Tokenizer::new(dict) })
	}

	pub fn analyze(&self, text: &str) -> Vec<Morpheme> {
		let mut worker = self.tokenizer.new_worker();

		worker.reset_sentence(text);
		worker.tokenize();

		worker
			.token_iter()
			.map(|token| Morpheme::new(token.surface(), pos_of(token.feature())))
			.collect()
	}
}

/// Splits on whitespace and tags every token as a noun. Used when no dictionary is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceAnalyzer;
impl WhitespaceAnalyzer {
	pub fn analyze(&self, text: &str) -> Vec<Morpheme> {
		text.split_whitespace().map(|surface| Morpheme::new(surface, WHITESPACE_POS)).collect()
	}
}

/// The coarse part of speech is the first field of a MeCab feature string.
fn pos_of(feature: &str) -> &str {
	feature.split(',').next().unwrap_or(feature)
}
