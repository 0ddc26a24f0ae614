use crate::{script, stop_words};

/// One morphological analysis unit: surface form and coarse part-of-speech tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Morpheme {
	pub surface: String,
	pub pos: String,
}
impl Morpheme {
	pub fn new(surface: impl Into<String>, pos: impl Into<String>) -> Self {
		Self { surface: surface.into(), pos: pos.into() }
	}
}

/// How a query was split into trimming units; decides the join separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tokenization {
	Morphological,
	Whitespace,
}
impl Tokenization {
	pub fn separator(self) -> &'static str {
		match self {
			Self::Morphological => "",
			Self::Whitespace => " ",
		}
	}
}

/// Keeps content-word surfaces. Purely alphanumeric surfaces are dropped since the translated
/// pass searches those.
pub fn content_tokens(morphemes: &[Morpheme], content_pos: &[String]) -> Vec<String> {
	morphemes
		.iter()
		.filter(|morpheme| content_pos.iter().any(|pos| pos == &morpheme.pos))
		.filter(|morpheme| !script::is_latin_script(&morpheme.surface))
		.map(|morpheme| morpheme.surface.clone())
		.collect()
}

pub fn latin_tokens(text: &str) -> Vec<String> {
	text.split_whitespace()
		.map(str::to_lowercase)
		.filter(|token| !stop_words::is_stop_word(token))
		.collect()
}

/// Prefixes of `tokens`, longest first.
pub fn right_trims(tokens: &[String], tokenization: Tokenization) -> Vec<String> {
	(1..=tokens.len()).rev().map(|end| tokens[..end].join(tokenization.separator())).collect()
}

/// Suffixes of `tokens` that drop at least one leading token, longest first.
pub fn left_trims(tokens: &[String], tokenization: Tokenization) -> Vec<String> {
	(1..tokens.len()).map(|start| tokens[start..].join(tokenization.separator())).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|token| token.to_string()).collect()
	}

	#[test]
	fn keeps_content_words_without_alphanumerics() {
		let morphemes = vec![
			Morpheme::new("左", "接頭詞"),
			Morpheme::new("大腿骨", "名詞"),
			Morpheme::new("の", "助詞"),
			Morpheme::new("LDH", "名詞"),
			Morpheme::new("骨折", "名詞"),
			Morpheme::new("高い", "形容詞"),
		];
		let content_pos = tokens(&["名詞", "動詞", "形容詞"]);

		assert_eq!(content_tokens(&morphemes, &content_pos), tokens(&["大腿骨", "骨折", "高い"]));
	}

	#[test]
	fn latin_tokens_drop_stop_words() {
		assert_eq!(
			latin_tokens("Standing  Body Height of the patient"),
			tokens(&["standing", "body", "height", "patient"])
		);
	}

	#[test]
	fn trims_in_search_order() {
		let words = tokens(&["a", "b", "c"]);

		assert_eq!(right_trims(&words, Tokenization::Whitespace), tokens(&["a b c", "a b", "a"]));
		assert_eq!(left_trims(&words, Tokenization::Morphological), tokens(&["bc", "c"]));
		assert!(left_trims(&tokens(&["a"]), Tokenization::Whitespace).is_empty());
		assert!(right_trims(&[], Tokenization::Whitespace).is_empty());
	}
}
