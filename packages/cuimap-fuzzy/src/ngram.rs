use ahash::AHashMap;

const PAD: char = '$';

/// Character n-gram extractor. Text is padded with `n - 1` markers on both sides, so a text of
/// `L` characters yields `L + n - 1` grams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharNgrams {
	n: usize,
}
impl CharNgrams {
	pub fn new(n: usize) -> Self {
		Self { n: n.max(1) }
	}

	pub fn n(&self) -> usize {
		self.n
	}

	pub fn features(&self, text: &str) -> Features {
		let pad = self.n - 1;
		let mut chars = Vec::with_capacity(text.len() + pad * 2);

		chars.extend(std::iter::repeat_n(PAD, pad));
		chars.extend(text.chars());
		chars.extend(std::iter::repeat_n(PAD, pad));

		let grams = chars.windows(self.n).map(|window| window.iter().collect()).collect();

		Features { grams }
	}
}

/// A multiset of n-grams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Features {
	grams: Vec<String>,
}
impl Features {
	pub fn len(&self) -> usize {
		self.grams.len()
	}

	pub fn is_empty(&self) -> bool {
		self.grams.is_empty()
	}

	pub fn grams(&self) -> &[String] {
		&self.grams
	}

	pub fn term_frequencies(&self) -> AHashMap<&str, u32> {
		let mut tf = AHashMap::with_capacity(self.grams.len());

		for gram in &self.grams {
			*tf.entry(gram.as_str()).or_insert(0) += 1;
		}

		tf
	}
}

/// Cosine similarity of two term-frequency vectors, in `[0, 1]`.
pub fn cosine(a: &Features, b: &Features) -> f64 {
	if a.is_empty() || b.is_empty() {
		return 0.0;
	}

	let tf_a = a.term_frequencies();
	let tf_b = b.term_frequencies();
	let dot: f64 = tf_a
		.iter()
		.filter_map(|(gram, count)| {
			tf_b.get(gram).map(|other| f64::from(*count) * f64::from(*other))
		})
		.sum();

	(dot / (norm(&tf_a) * norm(&tf_b))).clamp(0.0, 1.0)
}

pub(crate) fn norm(tf: &AHashMap<&str, u32>) -> f64 {
	tf.values().map(|count| f64::from(*count).powi(2)).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bigrams_are_padded() {
		let features = CharNgrams::new(2).features("発熱");

		assert_eq!(features.grams(), ["$発", "発熱", "熱$"]);
		assert_eq!(CharNgrams::new(3).features("abcd").len(), 6);
	}

	#[test]
	fn cosine_bounds() {
		let ngrams = CharNgrams::new(2);
		let fever = ngrams.features("fever");

		assert!((cosine(&fever, &fever) - 1.0).abs() < 1e-9);
		assert_eq!(cosine(&fever, &ngrams.features("頭痛")), 0.0);
		assert_eq!(cosine(&fever, &Features::default()), 0.0);
	}

	#[test]
	fn cosine_counts_repeated_grams() {
		let ngrams = CharNgrams::new(2);
		let a = ngrams.features("aaa");
		let b = ngrams.features("aa");

		// a: $a, aa x2, a$ ; b: $a, aa, a$
		let expected = 4.0 / (6.0_f64.sqrt() * 3.0_f64.sqrt());

		assert!((cosine(&a, &b) - expected).abs() < 1e-9);
	}

	#[test]
	fn long_repeated_input_keeps_exact_counts() {
		let ngrams = CharNgrams::new(2);
		let long = ngrams.features(&"a".repeat(70_000));
		let short = ngrams.features("aa");
		// long: $a, aa x69999, a$ ; short: $a, aa, a$
		let expected = 70_001.0 / ((69_999.0_f64.powi(2) + 2.0).sqrt() * 3.0_f64.sqrt());

		assert!((cosine(&long, &short) - expected).abs() < 1e-9);
	}
}
