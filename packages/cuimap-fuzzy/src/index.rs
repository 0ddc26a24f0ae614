use ahash::AHashMap;

use crate::ngram::{self, CharNgrams, Features};

/// Inverted n-gram index over dictionary strings.
///
/// `retrieve` returns every indexed string whose cosine similarity with the query is at least
/// the configured threshold.
#[derive(Clone, Debug)]
pub struct NgramIndex {
	ngrams: CharNgrams,
	threshold: f64,
	strings: Vec<String>,
	norms: Vec<f64>,
	postings: AHashMap<String, Vec<(u32, u32)>>,
}
impl NgramIndex {
	pub fn build<I, S>(n: usize, threshold: f64, strings: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ngrams = CharNgrams::new(n);
		let mut index = Self {
			ngrams,
			threshold,
			strings: Vec::new(),
			norms: Vec::new(),
			postings: AHashMap::new(),
		};

		for string in strings {
			index.insert(string.into());
		}

		tracing::debug!(
			strings = index.strings.len(),
			grams = index.postings.len(),
			"Built n-gram index."
		);

		index
	}

	fn insert(&mut self, string: String) {
		let Ok(id) = u32::try_from(self.strings.len()) else {
			tracing::warn!("N-gram index is full; dropping entry.");

			return;
		};
		let features = self.ngrams.features(&string);
		let tf = features.term_frequencies();

		self.norms.push(ngram::norm(&tf));

		for (gram, count) in tf {
			self.postings.entry(gram.to_string()).or_default().push((id, count));
		}

		self.strings.push(string);
	}

	pub fn features(&self, text: &str) -> Features {
		self.ngrams.features(text)
	}

	pub fn similarity(&self, a: &Features, b: &Features) -> f64 {
		ngram::cosine(a, b)
	}

	pub fn threshold(&self) -> f64 {
		self.threshold
	}

	pub fn len(&self) -> usize {
		self.strings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.strings.is_empty()
	}

	/// Indexed strings at or above the similarity threshold, in index order.
	pub fn retrieve(&self, query: &str) -> Vec<String> {
		let features = self.ngrams.features(query);
		let tf = features.term_frequencies();
		let query_norm = ngram::norm(&tf);

		if query_norm == 0.0 {
			return Vec::new();
		}

		let mut dots: AHashMap<u32, f64> = AHashMap::new();

		for (gram, query_count) in &tf {
			let Some(postings) = self.postings.get(*gram) else {
				continue;
			};

			for (id, count) in postings {
				*dots.entry(*id).or_insert(0.0) += f64::from(*query_count) * f64::from(*count);
			}
		}

		let mut hits: Vec<u32> = dots
			.into_iter()
			.filter(|(id, dot)| {
				let norm = self.norms[*id as usize];

				norm > 0.0 && dot / (query_norm * norm) >= self.threshold
			})
			.map(|(id, _)| id)
			.collect();

		hits.sort_unstable();

		hits.into_iter().map(|id| self.strings[id as usize].clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn retrieves_close_strings_only() {
		let index = NgramIndex::build(2, 0.65, ["発熱", "発熱性疾患", "頭痛", "fever"]);

		assert_eq!(index.retrieve("発熱"), vec!["発熱".to_string()]);
		assert_eq!(index.retrieve("fevers"), vec!["fever".to_string()]);
		assert!(index.retrieve("咳嗽").is_empty());
	}

	#[test]
	fn retrieve_agrees_with_cosine() {
		let strings = ["chest pain", "chest wall pain", "pain", "back pain"];
		let index = NgramIndex::build(2, 0.5, strings);
		let query = "chest pains";
		let query_features = index.features(query);
		let expected: Vec<String> = strings
			.iter()
			.filter(|s| index.similarity(&query_features, &index.features(s)) >= 0.5)
			.map(|s| s.to_string())
			.collect();

		assert_eq!(index.retrieve(query), expected);
	}

	#[test]
	fn long_repeated_query_is_scored() {
		let index = NgramIndex::build(2, 0.5, ["aa", "fever"]);

		assert_eq!(index.retrieve(&"a".repeat(70_000)), vec!["aa".to_string()]);
	}
}
