//! Concept candidates and the per-resolution score map.

use std::{cmp::Ordering, collections::HashMap};

/// One dictionary row matched by a fuzzy lookup, with its exact similarity to the query.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	pub similarity: f64,
	pub cui: String,
	pub synonym: String,
	pub semantic_type: String,
	pub representative: String,
	pub in_use: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredConcept {
	pub score: f64,
	pub synonym: String,
	pub semantic_type: String,
	pub representative: String,
	pub in_use: bool,
}
impl ScoredConcept {
	pub fn from_candidate(candidate: Candidate, score: f64) -> Self {
		Self {
			score,
			synonym: candidate.synonym,
			semantic_type: candidate.semantic_type,
			representative: candidate.representative,
			in_use: candidate.in_use,
		}
	}
}

/// Concept scores keyed by CUI.
///
/// Every CUI holds the highest score proposed for it so far. Merging the same set twice changes
/// nothing after the first merge.
#[derive(Clone, Debug, Default)]
pub struct ScoredConcepts {
	by_cui: HashMap<String, ScoredConcept>,
}
impl ScoredConcepts {
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds candidates in the order given, so later rows overwrite earlier rows for the same
	/// CUI. Feed candidates in ascending similarity order to keep the best row.
	pub fn from_ranked(candidates: Vec<Candidate>, score: impl Fn(f64) -> f64) -> Self {
		let mut by_cui = HashMap::with_capacity(candidates.len());

		for candidate in candidates {
			let value = score(candidate.similarity);

			by_cui.insert(candidate.cui.clone(), ScoredConcept::from_candidate(candidate, value));
		}

		Self { by_cui }
	}

	pub fn merge(&mut self, incoming: Self) {
		for (cui, concept) in incoming.by_cui {
			match self.by_cui.get_mut(&cui) {
				Some(existing) =>
					if concept.score > existing.score {
						*existing = concept;
					},
				None => {
					self.by_cui.insert(cui, concept);
				},
			}
		}
	}

	pub fn insert_if_absent(&mut self, cui: impl Into<String>, concept: ScoredConcept) {
		self.by_cui.entry(cui.into()).or_insert(concept);
	}

	pub fn contains(&self, cui: &str) -> bool {
		self.by_cui.contains_key(cui)
	}

	pub fn get(&self, cui: &str) -> Option<&ScoredConcept> {
		self.by_cui.get(cui)
	}

	pub fn len(&self) -> usize {
		self.by_cui.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_cui.is_empty()
	}

	/// Entries by descending score, ties broken by ascending CUI.
	pub fn into_ranked(self) -> Vec<(String, ScoredConcept)> {
		let mut entries: Vec<_> = self.by_cui.into_iter().collect();

		entries.sort_by(|(cui_a, a), (cui_b, b)| {
			b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then_with(|| cui_a.cmp(cui_b))
		});

		entries
	}
}

/// Sorts candidates ascending by `(similarity, cui)`.
pub fn sort_ascending(candidates: &mut [Candidate]) {
	candidates.sort_by(|a, b| {
		a.similarity
			.partial_cmp(&b.similarity)
			.unwrap_or(Ordering::Equal)
			.then_with(|| a.cui.cmp(&b.cui))
	});
}
