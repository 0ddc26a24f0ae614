use serde::Serialize;

use cuimap_domain::{
	concept::{ScoredConcept, ScoredConcepts},
	script::ScriptClass,
};

use crate::{CuimapService, Result, translate};

const UNKNOWN_SYNONYM: &str = "unknown";
const UNKNOWN_SEMANTIC_TYPE: &str = "Qualitative Concept";
const UNKNOWN_REPRESENTATIVE: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedConcept {
	pub cui: String,
	pub score: f64,
	pub synonym: String,
	pub semantic_type: String,
	pub representative: String,
	pub in_use: bool,
}

impl CuimapService {
	/// Resolves a phrase list to ranked concepts. The result is never empty: the unknown concept
	/// is always present.
	pub async fn resolve(&self, phrases: &[String]) -> Result<Vec<ResolvedConcept>> {
		let normalized = self.context.normalizer.normalize(phrases);
		let mut scores = ScoredConcepts::new();

		tracing::debug!(phrases = ?phrases, normalized = ?normalized, "Normalized phrases.");

		for phrase in &normalized {
			if phrase.trim().is_empty() {
				continue;
			}

			let outcome = self.search_phrase(phrase, ScriptClass::of(phrase)).await?;

			tracing::debug!(
				phrase = %phrase,
				direct_hit = outcome.direct_hit,
				concepts = outcome.scores.len(),
				"Searched phrase."
			);

			scores.merge(outcome.scores);

			if self.cfg.resolver.translation_enabled {
				scores.merge(self.search_translated(phrase).await?);
			}
		}

		Ok(self.finalize(scores))
	}

	/// Resolves a single free-text query. A blank query yields no concepts at all.
	pub async fn normalize_query(&self, query: &str) -> Result<Vec<ResolvedConcept>> {
		if query.trim().is_empty() {
			return Ok(Vec::new());
		}

		self.resolve(&[query.to_string()]).await
	}

	async fn search_translated(&self, phrase: &str) -> Result<ScoredConcepts> {
		let cfg = &self.cfg.providers.translation;
		let Some(translated) = translate::translate_with_retry(
			self.providers.translator.as_ref(),
			phrase,
			cfg.max_attempts,
		)
		.await
		else {
			return Ok(ScoredConcepts::new());
		};
		let folded = translate::fold_translation(&translated);
		let mut scores = ScoredConcepts::new();

		// Translations are searched as Latin script so they never earn the same-script bonus.
		for query in self.context.normalizer.normalize(&[folded]) {
			if query.trim().is_empty() {
				continue;
			}

			let outcome = self.search_phrase(&query, ScriptClass::Latin).await?;

			tracing::debug!(
				query = %query,
				direct_hit = outcome.direct_hit,
				concepts = outcome.scores.len(),
				"Searched translated phrase."
			);

			scores.merge(outcome.scores);
		}

		Ok(scores)
	}

	fn finalize(&self, mut scores: ScoredConcepts) -> Vec<ResolvedConcept> {
		let resolver = &self.cfg.resolver;

		scores.insert_if_absent(
			resolver.unknown_cui.clone(),
			ScoredConcept {
				score: resolver.unknown_score,
				synonym: UNKNOWN_SYNONYM.to_string(),
				semantic_type: UNKNOWN_SEMANTIC_TYPE.to_string(),
				representative: UNKNOWN_REPRESENTATIVE.to_string(),
				in_use: false,
			},
		);

		scores
			.into_ranked()
			.into_iter()
			.map(|(cui, concept)| ResolvedConcept {
				cui,
				score: concept.score,
				synonym: concept.synonym,
				semantic_type: concept.semantic_type,
				representative: concept.representative,
				in_use: concept.in_use,
			})
			.collect()
	}
}
