//! Direct search with right and left trimming fallbacks for a single phrase.

use cuimap_domain::{
	concept::ScoredConcepts,
	script::ScriptClass,
	tokens::{self, Tokenization},
};

use crate::{CuimapService, Result, ranked};

#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
	pub scores: ScoredConcepts,
	/// The untrimmed phrase matched at least one synonym.
	pub direct_hit: bool,
}

enum Stage {
	Direct,
	Tokenize,
	RightTrim { spans: Vec<String>, left_spans: Vec<String> },
	LeftTrim { spans: Vec<String> },
	Done,
}

impl CuimapService {
	/// Searches one normalized phrase.
	///
	/// A direct hit ends the search. Otherwise the phrase is tokenized and the first hit among
	/// its prefixes (longest first) is merged, followed by the first hit among its suffixes.
	/// Both trimming passes always run.
	pub async fn search_phrase(&self, query: &str, script: ScriptClass) -> Result<SearchOutcome> {
		let resolver = &self.cfg.resolver;
		let script_bonus = if script.is_latin() { 0.0 } else { resolver.non_latin_bonus };
		let original_len = self.context.index.features(query).len();
		let mut outcome = SearchOutcome::default();
		let mut stage = Stage::Direct;

		loop {
			stage = match stage {
				Stage::Direct => {
					let direct_query = query.replace('_', " ");
					let candidates = ranked::ranked_search(
						self.context.index.as_ref(),
						self.context.store.as_ref(),
						&direct_query,
					)
					.await?;

					tracing::debug!(query = %direct_query, hits = candidates.len(), "Direct search.");

					if candidates.is_empty() {
						Stage::Tokenize
					} else {
						let bonus = resolver.direct_hit_bonus + script_bonus;

						outcome
							.scores
							.merge(ScoredConcepts::from_ranked(candidates, |sim| sim + bonus));
						outcome.direct_hit = true;

						Stage::Done
					}
				},
				Stage::Tokenize => {
					let (tokens, tokenization) = self.tokenize(query, script);

					tracing::debug!(query, tokens = ?tokens, "Tokenized for trimming.");

					if tokens.is_empty() {
						Stage::Done
					} else {
						Stage::RightTrim {
							spans: tokens::right_trims(&tokens, tokenization),
							left_spans: tokens::left_trims(&tokens, tokenization),
						}
					}
				},
				Stage::RightTrim { spans, left_spans } => {
					if let Some(found) =
						self.first_partial_hit(&spans, original_len, script_bonus).await?
					{
						outcome.scores.merge(found);
					}

					Stage::LeftTrim { spans: left_spans }
				},
				Stage::LeftTrim { spans } => {
					if let Some(found) =
						self.first_partial_hit(&spans, original_len, script_bonus).await?
					{
						outcome.scores.merge(found);
					}

					Stage::Done
				},
				Stage::Done => break,
			};
		}

		Ok(outcome)
	}

	fn tokenize(&self, query: &str, script: ScriptClass) -> (Vec<String>, Tokenization) {
		if script.is_latin() {
			return (tokens::latin_tokens(query), Tokenization::Whitespace);
		}

		let tokens = match self.providers.analyzer.analyze(query) {
			Ok(morphemes) => tokens::content_tokens(&morphemes, &self.cfg.resolver.content_pos),
			Err(err) => {
				tracing::warn!(error = %err, query, "Morphological analysis failed; skipping trims.");

				Vec::new()
			},
		};

		(tokens, Tokenization::Morphological)
	}

	/// Scores the first span with any candidates, penalized by its share of the original
	/// phrase's features.
	async fn first_partial_hit(
		&self,
		spans: &[String],
		original_len: usize,
		script_bonus: f64,
	) -> Result<Option<ScoredConcepts>> {
		for span in spans {
			let candidates = ranked::ranked_search(
				self.context.index.as_ref(),
				self.context.store.as_ref(),
				span,
			)
			.await?;

			if candidates.is_empty() {
				continue;
			}

			let ratio = if original_len == 0 {
				0.0
			} else {
				self.context.index.features(span).len() as f64 / original_len as f64
			};

			tracing::debug!(span = %span, ratio, hits = candidates.len(), "Partial search hit.");

			return Ok(Some(ScoredConcepts::from_ranked(candidates, |sim| {
				sim * ratio + script_bonus
			})));
		}

		Ok(None)
	}
}
