use cuimap_domain::concept::{self, Candidate};

use crate::{FuzzyIndex, Result, SynonymStore};

/// Candidates for `query` sorted ascending by `(similarity, cui)`.
///
/// Folding the result into a CUI-keyed map in this order leaves the best row per CUI.
pub async fn ranked_search(
	index: &dyn FuzzyIndex,
	store: &dyn SynonymStore,
	query: &str,
) -> Result<Vec<Candidate>> {
	let names = index.retrieve(query);

	if names.is_empty() {
		return Ok(Vec::new());
	}

	let rows = store.lookup_by_names(&names).await?;
	let query_features = index.features(query);
	let mut candidates: Vec<Candidate> = rows
		.into_iter()
		.map(|row| Candidate {
			similarity: index.similarity(&query_features, &index.features(&row.synonym)),
			cui: row.cui,
			synonym: row.synonym,
			semantic_type: row.semantic,
			representative: row.representative,
			in_use: row.in_use,
		})
		.collect();

	concept::sort_ascending(&mut candidates);

	tracing::trace!(query, retrieved = names.len(), candidates = candidates.len(), "Ranked search.");

	Ok(candidates)
}
