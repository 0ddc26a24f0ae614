use sqlx::{QueryBuilder, Sqlite, Transaction};

use crate::{
	Result,
	db::Db,
	models::{NewSynonym, SynonymRow},
};

const LOOKUP_CHUNK: usize = 500;
const INSERT_BATCH: usize = 500;

/// Rows whose synonym is exactly one of `names`.
pub async fn lookup_by_names(db: &Db, names: &[String]) -> Result<Vec<SynonymRow>> {
	let mut rows = Vec::new();

	for chunk in names.chunks(LOOKUP_CHUNK) {
		let mut builder = QueryBuilder::<Sqlite>::new(
			"\
SELECT cui, synonym, semantic, representative, in_use
FROM umls_synonyms
WHERE synonym IN (",
		);
		let mut separated = builder.separated(", ");

		for name in chunk {
			separated.push_bind(name.clone());
		}

		separated.push_unseparated(")");

		rows.extend(builder.build_query_as::<SynonymRow>().fetch_all(&db.pool).await?);
	}

	Ok(rows)
}

pub async fn all_synonyms(db: &Db) -> Result<Vec<String>> {
	let synonyms = sqlx::query_scalar("SELECT DISTINCT synonym FROM umls_synonyms ORDER BY synonym")
		.fetch_all(&db.pool)
		.await?;

	Ok(synonyms)
}

pub async fn count_synonyms(db: &Db) -> Result<i64> {
	let count = sqlx::query_scalar("SELECT count(*) FROM umls_synonyms").fetch_one(&db.pool).await?;

	Ok(count)
}

pub async fn insert_synonyms(db: &Db, rows: &[NewSynonym]) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let inserted = insert_batches(&mut tx, rows).await?;

	tx.commit().await?;

	Ok(inserted)
}

/// Swaps the whole dictionary for `rows` in one transaction.
pub async fn replace_synonyms(db: &Db, rows: &[NewSynonym]) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let removed = sqlx::query("DELETE FROM umls_synonyms").execute(&mut *tx).await?.rows_affected();
	let inserted = insert_batches(&mut tx, rows).await?;

	tx.commit().await?;

	tracing::debug!(removed, inserted, "Replaced synonym dictionary.");

	Ok(inserted)
}

async fn insert_batches(tx: &mut Transaction<'_, Sqlite>, rows: &[NewSynonym]) -> Result<u64> {
	let mut inserted = 0;

	for batch in rows.chunks(INSERT_BATCH) {
		let mut builder = QueryBuilder::<Sqlite>::new(
			"\
INSERT INTO umls_synonyms (
	cui,
	semantic,
	synonym,
	representative,
	in_use
) ",
		);

		builder.push_values(batch, |mut b, row| {
			b.push_bind(row.cui.clone())
				.push_bind(row.semantic.clone())
				.push_bind(row.synonym.clone())
				.push_bind(row.representative.clone())
				.push_bind(row.in_use);
		});

		inserted += builder.build().execute(&mut **tx).await?.rows_affected();
	}

	Ok(inserted)
}
