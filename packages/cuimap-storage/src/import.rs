//! Synonym dictionary import from tab-separated files.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use crate::{Error, Result, db::Db, models::NewSynonym, queries};

const CUI_COLUMN: &str = "cui";
const SEMANTIC_COLUMN: &str = "SemanticType";
const SYNONYM_COLUMN: &str = "synonym";
const REPRESENTATIVE_COLUMN: &str = "representative";
const IN_USE_COLUMN: &str = "in_use";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedSynonyms {
	pub rows: Vec<NewSynonym>,
	pub skipped: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
	pub inserted: u64,
	pub skipped: usize,
}

/// Replaces the stored dictionary with the rows of the TSV at `path`.
pub async fn import_synonyms_tsv(db: &Db, path: &Path) -> Result<ImportReport> {
	let file =
		File::open(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
	let parsed = read_synonyms_tsv(file)?;
	let inserted = queries::replace_synonyms(db, &parsed.rows).await?;

	tracing::info!(inserted, skipped = parsed.skipped, path = %path.display(), "Imported synonyms.");

	Ok(ImportReport { inserted, skipped: parsed.skipped })
}

/// Parses a synonym TSV. Rows without a CUI or synonym are skipped. An empty representative falls
/// back to the first synonym seen for the same CUI.
pub fn read_synonyms_tsv<R: Read>(reader: R) -> Result<ParsedSynonyms> {
	let mut reader = csv::ReaderBuilder::new()
		.delimiter(b'\t')
		.quoting(false)
		.flexible(true)
		.from_reader(reader);
	let headers = reader.headers()?.clone();
	let column = |name: &str| headers.iter().position(|header| header.trim() == name);
	let require = |name: &str| {
		column(name).ok_or_else(|| Error::InvalidArgument(format!("Missing column {name:?}.")))
	};
	let cui_idx = require(CUI_COLUMN)?;
	let semantic_idx = require(SEMANTIC_COLUMN)?;
	let synonym_idx = require(SYNONYM_COLUMN)?;
	let representative_idx = column(REPRESENTATIVE_COLUMN);
	let in_use_idx = column(IN_USE_COLUMN);
	let mut first_synonym: HashMap<String, String> = HashMap::new();
	let mut parsed = ParsedSynonyms::default();

	for record in reader.records() {
		let record = record?;
		let field = |idx: Option<usize>| idx.and_then(|idx| record.get(idx)).unwrap_or("").trim();
		let cui = field(Some(cui_idx));
		let synonym = field(Some(synonym_idx));

		if cui.is_empty() || synonym.is_empty() {
			parsed.skipped += 1;

			continue;
		}

		let fallback =
			first_synonym.entry(cui.to_string()).or_insert_with(|| synonym.to_string()).clone();
		let representative = match field(representative_idx) {
			"" => fallback,
			value => value.to_string(),
		};

		parsed.rows.push(NewSynonym {
			cui: cui.to_string(),
			semantic: field(Some(semantic_idx)).to_string(),
			synonym: synonym.to_string(),
			representative,
			in_use: parse_flag(field(in_use_idx)),
		});
	}

	Ok(parsed)
}

fn parse_flag(raw: &str) -> bool {
	matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn representative_falls_back_to_first_synonym() {
		let tsv = "cui\tSemanticType\tsynonym\trepresentative\tin_use\n\
			C0015967\tSign or Symptom\tFever\t\t1\n\
			C0015967\tSign or Symptom\t発熱\t\t0\n\
			\tSign or Symptom\torphan\t\t0\n\
			C0018681\tSign or Symptom\t頭痛\tHeadache\n";
		let parsed = read_synonyms_tsv(tsv.as_bytes()).expect("TSV should parse.");

		assert_eq!(parsed.skipped, 1);
		assert_eq!(parsed.rows.len(), 3);
		assert_eq!(parsed.rows[1].representative, "Fever");
		assert!(parsed.rows[0].in_use);
		assert!(!parsed.rows[2].in_use);
		assert_eq!(parsed.rows[2].representative, "Headache");
	}

	#[test]
	fn missing_required_column_is_rejected() {
		let err = read_synonyms_tsv("cui\tsynonym\nC1\tx\n".as_bytes())
			.expect_err("Missing SemanticType should fail.");

		assert!(matches!(err, Error::InvalidArgument(message) if message.contains("SemanticType")));
	}
}
