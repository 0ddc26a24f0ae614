use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use cuimap_config::Config;
use cuimap_domain::lab_value::{LabNormalizer, LabTestTable};
use cuimap_service::{CuimapService, Providers, ResolverContext};
use cuimap_storage::{db::Db, import, lab_tests};

#[derive(Debug, Parser)]
#[command(
	version = cuimap_cli::VERSION,
	rename_all = "kebab",
	styles = cuimap_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE", global = true, default_value = "cuimap.toml")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Load a synonym TSV into the SQLite dictionary.
	Import {
		#[arg(value_name = "TSV")]
		input: PathBuf,
		/// Target database; defaults to `storage.sqlite.path`.
		#[arg(long, value_name = "FILE")]
		db: Option<PathBuf>,
	},
	/// Resolve phrases and print the ranked concepts as JSON.
	Resolve {
		#[arg(value_name = "PHRASE", required = true)]
		phrases: Vec<String>,
	},
	/// Print the lab-test reference ranges.
	LabTests,
	/// Print phrases after lab-value normalization.
	Normalize {
		#[arg(value_name = "PHRASE", required = true)]
		phrases: Vec<String>,
	},
}

#[derive(Debug, Serialize)]
struct LabTestRow<'a> {
	name: &'a str,
	upper: Option<f64>,
	lower: Option<f64>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = cuimap_config::load(&args.config)?;

	cuimap_cli::init_tracing(&config.service.log_level)?;

	match args.command {
		Command::Import { input, db } => {
			let path = db.unwrap_or_else(|| config.storage.sqlite.path.clone());
			let db = Db::create(&path).await?;
			let report = import::import_synonyms_tsv(&db, &input).await?;

			println!(
				"{}",
				serde_json::json!({ "inserted": report.inserted, "skipped": report.skipped })
			);
		},
		Command::Resolve { phrases } => {
			let service = build_service(config).await?;
			let resolved = service.resolve(&phrases).await?;

			println!("{}", serde_json::to_string_pretty(&resolved)?);
		},
		Command::LabTests => {
			let ranges = lab_tests::load_lab_tests(&config.normalizer)?;
			let rows: Vec<LabTestRow> = ranges
				.iter()
				.map(|range| LabTestRow {
					name: &range.name,
					upper: range.upper,
					lower: range.lower,
				})
				.collect();

			println!("{}", serde_json::to_string_pretty(&rows)?);
		},
		Command::Normalize { phrases } => {
			let table = LabTestTable::new(lab_tests::load_lab_tests(&config.normalizer)?);
			let normalizer = LabNormalizer::new(table, &config.normalizer);

			println!("{}", serde_json::to_string_pretty(&normalizer.normalize(&phrases))?);
		},
	}

	Ok(())
}

async fn build_service(config: Config) -> color_eyre::Result<CuimapService> {
	let context = ResolverContext::load(&config).await?;
	let providers = Providers::from_config(&config)?;

	Ok(CuimapService::new(config, context, providers))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_subcommands() {
		let args = Args::try_parse_from(["cuimap-tool", "-c", "cfg.toml", "resolve", "発熱", "頭痛"])
			.expect("Arguments should parse.");

		assert_eq!(args.config, PathBuf::from("cfg.toml"));
		assert!(matches!(args.command, Command::Resolve { phrases } if phrases.len() == 2));

		let args = Args::try_parse_from(["cuimap-tool", "import", "synonyms.tsv", "--db", "x.db"])
			.expect("Arguments should parse.");

		assert!(matches!(args.command, Command::Import { db: Some(_), .. }));
		assert!(Args::try_parse_from(["cuimap-tool", "resolve"]).is_err());
	}
}
