use std::{
	collections::HashSet,
	fs,
	path::{Path, PathBuf},
	time::Instant,
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use cuimap_service::{CuimapService, Providers, ResolverContext};

#[derive(Debug, Parser)]
#[command(
	version = cuimap_cli::VERSION,
	rename_all = "kebab",
	styles = cuimap_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: PathBuf,
	#[arg(long, value_name = "N", default_value_t = 5)]
	pub top_k: usize,
}

#[derive(Debug, Deserialize)]
pub struct EvalDataset {
	pub name: Option<String>,
	pub cases: Vec<EvalCase>,
}

#[derive(Debug, Deserialize)]
pub struct EvalCase {
	pub id: Option<String>,
	pub phrases: Vec<String>,
	pub expected_cuis: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EvalOutput {
	pub dataset: EvalDatasetInfo,
	pub generated_at: String,
	pub top_k: usize,
	pub summary: EvalSummary,
	pub cases: Vec<CaseReport>,
}

#[derive(Debug, Serialize)]
pub struct EvalDatasetInfo {
	pub name: String,
	pub case_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EvalSummary {
	pub avg_recall_at_k: f64,
	pub mean_rr: f64,
	pub hit_rate_at_k: f64,
	pub latency_ms_p50: f64,
	pub latency_ms_p95: f64,
}

#[derive(Debug, Serialize)]
pub struct CaseReport {
	pub id: String,
	pub phrases: Vec<String>,
	pub expected_cuis: Vec<String>,
	pub retrieved_cuis: Vec<String>,
	pub relevant_count: usize,
	pub recall_at_k: f64,
	pub rr: f64,
	pub latency_ms: f64,
}

struct Metrics {
	recall_at_k: f64,
	rr: f64,
	relevant_count: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = cuimap_config::load(&args.config)?;

	cuimap_cli::init_tracing(&config.service.log_level)?;

	let dataset = load_dataset(&args.dataset)?;
	let context = ResolverContext::load(&config).await?;
	let providers = Providers::from_config(&config)?;
	let service = CuimapService::new(config, context, providers);
	let output = evaluate(&service, &dataset, args.top_k).await?;
	let json = serde_json::to_string_pretty(&output)?;

	println!("{json}");

	Ok(())
}

pub fn load_dataset(path: &Path) -> color_eyre::Result<EvalDataset> {
	let raw = fs::read_to_string(path)?;
	let dataset: EvalDataset = serde_json::from_str(&raw)?;

	if dataset.cases.is_empty() {
		return Err(eyre::eyre!("Dataset must include at least one case."));
	}

	Ok(dataset)
}

/// Resolves every case and scores the top `top_k` concepts. The unknown concept is dropped from
/// the ranking unless a case expects it.
pub async fn evaluate(
	service: &CuimapService,
	dataset: &EvalDataset,
	top_k: usize,
) -> color_eyre::Result<EvalOutput> {
	let top_k = top_k.max(1);
	let unknown_cui = service.cfg.resolver.unknown_cui.as_str();
	let mut reports = Vec::with_capacity(dataset.cases.len());
	let mut latencies_ms = Vec::with_capacity(dataset.cases.len());

	for (index, case) in dataset.cases.iter().enumerate() {
		let expected: HashSet<&str> = case.expected_cuis.iter().map(String::as_str).collect();
		let started = Instant::now();
		let resolved = service.resolve(&case.phrases).await?;
		let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;
		let retrieved: Vec<String> = resolved
			.into_iter()
			.map(|concept| concept.cui)
			.filter(|cui| cui != unknown_cui || expected.contains(cui.as_str()))
			.take(top_k)
			.collect();
		let metrics = compute_metrics(&retrieved, &expected);

		tracing::debug!(case = index, recall = metrics.recall_at_k, rr = metrics.rr, "Case scored.");

		reports.push(CaseReport {
			id: case.id.clone().unwrap_or_else(|| format!("case-{index}")),
			phrases: case.phrases.clone(),
			expected_cuis: case.expected_cuis.clone(),
			retrieved_cuis: retrieved,
			relevant_count: metrics.relevant_count,
			recall_at_k: metrics.recall_at_k,
			rr: metrics.rr,
			latency_ms,
		});

		latencies_ms.push(latency_ms);
	}

	let summary = summarize(&reports, &latencies_ms);

	Ok(EvalOutput {
		dataset: EvalDatasetInfo {
			name: dataset.name.clone().unwrap_or_else(|| "eval".to_string()),
			case_count: reports.len(),
		},
		generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
		top_k,
		summary,
		cases: reports,
	})
}

fn compute_metrics(retrieved: &[String], expected: &HashSet<&str>) -> Metrics {
	let mut relevant_count = 0_usize;
	let mut first_hit = None;

	for (idx, cui) in retrieved.iter().enumerate() {
		if expected.contains(cui.as_str()) {
			relevant_count += 1;

			if first_hit.is_none() {
				first_hit = Some(idx + 1);
			}
		}
	}

	let rr = first_hit.map(|rank| 1.0 / rank as f64).unwrap_or(0.0);
	let recall_at_k =
		if expected.is_empty() { 0.0 } else { relevant_count as f64 / expected.len() as f64 };

	Metrics { recall_at_k, rr, relevant_count }
}

fn summarize(reports: &[CaseReport], latencies_ms: &[f64]) -> EvalSummary {
	let count = reports.len().max(1) as f64;
	let avg_recall_at_k = reports.iter().map(|r| r.recall_at_k).sum::<f64>() / count;
	let mean_rr = reports.iter().map(|r| r.rr).sum::<f64>() / count;
	let hit_rate_at_k = reports.iter().filter(|r| r.relevant_count > 0).count() as f64 / count;
	let mut sorted = latencies_ms.to_vec();

	sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

	EvalSummary {
		avg_recall_at_k,
		mean_rr,
		hit_rate_at_k,
		latency_ms_p50: percentile(&sorted, 0.50),
		latency_ms_p95: percentile(&sorted, 0.95),
	}
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
	if values.is_empty() {
		return 0.0;
	}

	let clamped = percentile.clamp(0.0, 1.0);
	let pos = clamped * (values.len() as f64 - 1.0);
	let lower = pos.floor() as usize;
	let upper = pos.ceil() as usize;

	if lower == upper {
		values[lower]
	} else {
		let weight = pos - lower as f64;

		values[lower] * (1.0 - weight) + values[upper] * weight
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cuis(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|cui| cui.to_string()).collect()
	}

	#[test]
	fn reciprocal_rank_uses_first_relevant_position() {
		let expected: HashSet<&str> = ["C2", "C9"].into_iter().collect();
		let metrics = compute_metrics(&cuis(&["C1", "C2", "C3"]), &expected);

		assert_eq!(metrics.relevant_count, 1);
		assert_eq!(metrics.rr, 0.5);
		assert_eq!(metrics.recall_at_k, 0.5);
	}

	#[test]
	fn no_expectations_score_zero() {
		let metrics = compute_metrics(&cuis(&["C1"]), &HashSet::new());

		assert_eq!(metrics.recall_at_k, 0.0);
		assert_eq!(metrics.rr, 0.0);
	}

	#[test]
	fn percentile_interpolates() {
		let values = [10.0, 20.0, 30.0, 40.0];

		assert_eq!(percentile(&values, 0.0), 10.0);
		assert_eq!(percentile(&values, 0.5), 25.0);
		assert_eq!(percentile(&values, 1.0), 40.0);
		assert_eq!(percentile(&[], 0.5), 0.0);
	}
}
