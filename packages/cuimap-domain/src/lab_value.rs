//! Lab-test mention normalization.
//!
//! Quantitative mentions such as `白血球数 15.0 ×千/μl` are rewritten into qualitative tokens
//! (`白血球数_high`) by comparing the value against a reference range. Blood-pressure readings are
//! folded as a group: the first reading is taken as systolic and every later one as diastolic.
//! That ordering is assumed, not checked, so callers must pass readings in measurement order.

use std::{collections::HashMap, sync::OnceLock};

use regex::Regex;

use crate::script;

pub const BLOOD_PRESSURE_HIGH: &str = "blood_pressure_high";
pub const BLOOD_PRESSURE_ABNORMAL: &str = "blood_pressure_abnormal";
pub const BLOOD_PRESSURE_NORMAL: &str = "blood_pressure_normal";

/// Stand-in for an absent reference bound.
pub const MISSING_BOUND: f64 = 10_000_000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LabTestRange {
	pub name: String,
	pub upper: Option<f64>,
	pub lower: Option<f64>,
}
impl LabTestRange {
	pub fn new(name: impl Into<String>, upper: Option<f64>, lower: Option<f64>) -> Self {
		Self { name: name.into(), upper, lower }
	}

	/// Expands a reference-sheet name such as `白血球数（ＷＢＣ）_血液` into every lookup name it
	/// carries: the name without each parenthetical, the parenthetical text, and the raw name.
	pub fn expand_local_name(raw: &str, upper: Option<f64>, lower: Option<f64>) -> Vec<Self> {
		let base = raw.split('_').next().unwrap_or(raw);
		let mut out = Vec::new();

		for found in parenthetical_regex().into_iter().flat_map(|re| re.find_iter(base)) {
			let alias = found.as_str();

			out.push(Self::new(base.replace(alias, ""), upper, lower));
			out.push(Self::new(alias.trim_start_matches('（').trim_end_matches('）'), upper, lower));
		}

		out.push(Self::new(raw, upper, lower));

		out
	}

	pub fn classify(&self, value: f64) -> LabLevel {
		let upper = self.upper.unwrap_or(MISSING_BOUND);
		let lower = self.lower.unwrap_or(-MISSING_BOUND);

		if value > upper {
			LabLevel::High
		} else if value < lower {
			LabLevel::Low
		} else {
			LabLevel::Normal
		}
	}
}

impl From<&cuimap_config::ExtraRange> for LabTestRange {
	fn from(extra: &cuimap_config::ExtraRange) -> Self {
		Self::new(extra.name.clone(), extra.upper, extra.lower)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabLevel {
	High,
	Low,
	Normal,
}
impl LabLevel {
	pub fn suffix(self) -> &'static str {
		match self {
			Self::High => "_high",
			Self::Low => "_low",
			Self::Normal => "_normal",
		}
	}
}

/// Reference ranges keyed by the full-width form of the test name.
#[derive(Clone, Debug, Default)]
pub struct LabTestTable {
	ranges: HashMap<String, LabTestRange>,
}
impl LabTestTable {
	pub fn new(ranges: impl IntoIterator<Item = LabTestRange>) -> Self {
		let mut table = HashMap::new();

		for range in ranges {
			let key = lookup_key(&range.name.to_lowercase().replace(' ', "_"));

			if key.is_empty() {
				continue;
			}

			table.entry(key).or_insert(range);
		}

		Self { ranges: table }
	}

	pub fn lookup(&self, test_name: &str) -> Option<&LabTestRange> {
		self.ranges.get(&lookup_key(&test_name.to_lowercase()))
	}

	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}
}

#[derive(Clone, Debug)]
pub struct LabNormalizer {
	table: LabTestTable,
	blood_pressure_marker: String,
	elevated_marker: String,
	low_marker: String,
	systolic_threshold: f64,
	diastolic_threshold: f64,
}
impl LabNormalizer {
	pub fn new(table: LabTestTable, cfg: &cuimap_config::Normalizer) -> Self {
		Self {
			table,
			blood_pressure_marker: cfg.blood_pressure_marker.to_lowercase(),
			elevated_marker: cfg.elevated_marker.to_lowercase(),
			low_marker: cfg.low_marker.to_lowercase(),
			systolic_threshold: cfg.systolic_threshold,
			diastolic_threshold: cfg.diastolic_threshold,
		}
	}

	pub fn table(&self) -> &LabTestTable {
		&self.table
	}

	/// Rewrites lab-test mentions. Output keeps input order; the blood-pressure group is emitted
	/// where its first reading appeared. Anything unrecognized passes through case-folded.
	pub fn normalize(&self, phrases: &[String]) -> Vec<String> {
		let mut slots = Vec::with_capacity(phrases.len());
		let mut readings = Vec::new();

		for raw in phrases {
			let phrase = fold_phrase(raw);
			let mut tokens = phrase.split_whitespace();
			let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
				slots.push(Slot::Ready(vec![phrase]));

				continue;
			};
			let Some(number) = script::parse_plain_number(value) else {
				slots.push(Slot::Ready(vec![self.qualitative(&phrase, name, value)]));

				continue;
			};

			if name == self.blood_pressure_marker {
				if readings.is_empty() {
					slots.push(Slot::BloodPressure);
				}

				readings.push(number);

				continue;
			}

			slots.push(Slot::Ready(vec![self.quantitative(&phrase, name, number)]));
		}

		let blood_pressure = self.blood_pressure(&readings);

		slots
			.into_iter()
			.flat_map(|slot| match slot {
				Slot::Ready(out) => out,
				Slot::BloodPressure => blood_pressure.clone(),
			})
			.collect()
	}

	fn qualitative(&self, phrase: &str, name: &str, value: &str) -> String {
		if value.contains(&self.elevated_marker) {
			format!("{name}_high")
		} else if value.contains(&self.low_marker) {
			format!("{name}_low")
		} else {
			phrase.to_string()
		}
	}

	fn quantitative(&self, phrase: &str, name: &str, value: f64) -> String {
		match self.table.lookup(name) {
			Some(range) => format!("{name}{}", range.classify(value).suffix()),
			None => phrase.to_string(),
		}
	}

	fn blood_pressure(&self, readings: &[f64]) -> Vec<String> {
		let abnormal = readings.iter().enumerate().any(|(idx, reading)| {
			let threshold =
				if idx == 0 { self.systolic_threshold } else { self.diastolic_threshold };

			*reading >= threshold
		});

		if abnormal {
			vec![BLOOD_PRESSURE_HIGH.to_string(), BLOOD_PRESSURE_ABNORMAL.to_string()]
		} else {
			vec![BLOOD_PRESSURE_NORMAL.to_string()]
		}
	}
}

enum Slot {
	Ready(Vec<String>),
	BloodPressure,
}

pub fn fold_phrase(raw: &str) -> String {
	raw.to_lowercase().replace('\u{3000}', " ")
}

fn lookup_key(name: &str) -> String {
	script::to_fullwidth(name.trim())
}

fn parenthetical_regex() -> Option<&'static Regex> {
	static RE: OnceLock<Option<Regex>> = OnceLock::new();

	RE.get_or_init(|| Regex::new("（.+?）").ok()).as_ref()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_parenthetical_aliases() {
		let expanded = LabTestRange::expand_local_name("白血球数（ＷＢＣ）_血液", Some(9.0), Some(3.5));
		let names: Vec<&str> = expanded.iter().map(|range| range.name.as_str()).collect();

		assert_eq!(names, vec!["白血球数", "ＷＢＣ", "白血球数（ＷＢＣ）_血液"]);
		assert!(expanded.iter().all(|range| range.upper == Some(9.0)));
	}

	#[test]
	fn missing_bounds_use_surrogates() {
		let range = LabTestRange::new("crp", None, None);

		assert_eq!(range.classify(9_999_999.0), LabLevel::Normal);
		assert_eq!(range.classify(10_000_001.0), LabLevel::High);
		assert_eq!(range.classify(-10_000_001.0), LabLevel::Low);
	}

	#[test]
	fn table_lookup_is_width_and_case_insensitive() {
		let table = LabTestTable::new([
			LabTestRange::new("Creatine Kinase", Some(210.0), Some(50.0)),
			LabTestRange::new("ＬＤＨ", Some(222.0), Some(124.0)),
		]);

		assert!(table.lookup("creatine_kinase").is_some());
		assert!(table.lookup("ldh").is_some());
		assert!(table.lookup("ast").is_none());
	}
}
