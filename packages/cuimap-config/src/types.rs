use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub index: Index,
	pub normalizer: Normalizer,
	pub resolver: Resolver,
	pub providers: Providers,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub sqlite: Sqlite,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Sqlite {
	pub path: PathBuf,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
}

/// Character n-gram index used for coarse candidate retrieval.
#[derive(Clone, Debug, Deserialize)]
pub struct Index {
	#[serde(default = "default_ngram")]
	pub ngram: usize,
	#[serde(default = "default_threshold")]
	pub threshold: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Normalizer {
	/// Optional. Reference ranges CSV; when absent only `extra_ranges` are known.
	pub lab_tests_path: Option<PathBuf>,
	#[serde(default = "default_name_column")]
	pub name_column: String,
	#[serde(default = "default_upper_column")]
	pub upper_column: String,
	#[serde(default = "default_lower_column")]
	pub lower_column: String,
	#[serde(default = "default_blood_pressure_marker")]
	pub blood_pressure_marker: String,
	#[serde(default = "default_elevated_marker")]
	pub elevated_marker: String,
	#[serde(default = "default_low_marker")]
	pub low_marker: String,
	#[serde(default = "default_systolic_threshold")]
	pub systolic_threshold: f64,
	#[serde(default = "default_diastolic_threshold")]
	pub diastolic_threshold: f64,
	#[serde(default = "default_extra_ranges")]
	pub extra_ranges: Vec<ExtraRange>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExtraRange {
	pub name: String,
	pub upper: Option<f64>,
	pub lower: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Resolver {
	#[serde(default = "default_non_latin_bonus")]
	pub non_latin_bonus: f64,
	#[serde(default = "default_direct_hit_bonus")]
	pub direct_hit_bonus: f64,
	#[serde(default = "default_unknown_cui")]
	pub unknown_cui: String,
	#[serde(default = "default_unknown_score")]
	pub unknown_score: f64,
	#[serde(default = "default_true")]
	pub translation_enabled: bool,
	/// Part-of-speech tags (first feature field) kept after morphological analysis.
	#[serde(default = "default_content_pos")]
	pub content_pos: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub translation: TranslationProviderConfig,
	#[serde(default)]
	pub morphology: MorphologyProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TranslationProviderConfig {
	pub api_base: String,
	pub path: String,
	#[serde(default = "default_source_lang")]
	pub source_lang: String,
	#[serde(default = "default_target_lang")]
	pub target_lang: String,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	pub timeout_ms: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MorphologyProviderConfig {
	/// Optional. MeCab-compatible system dictionary compiled for vibrato (`.dic` or `.dic.zst`).
	pub dictionary_path: Option<PathBuf>,
}

impl Default for Index {
	fn default() -> Self {
		Self { ngram: default_ngram(), threshold: default_threshold() }
	}
}

impl Default for Normalizer {
	fn default() -> Self {
		Self {
			lab_tests_path: None,
			name_column: default_name_column(),
			upper_column: default_upper_column(),
			lower_column: default_lower_column(),
			blood_pressure_marker: default_blood_pressure_marker(),
			elevated_marker: default_elevated_marker(),
			low_marker: default_low_marker(),
			systolic_threshold: default_systolic_threshold(),
			diastolic_threshold: default_diastolic_threshold(),
			extra_ranges: default_extra_ranges(),
		}
	}
}

impl Default for Resolver {
	fn default() -> Self {
		Self {
			non_latin_bonus: default_non_latin_bonus(),
			direct_hit_bonus: default_direct_hit_bonus(),
			unknown_cui: default_unknown_cui(),
			unknown_score: default_unknown_score(),
			translation_enabled: true,
			content_pos: default_content_pos(),
		}
	}
}

fn default_pool_max_conns() -> u32 {
	4
}

fn default_ngram() -> usize {
	2
}

fn default_threshold() -> f64 {
	0.65
}

fn default_name_column() -> String {
	"LOCAL_NAME".to_string()
}

fn default_upper_column() -> String {
	"上限".to_string()
}

fn default_lower_column() -> String {
	"下限".to_string()
}

fn default_blood_pressure_marker() -> String {
	"血圧".to_string()
}

fn default_elevated_marker() -> String {
	"高値".to_string()
}

fn default_low_marker() -> String {
	"低値".to_string()
}

fn default_systolic_threshold() -> f64 {
	120.0
}

fn default_diastolic_threshold() -> f64 {
	80.0
}

fn default_extra_ranges() -> Vec<ExtraRange> {
	vec![ExtraRange { name: "Creatine Kinase".to_string(), upper: Some(210.0), lower: Some(50.0) }]
}

fn default_non_latin_bonus() -> f64 {
	2.0
}

fn default_direct_hit_bonus() -> f64 {
	1.0
}

fn default_unknown_cui() -> String {
	"C0439673".to_string()
}

fn default_unknown_score() -> f64 {
	5.0
}

fn default_true() -> bool {
	true
}

fn default_content_pos() -> Vec<String> {
	vec!["名詞".to_string(), "動詞".to_string(), "形容詞".to_string()]
}

fn default_source_lang() -> String {
	"ja".to_string()
}

fn default_target_lang() -> String {
	"en".to_string()
}

fn default_max_attempts() -> u32 {
	5
}
