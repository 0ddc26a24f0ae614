//! Fixtures for resolver tests: an in-memory synonym dictionary, a test configuration and
//! scripted provider fakes.

mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
};

use color_eyre::eyre;

use cuimap_config::Config;
use cuimap_domain::{
	lab_value::{LabNormalizer, LabTestRange, LabTestTable},
	tokens::Morpheme,
};
use cuimap_fuzzy::NgramIndex;
use cuimap_service::{
	BoxFuture, CuimapService, MorphAnalyzer, Providers, ResolverContext, Translator,
	TranslatorFactory,
};
use cuimap_storage::{db::Db, models::NewSynonym, queries};

pub const UNKNOWN_CUI: &str = "C0439673";
pub const BODY_HEIGHT_CUI: &str = "C0005890";
pub const CHEST_PAIN_CUI: &str = "C0008031";
pub const HEMOPTYSIS_CUI: &str = "C0019079";
pub const FEMORAL_NECK_FRACTURE_CUI: &str = "C0015806";
pub const FOLLOW_UP_CUI: &str = "C1522577";
pub const CK_RAISED_CUI: &str = "C0151576";
pub const HYPERTENSION_CUI: &str = "C0020538";
pub const FEVER_CUI: &str = "C0015967";

const TEST_CONFIG: &str = r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "debug"

[storage.sqlite]
path = ":memory:"
pool_max_conns = 1

[index]
ngram = 2
threshold = 0.7

[normalizer]

[resolver]

[providers.translation]
api_base = "http://127.0.0.1:9"
path = "/translate_a/single"
timeout_ms = 1000
"#;

/// `(cui, semantic type, synonym, representative)`.
pub const DICTIONARY: &[(&str, &str, &str, &str)] = &[
	(BODY_HEIGHT_CUI, "Organism Attribute", "body height", "Body Height"),
	(BODY_HEIGHT_CUI, "Organism Attribute", "身長", "Body Height"),
	(CHEST_PAIN_CUI, "Sign or Symptom", "chest pain", "Chest Pain"),
	(HEMOPTYSIS_CUI, "Sign or Symptom", "hemoptysis", "Hemoptysis"),
	(FEMORAL_NECK_FRACTURE_CUI, "Injury or Poisoning", "大腿骨頸部骨折", "Femoral Neck Fractures"),
	(FOLLOW_UP_CUI, "Health Care Activity", "経過観察", "Follow-up"),
	(CK_RAISED_CUI, "Finding", "creatine kinase high", "Creatine kinase raised"),
	(HYPERTENSION_CUI, "Disease or Syndrome", "blood pressure high", "Hypertensive disease"),
	(FEVER_CUI, "Sign or Symptom", "fever", "Fever"),
	(FEVER_CUI, "Sign or Symptom", "発熱", "Fever"),
];

pub fn test_config() -> Result<Config> {
	Ok(cuimap_config::from_toml_str(TEST_CONFIG)?)
}

pub async fn dictionary(rows: &[(&str, &str, &str, &str)]) -> Result<Db> {
	let db = Db::in_memory().await?;
	let rows: Vec<NewSynonym> = rows
		.iter()
		.map(|(cui, semantic, synonym, representative)| NewSynonym {
			cui: cui.to_string(),
			semantic: semantic.to_string(),
			synonym: synonym.to_string(),
			representative: representative.to_string(),
			in_use: true,
		})
		.collect();

	queries::insert_synonyms(&db, &rows).await?;

	Ok(db)
}

/// Builds a resolver context over `db` the same way the service does at startup.
pub async fn context(cfg: &Config, db: Db) -> Result<ResolverContext> {
	let synonyms = queries::all_synonyms(&db).await?;
	let index = NgramIndex::build(cfg.index.ngram, cfg.index.threshold, synonyms);
	let ranges = cfg.normalizer.extra_ranges.iter().map(LabTestRange::from);
	let normalizer = LabNormalizer::new(LabTestTable::new(ranges), &cfg.normalizer);

	Ok(ResolverContext::new(Arc::new(index), Arc::new(db), normalizer))
}

pub async fn service(cfg: Config, providers: Providers) -> Result<CuimapService> {
	let db = dictionary(DICTIONARY).await?;
	let context = context(&cfg, db).await?;

	Ok(CuimapService::new(cfg, context, providers))
}

pub fn providers(
	translator: impl TranslatorFactory + 'static,
	analyzer: impl MorphAnalyzer + 'static,
) -> Providers {
	Providers::new(Arc::new(translator), Arc::new(analyzer))
}

/// Translates from a fixed table after failing a set number of attempts. Texts missing from the
/// table fail every attempt.
#[derive(Clone, Default)]
pub struct ScriptedTranslatorFactory {
	translations: Arc<HashMap<String, String>>,
	failures_before_success: u32,
	attempts: Arc<AtomicU32>,
	created: Arc<AtomicU32>,
}
impl ScriptedTranslatorFactory {
	pub fn new<I, K, V>(translations: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let translations =
			translations.into_iter().map(|(from, to)| (from.into(), to.into())).collect();

		Self { translations: Arc::new(translations), ..Default::default() }
	}

	pub fn failing_first(mut self, failures: u32) -> Self {
		self.failures_before_success = failures;

		self
	}

	pub fn attempts(&self) -> u32 {
		self.attempts.load(Ordering::SeqCst)
	}

	pub fn clients_created(&self) -> u32 {
		self.created.load(Ordering::SeqCst)
	}
}

impl TranslatorFactory for ScriptedTranslatorFactory {
	fn create(&self) -> color_eyre::Result<Box<dyn Translator>> {
		self.created.fetch_add(1, Ordering::SeqCst);

		Ok(Box::new(self.clone()))
	}
}

impl Translator for ScriptedTranslatorFactory {
	fn translate<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

			if attempt <= self.failures_before_success {
				return Err(eyre::eyre!("Scripted failure on attempt {attempt}."));
			}

			self.translations
				.get(text)
				.cloned()
				.ok_or_else(|| eyre::eyre!("No scripted translation for {text:?}."))
		})
	}
}

/// A factory whose clients never succeed.
pub fn failing_translator() -> ScriptedTranslatorFactory {
	ScriptedTranslatorFactory::new(Vec::<(String, String)>::new())
}

/// Returns fixed morphemes per text; unknown texts are split on whitespace and tagged as nouns.
#[derive(Clone, Default)]
pub struct FixedAnalyzer {
	analyses: HashMap<String, Vec<Morpheme>>,
}
impl FixedAnalyzer {
	pub fn with(mut self, text: &str, morphemes: &[(&str, &str)]) -> Self {
		self.analyses.insert(
			text.to_string(),
			morphemes.iter().map(|(surface, pos)| Morpheme::new(*surface, *pos)).collect(),
		);

		self
	}
}

impl MorphAnalyzer for FixedAnalyzer {
	fn analyze(&self, text: &str) -> color_eyre::Result<Vec<Morpheme>> {
		Ok(self.analyses.get(text).cloned().unwrap_or_else(|| {
			text.split_whitespace().map(|surface| Morpheme::new(surface, "名詞")).collect()
		}))
	}
}

pub struct FailingAnalyzer;

impl MorphAnalyzer for FailingAnalyzer {
	fn analyze(&self, _: &str) -> color_eyre::Result<Vec<Morpheme>> {
		Err(eyre::eyre!("Analyzer is unavailable."))
	}
}
