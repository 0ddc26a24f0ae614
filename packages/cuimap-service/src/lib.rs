pub mod fallback;
pub mod ranked;
pub mod resolve;
pub mod translate;

mod error;

pub use error::{Error, Result};
pub use fallback::SearchOutcome;
pub use resolve::ResolvedConcept;

use std::{future::Future, pin::Pin, sync::Arc};

use cuimap_config::{Config, TranslationProviderConfig};
use cuimap_domain::{
	lab_value::{LabNormalizer, LabTestTable},
	tokens::Morpheme,
};
use cuimap_fuzzy::{Features, NgramIndex};
use cuimap_providers::{
	morphology::{VibratoAnalyzer, WhitespaceAnalyzer},
	translation::HttpTranslator,
};
use cuimap_storage::{db::Db, lab_tests, models::SynonymRow, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Approximate string retrieval over the synonym vocabulary.
pub trait FuzzyIndex
where
	Self: Send + Sync,
{
	fn retrieve(&self, text: &str) -> Vec<String>;

	fn features(&self, text: &str) -> Features;

	fn similarity(&self, a: &Features, b: &Features) -> f64;
}

pub trait SynonymStore
where
	Self: Send + Sync,
{
	fn lookup_by_names<'a>(&'a self, names: &'a [String]) -> BoxFuture<'a, Result<Vec<SynonymRow>>>;
}

pub trait Translator
where
	Self: Send + Sync,
{
	fn translate<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<String>>;
}

/// Builds an independently owned translator. A fresh client is built for every attempt.
pub trait TranslatorFactory
where
	Self: Send + Sync,
{
	fn create(&self) -> color_eyre::Result<Box<dyn Translator>>;
}

pub trait MorphAnalyzer
where
	Self: Send + Sync,
{
	fn analyze(&self, text: &str) -> color_eyre::Result<Vec<Morpheme>>;
}

#[derive(Clone)]
pub struct Providers {
	pub translator: Arc<dyn TranslatorFactory>,
	pub analyzer: Arc<dyn MorphAnalyzer>,
}
impl Providers {
	pub fn new(translator: Arc<dyn TranslatorFactory>, analyzer: Arc<dyn MorphAnalyzer>) -> Self {
		Self { translator, analyzer }
	}

	/// HTTP translation plus the vibrato analyzer when a dictionary is configured, otherwise
	/// whitespace splitting.
	pub fn from_config(cfg: &Config) -> color_eyre::Result<Self> {
		let analyzer: Arc<dyn MorphAnalyzer> =
			match cfg.providers.morphology.dictionary_path.as_deref() {
				Some(path) => Arc::new(VibratoAnalyzer::load(path)?),
				None => {
					tracing::warn!(
						"No morphological dictionary configured; falling back to whitespace tokens."
					);

					Arc::new(WhitespaceAnalyzer)
				},
			};
		let translator = Arc::new(HttpTranslatorFactory { cfg: cfg.providers.translation.clone() });

		Ok(Self { translator, analyzer })
	}
}

/// Read-only reference data shared by every resolution.
pub struct ResolverContext {
	pub index: Arc<dyn FuzzyIndex>,
	pub store: Arc<dyn SynonymStore>,
	pub normalizer: LabNormalizer,
}
impl ResolverContext {
	pub fn new(
		index: Arc<dyn FuzzyIndex>,
		store: Arc<dyn SynonymStore>,
		normalizer: LabNormalizer,
	) -> Self {
		Self { index, store, normalizer }
	}

	/// Opens the dictionary, builds the n-gram index from its distinct synonyms and loads the
	/// lab-test reference table.
	pub async fn load(cfg: &Config) -> Result<Self> {
		let db = Db::open(&cfg.storage.sqlite).await?;
		let synonyms = queries::all_synonyms(&db).await?;
		let index = NgramIndex::build(cfg.index.ngram, cfg.index.threshold, synonyms);
		let table = LabTestTable::new(lab_tests::load_lab_tests(&cfg.normalizer)?);

		tracing::info!(
			synonyms = index.len(),
			lab_tests = table.len(),
			ngram = cfg.index.ngram,
			threshold = cfg.index.threshold,
			"Resolver context loaded."
		);

		Ok(Self::new(
			Arc::new(index),
			Arc::new(db),
			LabNormalizer::new(table, &cfg.normalizer),
		))
	}
}

pub struct CuimapService {
	pub cfg: Config,
	pub context: ResolverContext,
	pub providers: Providers,
}
impl CuimapService {
	pub fn new(cfg: Config, context: ResolverContext, providers: Providers) -> Self {
		Self { cfg, context, providers }
	}
}

struct HttpTranslatorFactory {
	cfg: TranslationProviderConfig,
}

impl FuzzyIndex for NgramIndex {
	fn retrieve(&self, text: &str) -> Vec<String> {
		NgramIndex::retrieve(self, text)
	}

	fn features(&self, text: &str) -> Features {
		NgramIndex::features(self, text)
	}

	fn similarity(&self, a: &Features, b: &Features) -> f64 {
		NgramIndex::similarity(self, a, b)
	}
}

impl SynonymStore for Db {
	fn lookup_by_names<'a>(&'a self, names: &'a [String]) -> BoxFuture<'a, Result<Vec<SynonymRow>>> {
		Box::pin(async move { Ok(queries::lookup_by_names(self, names).await?) })
	}
}

impl Translator for HttpTranslator {
	fn translate<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(HttpTranslator::translate(self, text))
	}
}

impl TranslatorFactory for HttpTranslatorFactory {
	fn create(&self) -> color_eyre::Result<Box<dyn Translator>> {
		Ok(Box::new(HttpTranslator::new(&self.cfg)?))
	}
}

impl MorphAnalyzer for VibratoAnalyzer {
	fn analyze(&self, text: &str) -> color_eyre::Result<Vec<Morpheme>> {
		Ok(VibratoAnalyzer::analyze(self, text))
	}
}

impl MorphAnalyzer for WhitespaceAnalyzer {
	fn analyze(&self, text: &str) -> color_eyre::Result<Vec<Morpheme>> {
		Ok(WhitespaceAnalyzer::analyze(self, text))
	}
}
