mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, ExtraRange, Index, MorphologyProviderConfig, Normalizer, Providers, Resolver, Service,
	Sqlite, Storage, TranslationProviderConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	from_toml_str(&raw).map_err(|err| match err {
		Error::Parse { source } => Error::ParseFile { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn from_toml_str(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw).map_err(|source| Error::Parse { source })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Invalid {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.path.as_os_str().is_empty() {
		return Err(Error::Invalid {
			message: "storage.sqlite.path must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.pool_max_conns == 0 {
		return Err(Error::Invalid {
			message: "storage.sqlite.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.index.ngram == 0 {
		return Err(Error::Invalid {
			message: "index.ngram must be greater than zero.".to_string(),
		});
	}
	if !cfg.index.threshold.is_finite() || !(0.0..=1.0).contains(&cfg.index.threshold) {
		return Err(Error::Invalid {
			message: "index.threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	for (label, value) in [
		("normalizer.name_column", &cfg.normalizer.name_column),
		("normalizer.upper_column", &cfg.normalizer.upper_column),
		("normalizer.lower_column", &cfg.normalizer.lower_column),
		("normalizer.blood_pressure_marker", &cfg.normalizer.blood_pressure_marker),
		("normalizer.elevated_marker", &cfg.normalizer.elevated_marker),
		("normalizer.low_marker", &cfg.normalizer.low_marker),
		("resolver.unknown_cui", &cfg.resolver.unknown_cui),
		("providers.translation.source_lang", &cfg.providers.translation.source_lang),
		("providers.translation.target_lang", &cfg.providers.translation.target_lang),
	] {
		if value.trim().is_empty() {
			return Err(Error::Invalid { message: format!("{label} must be non-empty.") });
		}
	}

	for (label, value) in [
		("normalizer.systolic_threshold", cfg.normalizer.systolic_threshold),
		("normalizer.diastolic_threshold", cfg.normalizer.diastolic_threshold),
		("resolver.non_latin_bonus", cfg.resolver.non_latin_bonus),
		("resolver.direct_hit_bonus", cfg.resolver.direct_hit_bonus),
		("resolver.unknown_score", cfg.resolver.unknown_score),
	] {
		if !value.is_finite() {
			return Err(Error::Invalid { message: format!("{label} must be a finite number.") });
		}
	}

	if cfg.resolver.non_latin_bonus < 0.0 || cfg.resolver.direct_hit_bonus < 0.0 {
		return Err(Error::Invalid {
			message: "resolver bonuses must be zero or greater.".to_string(),
		});
	}
	if cfg.resolver.content_pos.is_empty() {
		return Err(Error::Invalid {
			message: "resolver.content_pos must be non-empty.".to_string(),
		});
	}

	for range in &cfg.normalizer.extra_ranges {
		if range.name.trim().is_empty() {
			return Err(Error::Invalid {
				message: "normalizer.extra_ranges.name must be non-empty.".to_string(),
			});
		}
		if let (Some(upper), Some(lower)) = (range.upper, range.lower)
			&& upper < lower
		{
			return Err(Error::Invalid {
				message: format!(
					"normalizer.extra_ranges entry {} has an upper bound below its lower bound.",
					range.name
				),
			});
		}
	}

	if cfg.providers.translation.max_attempts == 0 {
		return Err(Error::Invalid {
			message: "providers.translation.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.translation.timeout_ms == 0 {
		return Err(Error::Invalid {
			message: "providers.translation.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.resolver.translation_enabled && cfg.providers.translation.api_base.trim().is_empty() {
		return Err(Error::Invalid {
			message: "providers.translation.api_base must be non-empty when translation is enabled."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.normalizer.lab_tests_path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false)
	{
		cfg.normalizer.lab_tests_path = None;
	}
	if cfg
		.providers
		.morphology
		.dictionary_path
		.as_deref()
		.map(|path| path.as_os_str().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.morphology.dictionary_path = None;
	}

	cfg.resolver.content_pos.retain(|pos| !pos.trim().is_empty());
}
