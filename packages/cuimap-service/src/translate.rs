use crate::TranslatorFactory;

/// Translates `text`, building a fresh client for every attempt. Returns `None` once
/// `max_attempts` attempts have failed.
pub async fn translate_with_retry(
	factory: &dyn TranslatorFactory,
	text: &str,
	max_attempts: u32,
) -> Option<String> {
	let mut last_error = None;

	for attempt in 1..=max_attempts {
		let result = match factory.create() {
			Ok(translator) => translator.translate(text).await,
			Err(err) => Err(err),
		};

		match result {
			Ok(translated) => {
				tracing::debug!(attempt, text, translated = %translated, "Translated phrase.");

				return Some(translated);
			},
			Err(err) => {
				tracing::debug!(attempt, error = %err, "Translation attempt failed.");

				last_error = Some(err);
			},
		}
	}

	tracing::warn!(
		attempts = max_attempts,
		error = last_error.map(|err| err.to_string()).unwrap_or_default(),
		"Translation failed; skipping the translated pass."
	);

	None
}

/// Case-folds and strips underscores from a translation before it is searched.
pub fn fold_translation(translated: &str) -> String {
	translated.to_lowercase().replace('_', "")
}
