use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Client for the `translate_a/single` endpoint.
pub struct HttpTranslator {
	client: Client,
	url: String,
	source_lang: String,
	target_lang: String,
}
impl HttpTranslator {
	pub fn new(cfg: &cuimap_config::TranslationProviderConfig) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			client,
			url: format!("{}{}", cfg.api_base, cfg.path),
			source_lang: cfg.source_lang.clone(),
			target_lang: cfg.target_lang.clone(),
		})
	}

	pub async fn translate(&self, text: &str) -> Result<String> {
		let res = self
			.client
			.get(&self.url)
			.query(&[
				("client", "gtx"),
				("sl", self.source_lang.as_str()),
				("tl", self.target_lang.as_str()),
				("dt", "t"),
				("q", text),
			])
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_translation_response(&json)
	}
}

/// Concatenates the translated segments of a `[[["text", "source", ...], ...], ...]` response.
pub fn parse_translation_response(json: &Value) -> Result<String> {
	let segments = json
		.get(0)
		.and_then(Value::as_array)
		.ok_or_else(|| eyre::eyre!("Translation response is missing the segment array."))?;
	let mut out = String::new();

	for segment in segments {
		let Some(text) = segment.get(0).and_then(Value::as_str) else {
			continue;
		};

		out.push_str(text);
	}

	if out.trim().is_empty() {
		return Err(eyre::eyre!("Translation response contained no text."));
	}

	Ok(out)
}
