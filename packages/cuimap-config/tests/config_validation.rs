use toml::Value;

use cuimap_config::Error;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &[&str], key: &str, value: Value) -> String {
	with_value(SAMPLE_CONFIG_TOML, section, key, value)
}

fn with_value(raw: &str, section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(raw).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn validation_message(raw: &str) -> String {
	match cuimap_config::from_toml_str(raw) {
		Err(Error::Invalid { message }) => message,
		other => panic!("Expected validation error, got {other:?}."),
	}
}

#[test]
fn sample_config_loads_with_defaults() {
	let cfg = cuimap_config::from_toml_str(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.index.ngram, 2);
	assert_eq!(cfg.normalizer.name_column, "LOCAL_NAME");
	assert_eq!(cfg.normalizer.blood_pressure_marker, "血圧");
	assert_eq!(cfg.providers.translation.max_attempts, 5);
	assert_eq!(cfg.providers.translation.source_lang, "ja");
	assert_eq!(cfg.resolver.content_pos, vec!["名詞", "動詞", "形容詞"]);
}

#[test]
fn blank_dictionary_path_is_normalized_to_none() {
	let cfg = cuimap_config::from_toml_str(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert!(cfg.providers.morphology.dictionary_path.is_none());
	assert!(cfg.normalizer.lab_tests_path.is_some());
}

#[test]
fn threshold_out_of_range_is_rejected() {
	let raw = sample_with(&["index"], "threshold", Value::Float(1.5));

	assert_eq!(validation_message(&raw), "index.threshold must be in the range 0.0-1.0.");
}

#[test]
fn zero_ngram_is_rejected() {
	let raw = sample_with(&["index"], "ngram", Value::Integer(0));

	assert_eq!(validation_message(&raw), "index.ngram must be greater than zero.");
}

#[test]
fn zero_translation_attempts_are_rejected() {
	let raw = sample_with(&["providers", "translation"], "max_attempts", Value::Integer(0));

	assert_eq!(
		validation_message(&raw),
		"providers.translation.max_attempts must be greater than zero."
	);
}

#[test]
fn inverted_extra_range_is_rejected() {
	let mut range = toml::map::Map::new();

	range.insert("name".to_string(), Value::String("Sodium".to_string()));
	range.insert("upper".to_string(), Value::Float(100.0));
	range.insert("lower".to_string(), Value::Float(140.0));

	let raw = sample_with(&["normalizer"], "extra_ranges", Value::Array(vec![Value::Table(range)]));

	assert!(validation_message(&raw).contains("Sodium"));
}

#[test]
fn blank_api_base_is_allowed_when_translation_is_disabled() {
	let raw = sample_with(&["providers", "translation"], "api_base", Value::String(String::new()));

	assert!(validation_message(&raw).starts_with("providers.translation.api_base"));

	let raw = with_value(&raw, &["resolver"], "translation_enabled", Value::Boolean(false));

	assert!(cuimap_config::from_toml_str(&raw).is_ok());
}

#[test]
fn missing_file_reports_read_error() {
	let err = cuimap_config::load(std::path::Path::new("/nonexistent/cuimap.toml"))
		.expect_err("Missing file must fail.");

	assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn malformed_file_reports_its_path() {
	let path = std::env::temp_dir().join(format!("cuimap-config-{}.toml", std::process::id()));

	std::fs::write(&path, "[service\nhttp_bind = 1").expect("Failed to write config.");

	let err = cuimap_config::load(&path).expect_err("Malformed config must fail.");

	let _ = std::fs::remove_file(&path);

	assert!(matches!(&err, Error::ParseFile { path: reported, .. } if reported == &path));
	assert!(matches!(cuimap_config::from_toml_str("[service"), Err(Error::Parse { .. })));
}
