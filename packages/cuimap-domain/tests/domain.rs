use cuimap_config::Normalizer;
use cuimap_domain::{
	lab_value::{
		BLOOD_PRESSURE_ABNORMAL, BLOOD_PRESSURE_HIGH, BLOOD_PRESSURE_NORMAL, LabNormalizer,
		LabTestRange, LabTestTable,
	},
	script::{self, ScriptClass},
	tokens::{self, Morpheme, Tokenization},
};

fn normalizer() -> LabNormalizer {
	let cfg = Normalizer::default();
	let mut ranges = LabTestRange::expand_local_name("白血球数（ＷＢＣ）_血液", Some(9.0), Some(3.5));

	ranges.extend(cfg.extra_ranges.iter().map(LabTestRange::from));

	LabNormalizer::new(LabTestTable::new(ranges), &cfg)
}

fn phrases(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn numeric_values_are_classified_against_reference_ranges() {
	let normalizer = normalizer();
	let out = normalizer.normalize(&phrases(&[
		"creatine_kinase 211",
		"creatine_kinase 49",
		"Creatine_Kinase 100",
	]));

	assert_eq!(out, vec!["creatine_kinase_high", "creatine_kinase_low", "creatine_kinase_normal"]);
}

#[test]
fn full_width_space_and_units_are_tolerated() {
	let normalizer = normalizer();
	let out = normalizer.normalize(&phrases(&["白血球数\u{3000}15.0 ×千/μl", "ｗｂｃ 2.0"]));

	assert_eq!(out, vec!["白血球数_high", "ｗｂｃ_low"]);
}

#[test]
fn qualitative_markers_are_appended() {
	let normalizer = normalizer();
	let out = normalizer.normalize(&phrases(&["ＣＲＰ 高値", "血糖 低値", "尿蛋白 陰性"]));

	assert_eq!(out, vec!["ｃｒｐ_high", "血糖_low", "尿蛋白 陰性"]);
}

#[test]
fn blood_pressure_readings_are_grouped() {
	let normalizer = normalizer();
	let high = normalizer.normalize(&phrases(&["発熱", "血圧 130", "血圧 70", "咳嗽"]));
	let normal = normalizer.normalize(&phrases(&["血圧 110", "血圧 70"]));
	let diastolic = normalizer.normalize(&phrases(&["血圧 110", "血圧 85"]));

	assert_eq!(high, vec!["発熱", BLOOD_PRESSURE_HIGH, BLOOD_PRESSURE_ABNORMAL, "咳嗽"]);
	assert_eq!(normal, vec![BLOOD_PRESSURE_NORMAL]);
	assert_eq!(diastolic, vec![BLOOD_PRESSURE_HIGH, BLOOD_PRESSURE_ABNORMAL]);
}

#[test]
fn unknown_or_malformed_phrases_pass_through() {
	let normalizer = normalizer();
	let out = normalizer.normalize(&phrases(&["Headache", "unknown_test 12", "", "ast 1.2.3"]));

	assert_eq!(out, vec!["headache", "unknown_test 12", "", "ast 1.2.3"]);
}

#[test]
fn morphological_tokens_keep_content_words_only() {
	let morphemes = vec![
		Morpheme::new("頭", "名詞"),
		Morpheme::new("が", "助詞"),
		Morpheme::new("痛い", "形容詞"),
		Morpheme::new("MRI", "名詞"),
	];
	let content_pos = vec!["名詞".to_string(), "動詞".to_string(), "形容詞".to_string()];
	let tokens = tokens::content_tokens(&morphemes, &content_pos);

	assert_eq!(tokens, vec!["頭", "痛い"]);
	assert_eq!(
		tokens::right_trims(&tokens, Tokenization::Morphological),
		vec!["頭痛い".to_string(), "頭".to_string()]
	);
	assert_eq!(tokens::left_trims(&tokens, Tokenization::Morphological), vec!["痛い".to_string()]);
}

#[test]
fn script_classification_matches_alphanumeric_rule() {
	assert_eq!(ScriptClass::of("chest pain"), ScriptClass::Latin);
	assert_eq!(ScriptClass::of("type_2-diabetes"), ScriptClass::Latin);
	assert_eq!(ScriptClass::of("胸痛"), ScriptClass::NonLatin);
	assert_eq!(ScriptClass::of("fever!"), ScriptClass::NonLatin);
	assert_eq!(script::to_fullwidth("ck 1"), "ｃｋ\u{3000}１");
}
