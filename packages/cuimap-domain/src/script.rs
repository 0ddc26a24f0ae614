use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptClass {
	/// ASCII letters, digits, whitespace, `-` and `_` only.
	Latin,
	NonLatin,
}
impl ScriptClass {
	pub fn of(text: &str) -> Self {
		if is_latin_script(text) { Self::Latin } else { Self::NonLatin }
	}

	pub fn is_latin(self) -> bool {
		self == Self::Latin
	}
}

pub fn is_latin_script(text: &str) -> bool {
	!text.is_empty()
		&& text
			.chars()
			.all(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace() || matches!(ch, '-' | '_'))
}

/// Folds ASCII and half-width katakana to their full-width forms.
pub fn to_fullwidth(input: &str) -> String {
	let mut out = String::with_capacity(input.len() * 3);
	let mut halfwidth_kana = String::new();

	for ch in input.chars() {
		if ('\u{FF61}'..='\u{FF9F}').contains(&ch) {
			halfwidth_kana.push(ch);

			continue;
		}

		flush_kana(&mut halfwidth_kana, &mut out);

		match ch {
			' ' => out.push('\u{3000}'),
			'!'..='~' => out.push(char::from_u32(ch as u32 + 0xFEE0).unwrap_or(ch)),
			_ => out.push(ch),
		}
	}

	flush_kana(&mut halfwidth_kana, &mut out);

	out
}

/// Parses a plain decimal (digits with at most one `.`), accepting full-width digits.
pub fn parse_plain_number(token: &str) -> Option<f64> {
	let folded: String = token.nfkc().collect();
	let mut dots = 0_usize;
	let mut digits = 0_usize;

	for ch in folded.chars() {
		match ch {
			'0'..='9' => digits += 1,
			'.' => dots += 1,
			_ => return None,
		}
	}

	if digits == 0 || dots > 1 {
		return None;
	}

	folded.parse().ok()
}

fn flush_kana(buffer: &mut String, out: &mut String) {
	if buffer.is_empty() {
		return;
	}

	out.extend(buffer.nfkc());
	buffer.clear();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_scripts() {
		assert_eq!(ScriptClass::of("body height"), ScriptClass::Latin);
		assert_eq!(ScriptClass::of("blood_pressure-high 120"), ScriptClass::Latin);
		assert_eq!(ScriptClass::of("身長"), ScriptClass::NonLatin);
		assert_eq!(ScriptClass::of("ｹｯｾｲLDH"), ScriptClass::NonLatin);
		assert_eq!(ScriptClass::of(""), ScriptClass::NonLatin);
	}

	#[test]
	fn folds_ascii_and_halfwidth_kana() {
		assert_eq!(to_fullwidth("ck_1"), "ｃｋ＿１");
		assert_eq!(to_fullwidth("ｹｯｾｲ"), "ケッセイ");
		assert_eq!(to_fullwidth("ｶﾞ a"), "ガ\u{3000}ａ");
		assert_eq!(to_fullwidth("白血球数"), "白血球数");
	}

	#[test]
	fn parses_only_plain_decimals() {
		assert_eq!(parse_plain_number("15.0"), Some(15.0));
		assert_eq!(parse_plain_number("１２０"), Some(120.0));
		assert_eq!(parse_plain_number("1.2.3"), None);
		assert_eq!(parse_plain_number("-5"), None);
		assert_eq!(parse_plain_number("1e3"), None);
		assert_eq!(parse_plain_number("."), None);
	}
}
