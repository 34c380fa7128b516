/// Canonicalizes raw text before it is cut into n-gram windows.
///
/// - Lowercases every character (Unicode aware)
/// - Collapses each run of whitespace (`' '`, `\n`, `\t`, `\r`, ...) into one ASCII space
/// - Trims leading and trailing whitespace
///
/// Training must go through this function so that generated windows
/// match future lookups.
pub fn normalize(text: &str) -> String {
	text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes control characters (`U+0000..=U+001F`, `U+007F`), keeping whitespace.
///
/// Raw files sometimes carry stray control bytes that would otherwise
/// end up as keys in the model.
pub fn strip_control(text: &str) -> String {
	text.chars()
		.filter(|c| !c.is_ascii_control() || c.is_whitespace())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_collapses_whitespace() {
		assert_eq!(normalize("  Hello\t\tWORLD\r\n  again "), "hello world again");
	}

	#[test]
	fn empty_and_blank_inputs_normalize_to_empty() {
		assert_eq!(normalize(""), "");
		assert_eq!(normalize(" \n\t\r "), "");
	}

	#[test]
	fn keeps_non_ascii_characters() {
		assert_eq!(normalize("ÉTÉ  Çà"), "été çà");
	}

	#[test]
	fn strip_control_keeps_vertical_tab_for_normalize() {
		assert_eq!(strip_control("a\u{0B}b\u{0C}c\u{1C}"), "a\u{0B}b\u{0C}c");
		assert_eq!(normalize(&strip_control("a\u{0B}b")), "a b");
	}

	#[test]
	fn strip_control_keeps_whitespace() {
		assert_eq!(strip_control("a\u{0}b\u{7f}c\nd\te"), "abc\nd\te");
	}
}
