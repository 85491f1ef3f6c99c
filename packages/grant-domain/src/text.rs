use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Lower-cased NFC form used by every substring rule.
pub fn fold(text: &str) -> String {
	text.nfc().collect::<String>().to_lowercase()
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
	needles.iter().any(|needle| haystack.contains(needle))
}

/// Whether `phrase` occurs in `haystack` as a run of whole words.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
	let words: Vec<&str> = haystack.unicode_words().collect();
	let needle: Vec<&str> = phrase.unicode_words().collect();

	!needle.is_empty() && words.windows(needle.len()).any(|window| window == needle.as_slice())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_decomposed_diacritics() {
		// "Košický" with a combining caron.
		let decomposed = "Kos\u{030C}ický";

		assert_eq!(fold(decomposed), "košický");
	}

	#[test]
	fn phrases_match_whole_words_only() {
		assert!(contains_phrase("celé sr, s výnimkou bratislavy", "s výnimkou"));
		assert!(contains_phrase("mimo bratislavský kraj", "mimo"));
		assert!(!contains_phrase("košický kraj, mimoriadna výzva", "mimo"));
		assert!(!contains_phrase("mimovládne organizácie", "mimo"));
		assert!(!contains_phrase("anything", ""));
	}
}
