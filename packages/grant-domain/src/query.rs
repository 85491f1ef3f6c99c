use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::context::SearchContext;

/// Used when neither the message nor the context yields any text, so retrieval never sees an
/// empty query.
pub const GENERIC_QUERY: &str = "grant support funding";

/// Derives the search string (and cache key) for a request.
///
/// A non-blank raw message wins and is used verbatim up to `max_chars` characters. Otherwise the
/// context hints are joined in the order funding focus, sector, region, keywords.
pub fn build_search_query(ctx: &SearchContext, raw_message: &str, max_chars: usize) -> String {
	let trimmed = raw_message.trim();

	if !trimmed.is_empty() {
		return trimmed.chars().take(max_chars).collect();
	}

	let mut parts: Vec<&str> = Vec::new();

	for part in [ctx.funding_focus.as_deref(), ctx.sector.as_deref(), ctx.region.as_deref()]
		.into_iter()
		.flatten()
		.chain(ctx.keywords.iter().map(String::as_str))
	{
		let part = part.trim();

		if !part.is_empty() {
			parts.push(part);
		}
	}

	if parts.is_empty() { GENERIC_QUERY.to_string() } else { parts.join(" ") }
}

/// Lower-cased alphanumeric tokens of at least `min_chars` characters, first `max_tokens`
/// distinct ones in message order.
pub fn fallback_tokens(message: &str, max_tokens: usize, min_chars: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for word in message.unicode_words() {
		for piece in word.split(|c: char| !c.is_alphanumeric()) {
			if out.len() >= max_tokens {
				return out;
			}
			if piece.chars().count() < min_chars {
				continue;
			}

			let token = piece.to_lowercase();

			if seen.insert(token.clone()) {
				out.push(token);
			}
		}
	}

	out
}
