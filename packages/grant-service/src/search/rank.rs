use std::cmp::Ordering;

use crate::search::Candidate;
use grant_domain::text;

/// Orders candidates by similarity, best first. With a funding focus, calls whose title
/// contains it come first. The sort is stable.
pub fn rank(candidates: Vec<Candidate>, funding_focus: Option<&str>) -> Vec<Candidate> {
	let focus = funding_focus.map(text::fold).filter(|focus| !focus.is_empty());
	let mut keyed: Vec<(bool, Candidate)> = candidates
		.into_iter()
		.map(|candidate| {
			let boosted = focus
				.as_deref()
				.is_some_and(|focus| text::fold(&candidate.call.title).contains(focus));

			(boosted, candidate)
		})
		.collect();

	keyed.sort_by(|(a_boost, a), (b_boost, b)| {
		b_boost.cmp(a_boost).then_with(|| cmp_similarity_desc(a.similarity, b.similarity))
	});

	keyed.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Descending, with NaN after every number so the order stays total.
fn cmp_similarity_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
