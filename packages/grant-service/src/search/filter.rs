//! Soft narrowing by region and applicant type.
//!
//! A pass only narrows when something survives it; otherwise the unnarrowed set is kept.

use crate::search::Candidate;
use grant_domain::{context::SearchContext, eligibility, geography};

/// Geography first, then applicant eligibility. Order of survivors is preserved.
pub fn apply(ctx: &SearchContext, candidates: Vec<Candidate>) -> Vec<Candidate> {
	let mut candidates = candidates;

	if let Some(region) = ctx.region() {
		candidates = narrow_softly(candidates, "geography", |candidate| {
			geography::region_verdict(candidate.call.geographic_scope.as_deref(), region).keeps()
		});
	}
	if let Some(applicant) = ctx.applicant_type {
		candidates = narrow_softly(candidates, "eligibility", |candidate| {
			eligibility::applicant_matches(candidate.call.eligible_applicants.as_deref(), applicant)
		});
	}

	candidates
}

pub fn narrow_softly<F>(candidates: Vec<Candidate>, pass: &'static str, keep: F) -> Vec<Candidate>
where
	F: Fn(&Candidate) -> bool,
{
	if candidates.is_empty() {
		return candidates;
	}

	let (kept, dropped): (Vec<Candidate>, Vec<Candidate>) =
		candidates.into_iter().partition(|candidate| keep(candidate));

	if kept.is_empty() {
		tracing::debug!(pass, candidates = dropped.len(), "Narrowing matched nothing; keeping all.");

		return dropped;
	}

	kept
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use super::*;
	use grant_domain::context::ApplicantType;
	use grant_storage::models::GrantCall;

	fn candidate(id: u128, scope: Option<&str>, applicants: Option<&str>) -> Candidate {
		Candidate {
			call: GrantCall {
				call_id: Uuid::from_u128(id),
				title: format!("Výzva {id}"),
				provider: None,
				deadline_at: None,
				total_allocation: None,
				call_url: format!("https://example.sk/{id}"),
				status: "open".to_string(),
				eligible_applicants: applicants.map(str::to_string),
				geographic_scope: scope.map(str::to_string),
			},
			similarity: 0.5,
		}
	}

	fn ids(candidates: &[Candidate]) -> Vec<u128> {
		candidates.iter().map(|candidate| candidate.call.call_id.as_u128()).collect()
	}

	#[test]
	fn region_keeps_nationwide_and_drops_other_regions() {
		let ctx = SearchContext { region: Some("Košický".to_string()), ..Default::default() };
		let out = apply(
			&ctx,
			vec![
				candidate(1, Some("celé SR"), None),
				candidate(2, Some("Bratislavský kraj"), None),
				candidate(3, None, None),
			],
		);

		assert_eq!(ids(&out), vec![1, 3]);
	}

	#[test]
	fn region_never_empties_the_set() {
		let ctx = SearchContext { region: Some("Košický".to_string()), ..Default::default() };
		let out = apply(
			&ctx,
			vec![
				candidate(1, Some("Bratislavský kraj"), None),
				candidate(2, Some("celé SR okrem Košického kraja"), None),
			],
		);

		assert_eq!(ids(&out), vec![1, 2]);
	}

	#[test]
	fn applicant_type_narrows_after_region() {
		let ctx = SearchContext {
			applicant_type: Some(ApplicantType::Municipality),
			..Default::default()
		};
		let out = apply(
			&ctx,
			vec![
				candidate(1, None, Some("Malé a stredné podniky")),
				candidate(2, None, Some("Obce a mestá")),
				candidate(3, None, None),
			],
		);

		assert_eq!(ids(&out), vec![2, 3]);
	}
}
