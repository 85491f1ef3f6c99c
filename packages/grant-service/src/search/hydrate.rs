//! Resolves chunk hits into catalog rows and merges keyword-fallback rows.

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::search::Candidate;
use grant_domain::status;
use grant_storage::models::{ChunkMatch, GrantCall};

/// Turns chunk hits (best first) into one candidate per call.
///
/// `calls` is the catalog answer for the hit ids, in any order. A hit whose call is missing,
/// past its deadline or not open is skipped. Catalog fields win; an absent provider or
/// allocation is taken from the hit's payload copy.
pub fn hydrate(
	matches: Vec<ChunkMatch>,
	calls: Vec<GrantCall>,
	now: OffsetDateTime,
	open_statuses: &[String],
) -> Vec<Candidate> {
	let mut by_id: HashMap<Uuid, GrantCall> =
		calls.into_iter().map(|call| (call.call_id, call)).collect();
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for chunk in matches {
		if !seen.insert(chunk.call_id) {
			continue;
		}

		let Some(mut call) = by_id.remove(&chunk.call_id) else {
			tracing::debug!(call_id = %chunk.call_id, "Hydration gap; chunk has no catalog row.");

			continue;
		};

		if !is_live(&call, now, open_statuses) {
			continue;
		}
		if call.provider.is_none() {
			call.provider = chunk.provider;
		}
		if call.total_allocation.is_none() {
			call.total_allocation = chunk.total_allocation;
		}

		out.push(Candidate { call, similarity: chunk.similarity });
	}

	out
}

/// Appends keyword-fallback rows not already present, with similarity 0. Returns how many were
/// added.
pub fn merge_fallback(
	candidates: &mut Vec<Candidate>,
	calls: Vec<GrantCall>,
	now: OffsetDateTime,
	open_statuses: &[String],
) -> usize {
	let mut seen: HashSet<Uuid> = candidates.iter().map(|candidate| candidate.call.call_id).collect();
	let before = candidates.len();

	for call in calls {
		if !is_live(&call, now, open_statuses) || !seen.insert(call.call_id) {
			continue;
		}

		candidates.push(Candidate { call, similarity: 0.0 });
	}

	candidates.len() - before
}

fn is_live(call: &GrantCall, now: OffsetDateTime, open_statuses: &[String]) -> bool {
	if call.deadline_at.is_some_and(|deadline| deadline <= now) {
		return false;
	}

	status::is_open_status(&call.status, open_statuses)
}

#[cfg(test)]
mod tests {
	use time::{Duration, macros::datetime};

	use super::*;

	fn call(id: u128, status: &str, deadline_at: Option<OffsetDateTime>) -> GrantCall {
		GrantCall {
			call_id: Uuid::from_u128(id),
			title: format!("Výzva {id}"),
			provider: None,
			deadline_at,
			total_allocation: None,
			call_url: format!("https://example.sk/{id}"),
			status: status.to_string(),
			eligible_applicants: None,
			geographic_scope: None,
		}
	}

	fn hit(id: u128, similarity: f32) -> ChunkMatch {
		ChunkMatch {
			call_id: Uuid::from_u128(id),
			similarity,
			title: None,
			provider: Some("Payload provider".to_string()),
			deadline_at: None,
			total_allocation: Some(250_000.0),
		}
	}

	fn open() -> Vec<String> {
		vec!["open".to_string()]
	}

	#[test]
	fn keeps_first_hit_per_call_in_retrieval_order() {
		let now = datetime!(2030-01-01 00:00 UTC);
		let calls = vec![call(2, "open", None), call(1, "Open", None)];
		let out = hydrate(vec![hit(1, 0.9), hit(2, 0.8), hit(1, 0.7)], calls, now, &open());
		let ids: Vec<u128> = out.iter().map(|c| c.call.call_id.as_u128()).collect();

		assert_eq!(ids, vec![1, 2]);
		assert_eq!(out[0].similarity, 0.9);
	}

	#[test]
	fn drops_gaps_expired_and_closed_calls() {
		let now = datetime!(2030-01-01 00:00 UTC);
		let calls = vec![
			call(1, "open", Some(now)),
			call(2, "closed", None),
			call(3, "open", Some(now + Duration::days(1))),
		];
		let out = hydrate(vec![hit(1, 0.9), hit(2, 0.8), hit(3, 0.7), hit(4, 0.6)], calls, now, &open());

		assert_eq!(out.len(), 1);
		assert_eq!(out[0].call.call_id, Uuid::from_u128(3));
	}

	#[test]
	fn catalog_fields_win_over_payload_copies() {
		let now = datetime!(2030-01-01 00:00 UTC);
		let mut with_provider = call(1, "open", None);

		with_provider.provider = Some("MH SR".to_string());

		let out = hydrate(vec![hit(1, 0.9)], vec![with_provider], now, &open());

		assert_eq!(out[0].call.provider.as_deref(), Some("MH SR"));
		assert_eq!(out[0].call.total_allocation, Some(250_000.0));
	}

	#[test]
	fn fallback_merge_skips_known_and_rechecks_status() {
		let now = datetime!(2030-01-01 00:00 UTC);
		let mut candidates = vec![Candidate { call: call(1, "open", None), similarity: 0.8 }];
		let added = merge_fallback(
			&mut candidates,
			vec![call(1, "open", None), call(2, "draft", None), call(3, "open", None)],
			now,
			&open(),
		);

		assert_eq!(added, 1);
		assert_eq!(candidates[1].call.call_id, Uuid::from_u128(3));
		assert_eq!(candidates[1].similarity, 0.0);
	}
}
