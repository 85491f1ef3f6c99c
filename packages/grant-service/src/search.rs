pub mod filter;
pub mod hydrate;
pub mod rank;

use std::{future::Future, time::Instant};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, GrantService, Result};
use grant_config::MAX_PAGE_SIZE;
use grant_domain::{context::SearchContext, query};
use grant_storage::models::{ChunkMatch, GrantCall};

/// One grant call in a search answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantResult {
	pub id: Uuid,
	pub title: String,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub deadline_at: Option<OffsetDateTime>,
	pub total_allocation: Option<f64>,
	pub provider: Option<String>,
	pub call_url: String,
	pub similarity: f32,
}

/// A hydrated catalog row moving through filtering and ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub call: GrantCall,
	pub similarity: f32,
}
impl From<Candidate> for GrantResult {
	fn from(candidate: Candidate) -> Self {
		let Candidate { call, similarity } = candidate;

		Self {
			id: call.call_id,
			title: call.title,
			deadline_at: call.deadline_at,
			total_allocation: call.total_allocation,
			provider: call.provider,
			call_url: call.call_url,
			similarity,
		}
	}
}

impl GrantService {
	/// Finds open grant calls for `ctx` and the raw user message.
	///
	/// Never fails. Unavailable collaborators shrink the answer, possibly to nothing, and are
	/// reported through `tracing`.
	pub async fn search(&self, ctx: &SearchContext, raw_message: &str) -> Vec<GrantResult> {
		self.search_at(ctx, raw_message, OffsetDateTime::now_utc()).await
	}

	/// [`GrantService::search`] evaluated at `now`, which is used for deadline checks and cache
	/// freshness.
	pub async fn search_at(
		&self,
		ctx: &SearchContext,
		raw_message: &str,
		now: OffsetDateTime,
	) -> Vec<GrantResult> {
		let started = Instant::now();
		let search_cfg = &self.cfg.search;
		let query = query::build_search_query(ctx, raw_message, search_cfg.query_max_chars as usize);

		if let Err(err) = self.check_configuration() {
			tracing::error!(error = %err, "Grant search is not configured.");

			return Vec::new();
		}
		if let Some(mut hit) = self.caches.results.get_at(&query, now) {
			hit.retain(|grant| grant.deadline_at.is_none_or(|deadline| deadline > now));

			tracing::info!(query = %query, results = hit.len(), "Serving grant search from cache.");

			return hit;
		}

		let mut candidates = match self.vector_candidates(&query, now).await {
			Ok(candidates) => candidates,
			Err(err) => {
				tracing::warn!(error = %err, query = %query, "Vector path failed.");

				Vec::new()
			},
		};
		let vector_count = candidates.len();

		candidates = filter::apply(ctx, candidates);
		candidates = rank::rank(candidates, ctx.funding_focus());

		let narrowed_count = candidates.len();
		let mut fallback_added = 0;

		if !raw_message.trim().is_empty() {
			match self.fallback_calls(raw_message, now).await {
				Ok(calls) => {
					fallback_added = hydrate::merge_fallback(
						&mut candidates,
						calls,
						now,
						&search_cfg.open_statuses,
					);
					candidates = rank::rank(candidates, ctx.funding_focus());
				},
				Err(err) => {
					tracing::warn!(error = %err, query = %query, "Keyword fallback failed.");
				},
			}
		}

		candidates.truncate(search_cfg.page_size.min(MAX_PAGE_SIZE) as usize);

		let results: Vec<GrantResult> = candidates.into_iter().map(GrantResult::from).collect();

		self.caches.results.put_at(&query, results.clone(), now);

		tracing::info!(
			query = %query,
			vector_candidates = vector_count,
			after_filters = narrowed_count,
			fallback_added,
			results = results.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Grant search completed."
		);

		results
	}

	fn check_configuration(&self) -> Result<()> {
		let missing = self.cfg.missing_credentials();

		if missing.is_empty() {
			return Ok(());
		}

		Err(Error::Configuration { message: format!("Missing {}.", missing.join(", ")) })
	}

	async fn vector_candidates(&self, query: &str, now: OffsetDateTime) -> Result<Vec<Candidate>> {
		let search_cfg = &self.cfg.search;
		let vector = self.query_vector(query, now).await?;
		let matches = bounded(
			search_cfg.timeouts.retrieval_ms,
			self.backends.retriever.retrieve_matches(
				&vector,
				search_cfg.match_threshold,
				search_cfg.match_count,
			),
			|message| Error::Retrieval { message },
		)
		.await?;

		if matches.is_empty() {
			return Ok(Vec::new());
		}

		let call_ids = distinct_call_ids(&matches);
		let calls = bounded(
			search_cfg.timeouts.catalog_ms,
			self.backends.catalog.fetch_calls(&call_ids),
			|message| Error::Storage { message },
		)
		.await?;

		Ok(hydrate::hydrate(matches, calls, now, &search_cfg.open_statuses))
	}

	async fn query_vector(&self, query: &str, now: OffsetDateTime) -> Result<Vec<f32>> {
		if let Some(vector) = self.caches.embeddings.get_at(query, now) {
			tracing::debug!(query = %query, "Embedding cache hit.");

			return Ok(vector);
		}

		let texts = vec![query.to_string()];
		let embedded = bounded(
			self.cfg.search.timeouts.embedding_ms,
			self.backends.embedding.embed(&self.cfg.providers.embedding, &texts),
			|message| Error::Provider { message },
		)
		.await?;
		let Some(vector) = embedded.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};
		let expected = self.cfg.storage.qdrant.vector_dim as usize;

		if vector.len() != expected {
			return Err(Error::Provider {
				message: format!(
					"Embedding has {} dimensions; storage.qdrant.vector_dim is {expected}.",
					vector.len()
				),
			});
		}
		self.caches.embeddings.put_at(query, vector.clone(), now);

		Ok(vector)
	}

	async fn fallback_calls(&self, raw_message: &str, now: OffsetDateTime) -> Result<Vec<GrantCall>> {
		let search_cfg = &self.cfg.search;
		let tokens = query::fallback_tokens(
			raw_message,
			search_cfg.fallback.max_tokens as usize,
			search_cfg.fallback.min_token_chars as usize,
		);

		if tokens.is_empty() {
			return Ok(Vec::new());
		}

		tracing::debug!(?tokens, "Running keyword fallback.");

		bounded(
			search_cfg.timeouts.fallback_ms,
			self.backends.catalog.search_titles(
				&tokens,
				&search_cfg.open_statuses,
				now,
				search_cfg.fallback.limit,
			),
			|message| Error::Fallback { message },
		)
		.await
		.map_err(|err| match err {
			Error::Fallback { .. } => err,
			other => Error::Fallback { message: other.to_string() },
		})
	}
}

async fn bounded<T, F>(
	timeout_ms: u64,
	fut: F,
	on_timeout: impl FnOnce(String) -> Error,
) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	match tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), fut).await {
		Ok(res) => res,
		Err(_) => Err(on_timeout(format!("Timed out after {timeout_ms} ms."))),
	}
}

fn distinct_call_ids(matches: &[ChunkMatch]) -> Vec<Uuid> {
	let mut out: Vec<Uuid> = Vec::with_capacity(matches.len());

	for chunk in matches {
		if !out.contains(&chunk.call_id) {
			out.push(chunk.call_id);
		}
	}

	out
}
