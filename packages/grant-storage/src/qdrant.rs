pub const DENSE_VECTOR_NAME: &str = "dense";

use std::collections::HashMap;

use qdrant_client::qdrant::{Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::{Result, models::ChunkMatch};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &grant_config::Qdrant) -> Result<Self> {
		let mut builder = qdrant_client::Qdrant::from_url(&cfg.url);

		if let Some(api_key) = cfg.api_key.as_deref() {
			builder = builder.api_key(api_key);
		}

		let client = builder.build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Chunk hits scoring at least `threshold`, best first, at most `limit`.
	pub async fn retrieve_matches(
		&self,
		vector: Vec<f32>,
		threshold: f32,
		limit: u32,
	) -> Result<Vec<ChunkMatch>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.score_threshold(threshold)
			.with_payload(true)
			.limit(u64::from(limit));
		let response = self.client.query(search).await?;

		Ok(collect_chunk_matches(&response.result))
	}
}

pub fn collect_chunk_matches(points: &[ScoredPoint]) -> Vec<ChunkMatch> {
	let mut out = Vec::with_capacity(points.len());

	for point in points {
		let Some(call_id) = payload_uuid(&point.payload, "call_id") else {
			tracing::warn!("Chunk point missing call_id.");

			continue;
		};

		out.push(ChunkMatch {
			call_id,
			similarity: point.score,
			title: payload_string(&point.payload, "title"),
			provider: payload_string(&point.payload, "provider"),
			deadline_at: payload_rfc3339(&point.payload, "deadline_at"),
			total_allocation: payload_f64(&point.payload, "total_allocation"),
		});
	}

	out.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

	out
}

fn payload_uuid(payload: &HashMap<String, Value>, key: &str) -> Option<Uuid> {
	payload_string(payload, key).and_then(|text| Uuid::parse_str(&text).ok())
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}

fn payload_rfc3339(payload: &HashMap<String, Value>, key: &str) -> Option<OffsetDateTime> {
	let text = payload_string(payload, key)?;

	OffsetDateTime::parse(text.as_str(), &Rfc3339).ok()
}

fn payload_f64(payload: &HashMap<String, Value>, key: &str) -> Option<f64> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::DoubleValue(value)) => Some(*value),
		Some(Kind::IntegerValue(value)) => Some(*value as f64),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn string_value(text: &str) -> Value {
		Value { kind: Some(Kind::StringValue(text.to_string())) }
	}

	fn point(call_id: &str, score: f32, extra: &[(&str, Value)]) -> ScoredPoint {
		let mut payload = HashMap::new();

		payload.insert("call_id".to_string(), string_value(call_id));

		for (key, value) in extra {
			payload.insert(key.to_string(), value.clone());
		}

		ScoredPoint { payload, score, ..Default::default() }
	}

	#[test]
	fn reads_denormalized_payload_fields() {
		let id = "7d0f3c52-43c6-4f4b-9c5e-3d1f3c7d7f10";
		let points = vec![point(
			id,
			0.71,
			&[
				("title", string_value("Podpora MSP")),
				("deadline_at", string_value("2030-01-31T23:59:59Z")),
				("total_allocation", Value { kind: Some(Kind::IntegerValue(5_000_000)) }),
			],
		)];
		let matches = collect_chunk_matches(&points);

		assert_eq!(matches.len(), 1);
		assert_eq!(matches[0].call_id.to_string(), id);
		assert_eq!(matches[0].title.as_deref(), Some("Podpora MSP"));
		assert_eq!(matches[0].total_allocation, Some(5_000_000.0));
		assert!(matches[0].deadline_at.is_some());
		assert!(matches[0].provider.is_none());
	}

	#[test]
	fn skips_points_without_call_id_and_orders_by_score() {
		let points = vec![
			point("not-a-uuid", 0.9, &[]),
			point("11111111-1111-1111-1111-111111111111", 0.5, &[]),
			point("22222222-2222-2222-2222-222222222222", 0.8, &[]),
		];
		let matches = collect_chunk_matches(&points);

		assert_eq!(matches.len(), 2);
		assert_eq!(matches[0].similarity, 0.8);
	}
}
