use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	#[serde(default)]
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// Embeds `texts` through an OpenAI-style `embeddings` endpoint. Vectors come back in input
/// order, one per text.
pub async fn embed(
	cfg: &grant_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base.trim_end_matches('/'), cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?
		.error_for_status()?;
	let bytes = res.bytes().await?;

	parse_embedding_response(&bytes, texts.len())
}

fn parse_embedding_response(raw: &[u8], expected: usize) -> Result<Vec<Vec<f32>>> {
	let response: EmbeddingResponse = serde_json::from_slice(raw).map_err(|err| {
		Error::InvalidResponse { message: format!("Malformed embedding response: {err}.") }
	})?;

	if response.data.len() != expected {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding response has {} vectors for {expected} inputs.",
				response.data.len()
			),
		});
	}

	let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];

	for (position, item) in response.data.into_iter().enumerate() {
		let index = item.index.unwrap_or(position);
		let Some(slot) = slots.get_mut(index) else {
			return Err(Error::InvalidResponse {
				message: format!("Embedding index {index} is out of range."),
			});
		};

		*slot = Some(item.embedding);
	}

	slots
		.into_iter()
		.map(|slot| {
			slot.ok_or_else(|| Error::InvalidResponse {
				message: "Embedding response repeats an index.".to_string(),
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn places_vectors_by_index() {
		let raw = br#"{"data":[{"index":1,"embedding":[2.0,3.0]},{"index":0,"embedding":[0.5,1.5]}]}"#;
		let parsed = parse_embedding_response(raw, 2).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn rejects_count_mismatch_and_bad_indexes() {
		let short = br#"{"data":[{"index":0,"embedding":[1.0]}]}"#;
		let repeated = br#"{"data":[{"index":0,"embedding":[1.0]},{"index":0,"embedding":[2.0]}]}"#;
		let missing = br#"{"object":"list"}"#;

		assert!(parse_embedding_response(short, 2).is_err());
		assert!(parse_embedding_response(repeated, 2).is_err());
		assert!(parse_embedding_response(missing, 1).is_err());
	}
}
