mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmReplyConfig, Postgres, Providers, Qdrant, Search,
	SearchCache, SearchFallback, SearchTimeouts, Service, Storage, default_open_statuses,
};

use std::{fs, path::Path};

const MAX_EMBEDDING_TIMEOUT_MS: u64 = 10_000;
const MIN_CALL_TIMEOUT_MS: u64 = 8_000;
const MAX_CALL_TIMEOUT_MS: u64 = 20_000;

/// Upper bound on results returned by one search.
pub const MAX_PAGE_SIZE: u32 = 10;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, value) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("search.timeouts.embedding_ms", cfg.search.timeouts.embedding_ms),
	] {
		if value == 0 || value > MAX_EMBEDDING_TIMEOUT_MS {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 1-{MAX_EMBEDDING_TIMEOUT_MS}."),
			});
		}
	}
	for (label, value) in [
		("providers.llm_reply.timeout_ms", cfg.providers.llm_reply.timeout_ms),
		("search.timeouts.retrieval_ms", cfg.search.timeouts.retrieval_ms),
		("search.timeouts.catalog_ms", cfg.search.timeouts.catalog_ms),
		("search.timeouts.fallback_ms", cfg.search.timeouts.fallback_ms),
	] {
		if !(MIN_CALL_TIMEOUT_MS..=MAX_CALL_TIMEOUT_MS).contains(&value) {
			return Err(Error::Validation {
				message: format!(
					"{label} must be in the range {MIN_CALL_TIMEOUT_MS}-{MAX_CALL_TIMEOUT_MS}."
				),
			});
		}
	}

	if !cfg.search.match_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.match_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.match_threshold) {
		return Err(Error::Validation {
			message: "search.match_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	for (label, value) in [
		("search.match_count", cfg.search.match_count),
		("search.page_size", cfg.search.page_size),
		("search.query_max_chars", cfg.search.query_max_chars),
		("search.fallback.limit", cfg.search.fallback.limit),
		("search.fallback.min_token_chars", cfg.search.fallback.min_token_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.search.page_size > MAX_PAGE_SIZE {
		return Err(Error::Validation {
			message: format!("search.page_size must be in the range 1-{MAX_PAGE_SIZE}."),
		});
	}
	if cfg.search.cache.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.open_statuses.is_empty() {
		return Err(Error::Validation {
			message: "search.open_statuses must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.qdrant.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.qdrant.api_key = None;
	}

	cfg.search.open_statuses = cfg
		.search
		.open_statuses
		.iter()
		.map(|status| status.trim().to_lowercase())
		.filter(|status| !status.is_empty())
		.collect();
	cfg.service.cors_origins.retain(|origin| !origin.trim().is_empty());
}
