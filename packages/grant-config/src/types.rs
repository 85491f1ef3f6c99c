use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
}
impl Config {
	/// Labels of required credentials or endpoints that are blank.
	///
	/// These are not rejected at load time. The search pipeline reports them per request and
	/// answers with an empty result set.
	pub fn missing_credentials(&self) -> Vec<&'static str> {
		let mut missing = Vec::new();

		for (label, value) in [
			("providers.embedding.api_key", &self.providers.embedding.api_key),
			("providers.embedding.api_base", &self.providers.embedding.api_base),
			("storage.postgres.dsn", &self.storage.postgres.dsn),
			("storage.qdrant.url", &self.storage.qdrant.url),
		] {
			if value.trim().is_empty() {
				missing.push(label);
			}
		}

		missing
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default)]
	pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_reply: LlmReplyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmReplyConfig {
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_system_prompt")]
	pub system_prompt: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub match_threshold: f32,
	pub match_count: u32,
	pub page_size: u32,
	pub query_max_chars: u32,
	#[serde(default = "default_open_statuses")]
	pub open_statuses: Vec<String>,
	pub cache: SearchCache,
	#[serde(default)]
	pub fallback: SearchFallback,
	#[serde(default)]
	pub timeouts: SearchTimeouts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCache {
	pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchFallback {
	pub max_tokens: u32,
	pub min_token_chars: u32,
	pub limit: u32,
}
impl Default for SearchFallback {
	fn default() -> Self {
		Self { max_tokens: 2, min_token_chars: 4, limit: 10 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchTimeouts {
	pub embedding_ms: u64,
	pub retrieval_ms: u64,
	pub catalog_ms: u64,
	pub fallback_ms: u64,
}
impl Default for SearchTimeouts {
	fn default() -> Self {
		Self { embedding_ms: 10_000, retrieval_ms: 8_000, catalog_ms: 8_000, fallback_ms: 8_000 }
	}
}

pub fn default_open_statuses() -> Vec<String> {
	["open", "otvorená", "otvorena", "aktívna", "active"].iter().map(|s| s.to_string()).collect()
}

fn default_system_prompt() -> String {
	"Si slovenský grantový asistent. Pýtaj sa na chýbajúce info (sektor, región, typ projektu). \
Max 2-3 otázky. Buď stručný."
		.to_string()
}
