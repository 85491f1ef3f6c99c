pub mod cache;
pub mod reply;
pub mod search;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

pub use cache::{SearchCaches, TtlCache};
pub use error::{Error, Result};
use grant_config::{Config, EmbeddingProviderConfig, LlmReplyConfig};
use grant_providers::{embedding, reply as llm_reply};
use grant_storage::{
	catalog,
	db::Db,
	models::{ChunkMatch, GrantCall},
	qdrant::QdrantStore,
};
pub use reply::{ChatReply, summarize_grants};
pub use search::{Candidate, GrantResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ChunkRetriever
where
	Self: Send + Sync,
{
	/// Chunk hits scoring at least `threshold`, best first, at most `limit`.
	fn retrieve_matches<'a>(
		&'a self,
		vector: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<ChunkMatch>>>;
}

pub trait GrantCatalog
where
	Self: Send + Sync,
{
	fn fetch_calls<'a>(&'a self, call_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<GrantCall>>>;

	/// Open calls whose title contains any of `tokens`, case-insensitively.
	fn search_titles<'a>(
		&'a self,
		tokens: &'a [String],
		open_statuses: &'a [String],
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<GrantCall>>>;
}

pub trait ReplyProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmReplyConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Backends {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub retriever: Arc<dyn ChunkRetriever>,
	pub catalog: Arc<dyn GrantCatalog>,
	pub reply: Arc<dyn ReplyProvider>,
}
impl Backends {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		retriever: Arc<dyn ChunkRetriever>,
		catalog: Arc<dyn GrantCatalog>,
		reply: Arc<dyn ReplyProvider>,
	) -> Self {
		Self { embedding, retriever, catalog, reply }
	}

	/// HTTP providers from `grant-providers` over the given stores.
	pub fn from_stores(db: Db, qdrant: QdrantStore) -> Self {
		let provider = Arc::new(DefaultProviders);

		Self {
			embedding: provider.clone(),
			retriever: Arc::new(qdrant),
			catalog: Arc::new(db),
			reply: provider,
		}
	}
}

pub struct GrantService {
	pub cfg: Config,
	pub backends: Backends,
	pub caches: SearchCaches,
}
impl GrantService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self::with_backends(cfg, Backends::from_stores(db, qdrant))
	}

	pub fn with_backends(cfg: Config, backends: Backends) -> Self {
		let caches = SearchCaches::new(cfg.search.cache.ttl_secs);

		Self { cfg, backends, caches }
	}

	pub fn with_caches(mut self, caches: SearchCaches) -> Self {
		self.caches = caches;

		self
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { embedding::embed(cfg, texts).await.map_err(Error::from) })
	}
}

impl ReplyProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmReplyConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { llm_reply::generate(cfg, prompt).await.map_err(Error::from) })
	}
}

impl ChunkRetriever for QdrantStore {
	fn retrieve_matches<'a>(
		&'a self,
		vector: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<ChunkMatch>>> {
		Box::pin(async move {
			QdrantStore::retrieve_matches(self, vector.to_vec(), threshold, limit)
				.await
				.map_err(|err| Error::Retrieval { message: err.to_string() })
		})
	}
}

impl GrantCatalog for Db {
	fn fetch_calls<'a>(&'a self, call_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<GrantCall>>> {
		Box::pin(async move {
			catalog::fetch_calls(self, call_ids)
				.await
				.map_err(|err| Error::Storage { message: err.to_string() })
		})
	}

	fn search_titles<'a>(
		&'a self,
		tokens: &'a [String],
		open_statuses: &'a [String],
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<GrantCall>>> {
		Box::pin(async move {
			catalog::search_titles(self, tokens, open_statuses, now, limit)
				.await
				.map_err(|err| Error::Fallback { message: err.to_string() })
		})
	}
}
