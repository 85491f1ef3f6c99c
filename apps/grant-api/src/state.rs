use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use grant_domain::context::SearchContext;
use grant_service::GrantService;
use grant_storage::{db::Db, qdrant::QdrantStore};

/// Per-conversation search hints, keyed by session id.
///
/// Entries are never evicted. The map grows with every new session id until the process
/// restarts.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
	inner: Arc<Mutex<HashMap<String, SearchContext>>>,
}
impl Sessions {
	/// Overlays `extracted` on the stored context for `session_id` and returns the result.
	pub fn merge(&self, session_id: &str, extracted: SearchContext) -> SearchContext {
		let mut sessions = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let merged = sessions.remove(session_id).unwrap_or_default().merge(extracted);

		sessions.insert(session_id.to_string(), merged.clone());

		merged
	}

	pub fn get(&self, session_id: &str) -> Option<SearchContext> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner()).get(session_id).cloned()
	}
}

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GrantService>,
	pub sessions: Sessions,
}
impl AppState {
	/// Connects lazily so the server starts even while Postgres is unreachable.
	pub fn new(config: grant_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect_lazy(&config.storage.postgres)?;
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		Ok(Self::with_service(GrantService::new(config, db, qdrant)))
	}

	pub fn with_service(service: GrantService) -> Self {
		Self { service: Arc::new(service), sessions: Sessions::default() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sessions_are_kept_for_every_id() {
		let sessions = Sessions::default();

		let kosice = SearchContext { region: Some("Košický".to_string()), ..Default::default() };

		sessions.merge("a", kosice);
		sessions.merge("b", SearchContext::default());
		sessions.merge("a", SearchContext::default());

		assert_eq!(sessions.get("a").and_then(|ctx| ctx.region).as_deref(), Some("Košický"));
		assert!(sessions.get("b").is_some());
		assert!(sessions.get("c").is_none());
	}
}
