//! In-process TTL caches keyed by the search query string.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use time::{Duration, OffsetDateTime};

use crate::search::GrantResult;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
	value: T,
	created_at: OffsetDateTime,
}

/// Unbounded map whose entries stay valid while `now - created_at < ttl`.
///
/// Expired entries are removed on lookup. Clones share the same storage.
#[derive(Debug)]
pub struct TtlCache<T> {
	ttl: Duration,
	entries: Arc<Mutex<HashMap<String, CacheEntry<T>>>>,
}
impl<T> TtlCache<T>
where
	T: Clone,
{
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entries: Arc::new(Mutex::new(HashMap::new())) }
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn get(&self, key: &str) -> Option<T> {
		self.get_at(key, OffsetDateTime::now_utc())
	}

	pub fn put(&self, key: &str, value: T) {
		self.put_at(key, value, OffsetDateTime::now_utc());
	}

	pub fn get_at(&self, key: &str, now: OffsetDateTime) -> Option<T> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let entry = entries.get(key)?;

		if now - entry.created_at < self.ttl {
			return Some(entry.value.clone());
		}

		entries.remove(key);

		None
	}

	pub fn put_at(&self, key: &str, value: T, now: OffsetDateTime) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(key.to_string(), CacheEntry { value, created_at: now });
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<T> Clone for TtlCache<T> {
	fn clone(&self) -> Self {
		Self { ttl: self.ttl, entries: self.entries.clone() }
	}
}

#[derive(Debug, Clone)]
pub struct SearchCaches {
	pub embeddings: TtlCache<Vec<f32>>,
	pub results: TtlCache<Vec<GrantResult>>,
}
impl SearchCaches {
	pub fn new(ttl_secs: u64) -> Self {
		let ttl = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));

		Self { embeddings: TtlCache::new(ttl), results: TtlCache::new(ttl) }
	}
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn entry_is_fresh_until_ttl_elapses() {
		let cache = TtlCache::new(Duration::seconds(600));
		let t0 = datetime!(2030-01-01 00:00 UTC);

		cache.put_at("grant", vec![1.0_f32], t0);

		assert_eq!(cache.get_at("grant", t0 + Duration::seconds(599)), Some(vec![1.0]));
		assert_eq!(cache.get_at("grant", t0 + Duration::seconds(600)), None);
		assert!(cache.is_empty());
	}

	#[test]
	fn put_overwrites_with_fresh_timestamp() {
		let cache = TtlCache::new(Duration::seconds(10));
		let t0 = datetime!(2030-01-01 00:00 UTC);

		cache.put_at("q", 1_u32, t0);
		cache.put_at("q", 2_u32, t0 + Duration::seconds(8));

		assert_eq!(cache.get_at("q", t0 + Duration::seconds(15)), Some(2));
	}

	#[test]
	fn clones_share_entries() {
		let cache = TtlCache::new(Duration::seconds(10));
		let shared = cache.clone();

		cache.put("q", "v".to_string());

		assert_eq!(shared.get("q").as_deref(), Some("v"));
		assert_eq!(shared.len(), 1);
	}
}
