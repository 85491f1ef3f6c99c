use time::OffsetDateTime;
use uuid::Uuid;

/// A grant call as stored in the catalog. Read-only from this crate's point of view.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct GrantCall {
	pub call_id: Uuid,
	pub title: String,
	pub provider: Option<String>,
	pub deadline_at: Option<OffsetDateTime>,
	pub total_allocation: Option<f64>,
	pub call_url: String,
	pub status: String,
	pub eligible_applicants: Option<String>,
	pub geographic_scope: Option<String>,
}

/// One chunk-level hit from the vector index.
///
/// The optional fields are copies taken when the chunk was indexed and may be stale; the
/// catalog row is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMatch {
	pub call_id: Uuid,
	pub similarity: f32,
	pub title: Option<String>,
	pub provider: Option<String>,
	pub deadline_at: Option<OffsetDateTime>,
	pub total_allocation: Option<f64>,
}
