use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, db::Db, models::GrantCall};

const CALL_COLUMNS: &str = "\
id AS call_id,
	title,
	provider,
	deadline_at,
	total_allocation::float8 AS total_allocation,
	call_url,
	status,
	eligible_applicants,
	geographic_scope";

/// Loads the calls with the given ids. Order is unspecified and unknown ids are absent.
pub async fn fetch_calls(db: &Db, call_ids: &[Uuid]) -> Result<Vec<GrantCall>> {
	if call_ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
	{CALL_COLUMNS}
FROM calls
WHERE id = ANY($1)"
	);
	let rows = sqlx::query_as::<_, GrantCall>(&sql).bind(call_ids).fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Open calls whose title contains any of `tokens`, case-insensitively.
///
/// `open_statuses` must be lower-cased. Calls whose deadline is not after `now` are skipped.
pub async fn search_titles(
	db: &Db,
	tokens: &[String],
	open_statuses: &[String],
	now: OffsetDateTime,
	limit: u32,
) -> Result<Vec<GrantCall>> {
	if tokens.is_empty() || limit == 0 {
		return Ok(Vec::new());
	}

	let patterns: Vec<String> =
		tokens.iter().map(|token| format!("%{}%", escape_like(token))).collect();
	let sql = format!(
		"\
SELECT
	{CALL_COLUMNS}
FROM calls
WHERE lower(status) = ANY($1)
	AND title ILIKE ANY($2)
	AND (deadline_at IS NULL OR deadline_at > $3)
ORDER BY deadline_at ASC NULLS LAST, id ASC
LIMIT $4"
	);
	let rows = sqlx::query_as::<_, GrantCall>(&sql)
		.bind(open_statuses)
		.bind(&patterns)
		.bind(now)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
