pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("GRANT_PG_DSN is not a valid Postgres DSN: {0}")]
	InvalidDsn(sqlx::Error),
	#[error("No admin database reachable (tried postgres, template1): {0}")]
	AdminUnreachable(sqlx::Error),
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
