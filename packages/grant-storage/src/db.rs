use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::Result;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(8);

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &grant_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(ACQUIRE_TIMEOUT)
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}

	/// Builds the pool without opening a connection, so a service can start while the
	/// database is still unreachable.
	pub fn connect_lazy(cfg: &grant_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(ACQUIRE_TIMEOUT)
			.connect_lazy(&cfg.dsn)?;

		Ok(Self { pool })
	}
}
