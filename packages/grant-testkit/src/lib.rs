//! Disposable Postgres catalogs for integration tests.
//!
//! Tests read the server DSN from `GRANT_PG_DSN`, create a uniquely named database holding the
//! `calls` table, seed rows into it and drop it afterwards.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use time::OffsetDateTime;
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "GRANT_PG_DSN";

/// Schema of the read-only grant catalog.
pub const CALLS_TABLE_SQL: &str = "\
CREATE TABLE calls (
	id uuid PRIMARY KEY,
	title text NOT NULL,
	provider text,
	deadline_at timestamptz,
	total_allocation numeric,
	call_url text NOT NULL,
	status text NOT NULL,
	eligible_applicants text,
	geographic_scope text
)";

/// One row to insert into `calls`. Unset optional columns stay NULL.
#[derive(Debug, Clone)]
pub struct CallSeed {
	pub title: String,
	pub status: String,
	pub provider: Option<String>,
	pub deadline_at: Option<OffsetDateTime>,
	pub total_allocation: Option<f64>,
	pub eligible_applicants: Option<String>,
	pub geographic_scope: Option<String>,
}
impl CallSeed {
	pub fn open(title: &str) -> Self {
		Self {
			title: title.to_string(),
			status: "open".to_string(),
			provider: None,
			deadline_at: None,
			total_allocation: None,
			eligible_applicants: None,
			geographic_scope: None,
		}
	}
}

pub struct TestCatalog {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestCatalog {
	pub async fn create(server_dsn: &str) -> Result<Self> {
		let server = PgConnectOptions::from_str(server_dsn).map_err(Error::InvalidDsn)?;
		let (admin, mut admin_conn) = connect_admin(&server).await?;
		let name = format!("grant_test_{}", Uuid::new_v4().simple());

		admin_conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let options = server.database(&name);
		let mut conn = PgConnection::connect_with(&options).await?;

		conn.execute(CALLS_TABLE_SQL).await?;
		conn.close().await?;

		Ok(Self { name, dsn: options.to_url_lossy().to_string(), admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Inserts `seed` under a fresh id and returns that id.
	pub async fn insert_call(&self, seed: &CallSeed) -> Result<Uuid> {
		let id = Uuid::new_v4();
		let mut conn = PgConnection::connect(&self.dsn).await?;

		sqlx::query(
			"\
INSERT INTO calls (
	id,
	title,
	provider,
	deadline_at,
	total_allocation,
	call_url,
	status,
	eligible_applicants,
	geographic_scope
)
VALUES ($1, $2, $3, $4, $5::float8::numeric, $6, $7, $8, $9)",
		)
		.bind(id)
		.bind(&seed.title)
		.bind(&seed.provider)
		.bind(seed.deadline_at)
		.bind(seed.total_allocation)
		.bind(format!("https://example.sk/vyzvy/{id}"))
		.bind(&seed.status)
		.bind(&seed.eligible_applicants)
		.bind(&seed.geographic_scope)
		.execute(&mut conn)
		.await?;
		conn.close().await?;

		Ok(id)
	}

	pub async fn drop_database(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestCatalog {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		let handle = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Could not start a runtime to drop {name}: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(drop_database(&name, &admin)) {
				eprintln!("Could not drop {name}: {err}.");
			}
		});
		let _ = handle.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn connect_admin(server: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let postgres = server.clone().database("postgres");

	match PgConnection::connect_with(&postgres).await {
		Ok(conn) => Ok((postgres, conn)),
		Err(_) => {
			let template = server.clone().database("template1");
			let conn =
				PgConnection::connect_with(&template).await.map_err(Error::AdminUnreachable)?;

			Ok((template, conn))
		},
	}
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin).await?;

	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
