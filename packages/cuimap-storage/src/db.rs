use std::{path::Path, str::FromStr};

use sqlx::{
	SqlitePool,
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{Error, Result, schema};

pub struct Db {
	pub pool: SqlitePool,
}
impl Db {
	/// Opens an existing dictionary. A missing file is an error rather than an empty database.
	pub async fn open(cfg: &cuimap_config::Sqlite) -> Result<Self> {
		if !cfg.path.is_file() {
			return Err(Error::NotFound(format!(
				"Synonym dictionary {} does not exist.",
				cfg.path.display()
			)));
		}

		let options =
			SqliteConnectOptions::new().filename(&cfg.path).read_only(true).create_if_missing(false);
		let pool = SqlitePoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.connect_with(options)
			.await?;

		Ok(Self { pool })
	}

	/// Opens or creates a writable dictionary and ensures its schema.
	pub async fn create(path: &Path) -> Result<Self> {
		let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
		let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;
		let db = Self { pool };

		db.ensure_schema().await?;

		Ok(db)
	}

	/// A private in-memory database. The single connection is never recycled, since closing it
	/// would drop the data.
	pub async fn in_memory() -> Result<Self> {
		let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await?;
		let db = Self { pool };

		db.ensure_schema().await?;

		Ok(db)
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let mut tx = self.pool.begin().await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
