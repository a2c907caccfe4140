use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

pub use sqlx::Error;
pub use sqlx::Result;

static TEST_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

// --- Driver Adapter Pattern ---
pub type Driver = Sqlite;
pub type Connection = sqlx::SqliteConnection;
pub type Pool = SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Infrastructure(sqlx::Error),
    #[error("Resource not found")]
    NotFound,
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            _ => {
                if let Some(db_err) = err.as_database_error() {
                    if let Some(code) = db_err.code() {
                        // SQLite extended result codes
                        match code.as_ref() {
                            "2067" | "1555" => {
                                return RepositoryError::UniqueViolation(db_err.message().to_string());
                            }
                            "275" => {
                                return RepositoryError::CheckViolation(db_err.message().to_string());
                            }
                            "787" => {
                                return RepositoryError::ForeignKeyViolation(db_err.message().to_string());
                            }
                            _ => {}
                        }
                    }
                }
                RepositoryError::Infrastructure(err)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: Pool,
}

impl Database {
    pub async fn new(connection_string: &str) -> sqlx::Result<Self> {
        Self::connect(connection_string, SqlitePoolOptions::new()).await
    }

    async fn connect(connection_string: &str, pool_options: SqlitePoolOptions) -> sqlx::Result<Self> {
        // Several CLI processes may write the same file; WAL lets readers
        // proceed while one of them holds the write lock.
        let options = SqliteConnectOptions::from_str(connection_string)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        tracing::debug!("Running migrations...");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::debug!("Migrations complete.");
        Ok(())
    }

    pub async fn begin(&self) -> Result<UnitOfWork<'_>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork { tx })
    }
}

/// One SQL transaction. Dropping it without `commit` rolls back.
pub struct UnitOfWork<'a> {
    tx: Transaction<'a, Driver>,
}

impl<'a> UnitOfWork<'a> {
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub fn connection(&mut self) -> &mut Connection {
        &mut *self.tx
    }
}

fn test_db_url() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let seq = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_path = std::env::temp_dir().join(format!("test_budget_{}_{}_{}.db", std::process::id(), now, seq));
    format!("sqlite:{}", db_path.display())
}

// do not add #[cfg(test)] here because it hides this method from libraries.
pub async fn get_test_db() -> Database {
    // Create a unique database file in the temp directory for each test
    let pool_options = SqlitePoolOptions::new().max_connections(1); // Single connection is safer for SQLite tests
    let db = Database::connect(&test_db_url(), pool_options)
        .await
        .expect("Failed to create test database pool");

    db.run_migrations().await.expect("Failed to run migrations");
    db
}
