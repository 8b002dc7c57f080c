//! # SQLite Idempotency Registry
//!
//! Durable registry backed by two tables with composite primary keys:
//!
//! ```text
//! message_ids     (sender, message_id)      PRIMARY KEY (sender, message_id)
//! transaction_ids (sender, transaction_id)  PRIMARY KEY (sender, transaction_id)
//! ```
//!
//! A registration inserts the message id and then each transaction id inside
//! one immediate transaction. The first primary-key violation names the
//! duplicate and rolls everything back. Several registries may open the same
//! file; the primary keys decide the winner between them.

use crate::domain::RegistryError;
use crate::ports::{IdempotencyRegistry, RegistrationOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OpenFlags, TransactionBehavior};
use shared_types::{ActorNumber, MessageId, TransactionId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// `SQLite`-backed [`IdempotencyRegistry`].
#[derive(Clone)]
pub struct SqliteIdempotencyRegistry {
    connection: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteIdempotencyRegistry {
    /// Opens or creates the registry database at `path`.
    ///
    /// # Errors
    /// `RegistryError` if the file cannot be opened or the schema created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            return Err(RegistryError(
                "registry path must be a file, not a directory".to_string(),
            ));
        }
        let mut connection = open_connection(&path)?;
        initialize_schema(&mut connection)?;
        debug!(path = %path.display(), "[eh-02] SQLite idempotency registry opened");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of registered transaction ids across all senders.
    ///
    /// # Errors
    /// `RegistryError` on query failure.
    pub fn transaction_count(&self) -> Result<u64, RegistryError> {
        let guard = self.connection.lock();
        guard
            .query_row("SELECT COUNT(*) FROM transaction_ids", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|count| u64::try_from(count).unwrap_or_default())
            .map_err(db_error)
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, RegistryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, RegistryError> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock();
            work(&mut guard)
        })
        .await
        .map_err(|err| RegistryError(format!("registry task failed: {err}")))?
    }
}

#[async_trait]
impl IdempotencyRegistry for SqliteIdempotencyRegistry {
    async fn try_register(
        &self,
        sender: &ActorNumber,
        message_id: &MessageId,
        transaction_ids: &[TransactionId],
    ) -> Result<RegistrationOutcome, RegistryError> {
        let sender = sender.to_string();
        let message_id = message_id.clone();
        let transaction_ids = transaction_ids.to_vec();
        self.run_blocking(move |connection| {
            register(connection, &sender, &message_id, &transaction_ids)
        })
        .await
    }

    async fn contains_transaction(
        &self,
        sender: &ActorNumber,
        transaction_id: &TransactionId,
    ) -> Result<bool, RegistryError> {
        let sender = sender.to_string();
        let transaction_id = transaction_id.to_string();
        self.run_blocking(move |connection| {
            connection
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM transaction_ids WHERE sender = ?1 AND transaction_id = ?2)",
                    params![sender, transaction_id],
                    |row| row.get::<_, bool>(0),
                )
                .map_err(db_error)
        })
        .await
    }
}

fn register(
    connection: &mut Connection,
    sender: &str,
    message_id: &MessageId,
    transaction_ids: &[TransactionId],
) -> Result<RegistrationOutcome, RegistryError> {
    let tx = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(db_error)?;

    match tx.execute(
        "INSERT INTO message_ids (sender, message_id) VALUES (?1, ?2)",
        params![sender, message_id.as_str()],
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            return Ok(RegistrationOutcome::DuplicateMessageId);
        }
        Err(err) => return Err(db_error(err)),
    }

    for transaction_id in transaction_ids {
        match tx.execute(
            "INSERT INTO transaction_ids (sender, transaction_id) VALUES (?1, ?2)",
            params![sender, transaction_id.as_str()],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                // Dropping `tx` rolls back the message id as well.
                return Ok(RegistrationOutcome::DuplicateTransactionId(
                    transaction_id.clone(),
                ));
            }
            Err(err) => return Err(db_error(err)),
        }
    }

    tx.commit().map_err(db_error)?;
    Ok(RegistrationOutcome::Registered)
}

fn open_connection(path: &Path) -> Result<Connection, RegistryError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(path, flags).map_err(db_error)?;
    connection
        .execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = FULL;")
        .map_err(db_error)?;
    connection.busy_timeout(BUSY_TIMEOUT).map_err(db_error)?;
    Ok(connection)
}

fn initialize_schema(connection: &mut Connection) -> Result<(), RegistryError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS message_ids (
            sender TEXT NOT NULL,
            message_id TEXT NOT NULL,
            PRIMARY KEY (sender, message_id)
        );
        CREATE TABLE IF NOT EXISTS transaction_ids (
            sender TEXT NOT NULL,
            transaction_id TEXT NOT NULL,
            PRIMARY KEY (sender, transaction_id)
        );",
    )
    .map_err(db_error)?;
    tx.commit().map_err(db_error)
}

fn db_error(err: rusqlite::Error) -> RegistryError {
    RegistryError(err.to_string())
}
