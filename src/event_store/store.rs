//! Switch Store - SQLite handle, schema and transactions
//!
//! The store owns one SQLite connection. Every read or write goes through
//! `read`/`write`, which hand the caller a `StoreTx` scoped to a single
//! transaction. `EventLog` and `TemplateRegistry` views can only be
//! obtained from a `StoreTx`, so every mutation and the reads that decide
//! it share one atomic unit.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

use crate::types::SwitchResult;

use super::log::EventLog;
use super::registry::TemplateRegistry;

/// Environment variable overriding the default data directory
pub const HOME_ENV_VAR: &str = "LONET_SWITCH_HOME";

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "switch_state.sql";

/// How long a writer waits for another process holding the write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS switch_state_change (
    id TEXT PRIMARY KEY,
    c_time INTEGER NOT NULL,
    mode TEXT NOT NULL,
    group_name TEXT NOT NULL,
    locale TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_switch_state_change_group
    ON switch_state_change (group_name, c_time);
CREATE TABLE IF NOT EXISTS jinja_templates (
    id TEXT PRIMARY KEY,
    path TEXT NOT NULL UNIQUE
);
";

/// Configuration for the SwitchStore
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the database and the `scripts/` directory
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = match std::env::var(HOME_ENV_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".lonet_switch"),
        };
        Self { data_dir }
    }
}

impl StoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Directory scanned for `switch_*` plugin scripts
    pub fn scripts_dir(&self) -> PathBuf {
        self.data_dir.join("scripts")
    }
}

/// A transaction-scoped view over the store
pub struct StoreTx<'c> {
    conn: &'c Connection,
}

impl<'c> StoreTx<'c> {
    pub fn events(&self) -> EventLog<'c> {
        EventLog::new(self.conn)
    }

    pub fn templates(&self) -> TemplateRegistry<'c> {
        TemplateRegistry::new(self.conn)
    }
}

/// Durable store for the switch event log and the template registry
pub struct SwitchStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SwitchStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &StoreConfig) -> SwitchResult<Self> {
        fs::create_dir_all(config.data_dir())?;
        let path = config.db_path();
        let conn = Connection::open(&path)?;
        let store = Self::from_connection(conn, Some(path))?;
        info!(path = ?store.path, "opened switch store");
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> SwitchResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> SwitchResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;

        // Concurrent first opens must not both run the column upgrade
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        create_schema(&tx)?;
        tx.commit()?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` inside a write transaction
    ///
    /// The transaction takes SQLite's write lock up front (`BEGIN IMMEDIATE`)
    /// and commits only if `f` returns `Ok`. On error nothing `f` did is
    /// visible and the error is returned unchanged.
    pub fn write<T, F>(&self, f: F) -> SwitchResult<T>
    where
        F: FnOnce(&StoreTx<'_>) -> SwitchResult<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&StoreTx { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` inside a read transaction, giving it a consistent snapshot
    pub fn read<T, F>(&self, f: F) -> SwitchResult<T>
    where
        F: FnOnce(&StoreTx<'_>) -> SwitchResult<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let value = f(&StoreTx { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }
}

/// Create tables if absent and add columns introduced after the first release
fn create_schema(conn: &Connection) -> SwitchResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let columns = table_columns(conn, "jinja_templates")?;
    if !columns.iter().any(|c| c == "group_name") {
        debug!("adding group_name column to jinja_templates");
        conn.execute(
            "ALTER TABLE jinja_templates ADD COLUMN group_name TEXT NOT NULL DEFAULT '*'",
            [],
        )?;
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> SwitchResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JinjaTemplate, Mode, SwitchError, SwitchStateChange};
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        let config = StoreConfig::new("/tmp/lonet");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/lonet/switch_state.sql"));
        assert_eq!(config.scripts_dir(), PathBuf::from("/tmp/lonet/scripts"));
    }

    #[test]
    fn test_open_creates_data_dir_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path().join("nested"));

        let store = SwitchStore::open(&config).unwrap();

        assert!(config.db_path().exists());
        assert_eq!(store.path(), Some(config.db_path().as_path()));
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path());

        {
            let store = SwitchStore::open(&config).unwrap();
            store
                .write(|tx| tx.events().append(&SwitchStateChange::new(Mode::Network, "lab1", "")))
                .unwrap();
        }

        let store = SwitchStore::open(&config).unwrap();
        let count = store.read(|tx| tx.events().count()).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_upgrade_adds_group_column_and_keeps_rows() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path());

        {
            let conn = Connection::open(config.db_path()).unwrap();
            conn.execute_batch(
                "CREATE TABLE jinja_templates (id TEXT PRIMARY KEY, path TEXT NOT NULL UNIQUE);
                 INSERT INTO jinja_templates (id, path)
                 VALUES ('6f1c1f2e-3a8e-4b8e-9d43-0d3b1c2a5e77', '/etc/old.conf.jinja');",
            )
            .unwrap();
        }

        let store = SwitchStore::open(&config).unwrap();
        let templates = store.read(|tx| tx.templates().list_all()).unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].path, "/etc/old.conf.jinja");
        assert_eq!(templates[0].group, "*");
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let store = SwitchStore::open_in_memory().unwrap();

        let result: SwitchResult<()> = store.write(|tx| {
            tx.events().append(&SwitchStateChange::new(Mode::Network, "lab1", ""))?;
            tx.templates().add(&JinjaTemplate::new("/tmp/a.jinja", "*")?)?;
            Err(SwitchError::InvalidInput("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.read(|tx| tx.events().count()).unwrap(), 0);
        assert!(store.read(|tx| tx.templates().list_all()).unwrap().is_empty());
    }
}
