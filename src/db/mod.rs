// Database layer — persistent storage for the social link registry.
//
// SQLite (rusqlite, bundled) is the default backend; the database file lives
// wherever SOCIALGUARD_DB_PATH points (defaults to ./socialguard.db).
// PostgreSQL is available behind the `postgres` feature, and an in-memory
// store is always available for tests and throwaway runs.

pub mod memory;
pub mod models;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use traits::RegistryStore;

#[cfg(feature = "sqlite")]
use anyhow::{Context, Result};
#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use std::path::Path;
#[cfg(feature = "sqlite")]
use std::sync::Arc;

/// Open (or create) the SQLite database and run migrations.
///
/// Called by `socialguard init`.
#[cfg(feature = "sqlite")]
pub fn initialize(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing SQLite database (fails if it doesn't exist yet).
///
/// Migrations still run so a file created by an older build picks up
/// new schema versions.
#[cfg(feature = "sqlite")]
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `socialguard init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Create the SQLite database if needed and wrap it as a RegistryStore.
#[cfg(feature = "sqlite")]
pub fn initialize_sqlite(db_path: &str) -> Result<Arc<dyn RegistryStore>> {
    Ok(Arc::new(sqlite::SqliteStore::new(initialize(db_path)?)))
}

/// Open an existing SQLite database as a RegistryStore.
#[cfg(feature = "sqlite")]
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn RegistryStore>> {
    Ok(Arc::new(sqlite::SqliteStore::new(open(db_path)?)))
}

/// Connect to PostgreSQL (running migrations) and wrap it as a RegistryStore.
#[cfg(feature = "postgres")]
pub async fn connect_postgres(database_url: &str) -> anyhow::Result<std::sync::Arc<dyn RegistryStore>> {
    Ok(std::sync::Arc::new(postgres::PgStore::connect(database_url).await?))
}
