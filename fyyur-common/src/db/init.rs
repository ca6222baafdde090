//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and applies the schema.
//! Schema creation is idempotent and runs on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open the database file, creating it and its parent directory if missing
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Foreign keys are a per-connection setting, so they go on the connect options
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the schema applied
///
/// Limited to a single connection that never expires: every new in-memory
/// connection would otherwise see its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes if they don't exist
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    create_venues_table(pool).await?;
    create_artists_table(pool).await?;
    create_shows_table(pool).await?;

    info!("Database schema initialized (venues, artists, shows)");
    Ok(())
}

async fn create_venues_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city VARCHAR(120) NOT NULL,
            state VARCHAR(120) NOT NULL,
            address VARCHAR(120) NOT NULL,
            phone VARCHAR(120) NOT NULL,
            image_link VARCHAR(500),
            genres TEXT NOT NULL,
            facebook_link VARCHAR(120),
            website VARCHAR(120),
            seeking_talent INTEGER NOT NULL DEFAULT 0,
            seeking_description VARCHAR(120)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_venues_state_city ON venues(state, city)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city VARCHAR(120) NOT NULL,
            state VARCHAR(120) NOT NULL,
            phone VARCHAR(120) NOT NULL,
            image_link VARCHAR(500),
            genres TEXT NOT NULL,
            facebook_link VARCHAR(120),
            website VARCHAR(120),
            seeking_venue INTEGER NOT NULL DEFAULT 0,
            seeking_description VARCHAR(120)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Shows reference venues and artists. The references are nullable at the
/// schema level; the write layer never inserts a null one.
async fn create_shows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            venue_id INTEGER REFERENCES venues(id),
            artist_id INTEGER REFERENCES artists(id),
            start_time TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shows_venue_id ON shows(venue_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shows_artist_id ON shows(artist_id)")
        .execute(pool)
        .await?;

    Ok(())
}
