//! Show queries and writes
//!
//! A show's venue and artist must exist when it is written. The existence
//! check and the write share one transaction.

use serde::{Deserialize, Serialize};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use crate::db::Show;
use crate::time::format_start_time;
use crate::validation::{ShowFields, ShowForm, ValidationErrors};
use crate::{Error, Result};

/// Show with denormalized venue and artist display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// List every show, oldest id first
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowListing>> {
    let rows = sqlx::query(
        r#"
        SELECT s.venue_id, v.name AS venue_name, s.artist_id, a.name AS artist_name,
               a.image_link AS artist_image_link, s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        JOIN artists a ON a.id = s.artist_id
        ORDER BY s.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut shows = Vec::with_capacity(rows.len());
    for row in rows {
        shows.push(ShowListing {
            venue_id: row.try_get("venue_id")?,
            venue_name: row.try_get("venue_name")?,
            artist_id: row.try_get("artist_id")?,
            artist_name: row.try_get("artist_name")?,
            artist_image_link: row.try_get("artist_image_link")?,
            start_time: format_start_time(&row.try_get("start_time")?),
        });
    }

    Ok(shows)
}

/// Load a show record
pub async fn get_show(pool: &SqlitePool, show_id: i64) -> Result<Show> {
    let row = sqlx::query("SELECT id, venue_id, artist_id, start_time FROM shows WHERE id = ?")
        .bind(show_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Show::from_row(&row)?),
        None => Err(Error::NotFound(format!("Show {}", show_id))),
    }
}

/// Report references to missing venues or artists as field errors
async fn check_references(tx: &mut Transaction<'_, Sqlite>, fields: &ShowFields) -> Result<()> {
    let mut errors = ValidationErrors::new();

    let venue: Option<i64> = sqlx::query_scalar("SELECT id FROM venues WHERE id = ?")
        .bind(fields.venue_id)
        .fetch_optional(&mut **tx)
        .await?;
    if venue.is_none() {
        errors.push("venue_id", format!("Venue {} does not exist.", fields.venue_id));
    }

    let artist: Option<i64> = sqlx::query_scalar("SELECT id FROM artists WHERE id = ?")
        .bind(fields.artist_id)
        .fetch_optional(&mut **tx)
        .await?;
    if artist.is_none() {
        errors.push("artist_id", format!("Artist {} does not exist.", fields.artist_id));
    }

    Ok(errors.into_result(())?)
}

/// Insert a validated show, returning its new id
pub async fn insert_show(pool: &SqlitePool, fields: &ShowFields) -> Result<i64> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    if let Err(e) = check_references(&mut tx, fields).await {
        tx.rollback().await?;
        return Err(e);
    }

    let id = sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
        .bind(fields.venue_id)
        .bind(fields.artist_id)
        .bind(fields.start_time)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    tx.commit().await?;
    Ok(id)
}

/// Validate and list a new show
pub async fn create_show(pool: &SqlitePool, form: &ShowForm) -> Result<i64> {
    let fields = form.validate()?;
    let id = insert_show(pool, &fields).await?;

    info!(
        "Show {} listed (venue {}, artist {}, {})",
        id, fields.venue_id, fields.artist_id, fields.start_time
    );
    Ok(id)
}

/// Overwrite a show's venue, artist and start time
pub async fn overwrite_show(pool: &SqlitePool, show_id: i64, fields: &ShowFields) -> Result<()> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM shows WHERE id = ?")
        .bind(show_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        tx.rollback().await?;
        return Err(Error::NotFound(format!("Show {}", show_id)));
    }

    if let Err(e) = check_references(&mut tx, fields).await {
        tx.rollback().await?;
        return Err(e);
    }

    sqlx::query("UPDATE shows SET venue_id = ?, artist_id = ?, start_time = ? WHERE id = ?")
        .bind(fields.venue_id)
        .bind(fields.artist_id)
        .bind(fields.start_time)
        .bind(show_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Validate and apply an edit to an existing show
pub async fn update_show(pool: &SqlitePool, show_id: i64, form: &ShowForm) -> Result<Show> {
    let fields = form.validate()?;
    overwrite_show(pool, show_id, &fields).await?;

    info!("Show {} edited", show_id);
    Ok(Show {
        id: show_id,
        venue_id: fields.venue_id,
        artist_id: fields.artist_id,
        start_time: fields.start_time,
    })
}

/// Delete a single show
pub async fn remove_show(pool: &SqlitePool, show_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM shows WHERE id = ?")
        .bind(show_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Show {}", show_id)));
    }
    Ok(())
}

/// Delete a show, treating any failure as "nothing deleted"
pub async fn delete_show(pool: &SqlitePool, show_id: i64) -> bool {
    match remove_show(pool, show_id).await {
        Ok(()) => {
            info!("Show {} deleted", show_id);
            true
        }
        Err(e) => {
            warn!("Show {} not deleted: {}", show_id, e);
            false
        }
    }
}
