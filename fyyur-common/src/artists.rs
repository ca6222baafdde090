//! Artist queries and writes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use crate::db::{name_entries, Artist, Listed, NameEntry, SearchResults};
use crate::time::{format_start_time, split_upcoming_past};
use crate::validation::{ArtistFields, ArtistForm};
use crate::{Error, Result};

/// A show as seen from its artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistShowEntry {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

/// Artist with its shows split around the query instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
}

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, genres, \
     facebook_link, website, seeking_venue, seeking_description";

/// List every artist by id
pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<NameEntry>> {
    let rows = sqlx::query("SELECT id, name FROM artists ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(name_entries(&rows)?)
}

/// Load an artist record
pub async fn get_artist(pool: &SqlitePool, artist_id: i64) -> Result<Artist> {
    let row = sqlx::query(&format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS))
        .bind(artist_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Artist::from_row(&row)?),
        None => Err(Error::NotFound(format!("Artist {}", artist_id))),
    }
}

/// Load an artist with its upcoming and past shows
pub async fn artist_detail(
    pool: &SqlitePool,
    artist_id: i64,
    now: &NaiveDateTime,
) -> Result<ArtistDetail> {
    let artist = get_artist(pool, artist_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT s.start_time, v.id AS venue_id, v.name AS venue_name,
               v.image_link AS venue_image_link
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.start_time, s.id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let start_time: NaiveDateTime = row.try_get("start_time")?;
        entries.push((
            start_time,
            ArtistShowEntry {
                venue_id: row.try_get("venue_id")?,
                venue_name: row.try_get("venue_name")?,
                venue_image_link: row.try_get("venue_image_link")?,
                start_time: format_start_time(&start_time),
            },
        ));
    }

    let (upcoming_shows, past_shows) = split_upcoming_past(entries, now);

    Ok(ArtistDetail {
        artist,
        upcoming_shows_count: upcoming_shows.len(),
        upcoming_shows,
        past_shows_count: past_shows.len(),
        past_shows,
    })
}

/// Case-insensitive substring search on artist names
pub async fn search_artists(pool: &SqlitePool, term: &str) -> Result<SearchResults> {
    let artists = list_artists(pool).await?;
    Ok(SearchResults::matching(artists, term))
}

/// Insert a validated artist, returning its new id
pub async fn insert_artist(pool: &SqlitePool, fields: &ArtistFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO artists (
            name, city, state, phone, image_link, genres,
            facebook_link, website, seeking_venue, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(Json(&fields.genres))
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Validate and list a new artist
pub async fn create_artist(pool: &SqlitePool, form: &ArtistForm) -> Result<Listed> {
    let fields = form.validate()?;
    let id = insert_artist(pool, &fields).await?;

    info!("Artist {} listed with id {}", fields.name, id);
    Ok(Listed {
        id,
        name: fields.name,
    })
}

/// Overwrite the editable fields of a validated artist
pub async fn overwrite_artist(
    pool: &SqlitePool,
    artist_id: i64,
    fields: &ArtistFields,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE artists
        SET name = ?, city = ?, state = ?, phone = ?, image_link = ?, genres = ?,
            facebook_link = ?, website = ?, seeking_venue = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(Json(&fields.genres))
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .bind(artist_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Artist {}", artist_id)));
    }
    Ok(())
}

/// Validate and apply an edit to an existing artist
pub async fn update_artist(
    pool: &SqlitePool,
    artist_id: i64,
    form: &ArtistForm,
) -> Result<Listed> {
    let fields = form.validate()?;
    overwrite_artist(pool, artist_id, &fields).await?;

    info!("Artist {} ({}) edited", artist_id, fields.name);
    Ok(Listed {
        id: artist_id,
        name: fields.name,
    })
}

/// Delete an artist and its shows in one transaction
///
/// Returns the number of shows removed with it.
pub async fn remove_artist(pool: &SqlitePool, artist_id: i64) -> Result<u64> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM artists WHERE id = ?")
        .bind(artist_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        tx.rollback().await?;
        return Err(Error::NotFound(format!("Artist {}", artist_id)));
    }

    match delete_with_shows(&mut tx, artist_id).await {
        Ok(shows) => {
            tx.commit().await?;
            Ok(shows)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e.into())
        }
    }
}

async fn delete_with_shows(
    tx: &mut Transaction<'_, Sqlite>,
    artist_id: i64,
) -> sqlx::Result<u64> {
    let shows = sqlx::query("DELETE FROM shows WHERE artist_id = ?")
        .bind(artist_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(artist_id)
        .execute(&mut **tx)
        .await?;

    Ok(shows)
}

/// Delete an artist, treating any failure as "nothing deleted"
pub async fn delete_artist(pool: &SqlitePool, artist_id: i64) -> bool {
    match remove_artist(pool, artist_id).await {
        Ok(shows) => {
            info!("Artist {} deleted along with {} shows", artist_id, shows);
            true
        }
        Err(e) => {
            warn!("Artist {} not deleted: {}", artist_id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    fn artist_form(name: &str) -> ArtistForm {
        ArtistForm {
            name: Some(name.to_string()),
            city: Some("San Francisco".to_string()),
            state: Some("CA".to_string()),
            phone: Some("326-123-5000".to_string()),
            genres: Some(vec!["Rock n Roll".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_artist() {
        let pool = init_memory_database().await.unwrap();

        let mut form = artist_form("Guns N Petals");
        form.genres = Some(vec!["Rock n Roll".to_string(), "Blues".to_string()]);
        form.image_link = Some("https://images.example.com/gnp.jpg".to_string());
        let listed = create_artist(&pool, &form).await.unwrap();

        let artist = get_artist(&pool, listed.id).await.unwrap();
        assert_eq!(artist.fields.name, "Guns N Petals");
        assert_eq!(artist.fields.genres, vec!["Rock n Roll", "Blues"]);
        assert_eq!(
            artist.fields.image_link.as_deref(),
            Some("https://images.example.com/gnp.jpg")
        );
        assert!(!artist.fields.seeking_venue);
    }

    #[tokio::test]
    async fn test_list_artists_in_id_order() {
        let pool = init_memory_database().await.unwrap();
        create_artist(&pool, &artist_form("Matt Quevedo")).await.unwrap();
        create_artist(&pool, &artist_form("The Wild Sax Band")).await.unwrap();

        let artists = list_artists(&pool).await.unwrap();
        let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let pool = init_memory_database().await.unwrap();
        create_artist(&pool, &artist_form("Guns N Petals")).await.unwrap();
        create_artist(&pool, &artist_form("Matt Quevedo")).await.unwrap();
        create_artist(&pool, &artist_form("The Wild Sax Band")).await.unwrap();

        let results = search_artists(&pool, "A").await.unwrap();
        assert_eq!(results.count, 3);

        let results = search_artists(&pool, "band").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn test_update_missing_artist() {
        let pool = init_memory_database().await.unwrap();
        let result = update_artist(&pool, 3, &artist_form("Nobody")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(list_artists(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_stored_values() {
        let pool = init_memory_database().await.unwrap();
        let listed = create_artist(&pool, &artist_form("Guns N Petals")).await.unwrap();

        let mut form = artist_form("Renamed");
        form.phone = None;
        let result = update_artist(&pool, listed.id, &form).await;

        match result {
            Err(Error::Validation(errors)) => assert!(errors.has_field("phone")),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(get_artist(&pool, listed.id).await.unwrap().fields.name, "Guns N Petals");
    }
}
