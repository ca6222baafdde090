//! Venue queries and writes
//!
//! Upcoming/past classification is computed against the `now` passed in by
//! the caller; callers serving requests pass [`crate::time::now`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::db::{name_entries, Listed, SearchResults, Venue};
use crate::time::{classify, format_start_time, split_upcoming_past, ShowTiming};
use crate::validation::{VenueFields, VenueForm};
use crate::{Error, Result};

/// One venue in the directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueListing {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// All venues sharing a (state, city) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueListing>,
}

/// A show as seen from its venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueShowEntry {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Venue with its shows split around the query instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
}

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, genres, \
     facebook_link, website, seeking_talent, seeking_description";

/// List venues grouped by (state, city) with upcoming show counts
///
/// Groups are ordered by state then city, venues inside a group by id.
pub async fn list_directory(pool: &SqlitePool, now: &NaiveDateTime) -> Result<Vec<CityArea>> {
    let venues = sqlx::query("SELECT id, name, city, state FROM venues ORDER BY state, city, id")
        .fetch_all(pool)
        .await?;

    let show_times: Vec<(i64, NaiveDateTime)> = sqlx::query_as(
        "SELECT venue_id, start_time FROM shows WHERE venue_id IS NOT NULL",
    )
    .fetch_all(pool)
    .await?;

    let mut upcoming: HashMap<i64, usize> = HashMap::new();
    for (venue_id, start_time) in show_times {
        if classify(&start_time, now) == ShowTiming::Upcoming {
            *upcoming.entry(venue_id).or_default() += 1;
        }
    }

    let mut areas: Vec<CityArea> = Vec::new();
    for row in venues {
        let id: i64 = row.try_get("id")?;
        let city: String = row.try_get("city")?;
        let state: String = row.try_get("state")?;
        let listing = VenueListing {
            id,
            name: row.try_get("name")?,
            num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
        };

        // Rows arrive sorted, so a new pair always starts a new group
        match areas.last_mut() {
            Some(area) if area.state == state && area.city == city => area.venues.push(listing),
            _ => areas.push(CityArea {
                city,
                state,
                venues: vec![listing],
            }),
        }
    }

    debug!("Venue directory: {} areas", areas.len());
    Ok(areas)
}

/// Load a venue record
pub async fn get_venue(pool: &SqlitePool, venue_id: i64) -> Result<Venue> {
    let row = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
        .bind(venue_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Venue::from_row(&row)?),
        None => Err(Error::NotFound(format!("Venue {}", venue_id))),
    }
}

/// Load a venue with its upcoming and past shows
pub async fn venue_detail(
    pool: &SqlitePool,
    venue_id: i64,
    now: &NaiveDateTime,
) -> Result<VenueDetail> {
    let venue = get_venue(pool, venue_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT s.start_time, a.id AS artist_id, a.name AS artist_name,
               a.image_link AS artist_image_link
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.start_time, s.id
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let start_time: NaiveDateTime = row.try_get("start_time")?;
        entries.push((
            start_time,
            VenueShowEntry {
                artist_id: row.try_get("artist_id")?,
                artist_name: row.try_get("artist_name")?,
                artist_image_link: row.try_get("artist_image_link")?,
                start_time: format_start_time(&start_time),
            },
        ));
    }

    let (upcoming_shows, past_shows) = split_upcoming_past(entries, now);

    Ok(VenueDetail {
        venue,
        upcoming_shows_count: upcoming_shows.len(),
        upcoming_shows,
        past_shows_count: past_shows.len(),
        past_shows,
    })
}

/// Case-insensitive substring search on venue names
pub async fn search_venues(pool: &SqlitePool, term: &str) -> Result<SearchResults> {
    let rows = sqlx::query("SELECT id, name FROM venues ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(SearchResults::matching(name_entries(&rows)?, term))
}

/// Insert a validated venue, returning its new id
pub async fn insert_venue(pool: &SqlitePool, fields: &VenueFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, image_link, genres,
            facebook_link, website, seeking_talent, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(Json(&fields.genres))
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Validate and list a new venue
pub async fn create_venue(pool: &SqlitePool, form: &VenueForm) -> Result<Listed> {
    let fields = form.validate()?;
    let id = insert_venue(pool, &fields).await?;

    info!("Venue {} listed with id {}", fields.name, id);
    Ok(Listed {
        id,
        name: fields.name,
    })
}

/// Overwrite the editable fields of a validated venue
pub async fn overwrite_venue(pool: &SqlitePool, venue_id: i64, fields: &VenueFields) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE venues
        SET name = ?, city = ?, state = ?, address = ?, phone = ?, image_link = ?,
            genres = ?, facebook_link = ?, website = ?, seeking_talent = ?,
            seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(Json(&fields.genres))
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .bind(venue_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Venue {}", venue_id)));
    }
    Ok(())
}

/// Validate and apply an edit to an existing venue
pub async fn update_venue(pool: &SqlitePool, venue_id: i64, form: &VenueForm) -> Result<Listed> {
    let fields = form.validate()?;
    overwrite_venue(pool, venue_id, &fields).await?;

    info!("Venue {} ({}) edited", venue_id, fields.name);
    Ok(Listed {
        id: venue_id,
        name: fields.name,
    })
}

/// Delete a venue and its shows in one transaction
///
/// Returns the number of shows removed with it.
pub async fn remove_venue(pool: &SqlitePool, venue_id: i64) -> Result<u64> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM venues WHERE id = ?")
        .bind(venue_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        tx.rollback().await?;
        return Err(Error::NotFound(format!("Venue {}", venue_id)));
    }

    match delete_with_shows(&mut tx, venue_id).await {
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
    venue_id: i64,
) -> sqlx::Result<u64> {
    let shows = sqlx::query("DELETE FROM shows WHERE venue_id = ?")
        .bind(venue_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(venue_id)
        .execute(&mut **tx)
        .await?;

    Ok(shows)
}

/// Delete a venue, treating any failure as "nothing deleted"
pub async fn delete_venue(pool: &SqlitePool, venue_id: i64) -> bool {
    match remove_venue(pool, venue_id).await {
        Ok(shows) => {
            info!("Venue {} deleted along with {} shows", venue_id, shows);
            true
        }
        Err(e) => {
            warn!("Venue {} not deleted: {}", venue_id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
        VenueForm {
            name: Some(name.to_string()),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            address: Some("1 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            genres: Some(vec!["Jazz".to_string()]),
            ..Default::default()
        }
    }

    async fn add_artist(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query(
            "INSERT INTO artists (name, city, state, phone, genres) VALUES (?, 'SF', 'CA', '555-0101', '[\"Jazz\"]')",
        )
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    async fn add_show(
        pool: &SqlitePool,
        venue_id: i64,
        artist_id: i64,
        start: NaiveDateTime,
    ) -> i64 {
        sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
            .bind(venue_id)
            .bind(artist_id)
            .bind(start)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_directory_groups_and_counts() {
        let pool = init_memory_database().await.unwrap();
        let now = noon();

        let fillmore = create_venue(&pool, &venue_form("The Fillmore", "San Francisco", "CA"))
            .await
            .unwrap();
        let dueling = create_venue(&pool, &venue_form("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        let musical = create_venue(
            &pool,
            &venue_form("Park Square Live Music & Coffee", "San Francisco", "CA"),
        )
        .await
        .unwrap();
        let artist = add_artist(&pool, "Guns N Petals").await;

        add_show(&pool, fillmore.id, artist, now + Duration::days(3)).await;
        add_show(&pool, fillmore.id, artist, now + Duration::days(9)).await;
        add_show(&pool, fillmore.id, artist, now - Duration::days(3)).await;
        add_show(&pool, musical.id, artist, now).await;

        let areas = list_directory(&pool, &now).await.unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!((areas[0].state.as_str(), areas[0].city.as_str()), ("CA", "San Francisco"));
        assert_eq!((areas[1].state.as_str(), areas[1].city.as_str()), ("NY", "New York"));

        let sf = &areas[0].venues;
        assert_eq!(sf.len(), 2);
        assert_eq!(sf[0].id, fillmore.id);
        assert_eq!(sf[0].num_upcoming_shows, 2);
        assert_eq!(sf[1].id, musical.id);
        assert_eq!(sf[1].num_upcoming_shows, 0, "show exactly at now is not upcoming");

        assert_eq!(areas[1].venues[0].id, dueling.id);
        assert_eq!(areas[1].venues[0].num_upcoming_shows, 0);
    }

    #[tokio::test]
    async fn test_detail_splits_shows() {
        let pool = init_memory_database().await.unwrap();
        let now = noon();

        let venue = create_venue(&pool, &venue_form("The Fillmore", "SF", "CA")).await.unwrap();
        let artist = add_artist(&pool, "The Wild Sax Band").await;

        add_show(&pool, venue.id, artist, now - Duration::days(1)).await;
        add_show(&pool, venue.id, artist, now).await;
        add_show(&pool, venue.id, artist, now + Duration::hours(5)).await;

        let detail = venue_detail(&pool, venue.id, &now).await.unwrap();

        assert_eq!(detail.venue.fields.name, "The Fillmore");
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.upcoming_shows[0].artist_name, "The Wild Sax Band");
        assert_eq!(detail.upcoming_shows[0].start_time, "06/01/2024, 17:00:00");
        assert_eq!(detail.past_shows[0].start_time, "05/31/2024, 12:00:00");
    }

    #[tokio::test]
    async fn test_detail_missing_venue() {
        let pool = init_memory_database().await.unwrap();
        let result = venue_detail(&pool, 42, &noon()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let pool = init_memory_database().await.unwrap();
        create_venue(&pool, &venue_form("100% Jazz", "SF", "CA")).await.unwrap();
        create_venue(&pool, &venue_form("1000 Jazz", "SF", "CA")).await.unwrap();

        let results = search_venues(&pool, "0%").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "100% Jazz");
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let pool = init_memory_database().await.unwrap();
        let venue = create_venue(&pool, &venue_form("The Fillmore", "SF", "CA")).await.unwrap();

        let mut form = venue_form("The New Fillmore", "Oakland", "CA");
        form.seeking_talent = true;
        form.seeking_description = Some("Local bands welcome".to_string());
        let listed = update_venue(&pool, venue.id, &form).await.unwrap();
        assert_eq!(listed.name, "The New Fillmore");

        let stored = get_venue(&pool, venue.id).await.unwrap();
        assert_eq!(stored.id, venue.id);
        assert_eq!(stored.fields.city, "Oakland");
        assert!(stored.fields.seeking_talent);
        assert_eq!(stored.fields.seeking_description.as_deref(), Some("Local bands welcome"));
    }

    #[tokio::test]
    async fn test_delete_swallows_missing_id() {
        let pool = init_memory_database().await.unwrap();
        assert!(!delete_venue(&pool, 7).await);
        assert!(matches!(remove_venue(&pool, 7).await, Err(Error::NotFound(_))));
    }
}
