//! Database records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::Row;

use crate::validation::{ArtistFields, VenueFields};

/// Venue record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    #[serde(flatten)]
    pub fields: VenueFields,
}

impl Venue {
    pub(crate) fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let genres: Json<Vec<String>> = row.try_get("genres")?;

        Ok(Venue {
            id: row.try_get("id")?,
            fields: VenueFields {
                name: row.try_get("name")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                address: row.try_get("address")?,
                phone: row.try_get("phone")?,
                image_link: row.try_get("image_link")?,
                genres: genres.0,
                facebook_link: row.try_get("facebook_link")?,
                website: row.try_get("website")?,
                seeking_talent: row.try_get("seeking_talent")?,
                seeking_description: row.try_get("seeking_description")?,
            },
        })
    }
}

/// Artist record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    #[serde(flatten)]
    pub fields: ArtistFields,
}

impl Artist {
    pub(crate) fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let genres: Json<Vec<String>> = row.try_get("genres")?;

        Ok(Artist {
            id: row.try_get("id")?,
            fields: ArtistFields {
                name: row.try_get("name")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                phone: row.try_get("phone")?,
                image_link: row.try_get("image_link")?,
                genres: genres.0,
                facebook_link: row.try_get("facebook_link")?,
                website: row.try_get("website")?,
                seeking_venue: row.try_get("seeking_venue")?,
                seeking_description: row.try_get("seeking_description")?,
            },
        })
    }
}

/// Show record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: NaiveDateTime,
}

impl Show {
    pub(crate) fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Show {
            id: row.try_get("id")?,
            venue_id: row.try_get("venue_id")?,
            artist_id: row.try_get("artist_id")?,
            start_time: row.try_get("start_time")?,
        })
    }
}

/// Id and display name of a venue or artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub id: i64,
    pub name: String,
}

/// Map `id, name` rows
pub(crate) fn name_entries(rows: &[SqliteRow]) -> sqlx::Result<Vec<NameEntry>> {
    rows.iter()
        .map(|row| {
            Ok(NameEntry {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

/// Name search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<NameEntry>,
}

impl SearchResults {
    /// Keep the entries whose name contains `term`, ignoring case
    ///
    /// Case folding is Unicode-aware; the term is matched literally.
    pub fn matching(entries: Vec<NameEntry>, term: &str) -> Self {
        let needle = term.to_lowercase();
        let data: Vec<NameEntry> = entries
            .into_iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .collect();
        Self::from(data)
    }
}

impl From<Vec<NameEntry>> for SearchResults {
    fn from(data: Vec<NameEntry>) -> Self {
        SearchResults {
            count: data.len(),
            data,
        }
    }
}

/// Outcome of a successful venue/artist create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listed {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<NameEntry> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| NameEntry {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_matching_folds_non_ascii_case() {
        let results = SearchResults::matching(entries(&["CAFÉ ÉCLAIR", "Hop House"]), "café");
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "CAFÉ ÉCLAIR");
    }

    #[test]
    fn test_matching_treats_wildcards_literally() {
        let all = entries(&["100% Jazz", "1000 Jazz", "a_b", "axb"]);

        assert_eq!(SearchResults::matching(all.clone(), "0%").count, 1);
        assert_eq!(SearchResults::matching(all.clone(), "_").count, 1);
        assert_eq!(SearchResults::matching(all, "").count, 4);
    }
}
