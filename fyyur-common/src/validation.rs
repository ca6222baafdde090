//! Field validation for submitted listings
//!
//! Each entity has a form type holding raw submitted values and a `validate`
//! method producing the field set the persistence layer accepts. Failures are
//! collected per field rather than stopping at the first one.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::parse_start_time;

/// Maximum length of short text columns
pub const MAX_TEXT_LEN: usize = 120;

/// Maximum length of image links
pub const MAX_IMAGE_LINK_LEN: usize = 500;

const REQUIRED: &str = "This field is required.";
const INVALID_URL: &str = "Invalid URL.";
const INVALID_CHOICE: &str = "Not a valid choice.";

/// US state codes accepted for the `state` field
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Genres accepted for the `genres` field
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// True if any violation was recorded for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Ok(value) if nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} - {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Trim a submitted value; blank counts as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn too_long(max: usize) -> String {
    format!("Field cannot be longer than {} characters.", max)
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    max: Option<usize>,
) -> String {
    match present(value) {
        None => {
            errors.push(field, REQUIRED);
            String::new()
        }
        Some(v) => {
            if let Some(max) = max {
                if v.chars().count() > max {
                    errors.push(field, too_long(max));
                }
            }
            v.to_string()
        }
    }
}

fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    max: usize,
) -> Option<String> {
    let v = present(value)?;
    if v.chars().count() > max {
        errors.push(field, too_long(max));
    }
    Some(v.to_string())
}

fn optional_url(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    max: usize,
) -> Option<String> {
    let v = optional_text(errors, field, value, max)?;
    match url::Url::parse(&v) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
        _ => errors.push(field, INVALID_URL),
    }
    Some(v)
}

fn state_code(errors: &mut ValidationErrors, value: &Option<String>) -> String {
    let state = required_text(errors, "state", value, Some(MAX_TEXT_LEN));
    if !state.is_empty() && !STATES.contains(&state.as_str()) {
        errors.push("state", INVALID_CHOICE);
    }
    state
}

fn genre_list(errors: &mut ValidationErrors, value: &Option<Vec<String>>) -> Vec<String> {
    let genres: Vec<String> = value
        .iter()
        .flatten()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    if genres.is_empty() {
        errors.push("genres", REQUIRED);
    }
    for genre in &genres {
        if !GENRES.contains(&genre.as_str()) {
            errors.push(
                "genres",
                format!("'{}' is not a valid choice for this field.", genre),
            );
        }
    }
    genres
}

/// Seeking text is only kept while the seeking flag is set
fn seeking_text(
    errors: &mut ValidationErrors,
    seeking: bool,
    value: &Option<String>,
) -> Option<String> {
    if !seeking {
        return None;
    }
    optional_text(errors, "seeking_description", value, MAX_TEXT_LEN)
}

/// Validated venue attributes (everything but the id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Raw venue submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub facebook_link: Option<String>,
    #[serde(alias = "website_link")]
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<VenueFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let fields = VenueFields {
            name: required_text(&mut errors, "name", &self.name, None),
            city: required_text(&mut errors, "city", &self.city, Some(MAX_TEXT_LEN)),
            state: state_code(&mut errors, &self.state),
            address: required_text(&mut errors, "address", &self.address, Some(MAX_TEXT_LEN)),
            phone: required_text(&mut errors, "phone", &self.phone, Some(MAX_TEXT_LEN)),
            image_link: optional_url(
                &mut errors,
                "image_link",
                &self.image_link,
                MAX_IMAGE_LINK_LEN,
            ),
            genres: genre_list(&mut errors, &self.genres),
            facebook_link: optional_url(
                &mut errors,
                "facebook_link",
                &self.facebook_link,
                MAX_TEXT_LEN,
            ),
            website: optional_url(&mut errors, "website", &self.website, MAX_TEXT_LEN),
            seeking_talent: self.seeking_talent,
            seeking_description: seeking_text(
                &mut errors,
                self.seeking_talent,
                &self.seeking_description,
            ),
        };

        errors.into_result(fields)
    }
}

/// Validated artist attributes (everything but the id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Raw artist submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub facebook_link: Option<String>,
    #[serde(alias = "website_link")]
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let fields = ArtistFields {
            name: required_text(&mut errors, "name", &self.name, None),
            city: required_text(&mut errors, "city", &self.city, Some(MAX_TEXT_LEN)),
            state: state_code(&mut errors, &self.state),
            phone: required_text(&mut errors, "phone", &self.phone, Some(MAX_TEXT_LEN)),
            image_link: optional_url(
                &mut errors,
                "image_link",
                &self.image_link,
                MAX_IMAGE_LINK_LEN,
            ),
            genres: genre_list(&mut errors, &self.genres),
            facebook_link: optional_url(
                &mut errors,
                "facebook_link",
                &self.facebook_link,
                MAX_TEXT_LEN,
            ),
            website: optional_url(&mut errors, "website", &self.website, MAX_TEXT_LEN),
            seeking_venue: self.seeking_venue,
            seeking_description: seeking_text(
                &mut errors,
                self.seeking_venue,
                &self.seeking_description,
            ),
        };

        errors.into_result(fields)
    }
}

/// Validated show attributes
///
/// Reference existence is checked by the write itself, inside its transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowFields {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: NaiveDateTime,
}

/// Raw show submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    pub venue_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub start_time: Option<String>,
}

impl ShowForm {
    pub fn validate(&self) -> Result<ShowFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.venue_id.is_none() {
            errors.push("venue_id", REQUIRED);
        }
        if self.artist_id.is_none() {
            errors.push("artist_id", REQUIRED);
        }
        let start_time = match present(&self.start_time) {
            None => {
                errors.push("start_time", REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = parse_start_time(raw);
                if parsed.is_none() {
                    errors.push("start_time", "Not a valid datetime value.");
                }
                parsed
            }
        };

        match (self.venue_id, self.artist_id, start_time) {
            (Some(venue_id), Some(artist_id), Some(start_time)) if errors.is_empty() => {
                Ok(ShowFields {
                    venue_id,
                    artist_id,
                    start_time,
                })
            }
            _ => Err(errors),
        }
    }
}
