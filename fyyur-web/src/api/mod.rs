//! HTTP handlers

pub mod artists;
pub mod health;
pub mod shows;
pub mod venues;

pub use artists::artist_routes;
pub use health::health_routes;
pub use shows::show_routes;
pub use venues::venue_routes;

use serde::{Deserialize, Serialize};

/// Outcome of a write: the affected id and the messages to show the user
#[derive(Debug, Serialize)]
pub struct FlashResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub messages: Vec<String>,
}

impl FlashResponse {
    pub fn new(id: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            id,
            messages: vec![message.into()],
        }
    }

    /// A write that silently did nothing
    pub fn empty() -> Self {
        Self {
            id: None,
            messages: Vec::new(),
        }
    }
}

/// Body of the search endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}
