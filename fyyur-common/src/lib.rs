//! # Fyyur Common Library
//!
//! Booking directory core shared by the Fyyur services:
//! - Database schema and connection setup
//! - Venue, artist and show records
//! - Directory, detail and search queries
//! - Create/update/delete operations with cascading show removal
//! - Field validation for submitted listings
//! - Bootstrap configuration loading

pub mod artists;
pub mod config;
pub mod db;
pub mod error;
pub mod shows;
pub mod time;
pub mod validation;
pub mod venues;

pub use error::{Error, Result};
pub use validation::{FieldError, ValidationErrors};
