//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A catalog book, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// International Standard Book Number, unique across the catalog
    pub isbn: String,
    pub title: String,
    pub category: String,
    /// IDs of the book's authors. Set semantics: no duplicate entries.
    #[serde(default)]
    pub authors: Vec<u64>,
    /// The book carries at most one publication reference; attaching a new
    /// publication replaces the previous one.
    #[serde(default)]
    pub publication: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,
}

/// Update book title request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookTitle {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
}
