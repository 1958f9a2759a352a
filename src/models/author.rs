//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// An author with back-references to the books they wrote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    /// Generated identifier
    pub id: u64,
    pub name: String,
    /// ISBNs of this author's books. Set semantics: no duplicate entries.
    #[serde(default)]
    pub books: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}
