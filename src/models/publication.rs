//! Publication model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A publication with back-references to the books it published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Publication {
    /// Generated identifier
    pub id: u64,
    pub name: String,
    /// ISBNs of the books published here. Set semantics: no duplicate entries.
    #[serde(default)]
    pub books: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create publication request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePublication {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}
