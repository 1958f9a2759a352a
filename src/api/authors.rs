//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
};

use super::LookupError;

/// Authors of a book
#[derive(Serialize, ToSchema)]
pub struct AuthorsResponse {
    pub authors: Vec<Author>,
}

/// Author creation response
#[derive(Serialize, ToSchema)]
pub struct AuthorCreatedResponse {
    pub author: Author,
    pub message: String,
}

/// List all authors
#[utoipa::path(
    get,
    path = "/author",
    tag = "authors",
    responses(
        (status = 200, description = "All authors", body = [Author])
    )
)]
pub async fn list_authors(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// List the authors of a book
#[utoipa::path(
    get,
    path = "/author/book/{isbn}",
    tag = "authors",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "The authors, or a legacy miss payload", body = AuthorsResponse)
    )
)]
pub async fn get_authors_by_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Response> {
    let authors = state.services.catalog.find_authors_by_book(&isbn).await?;
    if authors.is_empty() {
        return Ok(Json(LookupError {
            error: format!("No author found for the book of {isbn}"),
        })
        .into_response());
    }
    Ok(Json(AuthorsResponse { authors }).into_response())
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/author/new",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorCreatedResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<AuthorCreatedResponse>)> {
    payload.validate()?;

    let author = state.services.catalog.create_author(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthorCreatedResponse {
            author,
            message: "Author was added".to_string(),
        }),
    ))
}
