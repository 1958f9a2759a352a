//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{Book, CreateBook, UpdateBookTitle},
        publication::Publication,
    },
};

use super::LookupError;

/// Single-book response wrapper
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

/// Book creation response
#[derive(Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub book: Book,
    pub message: String,
}

/// Attach author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachAuthorRequest {
    pub author_id: u64,
}

/// Attach publication request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachPublicationRequest {
    pub publication_id: u64,
}

/// Book and author after a relationship change
#[derive(Serialize, ToSchema)]
pub struct BookAuthorResponse {
    pub book: Book,
    pub author: Author,
    pub message: String,
}

/// Book and publication after a relationship change
#[derive(Serialize, ToSchema)]
pub struct BookPublicationResponse {
    pub book: Book,
    pub publication: Publication,
    pub message: String,
}

/// List all books
#[utoipa::path(
    get,
    path = "/",
    tag = "books",
    responses(
        (status = 200, description = "All books in the catalog", body = [Book])
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/is/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "The book, or a legacy miss payload", body = BookResponse)
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Response> {
    match state.services.catalog.find_book(&isbn).await? {
        Some(book) => Ok(Json(BookResponse { book }).into_response()),
        None => Ok(Json(LookupError {
            error: format!("No book found for the ISBN of {isbn}"),
        })
        .into_response()),
    }
}

/// Get the first book matching a category
#[utoipa::path(
    get,
    path = "/c/{category}",
    tag = "books",
    params(
        ("category" = String, Path, description = "Book category")
    ),
    responses(
        (status = 200, description = "The book, or a legacy miss payload", body = BookResponse)
    )
)]
pub async fn get_book_by_category(
    State(state): State<crate::AppState>,
    Path(category): Path<String>,
) -> AppResult<Response> {
    match state.services.catalog.find_book_by_category(&category).await? {
        Some(book) => Ok(Json(BookResponse { book }).into_response()),
        None => Ok(Json(LookupError {
            error: format!("No book found for the category of {category}"),
        })
        .into_response()),
    }
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book/new",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    payload.validate()?;

    let book = state.services.catalog.create_book(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            book,
            message: "Book was added".to_string(),
        }),
    ))
}

/// Update a book's title
#[utoipa::path(
    put,
    path = "/book/update/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = UpdateBookTitle,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book_title(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    Json(payload): Json<UpdateBookTitle>,
) -> AppResult<Json<BookResponse>> {
    payload.validate()?;

    let book = state
        .services
        .catalog
        .update_book_title(&isbn, payload.title)
        .await?;
    Ok(Json(BookResponse { book }))
}

/// Attach an author to a book
#[utoipa::path(
    put,
    path = "/book/author/update/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = AttachAuthorRequest,
    responses(
        (status = 200, description = "Both sides updated", body = BookAuthorResponse),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn attach_author(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    Json(payload): Json<AttachAuthorRequest>,
) -> AppResult<Json<BookAuthorResponse>> {
    let (book, author) = state
        .services
        .relations
        .attach_author(&isbn, payload.author_id)
        .await?;
    Ok(Json(BookAuthorResponse {
        book,
        author,
        message: "New author was added".to_string(),
    }))
}

/// Attach a publication to a book, replacing any previous one
#[utoipa::path(
    put,
    path = "/publication/update/book/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = AttachPublicationRequest,
    responses(
        (status = 200, description = "Both sides updated", body = BookPublicationResponse),
        (status = 404, description = "Book or publication not found")
    )
)]
pub async fn attach_publication(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    Json(payload): Json<AttachPublicationRequest>,
) -> AppResult<Json<BookPublicationResponse>> {
    let (book, publication) = state
        .services
        .relations
        .attach_publication(&isbn, payload.publication_id)
        .await?;
    Ok(Json(BookPublicationResponse {
        book,
        publication,
        message: "Successfully updated publication".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/delete/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "The deleted book", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.relations.delete_book(&isbn).await?;
    Ok(Json(BookResponse { book }))
}

/// Detach an author from a book
#[utoipa::path(
    delete,
    path = "/book/delete/author/{isbn}/{author_id}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN"),
        ("author_id" = u64, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Both sides updated", body = BookAuthorResponse),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn detach_author(
    State(state): State<crate::AppState>,
    Path((isbn, author_id)): Path<(String, u64)>,
) -> AppResult<Json<BookAuthorResponse>> {
    let (book, author) = state
        .services
        .relations
        .detach_author(&isbn, author_id)
        .await?;
    Ok(Json(BookAuthorResponse {
        book,
        author,
        message: "Author was detached".to_string(),
    }))
}
