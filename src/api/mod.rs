//! API handlers for Booky REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod publications;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Legacy miss payload: lookup endpoints answer 200 with an error message
/// instead of a 404, for compatibility with existing API consumers.
#[derive(Serialize, ToSchema)]
pub struct LookupError {
    pub error: String,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/", get(books::list_books))
        .route("/is/:isbn", get(books::get_book_by_isbn))
        .route("/c/:category", get(books::get_book_by_category))
        .route("/book/new", post(books::create_book))
        .route("/book/update/:isbn", put(books::update_book_title))
        .route("/book/author/update/:isbn", put(books::attach_author))
        .route("/publication/update/book/:isbn", put(books::attach_publication))
        .route("/book/delete/:isbn", delete(books::delete_book))
        .route("/book/delete/author/:isbn/:author_id", delete(books::detach_author))
        // Authors
        .route("/author", get(authors::list_authors))
        .route("/author/book/:isbn", get(authors::get_authors_by_book))
        .route("/author/new", post(authors::create_author))
        // Publications
        .route("/publications", get(publications::list_publications))
        .route("/publication/new", post(publications::create_publication))
        // Maintenance
        .route("/maintenance/reconcile", post(maintenance::reconcile))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
