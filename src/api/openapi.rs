//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, maintenance, publications};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booky API",
        version = "1.0.0",
        description = "Book Catalog REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book_by_isbn,
        books::get_book_by_category,
        books::create_book,
        books::update_book_title,
        books::attach_author,
        books::attach_publication,
        books::delete_book,
        books::detach_author,
        // Authors
        authors::list_authors,
        authors::get_authors_by_book,
        authors::create_author,
        // Publications
        publications::list_publications,
        publications::create_publication,
        // Maintenance
        maintenance::reconcile,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBookTitle,
            books::BookResponse,
            books::BookCreatedResponse,
            books::AttachAuthorRequest,
            books::AttachPublicationRequest,
            books::BookAuthorResponse,
            books::BookPublicationResponse,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            authors::AuthorsResponse,
            authors::AuthorCreatedResponse,
            // Publications
            crate::models::publication::Publication,
            crate::models::publication::CreatePublication,
            publications::PublicationCreatedResponse,
            // Maintenance
            crate::services::relations::ReconcileReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::api::LookupError,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "authors", description = "Author management"),
        (name = "publications", description = "Publication management"),
        (name = "maintenance", description = "Catalog maintenance")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
