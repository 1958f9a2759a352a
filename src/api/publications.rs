//! Publication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::publication::{CreatePublication, Publication},
};

/// Publication creation response
#[derive(Serialize, ToSchema)]
pub struct PublicationCreatedResponse {
    pub publication: Publication,
    pub message: String,
}

/// List all publications
#[utoipa::path(
    get,
    path = "/publications",
    tag = "publications",
    responses(
        (status = 200, description = "All publications", body = [Publication])
    )
)]
pub async fn list_publications(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Publication>>> {
    let publications = state.services.catalog.list_publications().await?;
    Ok(Json(publications))
}

/// Create a new publication
#[utoipa::path(
    post,
    path = "/publication/new",
    tag = "publications",
    request_body = CreatePublication,
    responses(
        (status = 201, description = "Publication created", body = PublicationCreatedResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_publication(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreatePublication>,
) -> AppResult<(StatusCode, Json<PublicationCreatedResponse>)> {
    payload.validate()?;

    let publication = state.services.catalog.create_publication(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(PublicationCreatedResponse {
            publication,
            message: "Publication was added".to_string(),
        }),
    ))
}
