//! Maintenance endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, services::relations::ReconcileReport};

/// Repair author and publication back-references
#[utoipa::path(
    post,
    path = "/maintenance/reconcile",
    tag = "maintenance",
    responses(
        (status = 200, description = "Repairs performed", body = ReconcileReport)
    )
)]
pub async fn reconcile(State(state): State<crate::AppState>) -> AppResult<Json<ReconcileReport>> {
    let report = state.services.relations.reconcile().await?;

    tracing::info!(
        authors = report.authors_repaired,
        publications = report.publications_repaired,
        added = report.references_added,
        removed = report.references_removed,
        "Reconciliation pass completed"
    );

    Ok(Json(report))
}
