//! Performer endpoints.

use crate::{
    error::ApiResult,
    extractors::{IdList, RequestData, ResourceId},
    responses::{Created, Response},
    routes::view_models::{DeleteQuery, PerformerPayload, PerformerViewModel},
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use gala_domain::{Performer, PerformerId};
use gala_infrastructure::{PerformerRepository, Repository};
use tracing::debug;

/// Performer routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/performers", get(list_performers).post(create_performer))
        .route(
            "/performers/:performer_id",
            get(get_performer).put(update_performer).delete(delete_performer),
        )
}

/// Location of a stored performer
pub fn performer_location(performer_id: PerformerId) -> String {
    format!("/api/performers/{performer_id}")
}

/// Create a performer
#[utoipa::path(
    post,
    path = "/api/performers",
    tag = "performers",
    request_body = PerformerPayload,
    responses(
        (status = 201, description = "Performer created", body = PerformerViewModel),
        (status = 400, description = "Missing or invalid request data"),
    )
)]
pub async fn create_performer(
    State(state): State<AppState>,
    RequestData(creation): RequestData<PerformerPayload>,
) -> ApiResult<Created<PerformerViewModel>> {
    debug!(name = %creation.name, "Creating performer");

    let performer = state
        .performers
        .create_entity(Performer::from(creation))
        .await?;

    Ok(Created::at(performer_location(performer.id), performer.into()))
}

/// List performers by ID
#[utoipa::path(
    get,
    path = "/api/performers",
    tag = "performers",
    params(
        ("performerIds" = Vec<String>, Query, description = "Comma separated or repeated performer IDs"),
    ),
    responses(
        (status = 200, description = "Performers found, missing IDs skipped", body = [PerformerViewModel]),
        (status = 400, description = "No performer ID given"),
    )
)]
pub async fn list_performers(
    State(state): State<AppState>,
    IdList(performer_ids): IdList<PerformerId>,
) -> ApiResult<Response<Vec<PerformerViewModel>>> {
    debug!(count = performer_ids.len(), "Listing performers");

    let performers = state
        .performers
        .query_entities_by_keys(&performer_ids)
        .await?
        .into_iter()
        .filter(|performer| !performer.is_deleted)
        .map(PerformerViewModel::from)
        .collect();

    Ok(Response::success(performers))
}

/// Get a performer by ID
#[utoipa::path(
    get,
    path = "/api/performers/{performerId}",
    tag = "performers",
    params(("performerId" = String, Path, description = "Performer ID")),
    responses(
        (status = 200, description = "Performer found", body = PerformerViewModel),
        (status = 404, description = "Performer not found"),
    )
)]
pub async fn get_performer(
    State(state): State<AppState>,
    ResourceId(performer_id): ResourceId<PerformerId>,
) -> ApiResult<Response<PerformerViewModel>> {
    debug!(%performer_id, "Reading performer");

    let performer = state.performers.read_entity(performer_id).await?;
    Ok(Response::success(performer.into()))
}

/// Update a performer
#[utoipa::path(
    put,
    path = "/api/performers/{performerId}",
    tag = "performers",
    params(("performerId" = String, Path, description = "Performer ID")),
    request_body = PerformerPayload,
    responses(
        (status = 200, description = "Performer updated", body = PerformerViewModel),
        (status = 400, description = "Missing or invalid request data"),
        (status = 404, description = "Performer not found"),
    )
)]
pub async fn update_performer(
    State(state): State<AppState>,
    ResourceId(performer_id): ResourceId<PerformerId>,
    RequestData(edit): RequestData<PerformerPayload>,
) -> ApiResult<Response<PerformerViewModel>> {
    debug!(%performer_id, "Updating performer");

    let performer = state
        .performers
        .update_entity(performer_id, Performer::from(edit))
        .await?;
    Ok(Response::success(performer.into()))
}

/// Delete a performer
#[utoipa::path(
    delete,
    path = "/api/performers/{performerId}",
    tag = "performers",
    params(("performerId" = String, Path, description = "Performer ID"), DeleteQuery),
    responses(
        (status = 200, description = "Last state of the performer", body = PerformerViewModel),
        (status = 404, description = "Performer not found"),
    )
)]
pub async fn delete_performer(
    State(state): State<AppState>,
    ResourceId(performer_id): ResourceId<PerformerId>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Response<PerformerViewModel>> {
    let Query(query) = query?;
    debug!(%performer_id, hard_delete = query.hard_delete, "Deleting performer");

    let performer = state
        .performers
        .delete_entity(performer_id, query.hard_delete)
        .await?;
    Ok(Response::success(performer.into()))
}
