//! Gala endpoints.

use crate::{
    error::ApiResult,
    extractors::{Pagination, PaginationQuery, RequestData, ResourceId, Years, Zodiac},
    responses::{Created, PagedResponse, Response},
    routes::view_models::{
        DeleteQuery, GalaCreation, GalaEdit, GalaViewModel, PerformerViewModel, ProgramViewModel,
    },
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use gala_common::Page;
use gala_domain::{Gala, GalaId};
use gala_infrastructure::{GalaRepository, PerformerRepository, ProgramRepository, Repository};
use tracing::debug;

/// Gala routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/galas", get(list_galas).post(create_gala))
        .route(
            "/galas/:gala_id",
            get(get_gala).put(update_gala).delete(delete_gala),
        )
        .route("/galas/:gala_id/programs", get(list_gala_programs))
        .route("/galas/:gala_id/performers", get(list_gala_performers))
}

/// Location of a stored gala
pub fn gala_location(gala_id: GalaId) -> String {
    format!("/api/galas/{gala_id}")
}

/// Create a gala
#[utoipa::path(
    post,
    path = "/api/galas",
    tag = "galas",
    request_body = GalaCreation,
    responses(
        (status = 201, description = "Gala created", body = GalaViewModel),
        (status = 400, description = "Missing or invalid request data"),
    )
)]
pub async fn create_gala(
    State(state): State<AppState>,
    RequestData(creation): RequestData<GalaCreation>,
) -> ApiResult<Created<GalaViewModel>> {
    debug!(name = %creation.name, year = creation.year, "Creating gala");

    let gala = state.galas.create_entity(Gala::from(creation)).await?;

    Ok(Created::at(gala_location(gala.id), gala.into()))
}

/// List galas by year or zodiac sign, most recent first
///
/// `years` takes precedence over `zodiac`; with neither the page is empty.
#[utoipa::path(
    get,
    path = "/api/galas",
    tag = "galas",
    params(
        ("years" = Option<String>, Query, description = "Comma separated or repeated years"),
        ("zodiac" = Option<String>, Query, description = "Zodiac sign name or ordinal"),
        PaginationQuery,
    ),
    responses(
        (status = 200, description = "Page of galas", body = [GalaViewModel]),
        (status = 400, description = "Unknown zodiac sign"),
    )
)]
pub async fn list_galas(
    State(state): State<AppState>,
    Pagination(filter): Pagination,
    years: Years,
    Zodiac(zodiac): Zodiac,
) -> ApiResult<PagedResponse<GalaViewModel>> {
    debug!(years = ?years.0, zodiac = ?zodiac, "Listing galas");

    let galas = match zodiac {
        _ if !years.is_empty() => state.galas.galas_by_years(&years.0).await?,
        Some(zodiac) => state.galas.galas_by_zodiac(zodiac).await?,
        None => return PagedResponse::empty(filter, &state.pagination, "/api/galas"),
    };

    let galas: Vec<GalaViewModel> = galas
        .into_iter()
        .filter(|gala| !gala.is_deleted)
        .map(GalaViewModel::from)
        .collect();

    PagedResponse::new(Page::from_all(galas, filter), &state.pagination, "/api/galas")
}

/// Get a gala by ID
#[utoipa::path(
    get,
    path = "/api/galas/{galaId}",
    tag = "galas",
    params(("galaId" = String, Path, description = "Gala ID")),
    responses(
        (status = 200, description = "Gala found", body = GalaViewModel),
        (status = 404, description = "Gala not found"),
    )
)]
pub async fn get_gala(
    State(state): State<AppState>,
    ResourceId(gala_id): ResourceId<GalaId>,
) -> ApiResult<Response<GalaViewModel>> {
    debug!(%gala_id, "Reading gala");

    let gala = state.galas.read_entity(gala_id).await?;
    Ok(Response::success(gala.into()))
}

/// Programs of a gala
#[utoipa::path(
    get,
    path = "/api/galas/{galaId}/programs",
    tag = "galas",
    params(("galaId" = String, Path, description = "Gala ID"), PaginationQuery),
    responses(
        (status = 200, description = "Page of the gala's programs", body = [ProgramViewModel]),
        (status = 404, description = "Gala not found"),
    )
)]
pub async fn list_gala_programs(
    State(state): State<AppState>,
    ResourceId(gala_id): ResourceId<GalaId>,
    Pagination(filter): Pagination,
) -> ApiResult<PagedResponse<ProgramViewModel>> {
    debug!(%gala_id, "Listing gala programs");

    let programs: Vec<ProgramViewModel> = state
        .programs
        .programs_by_gala_id(gala_id)
        .await?
        .into_iter()
        .filter(|program| !program.is_deleted)
        .map(ProgramViewModel::from)
        .collect();

    let route = format!("{}/programs", gala_location(gala_id));
    PagedResponse::new(Page::from_all(programs, filter), &state.pagination, &route)
}

/// Performers across a gala's programs
#[utoipa::path(
    get,
    path = "/api/galas/{galaId}/performers",
    tag = "galas",
    params(("galaId" = String, Path, description = "Gala ID")),
    responses(
        (status = 200, description = "Performers of the gala", body = [PerformerViewModel]),
        (status = 404, description = "Gala not found"),
    )
)]
pub async fn list_gala_performers(
    State(state): State<AppState>,
    ResourceId(gala_id): ResourceId<GalaId>,
) -> ApiResult<Response<Vec<PerformerViewModel>>> {
    debug!(%gala_id, "Listing gala performers");

    let performers = state
        .performers
        .performers_by_gala_id(gala_id)
        .await?
        .into_iter()
        .filter(|performer| !performer.is_deleted)
        .map(PerformerViewModel::from)
        .collect();

    Ok(Response::success(performers))
}

/// Update a gala
#[utoipa::path(
    put,
    path = "/api/galas/{galaId}",
    tag = "galas",
    params(("galaId" = String, Path, description = "Gala ID")),
    request_body = GalaEdit,
    responses(
        (status = 200, description = "Gala updated", body = GalaViewModel),
        (status = 400, description = "Missing or invalid request data"),
        (status = 404, description = "Gala not found"),
    )
)]
pub async fn update_gala(
    State(state): State<AppState>,
    ResourceId(gala_id): ResourceId<GalaId>,
    RequestData(edit): RequestData<GalaEdit>,
) -> ApiResult<Response<GalaViewModel>> {
    debug!(%gala_id, "Updating gala");

    let gala = state.galas.update_entity(gala_id, Gala::from(edit)).await?;
    Ok(Response::success(gala.into()))
}

/// Delete a gala
#[utoipa::path(
    delete,
    path = "/api/galas/{galaId}",
    tag = "galas",
    params(("galaId" = String, Path, description = "Gala ID"), DeleteQuery),
    responses(
        (status = 200, description = "Last state of the gala", body = GalaViewModel),
        (status = 404, description = "Gala not found"),
    )
)]
pub async fn delete_gala(
    State(state): State<AppState>,
    ResourceId(gala_id): ResourceId<GalaId>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Response<GalaViewModel>> {
    let Query(query) = query?;
    debug!(%gala_id, hard_delete = query.hard_delete, "Deleting gala");

    let gala = state
        .galas
        .delete_entity(gala_id, query.hard_delete)
        .await?;
    Ok(Response::success(gala.into()))
}
