//! Program endpoints.

use crate::{
    error::ApiResult,
    extractors::{IdList, RequestData, ResourceId},
    responses::{Created, Response},
    routes::view_models::{
        DeleteQuery, PerformerViewModel, ProgramPayload, ProgramViewModel,
    },
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use gala_domain::{Program, ProgramId};
use gala_infrastructure::{PerformerRepository, ProgramRepository, Repository};
use tracing::debug;

/// Program routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs).post(create_program))
        .route(
            "/programs/:program_id",
            get(get_program).put(update_program).delete(delete_program),
        )
        .route("/programs/:program_id/performers", get(list_program_performers))
}

/// Location of a stored program
pub fn program_location(program_id: ProgramId) -> String {
    format!("/api/programs/{program_id}")
}

/// Create a program
#[utoipa::path(
    post,
    path = "/api/programs",
    tag = "programs",
    request_body = ProgramPayload,
    responses(
        (status = 201, description = "Program created", body = ProgramViewModel),
        (status = 400, description = "Missing or invalid request data"),
    )
)]
pub async fn create_program(
    State(state): State<AppState>,
    RequestData(creation): RequestData<ProgramPayload>,
) -> ApiResult<Created<ProgramViewModel>> {
    debug!(name = %creation.name, "Creating program");

    let program = state.programs.create_entity(Program::from(creation)).await?;

    Ok(Created::at(program_location(program.id), program.into()))
}

/// List programs by ID
#[utoipa::path(
    get,
    path = "/api/programs",
    tag = "programs",
    params(
        ("programIds" = Vec<String>, Query, description = "Comma separated or repeated program IDs"),
    ),
    responses(
        (status = 200, description = "Programs found, missing IDs skipped", body = [ProgramViewModel]),
        (status = 400, description = "No program ID given"),
    )
)]
pub async fn list_programs(
    State(state): State<AppState>,
    IdList(program_ids): IdList<ProgramId>,
) -> ApiResult<Response<Vec<ProgramViewModel>>> {
    debug!(count = program_ids.len(), "Listing programs");

    let programs = state
        .programs
        .query_entities_by_keys(&program_ids)
        .await?
        .into_iter()
        .filter(|program| !program.is_deleted)
        .map(ProgramViewModel::from)
        .collect();

    Ok(Response::success(programs))
}

/// Get a program by ID
#[utoipa::path(
    get,
    path = "/api/programs/{programId}",
    tag = "programs",
    params(("programId" = String, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program found", body = ProgramViewModel),
        (status = 404, description = "Program not found"),
    )
)]
pub async fn get_program(
    State(state): State<AppState>,
    ResourceId(program_id): ResourceId<ProgramId>,
) -> ApiResult<Response<ProgramViewModel>> {
    debug!(%program_id, "Reading program");

    let program = state.programs.read_entity(program_id).await?;
    Ok(Response::success(program.into()))
}

/// Performers of a program
#[utoipa::path(
    get,
    path = "/api/programs/{programId}/performers",
    tag = "programs",
    params(("programId" = String, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Performers of the program", body = [PerformerViewModel]),
        (status = 404, description = "Program not found"),
    )
)]
pub async fn list_program_performers(
    State(state): State<AppState>,
    ResourceId(program_id): ResourceId<ProgramId>,
) -> ApiResult<Response<Vec<PerformerViewModel>>> {
    debug!(%program_id, "Listing program performers");

    let performers = state
        .performers
        .performers_by_program_id(program_id)
        .await?
        .into_iter()
        .filter(|performer| !performer.is_deleted)
        .map(PerformerViewModel::from)
        .collect();

    Ok(Response::success(performers))
}

/// Update a program
#[utoipa::path(
    put,
    path = "/api/programs/{programId}",
    tag = "programs",
    params(("programId" = String, Path, description = "Program ID")),
    request_body = ProgramPayload,
    responses(
        (status = 200, description = "Program updated", body = ProgramViewModel),
        (status = 400, description = "Missing or invalid request data"),
        (status = 404, description = "Program not found"),
    )
)]
pub async fn update_program(
    State(state): State<AppState>,
    ResourceId(program_id): ResourceId<ProgramId>,
    RequestData(edit): RequestData<ProgramPayload>,
) -> ApiResult<Response<ProgramViewModel>> {
    debug!(%program_id, "Updating program");

    let program = state
        .programs
        .update_entity(program_id, Program::from(edit))
        .await?;
    Ok(Response::success(program.into()))
}

/// Delete a program
#[utoipa::path(
    delete,
    path = "/api/programs/{programId}",
    tag = "programs",
    params(("programId" = String, Path, description = "Program ID"), DeleteQuery),
    responses(
        (status = 200, description = "Last state of the program", body = ProgramViewModel),
        (status = 404, description = "Program not found"),
    )
)]
pub async fn delete_program(
    State(state): State<AppState>,
    ResourceId(program_id): ResourceId<ProgramId>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Response<ProgramViewModel>> {
    let Query(query) = query?;
    debug!(%program_id, hard_delete = query.hard_delete, "Deleting program");

    let program = state
        .programs
        .delete_entity(program_id, query.hard_delete)
        .await?;
    Ok(Response::success(program.into()))
}
