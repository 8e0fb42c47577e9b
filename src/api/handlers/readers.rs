//! Reader CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::READER_TAG;
use crate::api::dto::{
    ReaderResponse, CreateReaderRequest, ErrorResponse, PaginationParams, UpdateReaderRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn reader_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_readers, create_reader))
        .routes(routes!(get_reader, update_reader, delete_reader))
}

#[utoipa::path(
    get,
    path = "/",
    tag = READER_TAG,
    params(PaginationParams),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Page of readers ordered by id", body = Vec<ReaderResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_readers(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<ReaderResponse>>> {
    let readers = state.services.readers.list_readers(page.skip, page.limit).await?;
    Ok(Json(readers.into_iter().map(ReaderResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = READER_TAG,
    request_body = CreateReaderRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Reader created", body = ReaderResponse),
        (status = 400, description = "Invalid reader data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn create_reader(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateReaderRequest>,
) -> AppResult<(StatusCode, Json<ReaderResponse>)> {
    let reader = state.services.readers.create_reader(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(reader.into())))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = READER_TAG,
    params(("id" = i32, Path, description = "Reader id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Reader found", body = ReaderResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse)
    )
)]
async fn get_reader(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<ReaderResponse>> {
    let reader = state.services.readers.get_reader(id).await?;
    Ok(Json(reader.into()))
}

/// Partial update: fields missing from the body keep their value.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = READER_TAG,
    params(("id" = i32, Path, description = "Reader id")),
    request_body = UpdateReaderRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Reader updated", body = ReaderResponse),
        (status = 400, description = "Invalid reader data", body = ErrorResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn update_reader(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateReaderRequest>,
) -> AppResult<Json<ReaderResponse>> {
    let reader = state.services.readers.update_reader(id, payload.into()).await?;
    Ok(Json(reader.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = READER_TAG,
    params(("id" = i32, Path, description = "Reader id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 400, description = "Reader has borrow history", body = ErrorResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse)
    )
)]
async fn delete_reader(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.readers.delete_reader(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
