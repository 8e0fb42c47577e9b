//! Borrow workflow handlers.
//!
//! The handlers only translate; every rule is enforced by `BorrowService` and
//! its lending store.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::BORROW_TAG;
use crate::api::dto::{BorrowRecordResponse, BorrowRequest, ErrorResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// - `POST /` borrow a book
/// - `POST /return/{borrow_id}`
/// - `GET /reader/{reader_id}` active borrows
/// - `GET /{borrow_id}`
pub fn borrow_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(borrow_book))
        .routes(routes!(return_book))
        .routes(routes!(list_active_borrows))
        .routes(routes!(get_borrow))
}

#[utoipa::path(
    post,
    path = "/",
    tag = BORROW_TAG,
    request_body = BorrowRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecordResponse),
        (status = 400, description = "NO_AVAILABLE_COPIES or BORROW_LIMIT_EXCEEDED", body = ErrorResponse),
        (status = 404, description = "Book or reader not found", body = ErrorResponse)
    )
)]
async fn borrow_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRecordResponse>)> {
    tracing::debug!(
        user_id = user.user_id,
        book_id = payload.book_id,
        reader_id = payload.reader_id,
        "Borrow requested"
    );
    let record = state
        .services
        .borrows
        .borrow(payload.book_id, payload.reader_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    post,
    path = "/return/{borrow_id}",
    tag = BORROW_TAG,
    params(("borrow_id" = i32, Path, description = "Borrow record id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecordResponse),
        (status = 400, description = "ALREADY_RETURNED", body = ErrorResponse),
        (status = 404, description = "Borrow record not found", body = ErrorResponse)
    )
)]
async fn return_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowRecordResponse>> {
    tracing::debug!(user_id = user.user_id, borrow_id, "Return requested");
    let record = state.services.borrows.return_book(borrow_id).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/reader/{reader_id}",
    tag = BORROW_TAG,
    params(("reader_id" = i32, Path, description = "Reader id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Active borrows ordered by id", body = Vec<BorrowRecordResponse>),
        (status = 404, description = "Reader not found", body = ErrorResponse)
    )
)]
async fn list_active_borrows(
    State(state): State<AppState>,
    Path(reader_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowRecordResponse>>> {
    let records = state.services.borrows.list_active(reader_id).await?;
    Ok(Json(records.into_iter().map(BorrowRecordResponse::from).collect()))
}

/// Current state of one record; the way to re-check after an ambiguous failure.
#[utoipa::path(
    get,
    path = "/{borrow_id}",
    tag = BORROW_TAG,
    params(("borrow_id" = i32, Path, description = "Borrow record id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecordResponse),
        (status = 404, description = "Borrow record not found", body = ErrorResponse)
    )
)]
async fn get_borrow(
    State(state): State<AppState>,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowRecordResponse>> {
    let record = state.services.borrows.get(borrow_id).await?;
    Ok(Json(record.into()))
}
