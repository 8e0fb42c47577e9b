//! Book CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::BOOK_TAG;
use crate::api::dto::{
    BookResponse, CreateBookRequest, ErrorResponse, PaginationParams, UpdateBookRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn book_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(get_book, update_book, delete_book))
}

#[utoipa::path(
    get,
    path = "/",
    tag = BOOK_TAG,
    params(PaginationParams),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Page of books ordered by id", body = Vec<BookResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_books(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.books.list_books(page.skip, page.limit).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = BOOK_TAG,
    request_body = CreateBookRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid book data", body = ErrorResponse),
        (status = 409, description = "ISBN already registered", body = ErrorResponse)
    )
)]
async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.books.create_book(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = BOOK_TAG,
    params(("id" = i32, Path, description = "Book id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Book found", body = BookResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book.into()))
}

/// Partial update: fields missing from the body keep their value.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = BOOK_TAG,
    params(("id" = i32, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid book data", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "ISBN already registered", body = ErrorResponse)
    )
)]
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.update_book(id, payload.into()).await?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = BOOK_TAG,
    params(("id" = i32, Path, description = "Book id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book has borrow history", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
