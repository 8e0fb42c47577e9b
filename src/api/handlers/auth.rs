//! Registration, login and token refresh.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    CredentialsRequest, ErrorResponse, LoginRequest, RefreshTokenRequest, TokenResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// - `POST /register`
/// - `POST /login`
/// - `POST /refresh`
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(refresh_token))
}

/// Creates an account and returns its first token pair.
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let users = &state.services.users;
    let user = users.create_user(payload.email, &payload.password).await?;
    let tokens = users.issue_tokens(&user, &state.jwt_config)?;
    Ok((StatusCode::CREATED, Json(tokens.into())))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Malformed email or empty password", body = ErrorResponse),
        (status = 401, description = "Incorrect email or password", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let users = &state.services.users;
    let user = users.authenticate(&payload.email, &payload.password).await?;
    let tokens = users.issue_tokens(&user, &state.jwt_config)?;
    Ok(Json(tokens.into()))
}

/// Exchanges a refresh token for a new pair.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state
        .services
        .users
        .refresh(&payload.refresh_token, &state.jwt_config)
        .await?;
    Ok(Json(tokens.into()))
}
