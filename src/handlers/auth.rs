// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload},
};

// ---
// Handler: register
// ---
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado, devolve o token"),
        (status = 409, description = "Nome de usuário já existe"),
        (status = 422, description = "Payload ou código de convite inválido")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .register_user(&payload.username, &payload.password, &payload.invite_code)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(AuthResponse { token })),
    ))
}

// ---
// Handler: login
// ---
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Token de acesso"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(AuthResponse { token }))))
}

// ---
// Handler: get_me
// ---
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(Envelope::ok(user.0))))
}

// ---
// Handler: create_invite (admin)
// ---
#[utoipa::path(
    post,
    path = "/api/auth/invites",
    tag = "Auth",
    responses(
        (status = 201, description = "Código de convite cunhado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let invite = app_state.auth_service.create_invite(&user.0).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(invite))))
}
