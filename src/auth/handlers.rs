use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            normalize_email, AuthenticatedUser, LoginForm, RefreshRequest, SignupRequest,
            TokenResponse,
        },
        extractors::AuthUser,
        password::{hash_password, verify_password},
        store::{StoreError, UserRecord},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthenticatedUser>), ApiError> {
    let Json(mut payload) = payload?;
    if let Err(e) = payload.validate() {
        warn!(error = %e, "signup validation failed");
        return Err(e);
    }

    let password_hash = hash_password(&payload.password)?;
    let record = UserRecord {
        full_name: payload.full_name.clone(),
        password_hash,
    };

    match state.users.create(&payload.email, record).await {
        Ok(()) => {}
        Err(StoreError::AlreadyExists) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::UserExists);
        }
    }

    info!(email = %payload.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthenticatedUser {
            email: payload.email,
            full_name: payload.full_name,
        }),
    ))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(form) = form?;
    let email = normalize_email(&form.username);

    let Some(user) = state.users.get(&email).await else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(email = %email, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = state.keys.sign_access(&email)?;
    info!(email = %email, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Refresh tokens are ordinary access tokens; a valid one is swapped for a
/// fresh token with the configured lifetime.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;

    let Some(email) = state.keys.verify(&payload.refresh_token) else {
        warn!("refresh with invalid token");
        return Err(ApiError::Unauthorized("Invalid refresh token"));
    };
    if state.users.get(&email).await.is_none() {
        warn!(email = %email, "refresh for unknown user");
        return Err(ApiError::Unauthorized("Invalid refresh token"));
    }

    let access_token = state.keys.sign_access(&email)?;
    info!(email = %email, "token refreshed");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<AuthenticatedUser> {
    Json(user)
}
