use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::service::{AuthServiceError, Credentials, SessionView};
use super::session::AuthenticatedUser;
use super::UserView;
use crate::context::AppContext;
use crate::error::{ApiError, ApiJson};
use crate::store::RepositoryError;

pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
}

async fn register_handler(
    State(ctx): State<AppContext>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let session = ctx.auth.register(credentials)?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn login_handler(
    State(ctx): State<AppContext>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<SessionView>, ApiError> {
    let session = ctx.auth.login(credentials)?;
    Ok(Json(session))
}

async fn me_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<UserView>, ApiError> {
    let view = ctx.auth.current_user(&user)?;
    Ok(Json(view))
}

impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidEmail | AuthServiceError::WeakPassword => {
                ApiError::BadRequest(err.to_string())
            }
            AuthServiceError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthServiceError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthServiceError::UnknownUser => ApiError::NotFound(err.to_string()),
            AuthServiceError::Hash(_)
            | AuthServiceError::Session(_)
            | AuthServiceError::Repository(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict => ApiError::Conflict(err.to_string()),
            RepositoryError::NotFound => ApiError::NotFound(err.to_string()),
            RepositoryError::Unavailable(_) => ApiError::Internal(err.to_string()),
        }
    }
}
