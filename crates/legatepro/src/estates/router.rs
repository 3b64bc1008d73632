use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::domain::{CollaboratorView, EstatePatch, EstateView, NewEstate};
use super::service::{EstateServiceError, NewCollaborator, RoleChange};
use crate::access::AccessError;
use crate::auth::session::AuthenticatedUser;
use crate::context::AppContext;
use crate::domain::{EstateId, UserId};
use crate::error::{ApiError, ApiJson};

pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/api/estates", get(list_handler).post(create_handler))
        .route(
            "/api/estates/:estate_id",
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .route(
            "/api/estates/:estate_id/collaborators",
            get(collaborators_handler).post(add_collaborator_handler),
        )
        .route(
            "/api/estates/:estate_id/collaborators/:user_id",
            axum::routing::patch(change_role_handler).delete(remove_collaborator_handler),
        )
}

async fn create_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(input): ApiJson<NewEstate>,
) -> Result<(StatusCode, Json<EstateView>), ApiError> {
    let view = ctx.estates.create(user, input)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<EstateView>>, ApiError> {
    Ok(Json(ctx.estates.list(user)?))
}

async fn get_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<EstateView>, ApiError> {
    Ok(Json(ctx.estates.get(user, EstateId(estate_id))?))
}

async fn update_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(patch): ApiJson<EstatePatch>,
) -> Result<Json<EstateView>, ApiError> {
    Ok(Json(ctx.estates.update(user, EstateId(estate_id), patch)?))
}

async fn delete_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ctx.estates.delete(user, EstateId(estate_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn collaborators_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<CollaboratorView>>, ApiError> {
    Ok(Json(ctx.estates.collaborators(user, EstateId(estate_id))?))
}

async fn add_collaborator_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewCollaborator>,
) -> Result<(StatusCode, Json<CollaboratorView>), ApiError> {
    let view = ctx
        .estates
        .add_collaborator(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn change_role_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, target)): Path<(Uuid, Uuid)>,
    ApiJson(change): ApiJson<RoleChange>,
) -> Result<Json<CollaboratorView>, ApiError> {
    let view = ctx.estates.change_collaborator_role(
        user,
        EstateId(estate_id),
        UserId(target),
        change,
    )?;
    Ok(Json(view))
}

async fn remove_collaborator_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, target)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.estates
        .remove_collaborator(user, EstateId(estate_id), UserId(target))?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::EstateNotFound => ApiError::NotFound(err.to_string()),
            AccessError::RoleTooLow { .. } => ApiError::Forbidden(err.to_string()),
            AccessError::Repository(inner) => inner.into(),
        }
    }
}

impl From<EstateServiceError> for ApiError {
    fn from(err: EstateServiceError) -> Self {
        match err {
            EstateServiceError::Validation(_) | EstateServiceError::OwnerImmutable => {
                ApiError::BadRequest(err.to_string())
            }
            EstateServiceError::UnknownAccount | EstateServiceError::UnknownCollaborator => {
                ApiError::NotFound(err.to_string())
            }
            EstateServiceError::AlreadyCollaborator => ApiError::Conflict(err.to_string()),
            EstateServiceError::Access(inner) => inner.into(),
            EstateServiceError::Repository(inner) => inner.into(),
        }
    }
}
