use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::plan::ReadinessPlan;
use super::service::ReadinessServiceError;
use crate::auth::session::AuthenticatedUser;
use crate::context::AppContext;
use crate::domain::EstateId;
use crate::error::ApiError;

pub fn router() -> Router<AppContext> {
    Router::new().route("/api/estates/:estate_id/readiness", get(readiness_handler))
}

#[derive(Debug, Default, Deserialize)]
struct ReadinessQuery {
    #[serde(default)]
    refresh: bool,
}

async fn readiness_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    Query(query): Query<ReadinessQuery>,
) -> Result<Json<ReadinessPlan>, ApiError> {
    let plan = ctx
        .readiness
        .plan(user, EstateId(estate_id), query.refresh)
        .await?;
    Ok(Json(plan))
}

impl From<ReadinessServiceError> for ApiError {
    fn from(err: ReadinessServiceError) -> Self {
        match err {
            ReadinessServiceError::Access(inner) => inner.into(),
            ReadinessServiceError::Repository(inner) => inner.into(),
        }
    }
}
