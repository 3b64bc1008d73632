use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::domain::{
    Contact, ContactPatch, DocumentPatch, EstateDocument, EstateNote, EstateTask, NewContact,
    NewDocument, NewNote, NewTask, NotePatch, TaskPatch,
};
use super::service::RecordServiceError;
use crate::auth::session::AuthenticatedUser;
use crate::context::AppContext;
use crate::domain::{EstateId, RecordId};
use crate::error::{ApiError, ApiJson};

pub fn router() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/estates/:estate_id/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/api/estates/:estate_id/documents/:record_id",
            get(get_document)
                .patch(update_document)
                .delete(delete_document),
        )
        .route(
            "/api/estates/:estate_id/contacts",
            get(list_contacts).post(create_contact),
        )
        .route(
            "/api/estates/:estate_id/contacts/:record_id",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
        .route(
            "/api/estates/:estate_id/notes",
            get(list_notes).post(create_note),
        )
        .route(
            "/api/estates/:estate_id/notes/:record_id",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .route(
            "/api/estates/:estate_id/tasks",
            get(list_tasks).post(create_task),
        )
        .route(
            "/api/estates/:estate_id/tasks/:record_id",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

async fn create_document(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewDocument>,
) -> Result<(StatusCode, Json<EstateDocument>), ApiError> {
    let document = ctx
        .records
        .create_document(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn list_documents(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<EstateDocument>>, ApiError> {
    Ok(Json(ctx.records.list_documents(user, EstateId(estate_id))?))
}

async fn get_document(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EstateDocument>, ApiError> {
    Ok(Json(ctx.records.get_document(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_document(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<DocumentPatch>,
) -> Result<Json<EstateDocument>, ApiError> {
    Ok(Json(ctx.records.update_document(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_document(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.records
        .delete_document(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_contact(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewContact>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = ctx
        .records
        .create_contact(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(ctx.records.list_contacts(user, EstateId(estate_id))?))
}

async fn get_contact(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(ctx.records.get_contact(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_contact(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<ContactPatch>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(ctx.records.update_contact(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_contact(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.records
        .delete_contact(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_note(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewNote>,
) -> Result<(StatusCode, Json<EstateNote>), ApiError> {
    let note = ctx.records.create_note(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_notes(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<EstateNote>>, ApiError> {
    Ok(Json(ctx.records.list_notes(user, EstateId(estate_id))?))
}

async fn get_note(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EstateNote>, ApiError> {
    Ok(Json(ctx.records.get_note(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_note(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<NotePatch>,
) -> Result<Json<EstateNote>, ApiError> {
    Ok(Json(ctx.records.update_note(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_note(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.records
        .delete_note(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_task(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewTask>,
) -> Result<(StatusCode, Json<EstateTask>), ApiError> {
    let task = ctx.records.create_task(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<EstateTask>>, ApiError> {
    Ok(Json(ctx.records.list_tasks(user, EstateId(estate_id))?))
}

async fn get_task(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EstateTask>, ApiError> {
    Ok(Json(ctx.records.get_task(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_task(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<EstateTask>, ApiError> {
    Ok(Json(ctx.records.update_task(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_task(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.records
        .delete_task(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<RecordServiceError> for ApiError {
    fn from(err: RecordServiceError) -> Self {
        match err {
            RecordServiceError::Validation(_) => ApiError::BadRequest(err.to_string()),
            RecordServiceError::RecordNotFound => ApiError::NotFound(err.to_string()),
            RecordServiceError::Access(inner) => inner.into(),
            RecordServiceError::Repository(inner) => inner.into(),
        }
    }
}
