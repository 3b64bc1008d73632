use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::domain::{
    Expense, ExpensePatch, Invoice, InvoicePatch, NewExpense, NewInvoice, NewRentPayment,
    RentPatch, RentPayment,
};
use super::service::FinanceServiceError;
use crate::auth::session::AuthenticatedUser;
use crate::context::AppContext;
use crate::domain::{EstateId, RecordId};
use crate::error::{ApiError, ApiJson};

pub fn router() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/estates/:estate_id/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/api/estates/:estate_id/expenses/:record_id",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
        .route(
            "/api/estates/:estate_id/invoices",
            get(list_invoices).post(create_invoice),
        )
        .route(
            "/api/estates/:estate_id/invoices/:record_id",
            get(get_invoice).patch(update_invoice).delete(delete_invoice),
        )
        .route(
            "/api/estates/:estate_id/rent",
            get(list_rent).post(create_rent),
        )
        .route(
            "/api/estates/:estate_id/rent/:record_id",
            get(get_rent).patch(update_rent).delete(delete_rent),
        )
}

async fn create_expense(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = ctx
        .finance
        .create_expense(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn list_expenses(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(ctx.finance.list_expenses(user, EstateId(estate_id))?))
}

async fn get_expense(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(ctx.finance.get_expense(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_expense(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<ExpensePatch>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(ctx.finance.update_expense(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_expense(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.finance
        .delete_expense(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_invoice(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewInvoice>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = ctx
        .finance
        .create_invoice(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn list_invoices(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(ctx.finance.list_invoices(user, EstateId(estate_id))?))
}

async fn get_invoice(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(ctx.finance.get_invoice(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_invoice(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<InvoicePatch>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(ctx.finance.update_invoice(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_invoice(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.finance
        .delete_invoice(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_rent(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
    ApiJson(input): ApiJson<NewRentPayment>,
) -> Result<(StatusCode, Json<RentPayment>), ApiError> {
    let payment = ctx
        .finance
        .create_rent_payment(user, EstateId(estate_id), input)?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn list_rent(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(estate_id): Path<Uuid>,
) -> Result<Json<Vec<RentPayment>>, ApiError> {
    Ok(Json(
        ctx.finance.list_rent_payments(user, EstateId(estate_id))?,
    ))
}

async fn get_rent(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RentPayment>, ApiError> {
    Ok(Json(ctx.finance.get_rent_payment(
        user,
        EstateId(estate_id),
        RecordId(record_id),
    )?))
}

async fn update_rent(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<RentPatch>,
) -> Result<Json<RentPayment>, ApiError> {
    Ok(Json(ctx.finance.update_rent_payment(
        user,
        EstateId(estate_id),
        RecordId(record_id),
        patch,
    )?))
}

async fn delete_rent(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((estate_id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ctx.finance
        .delete_rent_payment(user, EstateId(estate_id), RecordId(record_id))?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<FinanceServiceError> for ApiError {
    fn from(err: FinanceServiceError) -> Self {
        match err {
            FinanceServiceError::Validation(_) | FinanceServiceError::Amount(_) => {
                ApiError::BadRequest(err.to_string())
            }
            FinanceServiceError::RecordNotFound => ApiError::NotFound(err.to_string()),
            FinanceServiceError::Access(inner) => inner.into(),
            FinanceServiceError::Repository(inner) => inner.into(),
        }
    }
}
