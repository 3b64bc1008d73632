use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    Expense, ExpensePatch, ExpenseStatus, Invoice, InvoicePatch, InvoiceStatus, NewExpense,
    NewInvoice, NewRentPayment, RentPatch, RentPayment, RentStatus,
};
use crate::access::{AccessError, EstateAccess};
use crate::activity::ActivityLog;
use crate::domain::{EstateId, Money, MoneyParseError, RecordId, UserId};
use crate::estates::repository::EstateRepository;
use crate::store::{EstateRecordRepository, RepositoryError};

/// CRUD over the financial records: expenses, invoices, rent payments.
///
/// All amounts pass through [`Money::parse`] so cents-vs-dollars drift
/// cannot reappear per route.
pub struct FinanceService {
    estates: Arc<dyn EstateRepository>,
    expenses: Arc<dyn EstateRecordRepository<Expense>>,
    invoices: Arc<dyn EstateRecordRepository<Invoice>>,
    rent: Arc<dyn EstateRecordRepository<RentPayment>>,
    activity: ActivityLog,
}

impl FinanceService {
    pub fn new(
        estates: Arc<dyn EstateRepository>,
        expenses: Arc<dyn EstateRecordRepository<Expense>>,
        invoices: Arc<dyn EstateRecordRepository<Invoice>>,
        rent: Arc<dyn EstateRecordRepository<RentPayment>>,
        activity: ActivityLog,
    ) -> Self {
        Self {
            estates,
            expenses,
            invoices,
            rent,
            activity,
        }
    }

    fn access(&self, user: &UserId, estate: &EstateId) -> Result<EstateAccess, FinanceServiceError> {
        Ok(EstateAccess::load(&self.estates, estate, user)?)
    }

    // --- expenses ---

    pub fn create_expense(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewExpense,
    ) -> Result<Expense, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        if input.description.trim().is_empty() {
            return Err(FinanceServiceError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        let amount = Money::parse(&input.amount)?;

        let now = Utc::now();
        let expense = self.expenses.insert(Expense {
            id: RecordId::generate(),
            estate_id,
            amount,
            incurred_on: input.incurred_on,
            category: input.category,
            description: input.description,
            status: ExpenseStatus::Pending,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "expense.created", expense.id.to_string());
        Ok(expense)
    }

    pub fn list_expenses(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<Expense>, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        let mut expenses = self.expenses.list(&estate_id)?;
        expenses.sort_by(|a, b| b.incurred_on.cmp(&a.incurred_on));
        Ok(expenses)
    }

    pub fn get_expense(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<Expense, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        self.expenses
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)
    }

    pub fn update_expense(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: ExpensePatch,
    ) -> Result<Expense, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut expense = self
            .expenses
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)?;

        if let Some(amount) = patch.amount {
            expense.amount = Money::parse(&amount)?;
        }
        if let Some(incurred_on) = patch.incurred_on {
            expense.incurred_on = incurred_on;
        }
        if let Some(category) = patch.category {
            expense.category = Some(category);
        }
        if let Some(description) = patch.description {
            if description.trim().is_empty() {
                return Err(FinanceServiceError::Validation(
                    "description must not be empty".to_string(),
                ));
            }
            expense.description = description;
        }
        if let Some(status) = patch.status {
            expense.status = status;
        }
        expense.updated_at = Utc::now();

        self.expenses.update(expense.clone())?;
        self.activity
            .record(user, estate_id, "expense.updated", id.to_string());
        Ok(expense)
    }

    pub fn delete_expense(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.expenses
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "expense.deleted", id.to_string());
        Ok(())
    }

    // --- invoices ---

    pub fn create_invoice(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewInvoice,
    ) -> Result<Invoice, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        if input.counterparty.trim().is_empty() {
            return Err(FinanceServiceError::Validation(
                "counterparty must not be empty".to_string(),
            ));
        }
        let amount = Money::parse(&input.amount)?;

        let now = Utc::now();
        let invoice = self.invoices.insert(Invoice {
            id: RecordId::generate(),
            estate_id,
            amount,
            counterparty: input.counterparty,
            issued_on: input.issued_on,
            due_on: input.due_on,
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "invoice.created", invoice.id.to_string());
        Ok(invoice)
    }

    pub fn list_invoices(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<Invoice>, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        let mut invoices = self.invoices.list(&estate_id)?;
        invoices.sort_by(|a, b| b.issued_on.cmp(&a.issued_on));
        Ok(invoices)
    }

    pub fn get_invoice(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<Invoice, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        self.invoices
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)
    }

    pub fn update_invoice(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: InvoicePatch,
    ) -> Result<Invoice, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut invoice = self
            .invoices
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)?;

        if let Some(amount) = patch.amount {
            invoice.amount = Money::parse(&amount)?;
        }
        if let Some(counterparty) = patch.counterparty {
            if counterparty.trim().is_empty() {
                return Err(FinanceServiceError::Validation(
                    "counterparty must not be empty".to_string(),
                ));
            }
            invoice.counterparty = counterparty;
        }
        if let Some(issued_on) = patch.issued_on {
            invoice.issued_on = issued_on;
        }
        if let Some(due_on) = patch.due_on {
            invoice.due_on = Some(due_on);
        }
        if let Some(status) = patch.status {
            invoice.status = status;
        }
        invoice.updated_at = Utc::now();

        self.invoices.update(invoice.clone())?;
        self.activity
            .record(user, estate_id, "invoice.updated", id.to_string());
        Ok(invoice)
    }

    pub fn delete_invoice(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.invoices
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "invoice.deleted", id.to_string());
        Ok(())
    }

    // --- rent payments ---

    pub fn create_rent_payment(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewRentPayment,
    ) -> Result<RentPayment, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        if input.property.trim().is_empty() || input.period.trim().is_empty() {
            return Err(FinanceServiceError::Validation(
                "property and period are required".to_string(),
            ));
        }
        let amount = Money::parse(&input.amount)?;

        let status = input.status.unwrap_or(RentStatus::Due);
        let now = Utc::now();
        let payment = self.rent.insert(RentPayment {
            id: RecordId::generate(),
            estate_id,
            amount,
            property: input.property,
            period: input.period,
            received_on: input.received_on,
            status,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "rent.created", payment.id.to_string());
        Ok(payment)
    }

    pub fn list_rent_payments(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<RentPayment>, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        let mut payments = self.rent.list(&estate_id)?;
        payments.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(payments)
    }

    pub fn get_rent_payment(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<RentPayment, FinanceServiceError> {
        self.access(&user, &estate_id)?;
        self.rent
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)
    }

    pub fn update_rent_payment(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: RentPatch,
    ) -> Result<RentPayment, FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut payment = self
            .rent
            .fetch(&estate_id, &id)?
            .ok_or(FinanceServiceError::RecordNotFound)?;

        if let Some(amount) = patch.amount {
            payment.amount = Money::parse(&amount)?;
        }
        if let Some(property) = patch.property {
            payment.property = property;
        }
        if let Some(period) = patch.period {
            payment.period = period;
        }
        if let Some(received_on) = patch.received_on {
            payment.received_on = Some(received_on);
        }
        if let Some(status) = patch.status {
            payment.status = status;
        }
        payment.updated_at = Utc::now();

        self.rent.update(payment.clone())?;
        self.activity
            .record(user, estate_id, "rent.updated", id.to_string());
        Ok(payment)
    }

    pub fn delete_rent_payment(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), FinanceServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.rent
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "rent.deleted", id.to_string());
        Ok(())
    }
}

fn record_not_found(err: RepositoryError) -> FinanceServiceError {
    match err {
        RepositoryError::NotFound => FinanceServiceError::RecordNotFound,
        other => FinanceServiceError::Repository(other),
    }
}

/// Error raised by the finance service.
#[derive(Debug, thiserror::Error)]
pub enum FinanceServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Amount(#[from] MoneyParseError),
    #[error("record not found")]
    RecordNotFound,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
