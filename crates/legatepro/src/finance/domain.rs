use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{EstateId, Money, RecordId};
use crate::store::EstateRecord;

/// Reimbursement state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Reimbursed,
}

/// Out-of-pocket cost incurred while administering the estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub estate_id: EstateId,
    pub amount: Money,
    pub incurred_on: NaiveDate,
    pub category: Option<String>,
    pub description: String,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstateRecord for Expense {
    fn record_id(&self) -> RecordId {
        self.id
    }

    fn estate_id(&self) -> EstateId {
        self.estate_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    /// Dollars as a JSON number or numeric string; normalized to cents.
    pub amount: Value,
    pub incurred_on: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub incurred_on: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ExpenseStatus>,
}

/// Billing state of an invoice issued by or against the estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Void,
}

impl InvoiceStatus {
    /// Open invoices still count against readiness.
    pub const fn is_outstanding(self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: RecordId,
    pub estate_id: EstateId,
    pub amount: Money,
    pub counterparty: String,
    pub issued_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstateRecord for Invoice {
    fn record_id(&self) -> RecordId {
        self.id
    }

    fn estate_id(&self) -> EstateId {
        self.estate_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
    pub amount: Value,
    pub counterparty: String,
    pub issued_on: NaiveDate,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePatch {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

/// Collection state of a rent payment owed to the estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentStatus {
    Due,
    Received,
    Late,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentPayment {
    pub id: RecordId,
    pub estate_id: EstateId,
    pub amount: Money,
    pub property: String,
    /// Human-readable period label, e.g. `"2026-08"` or `"Aug 2026"`.
    pub period: String,
    pub received_on: Option<NaiveDate>,
    pub status: RentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstateRecord for RentPayment {
    fn record_id(&self) -> RecordId {
        self.id
    }

    fn estate_id(&self) -> EstateId {
        self.estate_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRentPayment {
    pub amount: Value,
    pub property: String,
    pub period: String,
    #[serde(default)]
    pub received_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<RentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RentPatch {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub received_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<RentStatus>,
}
