//! Financial records: expenses, invoices, and rent payments.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    Expense, ExpensePatch, ExpenseStatus, Invoice, InvoicePatch, InvoiceStatus, NewExpense,
    NewInvoice, NewRentPayment, RentPatch, RentPayment, RentStatus,
};
pub use service::{FinanceService, FinanceServiceError};
