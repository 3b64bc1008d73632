//! Heuristic readiness scan over an estate's records.

use chrono::NaiveDate;

use super::plan::{PlanStep, ReadinessSignal, Severity, SignalKind};
use crate::domain::Money;
use crate::finance::domain::{Invoice, RentPayment, RentStatus};
use crate::records::domain::{Contact, DocumentCategory, EstateDocument, EstateTask};

/// Document categories every estate file should eventually contain.
const KEY_CATEGORIES: [(DocumentCategory, Severity, &str); 3] = [
    (DocumentCategory::Will, Severity::High, "no will on file"),
    (
        DocumentCategory::DeathCertificate,
        Severity::High,
        "no death certificate on file",
    ),
    (
        DocumentCategory::Financial,
        Severity::Medium,
        "no financial records indexed",
    ),
];

pub fn collect(
    documents: &[EstateDocument],
    tasks: &[EstateTask],
    invoices: &[Invoice],
    rent: &[RentPayment],
    contacts: &[Contact],
    today: NaiveDate,
) -> Vec<ReadinessSignal> {
    let mut signals = Vec::new();

    for (category, severity, detail) in KEY_CATEGORIES {
        if !documents.iter().any(|document| document.category == category) {
            signals.push(ReadinessSignal {
                kind: SignalKind::MissingDocument,
                severity,
                detail: detail.to_string(),
            });
        }
    }

    let overdue = tasks.iter().filter(|task| task.is_overdue(today)).count();
    if overdue > 0 {
        signals.push(ReadinessSignal {
            kind: SignalKind::OverdueTask,
            severity: if overdue > 2 {
                Severity::High
            } else {
                Severity::Medium
            },
            detail: format!("{overdue} task(s) past their due date"),
        });
    }

    let outstanding: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.status.is_outstanding())
        .collect();
    if !outstanding.is_empty() {
        let total = outstanding
            .iter()
            .fold(Money::default(), |sum, invoice| {
                sum.saturating_add(invoice.amount)
            });
        signals.push(ReadinessSignal {
            kind: SignalKind::OutstandingInvoice,
            severity: Severity::Medium,
            detail: format!(
                "{} invoice(s) totalling ${} not yet settled",
                outstanding.len(),
                total.dollars()
            ),
        });
    }

    let late = rent
        .iter()
        .filter(|payment| payment.status == RentStatus::Late)
        .count();
    if late > 0 {
        signals.push(ReadinessSignal {
            kind: SignalKind::LateRent,
            severity: Severity::Medium,
            detail: format!("{late} rent payment(s) marked late"),
        });
    }

    if contacts.is_empty() {
        signals.push(ReadinessSignal {
            kind: SignalKind::NoContacts,
            severity: Severity::Low,
            detail: "no contacts recorded for this estate".to_string(),
        });
    }

    signals
}

/// Score from 100 downward, clamped at zero.
pub fn score(signals: &[ReadinessSignal]) -> u8 {
    let penalty: u32 = signals.iter().map(|signal| signal.severity.weight()).sum();
    100u32.saturating_sub(penalty).min(100) as u8
}

/// Deterministic step list derived straight from the signals.
pub fn heuristic_steps(signals: &[ReadinessSignal]) -> Vec<PlanStep> {
    let mut steps: Vec<PlanStep> = signals
        .iter()
        .map(|signal| PlanStep {
            priority: signal.severity.priority(),
            title: match signal.kind {
                SignalKind::MissingDocument => "Locate and index the missing document".to_string(),
                SignalKind::OverdueTask => "Work through overdue tasks".to_string(),
                SignalKind::OutstandingInvoice => "Settle outstanding invoices".to_string(),
                SignalKind::LateRent => "Chase late rent payments".to_string(),
                SignalKind::NoContacts => "Record the estate's key contacts".to_string(),
            },
            rationale: signal.detail.clone(),
        })
        .collect();
    steps.sort_by_key(|step| step.priority);
    steps
}

pub fn summary(score: u8, signals: &[ReadinessSignal]) -> String {
    if signals.is_empty() {
        return "Estate records look complete; nothing is flagged.".to_string();
    }
    format!(
        "Estate readiness at {score}/100 with {} open item(s).",
        signals.len()
    )
}
