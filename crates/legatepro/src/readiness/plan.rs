use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a readiness signal is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    MissingDocument,
    OverdueTask,
    OutstandingInvoice,
    LateRent,
    NoContacts,
}

/// How much a signal weighs against the readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn weight(self) -> u32 {
        match self {
            Severity::Low => 5,
            Severity::Medium => 10,
            Severity::High => 25,
        }
    }

    pub const fn priority(self) -> u8 {
        match self {
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

/// One missing or at-risk item detected in the estate's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSignal {
    pub kind: SignalKind,
    pub severity: Severity,
    pub detail: String,
}

/// A prioritized next step; priority 1 is most urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub priority: u8,
    pub title: String,
    pub rationale: String,
}

/// Where the step list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Heuristic,
    Assisted,
}

/// The cached readiness checklist for an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessPlan {
    /// 0 (nothing in order) to 100 (fully ready).
    pub score: u8,
    pub summary: String,
    pub signals: Vec<ReadinessSignal>,
    pub steps: Vec<PlanStep>,
    pub source: PlanSource,
    pub generated_at: DateTime<Utc>,
}
