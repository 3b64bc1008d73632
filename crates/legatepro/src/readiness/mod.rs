//! Readiness planning: a heuristic scan of the estate's records producing a
//! scored, prioritized checklist, optionally refined by an LLM call.

pub mod assist;
pub mod plan;
pub mod router;
pub mod service;
pub(crate) mod signals;

pub use assist::{AssistContext, AssistError, HttpPlanAssistant, PlanAssistant};
pub use plan::{PlanSource, PlanStep, ReadinessPlan, ReadinessSignal, Severity, SignalKind};
pub use service::{ReadinessService, ReadinessServiceError};
