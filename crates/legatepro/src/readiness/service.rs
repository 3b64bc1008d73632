use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use super::assist::{AssistContext, PlanAssistant};
use super::plan::{PlanSource, ReadinessPlan};
use super::signals;
use crate::access::{AccessError, EstateAccess};
use crate::domain::{EstateId, UserId};
use crate::estates::repository::EstateRepository;
use crate::finance::domain::{Invoice, RentPayment};
use crate::records::domain::{Contact, EstateDocument, EstateTask};
use crate::store::{EstateRecordRepository, RepositoryError};

/// Builds, caches, and serves the readiness plan for an estate.
pub struct ReadinessService {
    estates: Arc<dyn EstateRepository>,
    documents: Arc<dyn EstateRecordRepository<EstateDocument>>,
    tasks: Arc<dyn EstateRecordRepository<EstateTask>>,
    invoices: Arc<dyn EstateRecordRepository<Invoice>>,
    rent: Arc<dyn EstateRecordRepository<RentPayment>>,
    contacts: Arc<dyn EstateRecordRepository<Contact>>,
    assistant: Option<Arc<dyn PlanAssistant>>,
    cache_ttl: Duration,
}

impl ReadinessService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        estates: Arc<dyn EstateRepository>,
        documents: Arc<dyn EstateRecordRepository<EstateDocument>>,
        tasks: Arc<dyn EstateRecordRepository<EstateTask>>,
        invoices: Arc<dyn EstateRecordRepository<Invoice>>,
        rent: Arc<dyn EstateRecordRepository<RentPayment>>,
        contacts: Arc<dyn EstateRecordRepository<Contact>>,
        assistant: Option<Arc<dyn PlanAssistant>>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            estates,
            documents,
            tasks,
            invoices,
            rent,
            contacts,
            assistant,
            cache_ttl,
        }
    }

    /// Return the cached plan when fresh, otherwise rebuild it.
    pub async fn plan(
        &self,
        user: UserId,
        estate_id: EstateId,
        refresh: bool,
    ) -> Result<ReadinessPlan, ReadinessServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;

        if !refresh {
            if let Some(cached) = &access.estate.readiness {
                if Utc::now() - cached.generated_at < self.cache_ttl {
                    return Ok(cached.clone());
                }
            }
        }

        let documents = self.documents.list(&estate_id)?;
        let tasks = self.tasks.list(&estate_id)?;
        let invoices = self.invoices.list(&estate_id)?;
        let rent = self.rent.list(&estate_id)?;
        let contacts = self.contacts.list(&estate_id)?;

        let today = Utc::now().date_naive();
        let found = signals::collect(&documents, &tasks, &invoices, &rent, &contacts, today);
        let score = signals::score(&found);
        let heuristic_steps = signals::heuristic_steps(&found);

        let (steps, source) = match &self.assistant {
            Some(assistant) if !found.is_empty() => {
                let context = AssistContext {
                    decedent_name: access.estate.decedent.full_name.clone(),
                    score,
                    signals: found.clone(),
                    draft_steps: heuristic_steps.clone(),
                };
                match assistant.refine(&context).await {
                    Ok(refined) => (refined, PlanSource::Assisted),
                    Err(err) => {
                        warn!(%err, estate = %estate_id, "plan assist failed, using heuristic");
                        (heuristic_steps, PlanSource::Heuristic)
                    }
                }
            }
            _ => (heuristic_steps, PlanSource::Heuristic),
        };

        let plan = ReadinessPlan {
            score,
            summary: signals::summary(score, &found),
            signals: found,
            steps,
            source,
            generated_at: Utc::now(),
        };

        // Cache write is best-effort; a stale cache only costs a rebuild.
        let mut estate = access.estate;
        estate.readiness = Some(plan.clone());
        if let Err(err) = self.estates.update(estate) {
            warn!(%err, estate = %estate_id, "failed to cache readiness plan");
        }

        Ok(plan)
    }
}

/// Error raised by the readiness service.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
