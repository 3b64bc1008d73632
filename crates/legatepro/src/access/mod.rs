//! The single authorization path for estate-scoped requests.
//!
//! Every service resolves the caller's [`EstateAccess`] here before touching
//! a record. Non-members get [`AccessError::EstateNotFound`] rather than a
//! 403 so estates they cannot see are indistinguishable from estates that do
//! not exist.

use std::sync::Arc;

use crate::domain::{EstateId, UserId};
use crate::estates::domain::{CollaboratorRole, Estate};
use crate::estates::repository::EstateRepository;
use crate::store::RepositoryError;

/// The caller's resolved membership on one estate.
#[derive(Debug, Clone)]
pub struct EstateAccess {
    pub estate: Estate,
    pub role: CollaboratorRole,
}

impl EstateAccess {
    /// Resolve a user's role on an estate, failing closed for non-members.
    pub fn resolve(estate: Estate, user: &UserId) -> Result<Self, AccessError> {
        let role = if estate.owner_id == *user {
            CollaboratorRole::Owner
        } else {
            estate
                .collaborators
                .iter()
                .find(|collaborator| collaborator.user_id == *user)
                .map(|collaborator| collaborator.role)
                .ok_or(AccessError::EstateNotFound)?
        };

        Ok(Self { estate, role })
    }

    /// Load the estate and resolve in one step.
    pub fn load(
        estates: &Arc<dyn EstateRepository>,
        estate_id: &EstateId,
        user: &UserId,
    ) -> Result<Self, AccessError> {
        let estate = estates
            .fetch(estate_id)?
            .ok_or(AccessError::EstateNotFound)?;
        Self::resolve(estate, user)
    }

    pub fn require_editor(&self) -> Result<(), AccessError> {
        self.require(CollaboratorRole::Editor)
    }

    pub fn require_owner(&self) -> Result<(), AccessError> {
        self.require(CollaboratorRole::Owner)
    }

    fn require(&self, minimum: CollaboratorRole) -> Result<(), AccessError> {
        if self.role >= minimum {
            Ok(())
        } else {
            Err(AccessError::RoleTooLow {
                required: minimum.label(),
            })
        }
    }

    /// Sensitive documents are hidden from viewers entirely.
    pub fn can_view_sensitive(&self) -> bool {
        self.role >= CollaboratorRole::Editor
    }
}

/// Authorization failures.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("estate not found")]
    EstateNotFound,
    #[error("requires {required} access")]
    RoleTooLow { required: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
