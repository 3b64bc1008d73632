use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::domain::{
    Collaborator, CollaboratorRole, CollaboratorView, Estate, EstatePatch, EstateView, NewEstate,
};
use super::repository::EstateRepository;
use crate::access::{AccessError, EstateAccess};
use crate::activity::ActivityLog;
use crate::auth::repository::UserRepository;
use crate::domain::{EstateId, UserId};
use crate::store::RepositoryError;

/// Estate CRUD plus collaborator management.
pub struct EstateService {
    estates: Arc<dyn EstateRepository>,
    users: Arc<dyn UserRepository>,
    activity: ActivityLog,
}

/// Inbound payload to add a collaborator by account email.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCollaborator {
    pub email: String,
    pub role: CollaboratorRole,
}

/// Inbound payload to change a collaborator's role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleChange {
    pub role: CollaboratorRole,
}

impl EstateService {
    pub fn new(
        estates: Arc<dyn EstateRepository>,
        users: Arc<dyn UserRepository>,
        activity: ActivityLog,
    ) -> Self {
        Self {
            estates,
            users,
            activity,
        }
    }

    pub fn create(&self, user: UserId, input: NewEstate) -> Result<EstateView, EstateServiceError> {
        if input.decedent.full_name.trim().is_empty() {
            return Err(EstateServiceError::Validation(
                "decedent full_name is required".to_string(),
            ));
        }

        let estate = self.estates.insert(Estate::new(user, input.decedent))?;
        self.activity
            .record(user, estate.id, "estate.created", estate.id.to_string());
        Ok(EstateView::shape(&estate, CollaboratorRole::Owner))
    }

    pub fn list(&self, user: UserId) -> Result<Vec<EstateView>, EstateServiceError> {
        let estates = self.estates.list_for_user(&user)?;
        Ok(estates
            .into_iter()
            .filter_map(|estate| {
                EstateAccess::resolve(estate, &user)
                    .ok()
                    .map(|access| EstateView::shape(&access.estate, access.role))
            })
            .collect())
    }

    pub fn get(&self, user: UserId, estate_id: EstateId) -> Result<EstateView, EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        Ok(EstateView::shape(&access.estate, access.role))
    }

    pub fn update(
        &self,
        user: UserId,
        estate_id: EstateId,
        patch: EstatePatch,
    ) -> Result<EstateView, EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        access.require_editor()?;

        let mut estate = access.estate;
        if let Some(full_name) = patch.full_name {
            if full_name.trim().is_empty() {
                return Err(EstateServiceError::Validation(
                    "decedent full_name must not be empty".to_string(),
                ));
            }
            estate.decedent.full_name = full_name;
        }
        if let Some(date_of_death) = patch.date_of_death {
            estate.decedent.date_of_death = Some(date_of_death);
        }
        if let Some(case_reference) = patch.case_reference {
            estate.decedent.case_reference = Some(case_reference);
        }
        if let Some(court) = patch.court {
            estate.decedent.court = Some(court);
        }
        estate.updated_at = Utc::now();

        self.estates.update(estate.clone())?;
        self.activity
            .record(user, estate_id, "estate.updated", estate_id.to_string());
        Ok(EstateView::shape(&estate, access.role))
    }

    pub fn delete(&self, user: UserId, estate_id: EstateId) -> Result<(), EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        access.require_owner()?;

        self.estates.delete(&estate_id)?;
        self.activity
            .record(user, estate_id, "estate.deleted", estate_id.to_string());
        Ok(())
    }

    pub fn collaborators(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<CollaboratorView>, EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        Ok(access
            .estate
            .collaborators
            .iter()
            .map(|collaborator| self.shape_collaborator(collaborator))
            .collect())
    }

    pub fn add_collaborator(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewCollaborator,
    ) -> Result<CollaboratorView, EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        access.require_owner()?;

        if input.role == CollaboratorRole::Owner {
            return Err(EstateServiceError::Validation(
                "collaborators cannot be granted the OWNER role".to_string(),
            ));
        }

        let email = input.email.trim().to_ascii_lowercase();
        let account = self
            .users
            .fetch_by_email(&email)?
            .ok_or(EstateServiceError::UnknownAccount)?;

        let mut estate = access.estate;
        if estate
            .collaborators
            .iter()
            .any(|collaborator| collaborator.user_id == account.id)
        {
            return Err(EstateServiceError::AlreadyCollaborator);
        }

        let collaborator = Collaborator {
            user_id: account.id,
            role: input.role,
            added_at: Utc::now(),
        };
        estate.collaborators.push(collaborator.clone());
        estate.updated_at = Utc::now();
        self.estates.update(estate)?;

        self.activity.record(
            user,
            estate_id,
            "collaborator.added",
            account.id.to_string(),
        );
        Ok(self.shape_collaborator(&collaborator))
    }

    pub fn change_collaborator_role(
        &self,
        user: UserId,
        estate_id: EstateId,
        target: UserId,
        change: RoleChange,
    ) -> Result<CollaboratorView, EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        access.require_owner()?;

        let mut estate = access.estate;
        if target == estate.owner_id {
            return Err(EstateServiceError::OwnerImmutable);
        }
        if change.role == CollaboratorRole::Owner {
            return Err(EstateServiceError::Validation(
                "collaborators cannot be granted the OWNER role".to_string(),
            ));
        }

        let collaborator = estate
            .collaborators
            .iter_mut()
            .find(|collaborator| collaborator.user_id == target)
            .ok_or(EstateServiceError::UnknownCollaborator)?;
        collaborator.role = change.role;
        let shaped = collaborator.clone();
        estate.updated_at = Utc::now();
        self.estates.update(estate)?;

        self.activity
            .record(user, estate_id, "collaborator.role_changed", target.to_string());
        Ok(self.shape_collaborator(&shaped))
    }

    pub fn remove_collaborator(
        &self,
        user: UserId,
        estate_id: EstateId,
        target: UserId,
    ) -> Result<(), EstateServiceError> {
        let access = EstateAccess::load(&self.estates, &estate_id, &user)?;
        access.require_owner()?;

        let mut estate = access.estate;
        if target == estate.owner_id {
            return Err(EstateServiceError::OwnerImmutable);
        }

        let before = estate.collaborators.len();
        estate
            .collaborators
            .retain(|collaborator| collaborator.user_id != target);
        if estate.collaborators.len() == before {
            return Err(EstateServiceError::UnknownCollaborator);
        }
        estate.updated_at = Utc::now();
        self.estates.update(estate)?;

        self.activity
            .record(user, estate_id, "collaborator.removed", target.to_string());
        Ok(())
    }

    fn shape_collaborator(&self, collaborator: &Collaborator) -> CollaboratorView {
        let email = self
            .users
            .fetch(&collaborator.user_id)
            .ok()
            .flatten()
            .map(|user| user.email);
        CollaboratorView {
            user_id: collaborator.user_id,
            email,
            role: collaborator.role.label(),
            added_at: collaborator.added_at,
        }
    }
}

/// Error raised by the estate service.
#[derive(Debug, thiserror::Error)]
pub enum EstateServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("no account exists for this email")]
    UnknownAccount,
    #[error("user is already a collaborator")]
    AlreadyCollaborator,
    #[error("user is not a collaborator on this estate")]
    UnknownCollaborator,
    #[error("the estate owner cannot be removed or demoted")]
    OwnerImmutable,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
