use super::domain::Estate;
use crate::domain::{EstateId, UserId};
use crate::store::RepositoryError;

/// Storage abstraction for estate workspaces.
pub trait EstateRepository: Send + Sync {
    fn insert(&self, estate: Estate) -> Result<Estate, RepositoryError>;
    fn update(&self, estate: Estate) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EstateId) -> Result<Option<Estate>, RepositoryError>;
    /// Estates the user owns or collaborates on, oldest first.
    fn list_for_user(&self, user: &UserId) -> Result<Vec<Estate>, RepositoryError>;
    fn delete(&self, id: &EstateId) -> Result<(), RepositoryError>;
}
