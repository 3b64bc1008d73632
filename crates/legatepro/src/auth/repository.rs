use super::User;
use crate::domain::UserId;
use crate::store::RepositoryError;

/// Storage abstraction for account records.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn update(&self, user: User) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}
