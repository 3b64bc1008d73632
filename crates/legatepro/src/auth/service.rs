use std::sync::Arc;

use super::password::{hash_password, verify_password, PasswordHashError};
use super::repository::UserRepository;
use super::session::{SessionError, SessionKeys};
use super::{SubscriptionStatus, User, UserView};
use crate::domain::UserId;
use crate::store::RepositoryError;
use chrono::Utc;
use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LEN: usize = 8;

/// Registration and login over the user repository.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionKeys>,
}

/// Inbound credentials for register and login.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response for a successful login or registration.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub token: String,
    pub user: UserView,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionKeys>) -> Self {
        Self { users, sessions }
    }

    pub fn register(&self, credentials: Credentials) -> Result<SessionView, AuthServiceError> {
        let email = normalize_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::WeakPassword);
        }
        if self.users.fetch_by_email(&email)?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let user = User {
            id: UserId::generate(),
            email,
            password_hash: hash_password(&credentials.password)?,
            subscription: SubscriptionStatus::Free,
            stripe_customer_id: None,
            created_at: Utc::now(),
        };
        let stored = self.users.insert(user).map_err(|err| match err {
            RepositoryError::Conflict => AuthServiceError::EmailTaken,
            other => AuthServiceError::Repository(other),
        })?;

        self.session_for(stored)
    }

    pub fn login(&self, credentials: Credentials) -> Result<SessionView, AuthServiceError> {
        let email = normalize_email(&credentials.email)?;
        let user = self
            .users
            .fetch_by_email(&email)?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.session_for(user)
    }

    pub fn current_user(&self, id: &UserId) -> Result<UserView, AuthServiceError> {
        let user = self
            .users
            .fetch(id)?
            .ok_or(AuthServiceError::UnknownUser)?;
        Ok(user.view())
    }

    fn session_for(&self, user: User) -> Result<SessionView, AuthServiceError> {
        let token = self.sessions.issue(user.id)?;
        Ok(SessionView {
            token,
            user: user.view(),
        })
    }
}

fn normalize_email(raw: &str) -> Result<String, AuthServiceError> {
    let email = raw.trim().to_ascii_lowercase();
    // Deliberately loose: one '@' with something on both sides.
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email)
    } else {
        Err(AuthServiceError::InvalidEmail)
    }
}

/// Error raised by the auth service.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("email address is invalid")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account not found")]
    UnknownUser,
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryUsers;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(SessionKeys::from_secret("test-secret", 1)),
        )
    }

    fn credentials(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: "sufficiently-long".to_string(),
        }
    }

    #[test]
    fn register_then_login() {
        let service = service();
        let registered = service
            .register(credentials("Executor@Example.com"))
            .expect("registration succeeds");
        assert_eq!(registered.user.email, "executor@example.com");

        let session = service
            .login(credentials("executor@example.com"))
            .expect("login succeeds");
        assert_eq!(session.user.id, registered.user.id);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let service = service();
        service
            .register(credentials("executor@example.com"))
            .expect("first registration succeeds");
        let err = service
            .register(credentials("executor@example.com"))
            .expect_err("duplicate rejected");
        assert!(matches!(err, AuthServiceError::EmailTaken));
    }

    #[test]
    fn short_password_is_rejected() {
        let service = service();
        let err = service
            .register(Credentials {
                email: "executor@example.com".to_string(),
                password: "short".to_string(),
            })
            .expect_err("weak password rejected");
        assert!(matches!(err, AuthServiceError::WeakPassword));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let service = service();
        service
            .register(credentials("executor@example.com"))
            .expect("registration succeeds");
        let err = service
            .login(Credentials {
                email: "executor@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .expect_err("login rejected");
        assert!(matches!(err, AuthServiceError::InvalidCredentials));
    }
}
