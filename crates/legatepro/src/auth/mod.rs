//! Credentials authentication: account records, bcrypt password hashing,
//! and bearer session tokens carrying the user id.

pub(crate) mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Account record. The password never leaves this struct un-hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub subscription: SubscriptionStatus,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            subscription: self.subscription.label(),
            created_at: self.created_at,
        }
    }
}

/// Subscription tier derived from the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Free,
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "free",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

/// Sanitized account representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub subscription: &'static str,
    pub created_at: DateTime<Utc>,
}

pub use repository::UserRepository;
pub use service::{AuthService, AuthServiceError};
pub use session::{AuthenticatedUser, SessionKeys};
