use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EstateId, UserId};
use crate::readiness::plan::ReadinessPlan;

/// Coarse permission tier on an estate, ordered from least to most access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CollaboratorRole {
    Viewer,
    Editor,
    Owner,
}

impl CollaboratorRole {
    pub const fn label(self) -> &'static str {
        match self {
            CollaboratorRole::Viewer => "VIEWER",
            CollaboratorRole::Editor => "EDITOR",
            CollaboratorRole::Owner => "OWNER",
        }
    }
}

/// Membership entry on an estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub user_id: UserId,
    pub role: CollaboratorRole,
    pub added_at: DateTime<Utc>,
}

/// Case metadata about the decedent whose affairs are being administered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecedentProfile {
    pub full_name: String,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
    #[serde(default)]
    pub case_reference: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
}

/// The estate workspace scoping every other record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: EstateId,
    pub owner_id: UserId,
    pub decedent: DecedentProfile,
    pub collaborators: Vec<Collaborator>,
    pub readiness: Option<ReadinessPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Estate {
    pub fn new(owner_id: UserId, decedent: DecedentProfile) -> Self {
        let now = Utc::now();
        Self {
            id: EstateId::generate(),
            owner_id,
            decedent,
            collaborators: vec![Collaborator {
                user_id: owner_id,
                role: CollaboratorRole::Owner,
                added_at: now,
            }],
            readiness: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Inbound payload to create an estate.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEstate {
    pub decedent: DecedentProfile,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstatePatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
    #[serde(default)]
    pub case_reference: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
}

/// Estate representation shaped for the caller, including their own role.
#[derive(Debug, Clone, Serialize)]
pub struct EstateView {
    pub id: EstateId,
    pub owner_id: UserId,
    pub decedent: DecedentProfile,
    pub role: &'static str,
    pub collaborator_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstateView {
    pub fn shape(estate: &Estate, role: CollaboratorRole) -> Self {
        Self {
            id: estate.id,
            owner_id: estate.owner_id,
            decedent: estate.decedent.clone(),
            role: role.label(),
            collaborator_count: estate.collaborators.len(),
            created_at: estate.created_at,
            updated_at: estate.updated_at,
        }
    }
}

/// Collaborator entry shaped for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorView {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: &'static str,
    pub added_at: DateTime<Utc>,
}
