//! Estate workspaces and collaborator management.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Collaborator, CollaboratorRole, CollaboratorView, DecedentProfile, Estate, EstatePatch,
    EstateView, NewEstate,
};
pub use repository::EstateRepository;
pub use service::{EstateService, EstateServiceError, NewCollaborator, RoleChange};
