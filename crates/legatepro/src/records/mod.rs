//! Estate-scoped documents, contacts, notes, and tasks.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    Contact, ContactPatch, DocumentCategory, DocumentPatch, EstateDocument, EstateNote,
    EstateTask, FileMetadata, NewContact, NewDocument, NewNote, NewTask, NotePatch, TaskPatch,
    TaskStatus,
};
pub use service::{RecordService, RecordServiceError};
