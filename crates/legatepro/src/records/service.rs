use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    Contact, ContactPatch, DocumentPatch, EstateDocument, EstateNote, EstateTask, NewContact,
    NewDocument, NewNote, NewTask, NotePatch, TaskPatch, TaskStatus,
};
use crate::access::{AccessError, EstateAccess};
use crate::activity::ActivityLog;
use crate::domain::{EstateId, RecordId, UserId};
use crate::estates::repository::EstateRepository;
use crate::store::{EstateRecordRepository, RepositoryError};

/// CRUD over the non-financial estate-scoped records.
///
/// Sensitivity gating for documents lives here: viewers never see records
/// flagged sensitive, whether listing or fetching directly.
pub struct RecordService {
    estates: Arc<dyn EstateRepository>,
    documents: Arc<dyn EstateRecordRepository<EstateDocument>>,
    contacts: Arc<dyn EstateRecordRepository<Contact>>,
    notes: Arc<dyn EstateRecordRepository<EstateNote>>,
    tasks: Arc<dyn EstateRecordRepository<EstateTask>>,
    activity: ActivityLog,
}

impl RecordService {
    pub fn new(
        estates: Arc<dyn EstateRepository>,
        documents: Arc<dyn EstateRecordRepository<EstateDocument>>,
        contacts: Arc<dyn EstateRecordRepository<Contact>>,
        notes: Arc<dyn EstateRecordRepository<EstateNote>>,
        tasks: Arc<dyn EstateRecordRepository<EstateTask>>,
        activity: ActivityLog,
    ) -> Self {
        Self {
            estates,
            documents,
            contacts,
            notes,
            tasks,
            activity,
        }
    }

    fn access(&self, user: &UserId, estate: &EstateId) -> Result<EstateAccess, RecordServiceError> {
        Ok(EstateAccess::load(&self.estates, estate, user)?)
    }

    // --- documents ---

    pub fn create_document(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewDocument,
    ) -> Result<EstateDocument, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        require_non_empty(&input.label, "label")?;

        let now = Utc::now();
        let document = self.documents.insert(EstateDocument {
            id: RecordId::generate(),
            estate_id,
            label: input.label,
            category: input.category,
            location: input.location,
            tags: input.tags,
            is_sensitive: input.is_sensitive,
            file: input.file,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "document.created", document.id.to_string());
        Ok(document)
    }

    pub fn list_documents(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<EstateDocument>, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        let mut documents = self.documents.list(&estate_id)?;
        if !access.can_view_sensitive() {
            documents.retain(|document| !document.is_sensitive);
        }
        documents.sort_by_key(|document| document.created_at);
        Ok(documents)
    }

    pub fn get_document(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<EstateDocument, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        let document = self
            .documents
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)?;
        // Sensitive entries are reported as missing to viewers.
        if document.is_sensitive && !access.can_view_sensitive() {
            return Err(RecordServiceError::RecordNotFound);
        }
        Ok(document)
    }

    pub fn update_document(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: DocumentPatch,
    ) -> Result<EstateDocument, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut document = self
            .documents
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)?;

        if let Some(label) = patch.label {
            require_non_empty(&label, "label")?;
            document.label = label;
        }
        if let Some(category) = patch.category {
            document.category = category;
        }
        if let Some(location) = patch.location {
            document.location = Some(location);
        }
        if let Some(tags) = patch.tags {
            document.tags = tags;
        }
        if let Some(is_sensitive) = patch.is_sensitive {
            document.is_sensitive = is_sensitive;
        }
        if let Some(file) = patch.file {
            document.file = file;
        }
        document.updated_at = Utc::now();

        self.documents.update(document.clone())?;
        self.activity
            .record(user, estate_id, "document.updated", id.to_string());
        Ok(document)
    }

    pub fn delete_document(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.documents
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "document.deleted", id.to_string());
        Ok(())
    }

    // --- contacts ---

    pub fn create_contact(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewContact,
    ) -> Result<Contact, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        require_non_empty(&input.name, "name")?;

        let now = Utc::now();
        let contact = self.contacts.insert(Contact {
            id: RecordId::generate(),
            estate_id,
            name: input.name,
            role: input.role,
            email: input.email,
            phone: input.phone,
            address: input.address,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "contact.created", contact.id.to_string());
        Ok(contact)
    }

    pub fn list_contacts(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<Contact>, RecordServiceError> {
        self.access(&user, &estate_id)?;
        let mut contacts = self.contacts.list(&estate_id)?;
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    pub fn get_contact(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<Contact, RecordServiceError> {
        self.access(&user, &estate_id)?;
        self.contacts
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)
    }

    pub fn update_contact(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: ContactPatch,
    ) -> Result<Contact, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut contact = self
            .contacts
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)?;

        if let Some(name) = patch.name {
            require_non_empty(&name, "name")?;
            contact.name = name;
        }
        if let Some(role) = patch.role {
            contact.role = Some(role);
        }
        if let Some(email) = patch.email {
            contact.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            contact.address = Some(address);
        }
        if let Some(notes) = patch.notes {
            contact.notes = Some(notes);
        }
        contact.updated_at = Utc::now();

        self.contacts.update(contact.clone())?;
        self.activity
            .record(user, estate_id, "contact.updated", id.to_string());
        Ok(contact)
    }

    pub fn delete_contact(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.contacts
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "contact.deleted", id.to_string());
        Ok(())
    }

    // --- notes ---

    pub fn create_note(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewNote,
    ) -> Result<EstateNote, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        require_non_empty(&input.title, "title")?;

        let now = Utc::now();
        let note = self.notes.insert(EstateNote {
            id: RecordId::generate(),
            estate_id,
            title: input.title,
            body: input.body,
            pinned: input.pinned,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "note.created", note.id.to_string());
        Ok(note)
    }

    pub fn list_notes(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<EstateNote>, RecordServiceError> {
        self.access(&user, &estate_id)?;
        let mut notes = self.notes.list(&estate_id)?;
        // Pinned first, newest within each group.
        notes.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(notes)
    }

    pub fn get_note(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<EstateNote, RecordServiceError> {
        self.access(&user, &estate_id)?;
        self.notes
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)
    }

    pub fn update_note(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: NotePatch,
    ) -> Result<EstateNote, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut note = self
            .notes
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)?;

        if let Some(title) = patch.title {
            require_non_empty(&title, "title")?;
            note.title = title;
        }
        if let Some(body) = patch.body {
            note.body = body;
        }
        if let Some(pinned) = patch.pinned {
            note.pinned = pinned;
        }
        note.updated_at = Utc::now();

        self.notes.update(note.clone())?;
        self.activity
            .record(user, estate_id, "note.updated", id.to_string());
        Ok(note)
    }

    pub fn delete_note(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.notes
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "note.deleted", id.to_string());
        Ok(())
    }

    // --- tasks ---

    pub fn create_task(
        &self,
        user: UserId,
        estate_id: EstateId,
        input: NewTask,
    ) -> Result<EstateTask, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;
        require_non_empty(&input.title, "title")?;

        let now = Utc::now();
        let task = self.tasks.insert(EstateTask {
            id: RecordId::generate(),
            estate_id,
            title: input.title,
            details: input.details,
            status: TaskStatus::Open,
            due_on: input.due_on,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })?;

        self.activity
            .record(user, estate_id, "task.created", task.id.to_string());
        Ok(task)
    }

    pub fn list_tasks(
        &self,
        user: UserId,
        estate_id: EstateId,
    ) -> Result<Vec<EstateTask>, RecordServiceError> {
        self.access(&user, &estate_id)?;
        let mut tasks = self.tasks.list(&estate_id)?;
        tasks.sort_by(|a, b| match (a.due_on, b.due_on) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at.cmp(&b.created_at),
        });
        Ok(tasks)
    }

    pub fn get_task(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<EstateTask, RecordServiceError> {
        self.access(&user, &estate_id)?;
        self.tasks
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)
    }

    pub fn update_task(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
        patch: TaskPatch,
    ) -> Result<EstateTask, RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        let mut task = self
            .tasks
            .fetch(&estate_id, &id)?
            .ok_or(RecordServiceError::RecordNotFound)?;

        if let Some(title) = patch.title {
            require_non_empty(&title, "title")?;
            task.title = title;
        }
        if let Some(details) = patch.details {
            task.details = Some(details);
        }
        if let Some(status) = patch.status {
            if status == TaskStatus::Done && task.status != TaskStatus::Done {
                task.completed_at = Some(Utc::now());
            }
            if status != TaskStatus::Done {
                task.completed_at = None;
            }
            task.status = status;
        }
        if let Some(due_on) = patch.due_on {
            task.due_on = Some(due_on);
        }
        task.updated_at = Utc::now();

        self.tasks.update(task.clone())?;
        self.activity
            .record(user, estate_id, "task.updated", id.to_string());
        Ok(task)
    }

    pub fn delete_task(
        &self,
        user: UserId,
        estate_id: EstateId,
        id: RecordId,
    ) -> Result<(), RecordServiceError> {
        let access = self.access(&user, &estate_id)?;
        access.require_editor()?;

        self.tasks
            .delete(&estate_id, &id)
            .map_err(record_not_found)?;
        self.activity
            .record(user, estate_id, "task.deleted", id.to_string());
        Ok(())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), RecordServiceError> {
    if value.trim().is_empty() {
        Err(RecordServiceError::Validation(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(())
    }
}

fn record_not_found(err: RepositoryError) -> RecordServiceError {
    match err {
        RepositoryError::NotFound => RecordServiceError::RecordNotFound,
        other => RecordServiceError::Repository(other),
    }
}

/// Error raised by the record service.
#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("record not found")]
    RecordNotFound,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
