//! Shared storage seam.
//!
//! All persistence goes through the traits defined here and in the
//! per-resource `repository` modules; the service layer never sees a
//! concrete database handle. The [`memory`] module provides the adapters
//! used by the HTTP binary and the test suites.

use crate::domain::{EstateId, RecordId};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Implemented by every record that lives inside an estate workspace.
pub trait EstateRecord {
    fn record_id(&self) -> RecordId;
    fn estate_id(&self) -> EstateId;
}

/// Uniform CRUD surface for estate-scoped records.
///
/// Fetch and delete take the estate id as well so a record can never be
/// addressed from outside its own estate.
pub trait EstateRecordRepository<T: EstateRecord>: Send + Sync {
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    fn update(&self, record: T) -> Result<(), RepositoryError>;
    fn fetch(&self, estate: &EstateId, id: &RecordId) -> Result<Option<T>, RepositoryError>;
    fn list(&self, estate: &EstateId) -> Result<Vec<T>, RepositoryError>;
    fn delete(&self, estate: &EstateId, id: &RecordId) -> Result<(), RepositoryError>;
}

pub mod memory {
    //! In-memory adapters backing the service in the binary and in tests.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{EstateRecord, EstateRecordRepository, RepositoryError};
    use crate::activity::{ActivityError, ActivityEvent, ActivitySink};
    use crate::auth::repository::UserRepository;
    use crate::auth::User;
    use crate::domain::{EstateId, RecordId, UserId};
    use crate::estates::repository::EstateRepository;
    use crate::estates::Estate;

    /// Generic map-backed store for any estate-scoped record type.
    #[derive(Clone)]
    pub struct InMemoryRecords<T> {
        records: Arc<Mutex<HashMap<RecordId, T>>>,
    }

    impl<T> Default for InMemoryRecords<T> {
        fn default() -> Self {
            Self {
                records: Arc::new(Mutex::new(HashMap::new())),
            }
        }
    }

    impl<T> EstateRecordRepository<T> for InMemoryRecords<T>
    where
        T: EstateRecord + Clone + Send + Sync,
    {
        fn insert(&self, record: T) -> Result<T, RepositoryError> {
            let mut guard = self.records.lock().expect("record mutex poisoned");
            if guard.contains_key(&record.record_id()) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.record_id(), record.clone());
            Ok(record)
        }

        fn update(&self, record: T) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("record mutex poisoned");
            if guard.contains_key(&record.record_id()) {
                guard.insert(record.record_id(), record);
                Ok(())
            } else {
                Err(RepositoryError::NotFound)
            }
        }

        fn fetch(&self, estate: &EstateId, id: &RecordId) -> Result<Option<T>, RepositoryError> {
            let guard = self.records.lock().expect("record mutex poisoned");
            Ok(guard
                .get(id)
                .filter(|record| record.estate_id() == *estate)
                .cloned())
        }

        fn list(&self, estate: &EstateId) -> Result<Vec<T>, RepositoryError> {
            let guard = self.records.lock().expect("record mutex poisoned");
            Ok(guard
                .values()
                .filter(|record| record.estate_id() == *estate)
                .cloned()
                .collect())
        }

        fn delete(&self, estate: &EstateId, id: &RecordId) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("record mutex poisoned");
            match guard.get(id) {
                Some(record) if record.estate_id() == *estate => {
                    guard.remove(id);
                    Ok(())
                }
                _ => Err(RepositoryError::NotFound),
            }
        }
    }

    #[derive(Default, Clone)]
    pub struct InMemoryUsers {
        users: Arc<Mutex<HashMap<UserId, User>>>,
    }

    impl UserRepository for InMemoryUsers {
        fn insert(&self, user: User) -> Result<User, RepositoryError> {
            let mut guard = self.users.lock().expect("user mutex poisoned");
            if guard
                .values()
                .any(|existing| existing.email == user.email || existing.id == user.id)
            {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(user.id, user.clone());
            Ok(user)
        }

        fn update(&self, user: User) -> Result<(), RepositoryError> {
            let mut guard = self.users.lock().expect("user mutex poisoned");
            if guard.contains_key(&user.id) {
                guard.insert(user.id, user);
                Ok(())
            } else {
                Err(RepositoryError::NotFound)
            }
        }

        fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
            let guard = self.users.lock().expect("user mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn fetch_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            let guard = self.users.lock().expect("user mutex poisoned");
            Ok(guard
                .values()
                .find(|user| user.email == email)
                .cloned())
        }
    }

    #[derive(Default, Clone)]
    pub struct InMemoryEstates {
        estates: Arc<Mutex<HashMap<EstateId, Estate>>>,
    }

    impl EstateRepository for InMemoryEstates {
        fn insert(&self, estate: Estate) -> Result<Estate, RepositoryError> {
            let mut guard = self.estates.lock().expect("estate mutex poisoned");
            if guard.contains_key(&estate.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(estate.id, estate.clone());
            Ok(estate)
        }

        fn update(&self, estate: Estate) -> Result<(), RepositoryError> {
            let mut guard = self.estates.lock().expect("estate mutex poisoned");
            if guard.contains_key(&estate.id) {
                guard.insert(estate.id, estate);
                Ok(())
            } else {
                Err(RepositoryError::NotFound)
            }
        }

        fn fetch(&self, id: &EstateId) -> Result<Option<Estate>, RepositoryError> {
            let guard = self.estates.lock().expect("estate mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn list_for_user(&self, user: &UserId) -> Result<Vec<Estate>, RepositoryError> {
            let guard = self.estates.lock().expect("estate mutex poisoned");
            let mut estates: Vec<Estate> = guard
                .values()
                .filter(|estate| {
                    estate.owner_id == *user
                        || estate
                            .collaborators
                            .iter()
                            .any(|collaborator| collaborator.user_id == *user)
                })
                .cloned()
                .collect();
            estates.sort_by_key(|estate| estate.created_at);
            Ok(estates)
        }

        fn delete(&self, id: &EstateId) -> Result<(), RepositoryError> {
            let mut guard = self.estates.lock().expect("estate mutex poisoned");
            guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
        }
    }

    /// Collecting sink so tests can assert on recorded activity.
    #[derive(Default, Clone)]
    pub struct InMemoryActivity {
        events: Arc<Mutex<Vec<ActivityEvent>>>,
    }

    impl InMemoryActivity {
        pub fn events(&self) -> Vec<ActivityEvent> {
            self.events.lock().expect("activity mutex poisoned").clone()
        }
    }

    impl ActivitySink for InMemoryActivity {
        fn record(&self, event: ActivityEvent) -> Result<(), ActivityError> {
            let mut guard = self.events.lock().expect("activity mutex poisoned");
            guard.push(event);
            Ok(())
        }
    }
}
