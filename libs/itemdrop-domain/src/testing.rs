//! In-memory port implementations for tests
//!
//! Both fakes are cheap to clone and share their state, so a test can keep a
//! handle after moving a clone into the service and inspect what was called.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::ingestion::{IngestionError, ItemId, NewItem};
use crate::ports::{ItemRepository, ObjectStore};

/// How a fake port answers each call
#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    Fail(String),
    Panic(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One recorded `ObjectStore::upload` call that succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub path: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct StoreState {
    attempts: usize,
    uploads: Vec<Upload>,
}

/// Object store keeping uploads in memory
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    behavior: Behavior,
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Succeed)
    }

    /// A store whose every upload fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    /// Successful uploads, in call order
    pub fn uploads(&self) -> Vec<Upload> {
        lock(&self.state).uploads.clone()
    }

    /// Number of upload calls, successful or not
    pub fn attempts(&self) -> usize {
        lock(&self.state).attempts
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), IngestionError>> + Send {
        let upload = Upload {
            path: path.to_string(),
            data,
            content_type: content_type.to_string(),
        };
        let behavior = self.behavior.clone();
        let state = self.state.clone();

        async move {
            lock(&state).attempts += 1;
            match behavior {
                Behavior::Succeed => {
                    lock(&state).uploads.push(upload);
                    Ok(())
                }
                Behavior::Fail(message) => Err(IngestionError::upload_failed(message)),
                Behavior::Panic(message) => panic!("{}", message),
            }
        }
    }
}

#[derive(Debug, Default)]
struct RepositoryState {
    attempts: usize,
    inserted: Vec<(ItemId, NewItem)>,
}

/// Item repository keeping rows in memory and assigning random ids
#[derive(Debug, Clone)]
pub struct InMemoryItemRepository {
    behavior: Behavior,
    state: Arc<Mutex<RepositoryState>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Succeed)
    }

    /// A repository whose every insert fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// A repository whose every insert panics with `message`
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Panic(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            state: Arc::new(Mutex::new(RepositoryState::default())),
        }
    }

    /// Successfully inserted items with their assigned ids, in call order
    pub fn inserted(&self) -> Vec<(ItemId, NewItem)> {
        lock(&self.state).inserted.clone()
    }

    /// Number of insert calls, successful or not
    pub fn attempts(&self) -> usize {
        lock(&self.state).attempts
    }
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn insert(&self, item: &NewItem) -> impl Future<Output = Result<ItemId, IngestionError>> + Send {
        let item = item.clone();
        let behavior = self.behavior.clone();
        let state = self.state.clone();

        async move {
            lock(&state).attempts += 1;
            match behavior {
                Behavior::Succeed => {
                    let id = ItemId::from_uuid(Uuid::new_v4());
                    lock(&state).inserted.push((id, item));
                    Ok(id)
                }
                Behavior::Fail(message) => Err(IngestionError::insert_failed(message)),
                Behavior::Panic(message) => panic!("{}", message),
            }
        }
    }
}
