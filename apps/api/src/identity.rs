//! Natural-key identity resolution shared by both stores.
//!
//! A store only has to answer "which id has this key?" and "insert this key";
//! `resolve_or_create` supplies the find-or-insert sequence. The store's unique
//! constraint is the only guard against a concurrent duplicate insert, which
//! surfaces as `AppError::Conflict`.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;

use crate::errors::AppError;

#[async_trait]
pub trait NaturalKeyStore: Send {
    type Key: Send + Sync;
    type Id: Clone + Send;

    async fn find_by_key(&mut self, key: &Self::Key) -> Result<Option<Self::Id>, AppError>;

    async fn insert(&mut self, key: &Self::Key) -> Result<Self::Id, AppError>;
}

/// Outcome of a resolution: the id plus whether this call inserted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<Id> {
    pub id: Id,
    pub created: bool,
}

pub async fn resolve_or_create<S>(store: &mut S, key: &S::Key) -> Result<Resolved<S::Id>, AppError>
where
    S: NaturalKeyStore + ?Sized,
{
    if let Some(id) = store.find_by_key(key).await? {
        return Ok(Resolved { id, created: false });
    }
    let id = store.insert(key).await?;
    Ok(Resolved { id, created: true })
}

/// Per-run memo of resolved keys, used by the bulk loaders to skip lookups.
/// Callers record an entry only once the write that produced it is durable.
#[derive(Debug)]
pub struct KeyCache<K, Id> {
    entries: HashMap<K, Id>,
}

impl<K: Eq + Hash, Id: Clone> KeyCache<K, Id> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<Id> {
        self.entries.get(key).cloned()
    }

    pub fn record(&mut self, key: K, id: Id) {
        self.entries.insert(key, id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, Id: Clone> Default for KeyCache<K, Id> {
    fn default() -> Self {
        Self::new()
    }
}
