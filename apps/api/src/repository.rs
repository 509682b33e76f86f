//! CRUD surface implemented once per store for each entity.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// `?skip=&limit=` pagination. Listings are ordered by primary key so that
/// adjacent pages never overlap while the data is unchanged.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }
}

/// Result of a create call that may have resolved to an existing record.
#[derive(Debug, Clone)]
pub enum Created<T> {
    New(T),
    Existing(T),
}

impl<T> Created<T> {
    pub fn record(&self) -> &T {
        match self {
            Created::New(r) | Created::Existing(r) => r,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Created::New(_))
    }
}

/// Create response body: the record, plus a marker when nothing was inserted.
#[derive(Debug, Serialize)]
pub struct CreateResponse<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[async_trait]
pub trait Repository: Send + Sync {
    type Id: Send + Sync;
    type Record: Send;
    type Create: Send;
    type Update: Send;

    async fn list(&self, page: Page) -> Result<Vec<Self::Record>, AppError>;

    /// Fails with `NotFound` when no record has this id.
    async fn find(&self, id: &Self::Id) -> Result<Self::Record, AppError>;

    async fn create(&self, input: Self::Create) -> Result<Created<Self::Record>, AppError>;

    async fn update(&self, id: &Self::Id, input: Self::Update) -> Result<Self::Record, AppError>;

    /// Hard delete. Fails with `NotFound` when nothing matched.
    async fn delete(&self, id: &Self::Id) -> Result<(), AppError>;
}
