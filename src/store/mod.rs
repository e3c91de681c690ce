pub mod sqlite;

pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ConversationRecord, NewConversation, RecordUpdate};

/// Durable table of conversation records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a resolved record and return its assigned id
    async fn insert(&self, record: &NewConversation) -> Result<i64, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<ConversationRecord>, StoreError>;

    /// All records, newest `created_at` first
    async fn list(&self) -> Result<Vec<ConversationRecord>, StoreError>;

    /// Overwrite the fields present in `update`; `None` when the id is unknown
    async fn update(
        &self,
        id: i64,
        update: &RecordUpdate,
    ) -> Result<Option<ConversationRecord>, StoreError>;

    /// Returns false when the id is unknown
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Cheap connectivity check for health reporting
    async fn ping(&self) -> Result<(), StoreError>;
}
