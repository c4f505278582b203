//! Ticket persistence behind a single trait, so the resolvers never see the SDK.
mod dynamo;
#[cfg(test)]
pub mod memory;

pub use dynamo::DynamoTicketStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Ticket, TicketChanges};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("conditional check failed for ticket '{0}'")]
    ConditionFailed(String),

    #[error("{0}")]
    Request(String),

    #[error("stored item is not a valid ticket: {0}")]
    Malformed(#[from] serde_dynamo::Error),

    #[error("no attributes returned for ticket '{0}'")]
    MissingAttributes(String),
}

/// One page of a full-table scan.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub tickets: Vec<Ticket>,
    /// Id of the last item the store evaluated; `None` once the table is exhausted.
    pub last_evaluated_id: Option<String>,
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, StorageError>;

    /// Writes a new ticket, failing with `ConditionFailed` if the id is taken.
    async fn put_new_ticket(&self, ticket: &Ticket) -> Result<(), StorageError>;

    /// Applies `changes` to an existing ticket and returns the post-update image.
    async fn update_ticket(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, StorageError>;

    /// Deletes unconditionally; deleting a missing id is not an error.
    async fn delete_ticket(&self, id: &str) -> Result<(), StorageError>;

    async fn scan_tickets(&self, limit: i32, start_after: Option<&str>) -> Result<ScanPage, StorageError>;
}
