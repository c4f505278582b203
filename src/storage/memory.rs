//! In-memory store with DynamoDB-like scan paging, used by the resolver and router tests.
use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ScanPage, StorageError, TicketStore};
use crate::models::{Ticket, TicketChanges, TicketField};

#[derive(Default)]
pub struct InMemoryTicketStore {
    tickets: RwLock<BTreeMap<String, Ticket>>,
    failure: Option<String>,
}

impl InMemoryTicketStore {
    /// A store whose every call fails with the given message.
    pub fn failing(message: &str) -> Self {
        InMemoryTicketStore {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub async fn count(&self) -> usize {
        self.tickets.read().await.len()
    }

    fn check(&self) -> Result<(), StorageError> {
        match &self.failure {
            Some(message) => Err(StorageError::Request(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, StorageError> {
        self.check()?;
        Ok(self.tickets.read().await.get(id).cloned())
    }

    async fn put_new_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        self.check()?;
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(StorageError::ConditionFailed(ticket.id.clone()));
        }
        tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn update_ticket(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, StorageError> {
        self.check()?;
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| StorageError::ConditionFailed(id.to_string()))?;
        for (field, value) in changes.iter() {
            match field {
                TicketField::Priority => ticket.priority = value.clone(),
                TicketField::Description => ticket.description = value.clone(),
            }
        }
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, id: &str) -> Result<(), StorageError> {
        self.check()?;
        self.tickets.write().await.remove(id);
        Ok(())
    }

    async fn scan_tickets(&self, limit: i32, start_after: Option<&str>) -> Result<ScanPage, StorageError> {
        self.check()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        let tickets = self.tickets.read().await;
        let lower = match start_after {
            Some(id) => Bound::Excluded(id.to_string()),
            None => Bound::Unbounded,
        };

        let page: Vec<Ticket> = tickets
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(_, t)| t.clone())
            .collect();

        // Like DynamoDB, a full page always reports a last key even if nothing follows it.
        let last_evaluated_id = if page.len() == limit {
            page.last().map(|t| t.id.clone())
        } else {
            None
        };

        Ok(ScanPage { tickets: page, last_evaluated_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_rejects_existing_id() {
        let store = InMemoryTicketStore::default();
        let ticket = Ticket::open("high".to_string(), "printer jam".to_string());

        store.put_new_ticket(&ticket).await.unwrap();
        let err = store.put_new_ticket(&ticket).await.unwrap_err();

        assert!(matches!(err, StorageError::ConditionFailed(ref id) if *id == ticket.id));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_id() {
        let store = InMemoryTicketStore::default();
        let mut changes = TicketChanges::default();
        changes.set(TicketField::Priority, "low".to_string());

        let err = store.update_ticket("missing", &changes).await.unwrap_err();

        assert!(matches!(err, StorageError::ConditionFailed(ref id) if id == "missing"));
        assert_eq!(store.count().await, 0);
    }
}
