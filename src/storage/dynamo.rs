//! DynamoDB-backed ticket store.
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    types::{AttributeValue, ReturnValue},
};

use super::{ScanPage, StorageError, TicketStore};
use crate::models::{Ticket, TicketChanges};

const KEY_ATTRIBUTE: &str = "id";

/// Shared handle to the tickets table. Built once at startup and reused by every invocation.
pub struct DynamoTicketStore {
    client: Client,
    table_name: String,
}

impl DynamoTicketStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        DynamoTicketStore {
            client,
            table_name: table_name.into(),
        }
    }
}

fn id_key(id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

/// A `SET` update expression with its placeholder maps.
#[derive(Debug, PartialEq)]
pub(crate) struct UpdateStatement {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Turns typed changes into an update expression. Every attribute goes through a `#name`
/// placeholder since `status`-style attribute names collide with DynamoDB reserved words.
pub(crate) fn build_update(changes: &TicketChanges) -> UpdateStatement {
    let mut assignments = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (field, value) in changes.iter() {
        let attr = field.attribute_name();
        assignments.push(format!("#{attr} = :{attr}"));
        names.insert(format!("#{attr}"), attr.to_string());
        values.insert(format!(":{attr}"), AttributeValue::S(value.clone()));
    }

    UpdateStatement {
        expression: format!("SET {}", assignments.join(", ")),
        names,
        values,
    }
}

fn last_evaluated_id(key: Option<HashMap<String, AttributeValue>>) -> Option<String> {
    key?.get(KEY_ATTRIBUTE).and_then(|av| av.as_s().ok()).cloned()
}

#[async_trait]
impl TicketStore for DynamoTicketStore {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, StorageError> {
        let output = self.client.get_item()
            .table_name(&self.table_name)
            .set_key(Some(id_key(id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to get ticket '{}': {:?}", id, e)))?;

        match output.item {
            Some(item) => Ok(Some(serde_dynamo::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn put_new_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(ticket)?;

        self.client.put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await
            .map_err(|e| {
                if let Some(service_err) = e.as_service_error() && service_err.is_conditional_check_failed_exception() {
                    return StorageError::ConditionFailed(ticket.id.clone());
                }
                StorageError::Request(format!("Failed to put ticket '{}': {:?}", ticket.id, e))
            })?;

        Ok(())
    }

    async fn update_ticket(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, StorageError> {
        let statement = build_update(changes);

        let output = self.client.update_item()
            .table_name(&self.table_name)
            .set_key(Some(id_key(id)))
            .update_expression(statement.expression)
            .condition_expression("attribute_exists(id)")
            .set_expression_attribute_names(Some(statement.names))
            .set_expression_attribute_values(Some(statement.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| {
                if let Some(service_err) = e.as_service_error() && service_err.is_conditional_check_failed_exception() {
                    return StorageError::ConditionFailed(id.to_string());
                }
                StorageError::Request(format!("Failed to update ticket '{}': {:?}", id, e))
            })?;

        let attributes = output.attributes
            .ok_or_else(|| StorageError::MissingAttributes(id.to_string()))?;

        Ok(serde_dynamo::from_item(attributes)?)
    }

    async fn delete_ticket(&self, id: &str) -> Result<(), StorageError> {
        self.client.delete_item()
            .table_name(&self.table_name)
            .set_key(Some(id_key(id)))
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to delete ticket '{}': {:?}", id, e)))?;

        Ok(())
    }

    async fn scan_tickets(&self, limit: i32, start_after: Option<&str>) -> Result<ScanPage, StorageError> {
        let output = self.client.scan()
            .table_name(&self.table_name)
            .limit(limit)
            .set_exclusive_start_key(start_after.map(id_key))
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to scan tickets: {:?}", e)))?;

        let tickets: Vec<Ticket> = serde_dynamo::from_items(output.items.unwrap_or_default())?;

        Ok(ScanPage {
            tickets,
            last_evaluated_id: last_evaluated_id(output.last_evaluated_key),
        })
    }
}
