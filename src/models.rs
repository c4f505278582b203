use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const OPEN_STATUS: &str = "open";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub priority: String,
    pub status: String,
    pub submission_date: String,
    pub description: String,
}

impl Ticket {
    /// Builds a freshly opened ticket with a random id and the current time.
    pub fn open(priority: String, description: String) -> Self {
        Ticket {
            id: Uuid::new_v4().to_string(),
            priority,
            status: OPEN_STATUS.to_string(),
            submission_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            description,
        }
    }
}

/// Attributes a client is allowed to change after a ticket is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TicketField {
    Priority,
    Description,
}

impl TicketField {
    pub fn attribute_name(self) -> &'static str {
        match self {
            TicketField::Priority => "priority",
            TicketField::Description => "description",
        }
    }
}

/// New values for a partial update, keyed by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges(BTreeMap<TicketField, String>);

impl TicketChanges {
    pub fn set(&mut self, field: TicketField, value: String) {
        self.0.insert(field, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketField, &String)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }
}

// Request Bodies
#[derive(Debug, Deserialize, Default)]
pub struct OpenTicketRequest {
    pub ticket: Option<NewTicket>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NewTicket {
    pub priority: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTicketRequest {
    pub updates: Option<TicketUpdates>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TicketUpdates {
    pub priority: Option<String>,
    pub description: Option<String>,
}

impl TicketUpdates {
    /// Keeps only fields carrying a non-empty value.
    pub fn into_changes(self) -> TicketChanges {
        let mut changes = TicketChanges::default();
        let fields = [
            (TicketField::Priority, self.priority),
            (TicketField::Description, self.description),
        ];
        for (field, value) in fields {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                changes.set(field, v);
            }
        }
        changes
    }
}
