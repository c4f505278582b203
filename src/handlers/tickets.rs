//! Ticket resolvers (open, fetch, list, update, close).
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use lambda_http::tracing;
use serde_json::{json, Value};

use crate::error::TicketError;
use crate::models::{OpenTicketRequest, Ticket, UpdateTicketRequest};
use crate::storage::TicketStore;

/// Opens a new ticket.
///
/// # Database Interactions
/// - **Tickets table**: `PutItem` guarded by `attribute_not_exists(id)`.
///
/// # Logic
/// - Both `priority` and `description` must be present and non-empty.
/// - `id`, `status = "open"` and `submissionDate` are generated server-side.
/// - Returns `{ "ticket": Ticket }` echoing the stored record.
pub async fn handle_open_ticket(
    req: OpenTicketRequest,
    store: &dyn TicketStore,
) -> Result<Value, TicketError> {
    let fields = req.ticket.ok_or(TicketError::InvalidInput)?;
    let priority = fields.priority.filter(|p| !p.is_empty()).ok_or(TicketError::InvalidInput)?;
    let description = fields.description.filter(|d| !d.is_empty()).ok_or(TicketError::InvalidInput)?;

    store_new_ticket(Ticket::open(priority, description), store).await
}

/// Writes a freshly built ticket. A taken id fails the put's condition and surfaces as a storage error.
async fn store_new_ticket(ticket: Ticket, store: &dyn TicketStore) -> Result<Value, TicketError> {
    store.put_new_ticket(&ticket).await
        .map_err(TicketError::storage("open ticket"))?;

    tracing::info!(ticket_id = %ticket.id, "opened ticket");
    Ok(json!({ "ticket": ticket }))
}

/// Retrieves a single ticket by id.
///
/// # Database Interactions
/// - **Tickets table**: consistent `GetItem`.
///
/// # Logic
/// - Returns `{ "ticket": Ticket }`, or `{ "ticket": null }` when no ticket has that id.
pub async fn handle_get_ticket(
    ticket_id: &str,
    store: &dyn TicketStore,
) -> Result<Value, TicketError> {
    let ticket = store.get_ticket(ticket_id).await
        .map_err(TicketError::storage("fetch ticket"))?;

    Ok(json!({ "ticket": ticket }))
}

/// Lists one page of tickets.
///
/// # Database Interactions
/// - **Tickets table**: `Scan` with `Limit = page_size`, resuming from the key inside `next_token`.
///
/// # Logic
/// - `nextToken` is only emitted while the store reports a last evaluated key; callers page until it is gone.
/// - Order is whatever the scan returns.
pub async fn handle_list_tickets(
    next_token: Option<&str>,
    page_size: i32,
    store: &dyn TicketStore,
) -> Result<Value, TicketError> {
    let start_after = next_token.map(decode_token).transpose()?;

    let page = store.scan_tickets(page_size, start_after.as_deref()).await
        .map_err(TicketError::storage("list tickets"))?;

    let mut body = json!({ "tickets": page.tickets });
    if let Some(last_id) = page.last_evaluated_id {
        body["nextToken"] = json!(encode_token(&last_id));
    }

    Ok(body)
}

/// Applies a partial update to a ticket.
///
/// # Database Interactions
/// - **Tickets table**: `UpdateItem` naming only the supplied fields, guarded by `attribute_exists(id)`, returning `ALL_NEW`.
///
/// # Logic
/// - Empty strings count as absent; at least one of `priority` or `description` is required.
/// - An unknown id fails the condition and yields a 503 storage error rather than creating a partial item.
/// - Returns `{ "ticket": Ticket }` with the full post-update record.
pub async fn handle_update_ticket(
    ticket_id: &str,
    req: UpdateTicketRequest,
    store: &dyn TicketStore,
) -> Result<Value, TicketError> {
    if ticket_id.trim().is_empty() {
        return Err(TicketError::InvalidInput);
    }

    let changes = req.updates.ok_or(TicketError::InvalidInput)?.into_changes();
    if changes.is_empty() {
        return Err(TicketError::InvalidInput);
    }

    let ticket = store.update_ticket(ticket_id, &changes).await
        .map_err(TicketError::storage("update ticket"))?;

    Ok(json!({ "ticket": ticket }))
}

/// Closes a ticket by deleting it.
///
/// # Database Interactions
/// - **Tickets table**: unconditional `DeleteItem` by `id`.
///
/// # Logic
/// - No existence check; succeeds whether or not the id existed.
/// - Returns `{ "message": "Ticket with id <id> has been deleted!" }`.
pub async fn handle_close_ticket(
    ticket_id: &str,
    store: &dyn TicketStore,
) -> Result<Value, TicketError> {
    if ticket_id.trim().is_empty() {
        return Err(TicketError::InvalidInput);
    }

    store.delete_ticket(ticket_id).await
        .map_err(TicketError::storage("close ticket"))?;

    tracing::info!(ticket_id, "closed ticket");
    Ok(json!({ "message": format!("Ticket with id {} has been deleted!", ticket_id) }))
}

fn encode_token(last_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(last_id)
}

fn decode_token(token: &str) -> Result<String, TicketError> {
    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| TicketError::InvalidInput)?;
    String::from_utf8(bytes).map_err(|_| TicketError::InvalidInput)
}
