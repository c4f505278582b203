//! Handler modules for Lambda function

pub mod tickets;

pub use tickets::{
    handle_close_ticket, handle_get_ticket, handle_list_tickets, handle_open_ticket, handle_update_ticket,
};
