mod config;
mod error;
mod handlers;
mod http;
mod models;
mod storage;

use lambda_http::{run, service_fn, tracing, Body, Request, Response};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use config::Config;
use handlers::{handle_close_ticket, handle_get_ticket, handle_list_tickets, handle_open_ticket, handle_update_ticket};
use http::{error_response, handle_options, parse_json_body, success_response};
use storage::{DynamoTicketStore, TicketStore};

/// Handle the Lambda event
async fn handle_lambda_event(event: Request, config: &Config, store: &dyn TicketStore) -> Response<Body> {
    let method = event.method().as_str();
    let path = event.uri().path();

    let path = strip_stage_prefix(path);

    // Handle CORS preflight requests
    if method == "OPTIONS" {
        return handle_options();
    }

    tracing::info!(method, path, "routing request");

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let result = match (method, segments.as_slice()) {
        ("GET", []) => handle_list_tickets(None, config.page_size, store).await,
        ("GET", ["tickets", ticket_id]) => handle_get_ticket(ticket_id, store).await,
        ("POST", ["tickets", "open"]) => match parse_json_body(event.body()) {
            Ok(req) => handle_open_ticket(req, store).await,
            Err(e) => Err(e),
        },
        // A missing id still reaches the resolver so it is reported as invalid input
        ("POST", ["tickets", "update", rest @ ..]) if rest.len() <= 1 => {
            let ticket_id = rest.first().copied().unwrap_or_default();
            match parse_json_body(event.body()) {
                Ok(req) => handle_update_ticket(ticket_id, req, store).await,
                Err(e) => Err(e),
            }
        }
        ("DELETE", ["tickets", "close", rest @ ..]) if rest.len() <= 1 => {
            let ticket_id = rest.first().copied().unwrap_or_default();
            handle_close_ticket(ticket_id, store).await
        }
        ("GET", [next_token]) if *next_token != "tickets" => {
            handle_list_tickets(Some(*next_token), config.page_size, store).await
        }
        _ => {
            return error_response(404, "Route not found", Some(&format!("{} {}", method, path)));
        }
    };

    match result {
        Ok(body) => success_response(200, &body),
        Err(e) => e.into_response(),
    }
}

/// Strips a leading `/Prod` or `/prod` stage segment. Only a whole segment counts, so `/products` is left alone.
fn strip_stage_prefix(path: &str) -> &str {
    for stage in ["/Prod", "/prod"] {
        if let Some(rest) = path.strip_prefix(stage)
            && (rest.is_empty() || rest.starts_with('/'))
        {
            return rest;
        }
    }
    path
}

/// Main Lambda handler function
async fn function_handler(
    event: Request,
    config: &Config,
    store: &dyn TicketStore,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(handle_lambda_event(event, config, store).await)
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;

    // One client for the lifetime of the execution environment
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoTicketStore::new(DynamoDbClient::new(&aws_config), config.table_name.clone());

    tracing::info!(table = %config.table_name, page_size = config.page_size, "ticket service starting");

    run(service_fn(|event: Request| function_handler(event, &config, &store))).await
}
