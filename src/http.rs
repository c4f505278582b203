//! HTTP utilities for request/response handling and CORS

use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::TicketError;

/// CORS origin header for all responses
pub fn get_cors_origin_header() -> (&'static str, &'static str) {
    ("Access-Control-Allow-Origin", "*")
}

/// Full CORS headers for OPTIONS preflight responses only
pub fn get_cors_preflight_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Access-Control-Allow-Origin", "*"),
        (
            "Access-Control-Allow-Headers",
            "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
        ),
        ("Access-Control-Allow-Methods", "GET,POST,DELETE,OPTIONS"),
        ("Access-Control-Max-Age", "86400"),
    ]
}

/// Build an error response: a human readable `message`, plus the raw `error` when there is one
pub fn error_response(status: u16, message: &str, error: Option<&str>) -> Response<Body> {
    let mut body = json!({ "message": message });

    if let Some(error) = error {
        body["error"] = json!(error);
    }

    let (key, value) = get_cors_origin_header();
    Response::builder()
        .status(status)
        .header(key, value)
        .header("Content-Type", "application/json")
        .body(body.to_string().into())
        .expect("Couldn't create error response")
}

/// Build a successful response with CORS headers
pub fn success_response(status: u16, body: &Value) -> Response<Body> {
    let (key, value) = get_cors_origin_header();
    Response::builder()
        .status(status)
        .header(key, value)
        .header("Content-Type", "application/json")
        .body(body.to_string().into())
        .expect("Couldn't create success response")
}

/// Handle CORS preflight requests
pub fn handle_options() -> Response<Body> {
    let mut response = Response::builder().status(200);

    for (key, value) in get_cors_preflight_headers() {
        response = response.header(key, value);
    }

    response
        .header("Content-Type", "application/json")
        .body(Body::Empty)
        .expect("Couldn't handle CORS request")
}

/// Decodes a request body into `T`. An empty body reads as `{}`.
pub fn parse_json_body<T: DeserializeOwned>(body: &Body) -> Result<T, TicketError> {
    let body_str: &str = match body {
        Body::Empty => "{}",
        Body::Text(s) => s,
        Body::Binary(b) => std::str::from_utf8(b).map_err(|_| TicketError::InvalidInput)?,
        _ => "{}",
    };

    serde_json::from_str(body_str).map_err(|_| TicketError::InvalidInput)
}
