//! # API Server Module
//!
//! ## Purpose
//! HTTP gateway for the product search service: parses and validates inbound
//! query parameters, invokes the classify-and-rank pipeline, and renders the
//! ranked item names for transport.
//!
//! ## Input/Output Specification
//! - **Input**: `GET /search?term=&lat=&lng=` requests
//! - **Output**: Newline-joined item names (plain text); JSON for
//!   `/health` and `/stats`
//! - **Validation**: Duplicated parameters, missing fields, and unparseable
//!   coordinates are rejected here; the core always receives a well-formed
//!   [`Query`]
//!
//! ## Key Features
//! - Strict single-value parameter rule (`term`, `lat`, `lng` once each)
//! - Structured error responses with client/server status split
//! - Request logging with peer address and query string

use crate::errors::{Result, SearchError};
use crate::{AppState, Query};
use actix_web::dev::Server;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};

/// API server wrapping the shared application state.
pub struct ApiServer {
    app_state: AppState,
}

impl ApiServer {
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Bind the listener and return the server future.
    ///
    /// The returned [`Server`] handle is `Send`, so callers may drive it on a
    /// spawned task and keep the main task free for signal handling.
    pub fn bind(self) -> Result<Server> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .route("/search", web::get().to(search_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| SearchError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        Ok(server)
    }

    /// Bind and run the API server until the process is stopped.
    pub async fn run(self) -> Result<()> {
        self.bind()?.await.map_err(|e| SearchError::Internal {
            message: format!("Server error: {}", e),
        })
    }
}

/// Parse and validate the raw query string into a well-formed [`Query`].
///
/// Each parameter must appear exactly once; coordinates must be finite
/// floats; the term must be non-empty and within the configured length.
pub fn parse_query(raw: &str, max_term_length: usize) -> Result<Query> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(raw)
        .map_err(|e| SearchError::ValidationFailed {
            field: "query".to_string(),
            reason: format!("malformed query string: {}", e),
        })?
        .into_inner();

    let term = single_value(&pairs, "term")?;
    let term = term.trim();
    if term.is_empty() {
        return Err(SearchError::ValidationFailed {
            field: "term".to_string(),
            reason: "search term must not be empty".to_string(),
        });
    }
    if term.chars().count() > max_term_length {
        return Err(SearchError::ValidationFailed {
            field: "term".to_string(),
            reason: format!("search term longer than {} characters", max_term_length),
        });
    }

    let latitude = parse_coordinate(&pairs, "lat", 90.0)?;
    let longitude = parse_coordinate(&pairs, "lng", 180.0)?;

    Ok(Query {
        term: term.to_string(),
        latitude,
        longitude,
    })
}

/// Extract a parameter that must appear exactly once.
fn single_value<'a>(pairs: &'a [(String, String)], key: &str) -> Result<&'a str> {
    let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
    let first = values.next().ok_or_else(|| SearchError::ValidationFailed {
        field: key.to_string(),
        reason: "parameter is required".to_string(),
    })?;
    if values.next().is_some() {
        return Err(SearchError::ValidationFailed {
            field: key.to_string(),
            reason: "parameter given more than once".to_string(),
        });
    }
    Ok(first)
}

fn parse_coordinate(pairs: &[(String, String)], key: &str, bound: f64) -> Result<f64> {
    let raw = single_value(pairs, key)?;
    let value: f64 = raw.parse().map_err(|_| SearchError::ValidationFailed {
        field: key.to_string(),
        reason: format!("'{}' is not a number", raw),
    })?;
    if !value.is_finite() || value.abs() > bound {
        return Err(SearchError::ValidationFailed {
            field: key.to_string(),
            reason: format!("coordinate {} out of range ±{}", value, bound),
        });
    }
    Ok(value)
}

/// Map a pipeline error to an HTTP response.
///
/// Client errors echo their message with a 400; everything else is a 500
/// with an opaque body so internal details never leak to callers.
fn error_response(e: &SearchError) -> HttpResponse {
    if e.is_client_error() {
        tracing::warn!(error = %e, "rejected search request");
        HttpResponse::BadRequest().body(e.to_string())
    } else {
        tracing::error!(error = %e, category = e.category(), "search failed");
        HttpResponse::InternalServerError().body("search failed")
    }
}

/// Search endpoint handler: plain-text, newline-joined item names.
async fn search_handler(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let peer = req
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(peer = %peer, query = %req.query_string(), "search request");

    let query = match parse_query(req.query_string(), app_state.config.search.max_term_length) {
        Ok(query) => query,
        Err(e) => return Ok(error_response(&e)),
    };

    match app_state.service.search(&query).await {
        Ok(names) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(names.join("\n"))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match app_state.service.health_check() {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            Ok(HttpResponse::ServiceUnavailable()
                .json(serde_json::json!({ "status": "unhealthy", "reason": e.to_string() })))
        }
    }
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app_state.service.stats()))
}
