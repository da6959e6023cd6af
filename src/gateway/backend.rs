//! Backend transport abstraction.
//!
//! A backend receives a method, a route and an optional JSON body and
//! answers with a JSON body. Application-level failures travel inside the
//! body; [`BackendError`] is reserved for transport faults.

use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Route for MIDI generation.
pub const GENERATE_PATH: &str = "/api/generate-midi";
/// Route for saving a composition.
pub const SAVE_PATH: &str = "/api/save-composition";
/// Route for loading a composition.
pub const LOAD_PATH: &str = "/api/load-composition";
/// Route for the service health check.
pub const HEALTH_PATH: &str = "/health";

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request addressed to a backend route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// Request method.
    pub method: Method,
    /// Route path, e.g. `/api/generate-midi`.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body for POST requests.
    pub body: Option<String>,
}

impl BackendRequest {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request carrying a JSON body.
    pub fn post(path: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the first value of query parameter `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport-level failures. The request never produced a reply body.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The service could not be reached.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// No route matches the request.
    #[error("no route for {method} {path}")]
    NotFound { method: Method, path: String },

    /// The reply could not be encoded.
    #[error("failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),

    /// The HTTP client could not be set up.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// A service that renders and stores compositions.
pub trait Backend {
    /// Sends `request` and returns the raw JSON reply body.
    fn call(
        &self,
        request: &BackendRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}
