//! Error types for specifier encoding, routing and API requests.

use thiserror::Error;

/// Errors while encoding or decoding a resource specifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Every identifying field is empty. This is a caller bug: the request
    /// would otherwise be routed to an empty resource.
    #[error("empty {kind}: at least one identifying field must be set")]
    Invalid { kind: &'static str },

    #[error("{kind} cannot be encoded: {message}")]
    Unsupported { kind: &'static str, message: String },

    #[error("malformed {kind} \"{input}\": {message}")]
    Malformed {
        kind: &'static str,
        input: String,
        message: String,
    },
}

/// Errors while building a URL from a named route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route {route} requires variable {var}")]
    MissingVar {
        route: &'static str,
        var: &'static str,
    },

    #[error("route {route} has an unterminated variable in pattern \"{pattern}\"")]
    BadPattern {
        route: &'static str,
        pattern: &'static str,
    },

    #[error("route {route} variable {var} has a '.' or '..' path segment: \"{value}\"")]
    DotSegment {
        route: &'static str,
        var: &'static str,
        value: String,
    },

    #[error("base URL {url} cannot carry a path")]
    InvalidBase { url: String },
}

/// Errors returned by API service calls.
#[derive(Debug, Error)]
pub enum ClientError {
    // Caller errors (exit code 2)
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("cannot encode query options: {source}")]
    Query {
        #[source]
        source: serde_urlencoded::ser::Error,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    // IO errors (exit code 3)
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Server rejected the request (exit code 1)
    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
}

impl SpecError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl ClientError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Network { .. } | ClientError::InvalidJson { .. } => 3,
            ClientError::Status { .. } => 1,
            _ => 2,
        }
    }

    /// HTTP status of a rejected request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// If the server reported that the repository moved, returns the URI it
    /// now lives at.
    pub fn redirect_uri(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => crate::repos::parse_redirect(message),
            _ => None,
        }
    }
}
