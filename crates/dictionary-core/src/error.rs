use anyhow::Error as AnyError;
use serde_json::json;
use thiserror::Error;

use crate::body::Body;
use crate::http::{header::CONTENT_TYPE, HeaderValue, Method, Response, StatusCode};
use crate::response::{response_with_body, IntoResponse, JSON_CONTENT_TYPE};

/// Host-level error that carries an HTTP status code. Lookup failures never surface as this type;
/// they are folded into [`crate::lookup::LookupOutcome::Failure`].
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("no route matched path: {path}")]
    NotFound { path: String },
    #[error("method {method} not allowed; allowed: {allowed}")]
    MethodNotAllowed { method: Method, allowed: String },
    #[error("internal error: {source}")]
    Internal {
        #[from]
        source: AnyError,
    },
}

impl DictionaryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        DictionaryError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        DictionaryError::NotFound { path: path.into() }
    }

    pub fn method_not_allowed(method: &Method, allowed: &[Method]) -> Self {
        let mut names = allowed
            .iter()
            .map(|m| m.as_str().to_string())
            .collect::<Vec<_>>();
        names.sort();
        let allowed = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };
        DictionaryError::MethodNotAllowed {
            method: method.clone(),
            allowed,
        }
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        DictionaryError::Internal {
            source: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DictionaryError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            DictionaryError::NotFound { .. } => StatusCode::NOT_FOUND,
            DictionaryError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DictionaryError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for DictionaryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Body::json(&json!({ "error": self.message() }))
            .unwrap_or_else(|_| Body::text("internal error"));
        let mut response = response_with_body(status, body);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        response
    }
}

/// Reasons a dictionary lookup can fail. These are logged but all map to the same generic message
/// for the caller.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("term is not valid percent-encoded UTF-8: {0}")]
    InvalidEncoding(#[from] crate::params::DecodeError),
    #[error("upstream URL `{target}` is invalid: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("dictionary API unreachable: {0}")]
    UpstreamUnreachable(#[source] DictionaryError),
    #[error("dictionary API returned a non-JSON body: {0}")]
    UpstreamMalformed(#[from] serde_json::Error),
}
