//! Word lookup decision logic: redirect URL-looking input, otherwise relay the dictionary API's
//! JSON verbatim.

use std::sync::Arc;

use serde_json::{json, Value};
use url::Url;

use crate::error::LookupError;
use crate::http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, Response, StatusCode};
use crate::response::{redirect, IntoResponse, Json};
use crate::upstream::{UpstreamHandle, UpstreamRequest};

/// Prefix the (decoded, unescaped) term is appended to.
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
/// Where URL-looking input is sent instead of the dictionary.
pub const DEFAULT_REDIRECT_TARGET: &str = "https://browser-aarush-ric.workers.dev";
/// The only failure text callers ever see.
pub const FAILURE_MESSAGE: &str = "Dictionary lookup failed";

/// Returns `true` when the term contains a `.` or starts with `http`.
///
/// This is a loose heuristic with known false positives (`"e.g"`) and misses (`"localhost"`);
/// callers rely on exactly this behaviour.
pub fn is_url_like(term: &str) -> bool {
    term.contains('.') || term.starts_with("http")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupSettings {
    upstream_base: String,
    redirect_target: Url,
}

impl LookupSettings {
    pub fn new(upstream_base: impl Into<String>, redirect_target: Url) -> Self {
        Self {
            upstream_base: upstream_base.into(),
            redirect_target,
        }
    }

    pub fn upstream_base(&self) -> &str {
        &self.upstream_base
    }

    pub fn redirect_target(&self) -> &Url {
        &self.redirect_target
    }

    /// Appends `term` to the upstream base without escaping it first. The result is parsed the way
    /// a browser's `fetch` would, so `/`, `?` and `#` inside the term keep their URL meaning.
    pub fn upstream_url(&self, term: &str) -> Result<Url, LookupError> {
        let target = format!("{}{}", self.upstream_base, term);
        Url::parse(&target).map_err(|source| LookupError::InvalidTarget { target, source })
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
            redirect_target: Url::parse(DEFAULT_REDIRECT_TARGET)
                .expect("default redirect target should be a valid URL"),
        }
    }
}

/// Result of evaluating one term.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Redirect { target: Url },
    Success { payload: Value },
    Failure { reason: String },
}

impl LookupOutcome {
    pub fn failure() -> Self {
        LookupOutcome::Failure {
            reason: FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success { .. })
    }
}

impl IntoResponse for LookupOutcome {
    fn into_response(self) -> Response {
        let mut response = match self {
            LookupOutcome::Redirect { target } => return redirect(target.as_str()),
            LookupOutcome::Success { payload } => Json(payload).into_response(),
            LookupOutcome::Failure { reason } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": reason })),
            )
                .into_response(),
        };
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        response
    }
}

/// Stateless per-request proxy in front of the dictionary API.
pub struct LookupProxy {
    upstream: UpstreamHandle,
    settings: Arc<LookupSettings>,
}

impl LookupProxy {
    pub fn new(upstream: UpstreamHandle, settings: Arc<LookupSettings>) -> Self {
        Self { upstream, settings }
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    /// Classify `raw_term` and, unless it looks like a URL, fetch it from the dictionary API.
    ///
    /// Issues at most one outbound request and never retries. Every failure collapses into
    /// [`LookupOutcome::Failure`] with [`FAILURE_MESSAGE`]; the cause is only logged.
    pub async fn evaluate(&self, raw_term: &str) -> LookupOutcome {
        if is_url_like(raw_term) {
            log::debug!("term {:?} looks like a URL, redirecting", raw_term);
            return LookupOutcome::Redirect {
                target: self.settings.redirect_target.clone(),
            };
        }

        match self.fetch(raw_term).await {
            Ok(payload) => LookupOutcome::Success { payload },
            Err(err) => {
                log::warn!("lookup for {:?} failed: {}", raw_term, err);
                LookupOutcome::failure()
            }
        }
    }

    async fn fetch(&self, term: &str) -> Result<Value, LookupError> {
        let url = self.settings.upstream_url(term)?;
        log::debug!("fetching {}", url);

        let response = self
            .upstream
            .send(UpstreamRequest::get(url))
            .await
            .map_err(LookupError::UpstreamUnreachable)?;
        log::debug!("dictionary API answered {}", response.status());

        // Status is not inspected; a 404 "No Definitions Found" object is still a payload.
        Ok(response.body().to_json()?)
    }
}
