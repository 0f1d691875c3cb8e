use std::sync::Arc;

use anyhow::anyhow;

use crate::context::RequestContext;
use crate::error::{DictionaryError, LookupError};
use crate::lookup::{LookupOutcome, LookupProxy, LookupSettings};
use crate::response::Html;

pub(crate) async fn index(page: Arc<str>) -> Result<Html<String>, DictionaryError> {
    Ok(Html::new(page.to_string()))
}

/// `GET /dictionary/{term}`: decode the remainder of the path once and hand it to the proxy.
pub(crate) async fn lookup(
    ctx: RequestContext,
    settings: Arc<LookupSettings>,
) -> Result<LookupOutcome, DictionaryError> {
    let upstream = ctx
        .upstream_handle()
        .ok_or_else(|| DictionaryError::internal(anyhow!("no upstream client attached")))?;

    let term = match ctx.path_params().decoded("term") {
        Ok(term) => term.unwrap_or_default(),
        Err(err) => {
            log::warn!("rejecting lookup: {}", LookupError::from(err));
            return Ok(LookupOutcome::failure());
        }
    };

    Ok(LookupProxy::new(upstream, settings).evaluate(&term).await)
}
