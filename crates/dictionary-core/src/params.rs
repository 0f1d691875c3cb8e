use std::collections::HashMap;
use std::str::Utf8Error;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Why a path parameter could not be percent-decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
    #[error("decoded bytes are not UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Path parameters captured by the router, exactly as they appeared in the request URI.
#[derive(Clone, Debug, Default)]
pub struct PathParams {
    inner: HashMap<String, String>,
}

impl PathParams {
    pub fn new(inner: HashMap<String, String>) -> Self {
        Self { inner }
    }

    /// Raw (still percent-encoded) value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(|s| s.as_str())
    }

    /// Value percent-decoded once. Every `%` must start a two-hex-digit escape and the decoded
    /// bytes must be UTF-8.
    pub fn decoded(&self, key: &str) -> Result<Option<String>, DecodeError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        if let Some(offset) = malformed_escape(raw) {
            return Err(DecodeError::MalformedEscape(offset));
        }
        let value = percent_decode_str(raw).decode_utf8()?;
        Ok(Some(value.into_owned()))
    }
}

fn malformed_escape(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .map(|(offset, _)| offset)
        .find(|&offset| {
            !matches!(
                bytes.get(offset + 1..offset + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        })
}
