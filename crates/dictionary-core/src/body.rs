use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Buffered HTTP payload. Every body this service handles (the page, dictionary JSON, error
/// envelopes) is small enough to hold in memory, so there is no streaming variant.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn text<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn json<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map(Self::from_bytes)
    }

    pub fn to_json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").field("len", &self.bytes.len()).finish()
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::from_bytes(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::from_bytes(value)
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Body::from_bytes(Bytes::copy_from_slice(value))
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::text(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn default_body_is_empty() {
        let body = Body::default();
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
    }

    #[test]
    fn json_round_trip_keeps_key_order() {
        let raw = r#"{"title":"No Definitions Found","message":"m","resolution":"r"}"#;
        let body = Body::from(raw);
        let value: Value = body.to_json().expect("json");
        let encoded = Body::json(&value).expect("encode");
        assert_eq!(encoded.as_bytes(), raw.as_bytes());
    }

    #[test]
    fn to_json_rejects_non_json() {
        let body = Body::from("<html>rate limited</html>");
        assert!(body.to_json::<Value>().is_err());
    }

    #[test]
    fn json_encodes_values() {
        let body = Body::json(&json!({"error": "x"})).expect("json");
        assert_eq!(body.as_bytes(), br#"{"error":"x"}"#);
    }

    #[test]
    fn debug_reports_length_only() {
        let debug = format!("{:?}", Body::from("payload"));
        assert_eq!(debug, "Body { len: 7 }");
    }

    #[test]
    fn from_vec_u8_builds_body() {
        let body = Body::from(vec![1u8, 2u8, 3u8]);
        assert_eq!(body.as_bytes(), &[1u8, 2u8, 3u8]);
        assert_eq!(body.into_bytes(), Bytes::from_static(&[1, 2, 3]));
    }
}
