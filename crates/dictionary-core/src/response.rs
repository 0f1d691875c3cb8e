use serde::Serialize;

use crate::body::Body;
use crate::error::DictionaryError;
use crate::http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION},
    response_builder, HeaderValue, Response, StatusCode,
};

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Convert common return types into `Response`.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for Body {
    fn into_response(self) -> Response {
        response_with_body(StatusCode::OK, self)
    }
}

impl IntoResponse for &str {
    fn into_response(self) -> Response {
        response_with_body(StatusCode::OK, Body::text(self))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        response_with_body(StatusCode::OK, Body::text(self))
    }
}

impl<T> IntoResponse for (StatusCode, T)
where
    T: IntoResponse,
{
    fn into_response(self) -> Response {
        let (status, inner) = self;
        let mut response = inner.into_response();
        *response.status_mut() = status;
        response
    }
}

/// HTML document response.
pub struct Html<T>(T);

impl<T> Html<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> IntoResponse for Html<T>
where
    T: Into<Body>,
{
    fn into_response(self) -> Response {
        with_content_type(
            response_with_body(StatusCode::OK, self.0.into()),
            HTML_CONTENT_TYPE,
        )
    }
}

/// JSON response serialised from any `Serialize` value.
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match Body::json(&self.0) {
            Ok(body) => with_content_type(
                response_with_body(StatusCode::OK, body),
                JSON_CONTENT_TYPE,
            ),
            Err(err) => DictionaryError::internal(err).into_response(),
        }
    }
}

/// `302 Found` pointing at `location`, with an empty body.
pub fn redirect(location: &str) -> Response {
    let mut response = response_with_body(StatusCode::FOUND, Body::empty());
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(LOCATION, value);
            response
        }
        Err(err) => DictionaryError::internal(err).into_response(),
    }
}

pub fn response_with_body(status: StatusCode, body: Body) -> Response {
    let mut builder = response_builder().status(status);

    if !body.is_empty() {
        builder = builder
            .header(CONTENT_LENGTH, body.len().to_string())
            .header(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));
    }

    builder
        .body(body)
        .expect("static response builder should not fail")
}

fn with_content_type(mut response: Response, content_type: &'static str) -> Response {
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn response_with_body_sets_length_and_type() {
        let response = response_with_body(StatusCode::OK, Body::from("hello"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "content-length"), Some("5"));
        assert_eq!(header(&response, "content-type"), Some(TEXT_CONTENT_TYPE));
    }

    #[test]
    fn empty_body_does_not_set_length() {
        let response = response_with_body(StatusCode::OK, Body::empty());
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn html_sets_document_content_type() {
        let response = Html::new("<p>hi</p>").into_response();
        assert_eq!(header(&response, "content-type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(response.body().as_bytes(), b"<p>hi</p>");
    }

    #[test]
    fn json_serialises_payload() {
        let response = Json(json!([{"word": "test"}])).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(response.body().as_bytes(), br#"[{"word":"test"}]"#);
    }

    #[test]
    fn redirect_sets_location_and_found() {
        let response = redirect("https://example.com/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(header(&response, "location"), Some("https://example.com/"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn status_code_tuple_overrides_status() {
        let response = (StatusCode::CREATED, "created").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().as_bytes(), b"created");
    }
}
