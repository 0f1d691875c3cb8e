use axum::body::Body as AxumBody;
use axum::http::Response;
use dictionary_core::http::Response as CoreResponse;

/// Convert a core response into one consumable by Axum/Hyper.
pub fn into_axum_response(response: CoreResponse) -> Response<AxumBody> {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, AxumBody::from(body.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictionary_core::body::Body;
    use dictionary_core::http::{response_builder, StatusCode};

    #[tokio::test]
    async fn keeps_status_headers_and_body() {
        let response = response_builder()
            .status(StatusCode::FOUND)
            .header("location", "https://example.com/")
            .body(Body::from("moved"))
            .expect("response");

        let axum_response = into_axum_response(response);
        assert_eq!(axum_response.status(), StatusCode::FOUND);
        assert_eq!(
            axum_response.headers().get("location").unwrap(),
            "https://example.com/"
        );

        let body = axum::body::to_bytes(axum_response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"moved");
    }
}
