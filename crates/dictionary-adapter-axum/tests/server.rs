use axum::extract::Path;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dictionary_adapter_axum::{DictionaryServer, DictionaryServerConfig, ReqwestUpstreamClient};
use dictionary_core::app::Hooks;
use dictionary_core::manifest::ManifestLoader;
use dictionary_core::upstream::UpstreamHandle;
use dictionary_core::DictionaryApp;
use reqwest::redirect::Policy;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const SAMPLE_ENTRY: &str = r#"[{"word":"test","phonetic":"/tɛst/","meanings":[{"partOfSpeech":"noun","definitions":[{"definition":"a trial","example":"this is a test"}]}]}]"#;
const NO_DEFINITIONS: &str = r#"{"title":"No Definitions Found","message":"Sorry pal, we couldn't find definitions for the word you were looking for.","resolution":"You can try the search again at later time or head to the web instead."}"#;

async fn fake_entry(Path(word): Path<String>) -> axum::response::Response {
    let json = [(header::CONTENT_TYPE, "application/json")];
    match word.as_str() {
        "test" => (json, SAMPLE_ENTRY).into_response(),
        "broken" => (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>bad gateway</html>",
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, json, NO_DEFINITIONS).into_response(),
    }
}

async fn echo_path(uri: Uri) -> axum::Json<Value> {
    axum::Json(json!({ "path": uri.path() }))
}

/// Dictionary API stand-in; returns its base URL.
async fn start_fake_upstream() -> String {
    let router = Router::new()
        .route("/api/v2/entries/en/{word}", get(fake_entry))
        .route("/echo/{*rest}", get(echo_path));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn start_app(upstream_base: &str) -> String {
    let manifest = format!(
        "[app]\nname = \"Dictionary\"\n\n[lookup]\nupstream_base = \"{}\"\n",
        upstream_base
    );
    let loader = ManifestLoader::load_from_str(&manifest).expect("manifest");
    let app = DictionaryApp::build_app(loader.manifest()).expect("app");
    let upstream = UpstreamHandle::with_client(ReqwestUpstreamClient::try_new().expect("client"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = DictionaryServerConfig {
        addr,
        enable_ctrl_c: false,
    };
    let server = DictionaryServer::with_config(app.into_router(), upstream, config);
    tokio::spawn(async move {
        server.run_with_listener(listener).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

async fn json_body(response: reqwest::Response) -> Value {
    serde_json::from_str(&response.text().await.unwrap()).unwrap()
}

fn allow_origin(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn serves_the_search_page() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    for path in ["/", "/index.html"] {
        let response = client().get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(allow_origin(&response), Some("*"));
        let html = response.text().await.unwrap();
        assert!(html.contains("<title>Dictionary</title>"));
        assert!(html.contains("searchWord()"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn relays_definitions_verbatim() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    let response = client()
        .get(format!("{}/dictionary/test", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(allow_origin(&response), Some("*"));
    assert_eq!(response.text().await.unwrap(), SAMPLE_ENTRY);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upstream_not_found_is_relayed_as_success() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    let response = client()
        .get(format!("{}/dictionary/xyzzyq", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), NO_DEFINITIONS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_json_upstream_body_is_a_failure() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    let response = client()
        .get(format!("{}/dictionary/broken", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(allow_origin(&response), Some("*"));
    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "Dictionary lookup failed" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_upstream_is_a_failure() {
    let base = start_app("http://127.0.0.1:1/api/v2/entries/en/").await;

    let response = client()
        .get(format!("{}/dictionary/xyz", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "Dictionary lookup failed" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn url_like_terms_redirect() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    for term in ["example.com", "httpfoo"] {
        let response = client()
            .get(format!("{}/dictionary/{}", base, term))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("https://browser-aarush-ric.workers.dev/")
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn decoded_term_is_forwarded_without_reencoding() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/echo/", upstream)).await;

    let response = client()
        .get(format!("{}/dictionary/a%2Fb", base))
        .send()
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body, json!({ "path": "/echo/a/b" }));

    let response = client()
        .get(format!("{}/dictionary/hello%20world", base))
        .send()
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body, json!({ "path": "/echo/hello%20world" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_routes_are_json_404s() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/api/v2/entries/en/", upstream)).await;

    let response = client()
        .get(format!("{}/nope", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(allow_origin(&response), Some("*"));
    let body = json_body(response).await;
    assert_eq!(body["error"], "no route matched path: /nope");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_escape_is_a_failure() {
    let upstream = start_fake_upstream().await;
    let base = start_app(&format!("{}/echo/", upstream)).await;

    let response = client()
        .get(format!("{}/dictionary/%zz", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(allow_origin(&response), Some("*"));
    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "Dictionary lookup failed" }));
}
