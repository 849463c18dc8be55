//! The studio web UI and its JSON API.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio::sync::RwLock;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::constants::SESSION_INACTIVITY_SECONDS;
use crate::genai::StyleBackend;
use crate::i18n::Localization;
use crate::orchestrator::Orchestrator;

mod actions;
mod api;
mod csrf;
mod media;
mod prelude;
mod views;

pub(crate) struct AppState<B> {
    catalog: Arc<Catalog>,
    orchestrator: Orchestrator<B>,
    localization: Arc<RwLock<Localization>>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            orchestrator: self.orchestrator.clone(),
            localization: self.localization.clone(),
        }
    }
}

impl<B: StyleBackend> AppState<B> {
    fn new(catalog: Catalog, backend: B, localization: Localization) -> Self {
        Self {
            catalog: Arc::new(catalog),
            orchestrator: Orchestrator::new(backend),
            localization: Arc::new(RwLock::new(localization)),
        }
    }
}

fn create_router<B: StyleBackend>(max_upload_bytes: usize) -> Router<AppState<B>> {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            SESSION_INACTIVITY_SECONDS,
        )));

    Router::new()
        .route("/", get(views::root_handler::<B>))
        .route("/static/styles.css", get(styles_handler))
        .route("/upload", post(actions::upload_handler::<B>))
        .route("/select", post(actions::select_handler::<B>))
        .route("/apply", post(actions::apply_handler::<B>))
        .route("/reset", post(actions::reset_handler::<B>))
        .route("/language", post(actions::language_handler::<B>))
        .route("/original", get(media::original_handler::<B>))
        .route("/download", get(media::download_handler::<B>))
        .route("/api/filters", get(api::filters_handler::<B>))
        .route("/api/studio", get(api::studio_handler::<B>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(sessions)
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves the studio until ctrl-c.
pub async fn setup_server<B: StyleBackend>(
    config: &AppConfig,
    catalog: Catalog,
    backend: B,
) -> Result<(), anyhow::Error> {
    let localization = Localization::new(&config.language)?;
    info!(
        "Serving {} filters, UI language {}",
        catalog.len(),
        localization.language()
    );
    let app = create_router::<B>(config.max_upload_bytes).with_state(AppState::new(
        catalog,
        backend,
        localization,
    ));

    let addr = format!("{}:{}", config.listen_address, config.port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::body::{Body, Bytes};
    use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, RESPONSE_BLOCKED_KEY};
    use crate::genai::{
        GenAiError, ImageTransformer, InlineImage, PromptSynthesizer, TransformOutput,
    };

    const PNG_UPLOAD: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
    const STUB_OUTPUT: &[u8] = b"stub transformed bytes";

    #[derive(Default)]
    struct StubBackend {
        gate: Option<Arc<Notify>>,
        blocked: bool,
    }

    impl PromptSynthesizer for StubBackend {
        async fn synthesize_prompt(&self, style: &str) -> Result<String, GenAiError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(format!("Detailed: {style}"))
        }
    }

    impl ImageTransformer for StubBackend {
        async fn transform_image(
            &self,
            _image: &[u8],
            _mime_type: &str,
            _prompt: &str,
        ) -> Result<TransformOutput, GenAiError> {
            if self.blocked {
                return Ok(TransformOutput {
                    image: None,
                    text: Some(RESPONSE_BLOCKED_KEY.to_string()),
                });
            }
            Ok(TransformOutput {
                image: Some(InlineImage::from_bytes("image/png", STUB_OUTPUT)),
                text: Some("Here you go".to_string()),
            })
        }
    }

    struct TestClient {
        app: Router,
        cookie: Option<String>,
    }

    impl TestClient {
        fn new(backend: StubBackend) -> Self {
            let catalog = Catalog::build(1000, 7).expect("build catalog");
            let localization = Localization::new("en").expect("load dictionaries");
            let app = create_router::<StubBackend>(DEFAULT_MAX_UPLOAD_BYTES)
                .with_state(AppState::new(catalog, backend, localization));
            Self { app, cookie: None }
        }

        async fn send(
            &mut self,
            method: &str,
            uri: &str,
            content_type: Option<&str>,
            body: Body,
        ) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                builder = builder.header(COOKIE, cookie);
            }
            if let Some(content_type) = content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            let response = self
                .app
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();
            if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
                self.cookie = set_cookie
                    .to_str()
                    .unwrap()
                    .split(';')
                    .next()
                    .map(str::to_string);
            }
            response
        }

        async fn get(&mut self, uri: &str) -> Response {
            self.send("GET", uri, None, Body::empty()).await
        }

        async fn post_form(&mut self, uri: &str, form: String) -> Response {
            self.send(
                "POST",
                uri,
                Some("application/x-www-form-urlencoded"),
                Body::from(form),
            )
            .await
        }

        async fn upload(&mut self, token: &str, image: &[u8]) -> Response {
            let boundary = "photostyle-test-boundary";
            let mut body = Vec::new();
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"csrf_token\"\r\n\r\n{token}\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(image);
            body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
            self.send(
                "POST",
                "/upload",
                Some(&format!("multipart/form-data; boundary={boundary}")),
                Body::from(body),
            )
            .await
        }

        /// Loads the page to start a session and returns its CSRF token.
        async fn csrf(&mut self) -> String {
            let body = read_body(self.get("/").await).await;
            let marker = "name=\"csrf_token\" value=\"";
            let start = body.find(marker).expect("csrf field") + marker.len();
            body[start..].split('"').next().unwrap().to_string()
        }

        async fn wait_for_phase(&mut self, phase: &str) -> serde_json::Value {
            for _ in 0..200 {
                let body = read_body(self.get("/api/studio").await).await;
                let value: serde_json::Value = serde_json::from_str(&body).unwrap();
                if value["phase"] == phase {
                    return value;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("studio never reached {phase}");
        }
    }

    async fn read_bytes(response: Response) -> Bytes {
        response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes()
    }

    async fn read_body(response: Response) -> String {
        String::from_utf8_lossy(&read_bytes(response).await).to_string()
    }

    #[tokio::test]
    async fn page_renders_with_token_and_session_cookie() {
        let mut client = TestClient::new(StubBackend::default());
        let response = client.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(client.cookie.is_some());

        let body = read_body(response).await;
        assert!(body.contains("AI Photo Style Studio"));
        assert!(body.contains("dir=\"ltr\""));
        assert!(body.contains("Neo-Noir"));
        assert!(body.contains("name=\"csrf_token\""));
    }

    #[tokio::test]
    async fn styles_are_served() {
        let mut client = TestClient::new(StubBackend::default());
        let response = client.get("/static/styles.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/css");
    }

    #[tokio::test]
    async fn posts_without_valid_token_are_rejected() {
        let mut client = TestClient::new(StubBackend::default());
        let response = client
            .post_form("/reset", "csrf_token=forged".to_string())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        client.csrf().await;
        let response = client
            .post_form("/apply", "csrf_token=forged".to_string())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn upload_rejects_non_images() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;
        let response = client.upload(&token, b"definitely not an image").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = client.get("/original").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn apply_without_inputs_shows_error_panel() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;
        let response = client
            .post_form("/apply", format!("csrf_token={token}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let body = read_body(client.get("/").await).await;
        assert!(body.contains("Please upload an image and select a filter first."));
    }

    #[tokio::test]
    async fn filter_grid_waits_for_an_upload() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;
        let body = read_body(client.get("/").await).await;
        assert!(body.contains("<button type=\"submit\" disabled>"));

        client.upload(&token, PNG_UPLOAD).await;
        let body = read_body(client.get("/").await).await;
        assert!(body.contains("cinematic-neonoir"));
        assert!(!body.contains("<button type=\"submit\" disabled>"));
    }

    #[tokio::test]
    async fn unknown_filter_is_not_found() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;
        let response = client
            .post_form(
                "/select",
                format!("csrf_token={token}&filter_id=cinematic-nosuchthing"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn full_transformation_flow() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;

        let response = client.upload(&token, PNG_UPLOAD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = client.get("/original").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(read_bytes(response).await.as_ref(), PNG_UPLOAD);

        let response = client
            .post_form(
                "/select",
                format!("csrf_token={token}&filter_id=cinematic-neonoir&category=cinematic&q=noir"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/?category=cinematic&q=noir"
        );

        let response = client
            .post_form("/apply", format!("csrf_token={token}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let snapshot = client.wait_for_phase("Done").await;
        assert_eq!(snapshot["selectedFilterId"], "cinematic-neonoir");
        assert!(
            snapshot["result"]["prompt"]
                .as_str()
                .unwrap()
                .starts_with("Detailed: ")
        );
        assert_eq!(snapshot["error"], serde_json::Value::Null);

        let body = read_body(client.get("/").await).await;
        assert!(body.contains("data:image/png;base64,"));
        assert!(body.contains("Here you go"));
        assert!(body.contains("Download image"));

        let response = client.get("/download").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"transformed-image.png\""
        );
        assert_eq!(read_bytes(response).await.as_ref(), STUB_OUTPUT);

        let response = client
            .post_form("/reset", format!("csrf_token={token}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let snapshot = client.wait_for_phase("Idle").await;
        assert_eq!(snapshot["hasImage"], false);
        assert_eq!(client.get("/download").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blocked_response_lands_in_error_panel() {
        let mut client = TestClient::new(StubBackend {
            blocked: true,
            ..Default::default()
        });
        let token = client.csrf().await;
        client.upload(&token, PNG_UPLOAD).await;
        client
            .post_form(
                "/select",
                format!("csrf_token={token}&filter_id=cinematic-neonoir"),
            )
            .await;
        client
            .post_form("/apply", format!("csrf_token={token}"))
            .await;

        let snapshot = client.wait_for_phase("Done").await;
        assert_eq!(snapshot["result"]["image"], serde_json::Value::Null);
        let message = Localization::new("en").unwrap().t(RESPONSE_BLOCKED_KEY);
        assert_eq!(snapshot["error"], message.as_str());
        assert_eq!(client.get("/download").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_apply_while_pending_conflicts() {
        let gate = Arc::new(Notify::new());
        let mut client = TestClient::new(StubBackend {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let token = client.csrf().await;
        client.upload(&token, PNG_UPLOAD).await;
        client
            .post_form(
                "/select",
                format!("csrf_token={token}&filter_id=cinematic-neonoir"),
            )
            .await;
        let response = client
            .post_form("/apply", format!("csrf_token={token}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let body = read_body(client.get("/").await).await;
        assert!(body.contains("http-equiv=\"refresh\""));
        assert!(body.contains("Transforming..."));

        let response = client
            .post_form("/apply", format!("csrf_token={token}"))
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let response = client.upload(&token, PNG_UPLOAD).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        gate.notify_one();
        client.wait_for_phase("Done").await;
    }

    #[tokio::test]
    async fn language_switch_changes_direction() {
        let mut client = TestClient::new(StubBackend::default());
        let token = client.csrf().await;
        let response = client
            .post_form("/language", format!("csrf_token={token}&language=ar"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let body = read_body(client.get("/").await).await;
        assert!(body.contains("dir=\"rtl\""));
        assert!(body.contains("lang=\"ar\""));

        let response = client
            .post_form("/language", format!("csrf_token={token}&language=xx"))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn filters_api_applies_selector() {
        let mut client = TestClient::new(StubBackend::default());
        let response = client.get("/api/filters?category=vintage&q=SEPIA").await;
        assert_eq!(response.status(), StatusCode::OK);
        let filters: Vec<serde_json::Value> =
            serde_json::from_str(&read_body(response).await).unwrap();
        assert!(!filters.is_empty());
        for filter in &filters {
            assert_eq!(filter["category"], "Vintage");
            assert!(
                filter["name"]
                    .as_str()
                    .unwrap()
                    .to_lowercase()
                    .contains("sepia")
            );
        }

        let response = client.get("/api/filters?category=nope").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
