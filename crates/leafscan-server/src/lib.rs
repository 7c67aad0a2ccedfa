//! HTTP server for Leafscan.
//!
//! Accepts leaf images over multipart upload, runs them through the
//! [`leafscan_core::Analyzer`], and exposes the ledger and analysis records
//! as JSON.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{ApiKeyAuth, AuthProvider, Credentials, Identity};
pub use config::{MirrorConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::LeafscanServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use leafscan_core::{
        Analyzer, AnalyzerConfig, ClassificationError, Classifier, StaticClassifier,
        ERROR_PREDICTION,
    };
    use leafscan_ledger::{InMemoryLedger, LedgerReader};
    use leafscan_records::RecordStore;
    use leafscan_types::DiseaseClass;

    use super::*;

    const BOUNDARY: &str = "leafscan-test-boundary";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn anthracnose() -> StaticClassifier {
        StaticClassifier::with_scores([
            (DiseaseClass::Anthracnose, 91.2),
            (DiseaseClass::BacterialBlight, 4.8),
            (DiseaseClass::PowderyMildew, 4.0),
        ])
        .unwrap()
    }

    fn state_with(classifier: impl Classifier + 'static) -> AppState {
        let analyzer = Analyzer::new(
            Arc::new(InMemoryLedger::new()),
            Arc::new(RecordStore::new()),
            Arc::new(classifier),
            AnalyzerConfig::default(),
        );
        AppState::new(Arc::new(analyzer), &ServerConfig::default())
    }

    fn multipart(field: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"leaf.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(uri: &str, field: &str, bytes: &[u8], headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(multipart(field, bytes))).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn counts(state: &AppState) -> (usize, usize) {
        (
            state.analyzer.ledger().current_block().unwrap().transaction_count(),
            state.analyzer.records().len().unwrap(),
        )
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = router::build_router(state_with(anthracnose()));
        let (status, body) = send(app, get("/v1/health")).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = router::build_router(state_with(anthracnose()));
        let (status, body) = send(app, get("/v1/info")).await;
        assert_eq!(status, 200);
        assert_eq!(body["classifier"], "static");
        assert_eq!(body["classes"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn predict_records_the_analysis() {
        let state = state_with(anthracnose());
        let app = router::build_router(state.clone());
        let (status, body) = send(
            app,
            upload("/v1/predict", "file", JPEG, &[("X-User-ID", "userA")]),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["prediction"], "Anthracnose");
        assert_eq!(body["blockchain_index"], 1);
        assert_eq!(body["image_hash"].as_str().unwrap().len(), 64);
        assert_eq!(body["all_predictions"].as_array().unwrap().len(), 3);
        assert_eq!(body["all_predictions"][0], serde_json::json!(["Anthracnose", 91.2]));
        assert!(body.get("error").is_none());
        assert_eq!(counts(&state), (1, 1));

        let record = &state.analyzer.records().list_records().unwrap()[0];
        assert_eq!(record.requester_id.as_str(), "userA");
    }

    #[tokio::test]
    async fn predict_without_user_header_is_anonymous() {
        let state = state_with(anthracnose());
        send(router::build_router(state.clone()), upload("/v1/predict", "file", JPEG, &[])).await;
        let record = &state.analyzer.records().list_records().unwrap()[0];
        assert_eq!(record.requester_id.as_str(), "anonymous");
    }

    #[tokio::test]
    async fn missing_or_empty_file_is_bad_request() {
        let state = state_with(anthracnose());

        let (status, body) = send(
            router::build_router(state.clone()),
            upload("/v1/predict", "image", JPEG, &[]),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "No file part");

        let (status, body) = send(
            router::build_router(state.clone()),
            upload("/v1/predict", "file", b"", &[]),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "No selected file");
        assert_eq!(counts(&state), (0, 0));
    }

    #[tokio::test]
    async fn oversized_upload_is_payload_too_large() {
        let analyzer = Analyzer::new(
            Arc::new(InMemoryLedger::new()),
            Arc::new(RecordStore::new()),
            Arc::new(anthracnose()),
            AnalyzerConfig::default(),
        );
        let config = ServerConfig {
            max_upload_bytes: 256,
            ..ServerConfig::default()
        };
        let state = AppState::new(Arc::new(analyzer), &config);

        let mut image = JPEG.to_vec();
        image.resize(4096, 0xAB);
        let (status, body) = send(
            router::build_router(state.clone()),
            upload("/v1/predict", "file", &image, &[]),
        )
        .await;
        assert_eq!(status, 413);
        assert!(body["error"].is_string());
        assert_eq!(counts(&state), (0, 0));
    }

    #[tokio::test]
    async fn classifier_failure_is_reported_in_body() {
        let state = state_with(StaticClassifier::failing(ClassificationError::UnreadableImage(
            "cannot identify image file".into(),
        )));
        let (status, body) = send(
            router::build_router(state.clone()),
            upload("/v1/predict", "file", b"corrupt", &[]),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["prediction"], ERROR_PREDICTION);
        assert_eq!(body["confidence"], 0.0);
        assert!(body["error"].as_str().unwrap().contains("cannot identify image file"));
        assert_eq!(counts(&state), (0, 0));
    }

    #[tokio::test]
    async fn api_predict_rejects_bad_key_before_analysis() {
        let state = state_with(anthracnose());
        for headers in [&[("X-API-Key", "wrong")][..], &[][..]] {
            let (status, body) = send(
                router::build_router(state.clone()),
                upload("/v1/api/predict", "file", JPEG, headers),
            )
            .await;
            assert_eq!(status, 403);
            assert_eq!(body["error"], "Invalid API key");
        }
        assert_eq!(counts(&state), (0, 0));
    }

    #[tokio::test]
    async fn api_predict_with_key_uses_api_requester() {
        let state = state_with(anthracnose());
        let (status, body) = send(
            router::build_router(state.clone()),
            upload("/v1/api/predict", "file", JPEG, &[("X-API-Key", "demo_api_key")]),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["prediction"], "Anthracnose");
        let record = &state.analyzer.records().list_records().unwrap()[0];
        assert_eq!(record.requester_id.as_str(), "api_user");
    }

    #[tokio::test]
    async fn ledger_block_lookup() {
        let state = state_with(anthracnose());
        let (status, body) = send(router::build_router(state.clone()), get("/v1/ledger/blocks/1")).await;
        assert_eq!(status, 200);
        assert_eq!(body["index"], 1);
        assert_eq!(body["previous_hash"], "0");

        let (status, _) = send(router::build_router(state), get("/v1/ledger/blocks/9")).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn seal_requires_key() {
        let state = state_with(anthracnose());
        let denied = Request::builder()
            .method("POST")
            .uri("/v1/ledger/seal")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(router::build_router(state.clone()), denied).await;
        assert_eq!(status, 403);
        assert_eq!(state.analyzer.ledger().block_count().unwrap(), 1);

        let allowed = Request::builder()
            .method("POST")
            .uri("/v1/ledger/seal")
            .header("X-API-Key", "demo_api_key")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router::build_router(state.clone()), allowed).await;
        assert_eq!(status, 200);
        assert_eq!(body["index"], 2);
        assert_eq!(state.analyzer.ledger().block_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn dashboard_and_listings() {
        let state = state_with(anthracnose());
        send(router::build_router(state.clone()), upload("/v1/predict", "file", JPEG, &[])).await;

        let (status, body) = send(router::build_router(state.clone()), get("/v1/dashboard")).await;
        assert_eq!(status, 200);
        assert_eq!(body["overview"]["total_analyses"], 1);
        assert_eq!(body["overview"]["blockchain_blocks"], 1);
        assert_eq!(body["overview"]["cloud_enabled"], false);
        assert_eq!(body["stats"]["distribution"]["Anthracnose"], 1);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
        assert_eq!(body["chain"][0]["transactions"].as_array().unwrap().len(), 1);

        let (_, records) = send(router::build_router(state.clone()), get("/v1/records")).await;
        assert_eq!(records[0]["prediction_label"], "Anthracnose");

        let (_, chain) = send(router::build_router(state), get("/v1/ledger")).await;
        assert_eq!(chain.as_array().unwrap().len(), 1);
    }
}
