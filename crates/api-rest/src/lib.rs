//! # API REST
//!
//! REST API implementation for Hysio.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, extractor rejections, CORS)
//!
//! Uses `api-shared` for wire types and the error envelope.

#![warn(rust_2018_idioms)]

pub mod error;
mod handlers;

use api_shared::{
    AnswersReq, CodeLookupRes, ErrorEnvelope, ErrorKind, ErrorResponse, HealthRes, HhsbRes,
    ListSubmissionsRes, RedFlagsRes, SaveDraftReq, SearchCodesRes, SubmissionRes,
    SubmitQuestionnaireReq, ValidateCodeReq, ValidateCodeRes,
};
use axum::routing::{get, post};
use axum::Router;
use hysio_core::validation::{LocationDetails, PathologyDetails};
use hysio_core::{
    CodeDetails, CoreConfig, DiagnosisCodeEntry, HhsbDocument, HhsbEntry, HhsbSection,
    QuestionnaireSubmission, RedFlag, RedFlagSummary, Severity, SubmissionService,
    SubmissionStatus, ValidationResult,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state for the REST API server
///
/// Shared by every request handler. The submission service owns its
/// repository, so cloning the state shares the same store.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub submissions: SubmissionService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, submissions: SubmissionService) -> Self {
        Self { cfg, submissions }
    }

    /// State backed by a fresh in-memory submission store.
    pub fn in_memory(cfg: Arc<CoreConfig>) -> Self {
        let submissions = SubmissionService::in_memory(cfg.clone());
        Self::new(cfg, submissions)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::validate_code_body,
        handlers::lookup_code,
        handlers::search_codes,
        handlers::red_flags,
        handlers::hhsb,
        handlers::save_draft,
        handlers::submit_questionnaire,
        handlers::list_submissions,
        handlers::get_submission,
        handlers::review_submission,
        handlers::import_submission,
    ),
    components(schemas(
        HealthRes,
        ErrorResponse,
        ErrorEnvelope,
        ErrorKind,
        ValidateCodeReq,
        ValidateCodeRes,
        ValidationResult,
        CodeLookupRes,
        CodeDetails,
        LocationDetails,
        PathologyDetails,
        SearchCodesRes,
        DiagnosisCodeEntry,
        AnswersReq,
        RedFlagsRes,
        RedFlag,
        RedFlagSummary,
        Severity,
        HhsbRes,
        HhsbDocument,
        HhsbSection,
        HhsbEntry,
        SaveDraftReq,
        SubmitQuestionnaireReq,
        SubmissionRes,
        ListSubmissionsRes,
        QuestionnaireSubmission,
        SubmissionStatus,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/validate-code", post(handlers::validate_code_body))
        .route("/validate-code/:code", get(handlers::lookup_code))
        .route("/codes", get(handlers::search_codes))
        .route("/red-flags", post(handlers::red_flags))
        .route("/hhsb", post(handlers::hhsb))
        .route("/save-draft", post(handlers::save_draft))
        .route("/submit-questionnaire", post(handlers::submit_questionnaire))
        .route("/submissions", get(handlers::list_submissions))
        .route("/submissions/:id", get(handlers::get_submission))
        .route("/submissions/:id/review", post(handlers::review_submission))
        .route("/submissions/:id/import", post(handlers::import_submission))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::in_memory(Arc::new(CoreConfig::new(2, 3, 2).unwrap()))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let response = router(state.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn complete_answers() -> Value {
        json!({
            "help_request": "Weer pijnvrij kunnen wandelen",
            "goals": "Binnen 6 weken 5 km wandelen",
            "complaint_location": "Rechterknie",
            "complaint_onset": "Geleidelijk, sinds 3 maanden",
            "pain_intensity": 6,
            "daily_limitations": "Traplopen en lang staan"
        })
    }

    fn assert_envelope(body: &Value, kind: &str) {
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["kind"], kind);
        assert!(body["error"]["message"].is_string());
        assert!(!body["error"]["suggestions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&test_state(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn validate_single_code() {
        let state = test_state();
        let (status, body) = send(&state, post_json("/validate-code", json!({"code": "7920"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["validation"]["isValid"], true);
        assert_eq!(body["validation"]["category"], "Onderste extremiteit");

        let (status, body) = send(&state, post_json("/validate-code", json!({"code": "0000"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validation"]["isValid"], false);
    }

    #[tokio::test]
    async fn validate_batch_prefers_codes() {
        let (status, body) = send(
            &test_state(),
            post_json("/validate-code", json!({"code": "1234", "codes": ["7920", "0000"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validCount"], 1);
        assert_eq!(body["validations"][0]["code"], "7920");
        assert!(body.get("validation").is_none());
    }

    #[tokio::test]
    async fn validate_rejects_bad_requests() {
        let state = test_state();
        for body in [json!({}), json!({"codes": []}), json!({"codes": ["7920", "7920", "7920"]})] {
            let (status, body) = send(&state, post_json("/validate-code", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_envelope(&body, "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn malformed_json_gets_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/red-flags")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&test_state(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");
        assert_eq!(body["error"]["recoverable"], true);
    }

    #[tokio::test]
    async fn lookup_code_statuses() {
        let state = test_state();

        let (status, body) = send(&state, get_req("/validate-code/7920")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validation"]["isValid"], true);
        assert_eq!(body["details"]["location"]["code"], "79");

        let (status, body) = send(&state, get_req("/validate-code/12a4")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");

        let (status, body) = send(&state, get_req("/validate-code/0000")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "NOT_FOUND");

        // Retired codes are known, just not accepted.
        let (status, body) = send(&state, get_req("/validate-code/7650")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validation"]["isValid"], false);
        assert_eq!(body["validation"]["suggestions"][0], "7626");
    }

    #[tokio::test]
    async fn search_codes_limits() {
        let state = test_state();
        let (status, body) = send(&state, get_req("/codes?q=knie&limit=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["codes"].as_array().unwrap().len(), 1);

        let (status, body) = send(&state, get_req("/codes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["codes"].as_array().unwrap().len(), 2);

        let (status, body) = send(&state, get_req("/codes?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn red_flags_detected() {
        let (status, body) = send(
            &test_state(),
            post_json(
                "/red-flags",
                json!({"answers": {"night_pain": true, "medical_history": "Borstkanker in 2019"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redFlags"][0]["id"], "night_pain");
        assert_eq!(body["redFlags"][1]["id"], "malignancy_history");
        assert_eq!(body["summary"]["highestSeverity"], "high");
        assert_eq!(body["summary"]["requiresImmediateAttention"], true);
    }

    #[tokio::test]
    async fn hhsb_lists_missing_fields() {
        let state = test_state();
        let (status, body) = send(&state, post_json("/hhsb", json!({"answers": {"goals": "Lopen"}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");
        let fields = body["error"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 5);
        assert!(fields.contains(&json!("help_request")));
        assert!(!fields.contains(&json!("goals")));

        let (status, body) = send(&state, post_json("/hhsb", json!({"answers": complete_answers()}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hhsb"]["hulpvraag"]["title"], "Hulpvraag");
        assert_eq!(body["hhsb"]["redFlags"]["total"], 0);
    }

    #[tokio::test]
    async fn submission_lifecycle() {
        let state = test_state();

        let (status, body) = send(
            &state,
            post_json("/save-draft", json!({"sessionId": "sess-1", "answers": {"goals": "Lopen"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["status"], "draft");

        let (status, body) = send(
            &state,
            post_json(
                "/submit-questionnaire",
                json!({"sessionId": "sess-1", "answers": complete_answers()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["status"], "submitted");
        let id = body["submission"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            post_json("/save-draft", json!({"sessionId": "sess-1", "answers": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_envelope(&body, "CONFLICT");

        let (status, body) = send(&state, get_req(&format!("/submissions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["sessionId"], "sess-1");

        let import = format!("/submissions/{id}/import");
        let (status, _) = send(&state, post_json(&import, json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&state, post_json(&format!("/submissions/{id}/review"), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["status"], "reviewed");

        let (status, body) = send(&state, post_json(&import, json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["status"], "imported");
    }

    #[tokio::test]
    async fn failed_submit_stays_draft() {
        let state = test_state();
        let (status, body) = send(
            &state,
            post_json("/submit-questionnaire", json!({"answers": {"goals": "Lopen"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");

        let (status, body) = send(&state, get_req("/submissions?status=draft")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn list_submissions_pages_and_filters() {
        let state = test_state();
        for _ in 0..3 {
            let (status, _) = send(
                &state,
                post_json("/submit-questionnaire", json!({"answers": complete_answers()})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&state, get_req("/submissions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["hasMore"], true);

        let (_, body) = send(&state, get_req("/submissions?offset=2")).await;
        assert_eq!(body["submissions"].as_array().unwrap().len(), 1);
        assert_eq!(body["hasMore"], false);

        let (_, body) = send(&state, get_req("/submissions?hasRedFlags=true")).await;
        assert_eq!(body["total"], 0);

        for uri in ["/submissions?limit=0", "/submissions?hasRedFlags=maybe", "/submissions?status=lost"] {
            let (status, body) = send(&state, get_req(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_envelope(&body, "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn submission_id_errors() {
        let state = test_state();
        let (status, body) = send(&state, get_req("/submissions/not-an-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");

        let (status, body) = send(&state, get_req("/submissions/0123456789abcdef0123456789abcdef")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_route_gets_envelope() {
        let (status, body) = send(&test_state(), get_req("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "NOT_FOUND");
    }

    #[tokio::test]
    async fn wrong_method_gets_envelope() {
        let state = test_state();
        let delete = Request::builder()
            .method("DELETE")
            .uri("/submissions")
            .body(Body::empty())
            .unwrap();
        for req in [delete, get_req("/validate-code")] {
            let (status, body) = send(&state, req).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_envelope(&body, "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn undecodable_path_gets_envelope() {
        let (status, body) = send(&test_state(), get_req("/validate-code/%FF%FE")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().starts_with("Invalid path"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(&test_state(), get_req("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/submissions/{id}/review"].is_object());
    }
}
