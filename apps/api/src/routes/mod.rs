pub mod health;

use std::path::Path;

use axum::{
    extract::OriginalUri,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::assistant::handlers as assistant;
use crate::errors::AppError;
use crate::marketplace::handlers as marketplace;
use crate::matching::handlers as matching;
use crate::rag::handlers as rag;
use crate::state::AppState;

async fn api_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

fn api_router() -> Router<AppState> {
    Router::new()
        // RAG
        .route("/rag/ping", get(rag::handle_ping))
        .route("/rag/ask", post(rag::handle_ask))
        .route("/rag/sync", post(rag::handle_sync))
        // Assistant
        .route("/assistant/polish-job", post(assistant::handle_polish_job))
        .route(
            "/assistant/analyze-skills",
            post(assistant::handle_analyze_skills),
        )
        .route("/assistant/advise", post(assistant::handle_advise))
        // Profiles
        .route(
            "/profiles",
            get(marketplace::handle_list_profiles).post(marketplace::handle_create_profile),
        )
        .route(
            "/profiles/:id",
            get(marketplace::handle_get_profile)
                .patch(marketplace::handle_update_profile)
                .delete(marketplace::handle_delete_profile),
        )
        // Freelancers
        .route(
            "/freelancers",
            get(marketplace::handle_list_freelancers).post(marketplace::handle_create_freelancer),
        )
        .route(
            "/freelancers/:id",
            get(marketplace::handle_get_freelancer)
                .patch(marketplace::handle_update_freelancer)
                .delete(marketplace::handle_delete_freelancer),
        )
        .route(
            "/freelancers/:id/skills",
            get(marketplace::handle_list_freelancer_skills)
                .post(marketplace::handle_attach_freelancer_skill),
        )
        .route(
            "/freelancers/:id/skills/:skill_id",
            axum::routing::delete(marketplace::handle_detach_freelancer_skill),
        )
        // Skills
        .route(
            "/skills",
            get(marketplace::handle_list_skills).post(marketplace::handle_create_skill),
        )
        .route(
            "/skills/:id",
            get(marketplace::handle_get_skill)
                .patch(marketplace::handle_update_skill)
                .delete(marketplace::handle_delete_skill),
        )
        // Job posts
        .route(
            "/jobs",
            get(marketplace::handle_list_jobs).post(marketplace::handle_create_job),
        )
        .route(
            "/jobs/:id",
            get(marketplace::handle_get_job)
                .patch(marketplace::handle_update_job)
                .delete(marketplace::handle_delete_job),
        )
        .route(
            "/jobs/:id/skills",
            get(marketplace::handle_list_job_skills).post(marketplace::handle_attach_job_skill),
        )
        .route(
            "/jobs/:id/skills/:skill_id",
            axum::routing::delete(marketplace::handle_detach_job_skill),
        )
        .route(
            "/jobs/:id/applications",
            get(marketplace::handle_list_job_applications),
        )
        .route("/jobs/:id/matches", get(matching::handle_job_matches))
        .route(
            "/jobs/:id/matches/:freelancer_id",
            get(matching::handle_score_pair),
        )
        // Applications
        .route(
            "/applications",
            get(marketplace::handle_list_applications).post(marketplace::handle_create_application),
        )
        .route(
            "/applications/:id",
            get(marketplace::handle_get_application)
                .patch(marketplace::handle_update_application)
                .delete(marketplace::handle_delete_application),
        )
        // Messages
        .route(
            "/messages",
            get(marketplace::handle_list_messages).post(marketplace::handle_create_message),
        )
        .route(
            "/messages/:id",
            get(marketplace::handle_get_message)
                .patch(marketplace::handle_update_message)
                .delete(marketplace::handle_delete_message),
        )
        // Portfolio projects
        .route(
            "/projects",
            get(marketplace::handle_list_projects).post(marketplace::handle_create_project),
        )
        .route(
            "/projects/:id",
            get(marketplace::handle_get_project).delete(marketplace::handle_delete_project),
        )
        // Match records
        .route("/matches", get(matching::handle_list_matches))
        .route(
            "/matches/:id",
            get(matching::handle_get_match)
                .patch(matching::handle_update_match)
                .delete(matching::handle_delete_match),
        )
        .fallback(api_not_found)
}

/// Everything outside /api and /health is the single-page frontend; unknown paths get index.html.
fn spa_service(static_dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(static_dir).join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}

pub fn build_router(state: AppState) -> Router {
    let spa = spa_service(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api_router())
        .fallback_service(spa)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::matching::scoring::WeightedMatchScorer;
    use crate::rag::embedder::{Embedder, EmbeddingError};

    struct ZeroEmbedder;

    #[async_trait]
    impl Embedder for ZeroEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![0.0; 384])
        }

        fn dimensions(&self) -> usize {
            384
        }
    }

    fn test_app() -> Router {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState {
            db,
            llm: LlmClient::new(config.google_ai_api_key.clone()).unwrap(),
            embedder: Arc::new(ZeroEmbedder),
            match_scorer: Arc::new(WeightedMatchScorer::default()),
            config,
        })
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(test_app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "marketplace-api");
    }

    #[tokio::test]
    async fn test_rag_ping() {
        let (status, body) = send(test_app(), Method::GET, "/api/rag/ping", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "pong"}));
    }

    #[tokio::test]
    async fn test_ask_without_prompt_is_rejected() {
        for payload in [json!({}), json!({"prompt": ""}), json!({"prompt": "   "})] {
            let (status, body) =
                send(test_app(), Method::POST, "/api/rag/ask", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["message"], "Missing prompt");
        }
    }

    #[tokio::test]
    async fn test_polish_job_reports_invalid_fields() {
        let draft = json!({
            "title": "Android app",
            "description": "I don't know",
            "skills": "Kotlin, Firebase",
            "budget": "$900",
            "deadline": "soonish"
        });
        let (status, body) =
            send(test_app(), Method::POST, "/api/assistant/polish-job", Some(draft)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Invalid job fields: description, deadline"
        );
    }

    #[tokio::test]
    async fn test_analyze_skills() {
        let (status, body) = send(
            test_app(),
            Method::POST,
            "/api/assistant/analyze-skills",
            Some(json!({"text": "Kotlin app with graph algorithms and Firebase"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["Kotlin", "Graph Algorithms", "Firebase"]));
        assert_eq!(body["experience_level"], "expert");
    }

    #[tokio::test]
    async fn test_create_job_validation_runs_before_the_database() {
        let (status, body) = send(
            test_app(),
            Method::POST,
            "/api/jobs",
            Some(json!({"title": "Logo", "budget_min": 500.0, "budget_max": 100.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "budget_min cannot exceed budget_max");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_the_error_shape() {
        let job_id = "6f1c2d1e-8a4b-4c1e-9a55-0d5f7c3b2a10";
        let (status, body) = send(
            test_app(),
            Method::POST,
            "/api/applications",
            Some(json!({"job_id": job_id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("freelancer_id")));
    }

    #[tokio::test]
    async fn test_body_without_json_content_type_uses_the_error_shape() {
        let (status, body) = send(test_app(), Method::POST, "/api/rag/ask", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let (status, body) = send(test_app(), Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "No route for /api/nope");
    }
}
