pub mod handlers;
pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // User profile
        .route("/user", get(handlers::get_user_info))
        .route("/user/basic-info", post(handlers::collect_basic_info))
        .route("/user/work-experience", post(handlers::add_work_experience))
        .route("/user/education", post(handlers::add_education))
        .route("/user/skills", post(handlers::add_skills))
        .route("/user/projects", post(handlers::add_projects))
        .route("/user/certifications", post(handlers::add_certifications))
        .route(
            "/user/profile-completeness",
            get(handlers::profile_completeness),
        )
        // Jobs
        .route("/jobs/search", post(handlers::search_jobs))
        .route("/jobs/saved", get(handlers::get_saved_jobs))
        .route("/jobs/save", post(handlers::save_job))
        .route("/jobs/:job_id", delete(handlers::remove_saved_job))
        .route("/jobs/analyze-match", post(handlers::analyze_job_match))
        // Resumes
        .route("/resume/generate", post(handlers::generate_resume))
        .route("/resume/optimize", post(handlers::optimize_resume))
        .route("/resume/format", post(handlers::format_resume))
        .route("/resume/:job_id", get(handlers::get_saved_resume))
        // Cover letters
        .route("/cover-letter/generate", post(handlers::generate_cover_letter))
        .route("/cover-letter/optimize", post(handlers::optimize_cover_letter))
        .route("/cover-letter/format", post(handlers::format_cover_letter))
        .route("/cover-letter/:job_id", get(handlers::get_saved_cover_letter))
        // Interview preparation
        .route(
            "/interview/common-questions",
            post(handlers::common_questions),
        )
        .route(
            "/interview/technical-questions",
            post(handlers::technical_questions),
        )
        .route(
            "/interview/company-research",
            post(handlers::company_research),
        )
        .route("/interview/tips", post(handlers::interview_tips))
        .route(
            "/interview/evaluate-answer",
            post(handlers::evaluate_answer),
        )
        .route("/interview/:job_id", get(handlers::get_saved_interview_prep))
        // Networking
        .route(
            "/networking/connection-message",
            post(handlers::connection_message),
        )
        .route(
            "/networking/coffee-chat-topics",
            post(handlers::coffee_chat_topics),
        )
        .route(
            "/networking/follow-up-message",
            post(handlers::follow_up_message),
        )
        .route(
            "/networking/analyze-profile",
            post(handlers::analyze_contact_profile),
        )
        .route(
            "/networking/:contact_id",
            get(handlers::get_saved_networking_info),
        )
        // Orchestration
        .route(
            "/application-package/:job_id",
            get(handlers::application_package),
        )
        .route("/agents/:agent/:action", post(handlers::run_agent_action))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_MODEL};
    use crate::llm_client::testing::ScriptedLlm;
    use crate::orchestrator::Orchestrator;
    use crate::store::JsonStore;

    fn app(responses: &[&str]) -> (Router, Arc<ScriptedLlm>, TempDir) {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(ScriptedLlm::new(responses.iter().copied()));
        let state = AppState {
            orchestrator: Arc::new(Orchestrator::new(llm.clone(), JsonStore::new(dir.path()))),
            config: Config {
                openai_api_key: "test".to_string(),
                llm_base_url: "http://localhost".to_string(),
                model: DEFAULT_MODEL.to_string(),
                data_dir: PathBuf::from(dir.path()),
                port: 0,
                rust_log: "debug".to_string(),
            },
        };
        (build_router(state), llm, dir)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _llm, _dir) = app(&[]);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "jobmaster-api");
    }

    #[tokio::test]
    async fn test_save_list_and_delete_jobs() {
        let (app, _llm, _dir) = app(&[]);

        let job = json!({"id": "job1", "title": "SRE"});
        send(&app, Method::POST, "/jobs/save", Some(job.clone())).await;
        let (status, body) = send(&app, Method::POST, "/jobs/save", Some(job)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved_jobs"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::DELETE, "/jobs/job1", None).await;
        assert_eq!(body, json!({"saved_jobs": []}));

        let (_, body) = send(&app, Method::GET, "/jobs/saved", None).await;
        assert_eq!(body, json!({"saved_jobs": []}));
    }

    #[tokio::test]
    async fn test_profile_routes() {
        let (app, _llm, _dir) = app(&[]);

        send(&app, Method::POST, "/user/skills", Some(json!({"skills": ["Python"]}))).await;
        let (_, body) = send(
            &app,
            Method::POST,
            "/user/skills",
            Some(json!({"skills": ["Python", "Go"]})),
        )
        .await;
        assert_eq!(body, json!({"skills": ["Python", "Go"]}));

        let (status, report) = send(&app, Method::GET, "/user/profile-completeness", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!((report["completeness_percentage"].as_f64().unwrap() - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(report["has_skills"], true);
    }

    #[tokio::test]
    async fn test_package_for_unknown_job_is_404() {
        let (app, llm, _dir) = app(&[]);
        let (status, body) = send(&app, Method::GET, "/application-package/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generic_dispatch() {
        let (app, _llm, _dir) = app(&[]);

        let (status, body) = send(&app, Method::POST, "/agents/job_search/get_saved_jobs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"saved_jobs": []}));

        let (status, body) = send(&app, Method::POST, "/agents/resume/generate_resume", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "Invalid action or missing data"}));

        let (status, body) = send(&app, Method::POST, "/agents/recruiter/call", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_traversal_id_is_rejected() {
        let (app, _llm, _dir) = app(&[]);
        let (status, body) = send(&app, Method::GET, "/resume/..", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway() {
        let (app, _llm, _dir) = app(&[]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/interview/tips",
            Some(json!({"job": {"title": "SRE", "company": "Acme"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }
}
