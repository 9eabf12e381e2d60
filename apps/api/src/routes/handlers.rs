//! Axum route handlers. Every handler forwards its body (or path parameter)
//! to one agent action through the orchestrator.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::agents::AgentKind;
use crate::errors::AppError;
use crate::state::AppState;

type AgentResponse = Result<Json<Value>, AppError>;

async fn dispatch(state: &AppState, kind: AgentKind, action: &str, data: Option<Value>) -> AgentResponse {
    state.orchestrator.dispatch(kind, action, data).await.map(Json)
}

// ────────────────────────────────────────────────────────────────────────────
// User profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /user
pub async fn get_user_info(State(state): State<AppState>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "get_user_info", None).await
}

/// POST /user/basic-info
pub async fn collect_basic_info(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "collect_basic_info", Some(body)).await
}

/// POST /user/work-experience
pub async fn add_work_experience(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "add_work_experience", Some(body)).await
}

/// POST /user/education
pub async fn add_education(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "add_education", Some(body)).await
}

/// POST /user/skills
///
/// Body: `{"skills": ["Rust", "Go"]}`. Skills already on the profile are not duplicated.
pub async fn add_skills(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "add_skills", Some(body)).await
}

/// POST /user/projects
pub async fn add_projects(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "add_projects", Some(body)).await
}

/// POST /user/certifications
pub async fn add_certifications(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "add_certifications", Some(body)).await
}

/// GET /user/profile-completeness
pub async fn profile_completeness(State(state): State<AppState>) -> AgentResponse {
    dispatch(&state, AgentKind::UserInfo, "analyze_profile_completeness", None).await
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /jobs/search
pub async fn search_jobs(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::JobSearch, "search_jobs", Some(body)).await
}

/// GET /jobs/saved
pub async fn get_saved_jobs(State(state): State<AppState>) -> AgentResponse {
    dispatch(&state, AgentKind::JobSearch, "get_saved_jobs", None).await
}

/// POST /jobs/save
pub async fn save_job(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::JobSearch, "save_job", Some(body)).await
}

/// DELETE /jobs/:job_id
pub async fn remove_saved_job(State(state): State<AppState>, Path(job_id): Path<String>) -> AgentResponse {
    let data = json!({ "job_id": job_id });
    dispatch(&state, AgentKind::JobSearch, "remove_saved_job", Some(data)).await
}

/// POST /jobs/analyze-match
pub async fn analyze_job_match(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::JobSearch, "analyze_job_match", Some(body)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// POST /resume/generate
pub async fn generate_resume(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Resume, "generate_resume", Some(body)).await
}

/// GET /resume/:job_id
pub async fn get_saved_resume(State(state): State<AppState>, Path(job_id): Path<String>) -> AgentResponse {
    let data = json!({ "job_id": job_id });
    dispatch(&state, AgentKind::Resume, "get_saved_resume", Some(data)).await
}

/// POST /resume/optimize
pub async fn optimize_resume(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Resume, "optimize_resume", Some(body)).await
}

/// POST /resume/format
pub async fn format_resume(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Resume, "format_resume_as_text", Some(body)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// POST /cover-letter/generate
///
/// Body: `{"user_profile": {...}, "job": {...}, "resume": {...}}`; `resume` is optional.
pub async fn generate_cover_letter(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::CoverLetter, "generate_cover_letter", Some(body)).await
}

/// GET /cover-letter/:job_id
pub async fn get_saved_cover_letter(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AgentResponse {
    let data = json!({ "job_id": job_id });
    dispatch(&state, AgentKind::CoverLetter, "get_saved_cover_letter", Some(data)).await
}

/// POST /cover-letter/optimize
pub async fn optimize_cover_letter(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::CoverLetter, "optimize_cover_letter", Some(body)).await
}

/// POST /cover-letter/format
pub async fn format_cover_letter(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::CoverLetter, "format_cover_letter_as_text", Some(body)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Interview preparation
// ────────────────────────────────────────────────────────────────────────────

/// POST /interview/common-questions
pub async fn common_questions(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::InterviewPrep, "generate_common_questions", Some(body)).await
}

/// POST /interview/technical-questions
pub async fn technical_questions(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::InterviewPrep, "generate_technical_questions", Some(body)).await
}

/// POST /interview/company-research
pub async fn company_research(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::InterviewPrep, "generate_company_research", Some(body)).await
}

/// POST /interview/tips
pub async fn interview_tips(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::InterviewPrep, "generate_interview_tips", Some(body)).await
}

/// GET /interview/:job_id
pub async fn get_saved_interview_prep(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AgentResponse {
    let data = json!({ "job_id": job_id });
    dispatch(&state, AgentKind::InterviewPrep, "get_saved_interview_prep", Some(data)).await
}

/// POST /interview/evaluate-answer
pub async fn evaluate_answer(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::InterviewPrep, "evaluate_practice_answer", Some(body)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Networking
// ────────────────────────────────────────────────────────────────────────────

/// POST /networking/connection-message
pub async fn connection_message(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Networking, "generate_connection_message", Some(body)).await
}

/// POST /networking/coffee-chat-topics
pub async fn coffee_chat_topics(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Networking, "generate_coffee_chat_topics", Some(body)).await
}

/// POST /networking/follow-up-message
pub async fn follow_up_message(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Networking, "generate_follow_up_message", Some(body)).await
}

/// POST /networking/analyze-profile
pub async fn analyze_contact_profile(State(state): State<AppState>, Json(body): Json<Value>) -> AgentResponse {
    dispatch(&state, AgentKind::Networking, "analyze_contact_profile", Some(body)).await
}

/// GET /networking/:contact_id
pub async fn get_saved_networking_info(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> AgentResponse {
    let data = json!({ "contact_id": contact_id });
    dispatch(&state, AgentKind::Networking, "get_saved_networking_info", Some(data)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// GET /application-package/:job_id
///
/// Generates resume, cover letter, interview material and a match analysis
/// for a saved job. 404 when the job is not in the saved list.
pub async fn application_package(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AgentResponse {
    state
        .orchestrator
        .generate_application_package(&job_id)
        .await
        .map(Json)
}

/// POST /agents/:agent/:action
///
/// Generic dispatch to any agent action. The body is optional.
pub async fn run_agent_action(
    State(state): State<AppState>,
    Path((agent, action)): Path<(String, String)>,
    body: Option<Json<Value>>,
) -> AgentResponse {
    let kind: AgentKind = agent.parse()?;
    dispatch(&state, kind, &action, body.map(|Json(value)| value)).await
}
