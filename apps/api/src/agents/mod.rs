//! Domain agents.
//!
//! Each agent owns one slice of the job-hunting workflow and exposes a fixed
//! set of named actions. A request arrives as an action name plus a loosely
//! typed JSON payload; the agent's `Action` enum turns that pair into a typed
//! command, or the request short-circuits to the generic invalid-action result
//! before any model call or disk access.

pub mod completeness;
pub mod cover_letter;
pub mod interview_prep;
pub mod job_search;
pub mod networking;
pub mod payload;
pub mod prompts;
pub mod resume;
pub mod user_info;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{agent_settings, AgentSettings};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{parse_structured, ChatCompletion, CompletionRequest, LlmError};
use crate::store::JsonStore;

pub use cover_letter::CoverLetterAgent;
pub use interview_prep::InterviewPrepAgent;
pub use job_search::JobSearchAgent;
pub use networking::NetworkingAgent;
pub use resume::ResumeAgent;
pub use user_info::UserInfoAgent;

/// Result returned for unknown actions and for actions missing required data.
pub const INVALID_ACTION: &str = "Invalid action or missing data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    UserInfo,
    JobSearch,
    Resume,
    CoverLetter,
    InterviewPrep,
    Networking,
}

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        AgentKind::UserInfo,
        AgentKind::JobSearch,
        AgentKind::Resume,
        AgentKind::CoverLetter,
        AgentKind::InterviewPrep,
        AgentKind::Networking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::UserInfo => "user_info",
            AgentKind::JobSearch => "job_search",
            AgentKind::Resume => "resume",
            AgentKind::CoverLetter => "cover_letter",
            AgentKind::InterviewPrep => "interview_prep",
            AgentKind::Networking => "networking",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown agent '{s}'")))
    }
}

/// A typed agent command parsed from an action name and its payload.
pub trait AgentAction: Sized + Send {
    /// Returns `None` for unknown names and for payloads missing required fields.
    fn parse(name: &str, data: Option<Value>) -> Option<Self>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait Agent: Send + Sync {
    type Action: AgentAction;

    fn kind(&self) -> AgentKind;

    async fn execute(&self, action: Self::Action) -> Result<Value, AppError>;

    /// Parses and executes one named action.
    async fn run(&self, action: &str, data: Option<Value>) -> Result<Value, AppError> {
        let Some(parsed) = Self::Action::parse(action, data) else {
            warn!(agent = %self.kind(), action, "Invalid action or missing data");
            return Ok(invalid_action());
        };

        info!(agent = %self.kind(), action = parsed.name(), "Running agent action");
        self.execute(parsed).await
    }
}

pub fn invalid_action() -> Value {
    json!({ "error": INVALID_ACTION })
}

/// Result of a structured generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Json(Value),
    /// The model answered, but not with JSON.
    Unparsed(String),
}

/// Degraded result for model output that could not be read as JSON.
pub fn degraded(message: &str, raw_response: String) -> Value {
    warn!("{message}: model output was not valid JSON");
    json!({
        "error": message,
        "raw_response": raw_response,
    })
}

/// What every agent needs: the completion backend, the store and its own sampling settings.
#[derive(Clone)]
pub struct AgentContext {
    llm: Arc<dyn ChatCompletion>,
    store: JsonStore,
    settings: AgentSettings,
}

impl AgentContext {
    pub fn new(kind: AgentKind, llm: Arc<dyn ChatCompletion>, store: JsonStore) -> Self {
        Self {
            llm,
            store,
            settings: agent_settings(kind),
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Free-text completion, returned as-is.
    pub async fn complete_text(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.llm
            .complete(CompletionRequest {
                system,
                prompt,
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            })
            .await
    }

    /// Completion whose output is expected to be JSON.
    pub async fn complete_json(&self, system: &str, prompt: &str) -> Result<Generated, LlmError> {
        let prompt = format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}");
        let text = self.complete_text(system, &prompt).await?;
        Ok(match parse_structured(&text) {
            Some(value) => Generated::Json(value),
            None => Generated::Unparsed(text),
        })
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

/// Renders a JSON value for interpolation into a prompt.
pub(crate) fn to_prompt_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Strings are interpolated as-is; anything else as compact JSON.
pub(crate) fn to_prompt_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => to_prompt_json(other),
    }
}

/// Pretty JSON for whole documents (resumes, cover letters) embedded in a prompt.
pub(crate) fn to_prompt_document(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::llm_client::testing::ScriptedLlm;

    /// Builds a context backed by a scripted model and a fresh temp data dir.
    pub fn context(kind: AgentKind, responses: &[&str]) -> (AgentContext, Arc<ScriptedLlm>, TempDir) {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(ScriptedLlm::new(responses.iter().copied()));
        let ctx = AgentContext::new(kind, llm.clone(), JsonStore::new(dir.path()));
        (ctx, llm, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_round_trips_through_names() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
        assert!(matches!(
            "recruiter".parse::<AgentKind>(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_json_degrades_on_prose() {
        let (ctx, llm, _dir) =
            test_support::context(AgentKind::Resume, &["Here you go!", "```json\n{\"a\": 1}\n```"]);

        let first = ctx.complete_json("system", "prompt").await.unwrap();
        assert_eq!(first, Generated::Unparsed("Here you go!".to_string()));

        let second = ctx.complete_json("system", "prompt").await.unwrap();
        assert_eq!(second, Generated::Json(json!({"a": 1})));

        let calls = llm.calls();
        assert!(calls[0].prompt.ends_with(JSON_ONLY_INSTRUCTION));
        assert_eq!(calls[0].temperature, 0.3);
    }

    #[test]
    fn test_degraded_shape() {
        let value = degraded("Failed to generate resume", "oops".to_string());
        assert_eq!(value["error"], "Failed to generate resume");
        assert_eq!(value["raw_response"], "oops");
    }
}
