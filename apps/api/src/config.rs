use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::agents::AgentKind;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub llm_base_url: String,
    pub model: String,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            model: optional_env("LLM_MODEL", DEFAULT_MODEL),
            data_dir: PathBuf::from(optional_env("DATA_DIR", "data")),
            port: optional_env("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

/// Sampling parameters for one agent's completion requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Fixed per-agent generation settings. Not exposed through the environment.
pub fn agent_settings(kind: AgentKind) -> AgentSettings {
    let (temperature, max_tokens) = match kind {
        AgentKind::JobSearch => (0.2, 1000),
        AgentKind::UserInfo => (0.1, 1000),
        AgentKind::Resume => (0.3, 2000),
        AgentKind::CoverLetter => (0.4, 1500),
        AgentKind::InterviewPrep => (0.5, 2000),
        AgentKind::Networking => (0.4, 1000),
    };
    AgentSettings {
        temperature,
        max_tokens,
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_agents_are_warmer_than_extraction_agents() {
        let user_info = agent_settings(AgentKind::UserInfo);
        let interview = agent_settings(AgentKind::InterviewPrep);
        assert!(user_info.temperature < interview.temperature);
        assert_eq!(interview.max_tokens, 2000);
    }

    #[test]
    fn test_cover_letter_settings() {
        assert_eq!(
            agent_settings(AgentKind::CoverLetter),
            AgentSettings {
                temperature: 0.4,
                max_tokens: 1500
            }
        );
    }
}
