use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agents::payload::Payload;
use crate::agents::prompts::{
    fill_template, OPTIMIZE_PROMPT, RESUME_FORMAT_PROMPT, RESUME_FORMAT_SYSTEM,
    RESUME_OPTIMIZE_SYSTEM, RESUME_PROMPT, RESUME_SYSTEM,
};
use crate::agents::{
    degraded, to_json, to_prompt_document, to_prompt_json, to_prompt_text, Agent, AgentAction,
    AgentContext, AgentKind, Generated,
};
use crate::errors::AppError;
use crate::models::artifact::{carry_metadata, ArtifactMetadata};
use crate::models::job::JobView;
use crate::models::user::ProfileView;
use crate::store::{ArtifactKind, DocumentKey};

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeAction {
    Generate { user_profile: Value, job: Value },
    GetSaved { job_id: String },
    Optimize { resume: Value, feedback: Value },
    FormatAsText { resume: Value },
}

impl AgentAction for ResumeAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        let mut payload = Payload::from_data(data)?;
        match name {
            "generate_resume" => Some(Self::Generate {
                user_profile: payload.take("user_profile")?,
                job: payload.take("job")?,
            }),
            "get_saved_resume" => Some(Self::GetSaved {
                job_id: payload.take_id("job_id")?,
            }),
            "optimize_resume" => Some(Self::Optimize {
                resume: payload.take("resume")?,
                feedback: payload.take("feedback")?,
            }),
            "format_resume_as_text" => Some(Self::FormatAsText {
                resume: payload.take("resume")?,
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate_resume",
            Self::GetSaved { .. } => "get_saved_resume",
            Self::Optimize { .. } => "optimize_resume",
            Self::FormatAsText { .. } => "format_resume_as_text",
        }
    }
}

/// Writes, optimizes and formats tailored resumes. Resumes are stored per job id.
pub struct ResumeAgent {
    ctx: AgentContext,
}

impl ResumeAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn generate_resume(&self, user_profile: &Value, job: &Value) -> Result<Value, AppError> {
        let job = JobView(job);
        let profile = ProfileView::from_value(user_profile);

        let prompt = fill_template(
            RESUME_PROMPT,
            &[
                ("title", job.title()),
                ("description", job.description()),
                ("required_skills", job.required_skills().to_string().as_str()),
                ("basic_info", to_prompt_json(&profile.basic_info()).as_str()),
                ("work_experience", to_prompt_json(profile.entries("work_experience")).as_str()),
                ("education", to_prompt_json(profile.entries("education")).as_str()),
                ("skills", profile.skills().join(", ").as_str()),
                ("projects", to_prompt_json(profile.entries("projects")).as_str()),
                ("certifications", to_prompt_json(profile.entries("certifications")).as_str()),
            ],
        );

        let mut resume = match self.ctx.complete_json(RESUME_SYSTEM, &prompt).await? {
            Generated::Json(Value::Object(resume)) => resume,
            Generated::Json(other) => return Ok(degraded("Failed to generate resume", other.to_string())),
            Generated::Unparsed(raw) => return Ok(degraded("Failed to generate resume", raw)),
        };

        resume.insert("metadata".to_string(), to_json(&ArtifactMetadata::for_job(job))?);
        if let Some(job_id) = job.id() {
            self.ctx
                .store()
                .save(DocumentKey::Artifact(ArtifactKind::Resume, job_id), resume.clone())
                .await?;
        }
        Ok(Value::Object(resume))
    }

    pub async fn get_saved_resume(&self, job_id: &str) -> Result<Value, AppError> {
        let doc = self
            .ctx
            .store()
            .load(DocumentKey::Artifact(ArtifactKind::Resume, job_id))
            .await?;
        Ok(Value::Object(doc))
    }

    /// Rewrites a resume against feedback. The result keeps the original
    /// metadata and replaces the stored resume for that job.
    pub async fn optimize_resume(&self, resume: &Value, feedback: &Value) -> Result<Value, AppError> {
        let prompt = fill_template(
            OPTIMIZE_PROMPT,
            &[
                ("document", to_prompt_document(resume).as_str()),
                ("feedback", to_prompt_text(feedback).as_str()),
                ("label", "resume"),
            ],
        );

        let mut optimized = match self.ctx.complete_json(RESUME_OPTIMIZE_SYSTEM, &prompt).await? {
            Generated::Json(Value::Object(optimized)) => optimized,
            Generated::Json(other) => return Ok(degraded("Failed to optimize resume", other.to_string())),
            Generated::Unparsed(raw) => return Ok(degraded("Failed to optimize resume", raw)),
        };

        if let Some(job_id) = carry_metadata(resume, &mut optimized) {
            self.ctx
                .store()
                .save(DocumentKey::Artifact(ArtifactKind::Resume, &job_id), optimized.clone())
                .await?;
        }
        Ok(Value::Object(optimized))
    }

    pub async fn format_resume_as_text(&self, resume: &Value) -> Result<String, AppError> {
        let document = to_prompt_document(resume);
        let prompt = fill_template(RESUME_FORMAT_PROMPT, &[("resume", document.as_str())]);
        Ok(self.ctx.complete_text(RESUME_FORMAT_SYSTEM, &prompt).await?)
    }
}

#[async_trait]
impl Agent for ResumeAgent {
    type Action = ResumeAction;

    fn kind(&self) -> AgentKind {
        AgentKind::Resume
    }

    async fn execute(&self, action: ResumeAction) -> Result<Value, AppError> {
        match action {
            ResumeAction::Generate { user_profile, job } => Ok(json!({
                "resume": self.generate_resume(&user_profile, &job).await?
            })),
            ResumeAction::GetSaved { job_id } => Ok(json!({
                "resume": self.get_saved_resume(&job_id).await?
            })),
            ResumeAction::Optimize { resume, feedback } => Ok(json!({
                "resume": self.optimize_resume(&resume, &feedback).await?
            })),
            ResumeAction::FormatAsText { resume } => Ok(json!({
                "formatted_text": self.format_resume_as_text(&resume).await?
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::context;

    fn profile() -> Value {
        json!({
            "basic_info": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "skills": ["Rust", "Mathematics"],
            "work_experience": [{"company": "Analytical Engines", "title": "Programmer"}]
        })
    }

    #[tokio::test]
    async fn test_generate_resume_attaches_metadata_and_saves() {
        let (ctx, llm, dir) = context(AgentKind::Resume, &[r#"{"summary": "Pioneer"}"#]);
        let agent = ResumeAgent::new(ctx);

        let job = json!({"id": "job1", "title": "Compiler Engineer", "company": "Acme"});
        let result = agent
            .run("generate_resume", Some(json!({"user_profile": profile(), "job": job})))
            .await
            .unwrap();

        let resume = &result["resume"];
        assert_eq!(resume["summary"], "Pioneer");
        assert_eq!(resume["metadata"]["job_id"], "job1");
        assert_eq!(resume["metadata"]["company"], "Acme");
        assert!(dir.path().join("resumes/resume_job1.json").exists());

        let saved = agent.get_saved_resume("job1").await.unwrap();
        assert_eq!(&saved, resume);

        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("Compiler Engineer"));
        assert!(prompt.contains("Rust, Mathematics"));
    }

    #[tokio::test]
    async fn test_generate_resume_without_job_id_is_not_saved() {
        let (ctx, _llm, dir) = context(AgentKind::Resume, &[r#"{"summary": "Pioneer"}"#]);
        let agent = ResumeAgent::new(ctx);

        let resume = agent
            .generate_resume(&profile(), &json!({"title": "Engineer"}))
            .await
            .unwrap();
        assert_eq!(resume["metadata"]["job_id"], "");
        assert!(!dir.path().join("resumes").exists());
    }

    #[tokio::test]
    async fn test_generate_resume_degrades_on_prose() {
        let (ctx, _llm, dir) = context(AgentKind::Resume, &["I cannot do that."]);
        let agent = ResumeAgent::new(ctx);

        let resume = agent
            .generate_resume(&profile(), &json!({"id": "job1"}))
            .await
            .unwrap();
        assert_eq!(
            resume,
            json!({"error": "Failed to generate resume", "raw_response": "I cannot do that."})
        );
        assert!(!dir.path().join("resumes").exists());
    }

    #[tokio::test]
    async fn test_optimize_resume_keeps_metadata_and_resaves() {
        let (ctx, llm, _dir) = context(AgentKind::Resume, &[r#"{"summary": "Sharper"}"#]);
        let agent = ResumeAgent::new(ctx);

        let original = json!({
            "summary": "Pioneer",
            "metadata": {"job_id": "job7", "job_title": "SRE", "company": "Acme",
                         "generated_timestamp": "2024-01-01T00:00:00+00:00"}
        });
        let result = agent
            .run(
                "optimize_resume",
                Some(json!({"resume": original, "feedback": "Be more concise"})),
            )
            .await
            .unwrap();

        let optimized = &result["resume"];
        assert_eq!(optimized["summary"], "Sharper");
        assert_eq!(optimized["metadata"]["job_id"], "job7");
        assert!(optimized["metadata"]["optimized_timestamp"].is_string());
        assert_eq!(&agent.get_saved_resume("job7").await.unwrap(), optimized);
        assert!(llm.calls()[0].prompt.contains("Be more concise"));
    }

    #[tokio::test]
    async fn test_format_resume_returns_raw_text() {
        let (ctx, llm, _dir) = context(AgentKind::Resume, &["ADA LOVELACE\nProgrammer"]);
        let agent = ResumeAgent::new(ctx);

        let result = agent
            .run("format_resume_as_text", Some(json!({"resume": {"name": "Ada"}})))
            .await
            .unwrap();
        assert_eq!(result, json!({"formatted_text": "ADA LOVELACE\nProgrammer"}));
        assert!(!llm.calls()[0].prompt.contains("valid JSON"));
    }

    #[tokio::test]
    async fn test_get_saved_resume_for_unknown_job_is_empty() {
        let (ctx, _llm, _dir) = context(AgentKind::Resume, &[]);
        let agent = ResumeAgent::new(ctx);

        let result = agent
            .run("get_saved_resume", Some(json!({"job_id": "nope"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"resume": {}}));
    }
}
