use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agents::payload::Payload;
use crate::agents::prompts::{
    fill_template, COVER_LETTER_FORMAT_PROMPT, COVER_LETTER_FORMAT_SYSTEM,
    COVER_LETTER_OPTIMIZE_SYSTEM, COVER_LETTER_PROMPT, COVER_LETTER_SYSTEM, OPTIMIZE_PROMPT,
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
pub enum CoverLetterAction {
    Generate {
        user_profile: Value,
        job: Value,
        resume: Option<Value>,
    },
    GetSaved {
        job_id: String,
    },
    Optimize {
        cover_letter: Value,
        feedback: Value,
    },
    FormatAsText {
        cover_letter: Value,
    },
}

impl AgentAction for CoverLetterAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        let mut payload = Payload::from_data(data)?;
        match name {
            "generate_cover_letter" => Some(Self::Generate {
                user_profile: payload.take("user_profile")?,
                job: payload.take("job")?,
                resume: payload.take("resume"),
            }),
            "get_saved_cover_letter" => Some(Self::GetSaved {
                job_id: payload.take_id("job_id")?,
            }),
            "optimize_cover_letter" => Some(Self::Optimize {
                cover_letter: payload.take("cover_letter")?,
                feedback: payload.take("feedback")?,
            }),
            "format_cover_letter_as_text" => Some(Self::FormatAsText {
                cover_letter: payload.take("cover_letter")?,
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate_cover_letter",
            Self::GetSaved { .. } => "get_saved_cover_letter",
            Self::Optimize { .. } => "optimize_cover_letter",
            Self::FormatAsText { .. } => "format_cover_letter_as_text",
        }
    }
}

/// Writes, optimizes and formats cover letters. Letters are stored per job id.
pub struct CoverLetterAgent {
    ctx: AgentContext,
}

impl CoverLetterAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    /// Generates a letter for the job. When a resume is supplied its content
    /// is offered to the model as extra context.
    pub async fn generate_cover_letter(
        &self,
        user_profile: &Value,
        job: &Value,
        resume: Option<&Value>,
    ) -> Result<Value, AppError> {
        let job = JobView(job);
        let profile = ProfileView::from_value(user_profile);

        let resume_context = match resume {
            Some(resume) => format!("\nTailored resume for this job:\n{}\n", to_prompt_document(resume)),
            None => String::new(),
        };

        let prompt = fill_template(
            COVER_LETTER_PROMPT,
            &[
                ("title", job.title()),
                ("company", job.company()),
                ("description", job.description()),
                ("required_skills", job.required_skills().to_string().as_str()),
                ("name", profile.basic_field("name")),
                ("email", profile.basic_field("email")),
                ("phone", profile.basic_field("phone")),
                ("work_experience", to_prompt_json(profile.entries("work_experience")).as_str()),
                ("skills", profile.skills().join(", ").as_str()),
                ("resume_context", resume_context.as_str()),
            ],
        );

        let mut letter = match self.ctx.complete_json(COVER_LETTER_SYSTEM, &prompt).await? {
            Generated::Json(Value::Object(letter)) => letter,
            Generated::Json(other) => {
                return Ok(degraded("Failed to generate cover letter", other.to_string()))
            }
            Generated::Unparsed(raw) => return Ok(degraded("Failed to generate cover letter", raw)),
        };

        letter.insert("metadata".to_string(), to_json(&ArtifactMetadata::for_job(job))?);
        if let Some(job_id) = job.id() {
            self.ctx
                .store()
                .save(DocumentKey::Artifact(ArtifactKind::CoverLetter, job_id), letter.clone())
                .await?;
        }
        Ok(Value::Object(letter))
    }

    pub async fn get_saved_cover_letter(&self, job_id: &str) -> Result<Value, AppError> {
        let doc = self
            .ctx
            .store()
            .load(DocumentKey::Artifact(ArtifactKind::CoverLetter, job_id))
            .await?;
        Ok(Value::Object(doc))
    }

    pub async fn optimize_cover_letter(
        &self,
        cover_letter: &Value,
        feedback: &Value,
    ) -> Result<Value, AppError> {
        let prompt = fill_template(
            OPTIMIZE_PROMPT,
            &[
                ("label", "cover letter"),
                ("document", to_prompt_document(cover_letter).as_str()),
                ("feedback", to_prompt_text(feedback).as_str()),
            ],
        );

        let mut optimized = match self
            .ctx
            .complete_json(COVER_LETTER_OPTIMIZE_SYSTEM, &prompt)
            .await?
        {
            Generated::Json(Value::Object(optimized)) => optimized,
            Generated::Json(other) => {
                return Ok(degraded("Failed to optimize cover letter", other.to_string()))
            }
            Generated::Unparsed(raw) => return Ok(degraded("Failed to optimize cover letter", raw)),
        };

        if let Some(job_id) = carry_metadata(cover_letter, &mut optimized) {
            self.ctx
                .store()
                .save(
                    DocumentKey::Artifact(ArtifactKind::CoverLetter, &job_id),
                    optimized.clone(),
                )
                .await?;
        }
        Ok(Value::Object(optimized))
    }

    /// Returns `full_text` directly when the letter already has one.
    pub async fn format_cover_letter_as_text(&self, cover_letter: &Value) -> Result<String, AppError> {
        if let Some(full_text) = cover_letter
            .get("full_text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
        {
            return Ok(full_text.to_string());
        }

        let document = to_prompt_document(cover_letter);
        let prompt = fill_template(COVER_LETTER_FORMAT_PROMPT, &[("cover_letter", document.as_str())]);
        Ok(self
            .ctx
            .complete_text(COVER_LETTER_FORMAT_SYSTEM, &prompt)
            .await?)
    }
}

#[async_trait]
impl Agent for CoverLetterAgent {
    type Action = CoverLetterAction;

    fn kind(&self) -> AgentKind {
        AgentKind::CoverLetter
    }

    async fn execute(&self, action: CoverLetterAction) -> Result<Value, AppError> {
        match action {
            CoverLetterAction::Generate {
                user_profile,
                job,
                resume,
            } => Ok(json!({
                "cover_letter": self
                    .generate_cover_letter(&user_profile, &job, resume.as_ref())
                    .await?
            })),
            CoverLetterAction::GetSaved { job_id } => Ok(json!({
                "cover_letter": self.get_saved_cover_letter(&job_id).await?
            })),
            CoverLetterAction::Optimize {
                cover_letter,
                feedback,
            } => Ok(json!({
                "cover_letter": self.optimize_cover_letter(&cover_letter, &feedback).await?
            })),
            CoverLetterAction::FormatAsText { cover_letter } => Ok(json!({
                "formatted_text": self.format_cover_letter_as_text(&cover_letter).await?
            })),
        }
    }
}
