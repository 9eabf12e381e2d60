use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agents::payload::Payload;
use crate::agents::prompts::{
    fill_template, COMMON_QUESTIONS_PROMPT, COMMON_QUESTIONS_SYSTEM, COMPANY_RESEARCH_PROMPT,
    COMPANY_RESEARCH_SYSTEM, EVALUATE_ANSWER_PROMPT, EVALUATE_ANSWER_SYSTEM, INTERVIEW_TIPS_PROMPT,
    INTERVIEW_TIPS_SYSTEM, TECHNICAL_QUESTIONS_PROMPT, TECHNICAL_QUESTIONS_SYSTEM,
};
use crate::agents::{
    degraded, to_json, to_prompt_json, to_prompt_text, Agent, AgentAction, AgentContext,
    AgentKind, Generated,
};
use crate::errors::AppError;
use crate::models::artifact::ArtifactMetadata;
use crate::models::job::JobView;
use crate::models::user::ProfileView;
use crate::store::{ArtifactKind, DocumentKey};

#[derive(Debug, Clone, PartialEq)]
pub enum InterviewPrepAction {
    CommonQuestions { user_profile: Value, job: Value },
    TechnicalQuestions { user_profile: Value, job: Value },
    CompanyResearch { job: Value },
    InterviewTips { job: Value },
    GetSaved { job_id: String },
    EvaluateAnswer { question: Value, answer: Value, job: Value },
}

impl AgentAction for InterviewPrepAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        let mut payload = Payload::from_data(data)?;
        match name {
            "generate_common_questions" => Some(Self::CommonQuestions {
                user_profile: payload.take("user_profile")?,
                job: payload.take("job")?,
            }),
            "generate_technical_questions" => Some(Self::TechnicalQuestions {
                user_profile: payload.take("user_profile")?,
                job: payload.take("job")?,
            }),
            "generate_company_research" => Some(Self::CompanyResearch {
                job: payload.take("job")?,
            }),
            "generate_interview_tips" => Some(Self::InterviewTips {
                job: payload.take("job")?,
            }),
            "get_saved_interview_prep" => Some(Self::GetSaved {
                job_id: payload.take_id("job_id")?,
            }),
            "evaluate_practice_answer" => Some(Self::EvaluateAnswer {
                question: payload.take("question")?,
                answer: payload.take("answer")?,
                job: payload.take("job")?,
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CommonQuestions { .. } => "generate_common_questions",
            Self::TechnicalQuestions { .. } => "generate_technical_questions",
            Self::CompanyResearch { .. } => "generate_company_research",
            Self::InterviewTips { .. } => "generate_interview_tips",
            Self::GetSaved { .. } => "get_saved_interview_prep",
            Self::EvaluateAnswer { .. } => "evaluate_practice_answer",
        }
    }
}

/// How a write treats the metadata block already on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metadata {
    Replace,
    KeepExisting,
}

/// Builds interview material. Everything generated for one job accumulates
/// in a single document keyed by the job id.
pub struct InterviewPrepAgent {
    ctx: AgentContext,
}

impl InterviewPrepAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn generate_common_questions(
        &self,
        user_profile: &Value,
        job: &Value,
    ) -> Result<Value, AppError> {
        let job = JobView(job);
        let profile = ProfileView::from_value(user_profile);

        let prompt = fill_template(
            COMMON_QUESTIONS_PROMPT,
            &[
                ("title", job.title()),
                ("company", job.company()),
                ("description", job.description()),
                ("required_skills", job.required_skills().to_string().as_str()),
                ("skills", profile.skills().join(", ").as_str()),
                ("work_experience", to_prompt_json(profile.entries("work_experience")).as_str()),
            ],
        );

        self.generate_section(
            job,
            "common_questions",
            COMMON_QUESTIONS_SYSTEM,
            &prompt,
            Metadata::Replace,
            "Failed to generate common interview questions",
        )
        .await
    }

    pub async fn generate_technical_questions(
        &self,
        user_profile: &Value,
        job: &Value,
    ) -> Result<Value, AppError> {
        let job = JobView(job);
        let profile = ProfileView::from_value(user_profile);

        let prompt = fill_template(
            TECHNICAL_QUESTIONS_PROMPT,
            &[
                ("title", job.title()),
                ("description", job.description()),
                ("required_skills", job.required_skills().to_string().as_str()),
                ("skills", profile.skills().join(", ").as_str()),
            ],
        );

        self.generate_section(
            job,
            "technical_questions",
            TECHNICAL_QUESTIONS_SYSTEM,
            &prompt,
            Metadata::KeepExisting,
            "Failed to generate technical interview questions",
        )
        .await
    }

    pub async fn generate_company_research(&self, job: &Value) -> Result<Value, AppError> {
        let job = JobView(job);
        let prompt = fill_template(COMPANY_RESEARCH_PROMPT, &[("company", job.company())]);

        self.generate_section(
            job,
            "company_research",
            COMPANY_RESEARCH_SYSTEM,
            &prompt,
            Metadata::KeepExisting,
            "Failed to generate company research",
        )
        .await
    }

    pub async fn generate_interview_tips(&self, job: &Value) -> Result<Value, AppError> {
        let job = JobView(job);
        let prompt = fill_template(
            INTERVIEW_TIPS_PROMPT,
            &[
                ("title", job.title()),
                ("company", job.company()),
            ],
        );

        self.generate_section(
            job,
            "interview_tips",
            INTERVIEW_TIPS_SYSTEM,
            &prompt,
            Metadata::KeepExisting,
            "Failed to generate interview tips",
        )
        .await
    }

    pub async fn get_saved_interview_prep(&self, job_id: &str) -> Result<Value, AppError> {
        let doc = self
            .ctx
            .store()
            .load(DocumentKey::Artifact(ArtifactKind::InterviewPrep, job_id))
            .await?;
        Ok(Value::Object(doc))
    }

    /// Grades a practice answer. Not persisted.
    pub async fn evaluate_practice_answer(
        &self,
        question: &Value,
        answer: &Value,
        job: &Value,
    ) -> Result<Value, AppError> {
        let prompt = fill_template(
            EVALUATE_ANSWER_PROMPT,
            &[
                ("title", JobView(job).title()),
                ("question", to_prompt_text(question).as_str()),
                ("answer", to_prompt_text(answer).as_str()),
            ],
        );

        Ok(match self.ctx.complete_json(EVALUATE_ANSWER_SYSTEM, &prompt).await? {
            Generated::Json(evaluation) => evaluation,
            Generated::Unparsed(raw) => degraded("Failed to evaluate practice answer", raw),
        })
    }

    async fn generate_section(
        &self,
        job: JobView<'_>,
        section: &str,
        system: &str,
        prompt: &str,
        metadata: Metadata,
        failure: &str,
    ) -> Result<Value, AppError> {
        let generated = match self.ctx.complete_json(system, prompt).await? {
            Generated::Json(value) => value,
            Generated::Unparsed(raw) => return Ok(degraded(failure, raw)),
        };

        let Some(job_id) = job.id() else {
            return Ok(generated);
        };

        let block = to_json(&ArtifactMetadata::for_job(job))?;
        let stored = generated.clone();
        self.ctx
            .store()
            .update(
                DocumentKey::Artifact(ArtifactKind::InterviewPrep, job_id),
                |doc| {
                    doc.insert(section.to_string(), stored);
                    if metadata == Metadata::Replace || !doc.contains_key("metadata") {
                        doc.insert("metadata".to_string(), block);
                    }
                },
            )
            .await?;
        Ok(generated)
    }
}

#[async_trait]
impl Agent for InterviewPrepAgent {
    type Action = InterviewPrepAction;

    fn kind(&self) -> AgentKind {
        AgentKind::InterviewPrep
    }

    async fn execute(&self, action: InterviewPrepAction) -> Result<Value, AppError> {
        match action {
            InterviewPrepAction::CommonQuestions { user_profile, job } => Ok(json!({
                "common_questions": self.generate_common_questions(&user_profile, &job).await?
            })),
            InterviewPrepAction::TechnicalQuestions { user_profile, job } => Ok(json!({
                "technical_questions": self.generate_technical_questions(&user_profile, &job).await?
            })),
            InterviewPrepAction::CompanyResearch { job } => Ok(json!({
                "company_research": self.generate_company_research(&job).await?
            })),
            InterviewPrepAction::InterviewTips { job } => Ok(json!({
                "interview_tips": self.generate_interview_tips(&job).await?
            })),
            InterviewPrepAction::GetSaved { job_id } => Ok(json!({
                "interview_prep": self.get_saved_interview_prep(&job_id).await?
            })),
            InterviewPrepAction::EvaluateAnswer {
                question,
                answer,
                job,
            } => Ok(json!({
                "evaluation": self.evaluate_practice_answer(&question, &answer, &job).await?
            })),
        }
    }
}
