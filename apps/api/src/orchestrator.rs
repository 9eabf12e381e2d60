//! Orchestrator: owns one instance of every agent, routes named actions to
//! them and composes the multi-agent application package.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::agents::{
    Agent, AgentContext, AgentKind, CoverLetterAgent, InterviewPrepAgent, JobSearchAgent,
    NetworkingAgent, ResumeAgent, UserInfoAgent,
};
use crate::errors::AppError;
use crate::llm_client::ChatCompletion;
use crate::store::JsonStore;

pub struct Orchestrator {
    user_info: UserInfoAgent,
    job_search: JobSearchAgent,
    resume: ResumeAgent,
    cover_letter: CoverLetterAgent,
    interview_prep: InterviewPrepAgent,
    networking: NetworkingAgent,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn ChatCompletion>, store: JsonStore) -> Self {
        let ctx = |kind| AgentContext::new(kind, llm.clone(), store.clone());
        Self {
            user_info: UserInfoAgent::new(ctx(AgentKind::UserInfo)),
            job_search: JobSearchAgent::new(ctx(AgentKind::JobSearch)),
            resume: ResumeAgent::new(ctx(AgentKind::Resume)),
            cover_letter: CoverLetterAgent::new(ctx(AgentKind::CoverLetter)),
            interview_prep: InterviewPrepAgent::new(ctx(AgentKind::InterviewPrep)),
            networking: NetworkingAgent::new(ctx(AgentKind::Networking)),
        }
    }

    /// Runs one named action on the given agent.
    pub async fn dispatch(
        &self,
        kind: AgentKind,
        action: &str,
        data: Option<Value>,
    ) -> Result<Value, AppError> {
        match kind {
            AgentKind::UserInfo => self.user_info.run(action, data).await,
            AgentKind::JobSearch => self.job_search.run(action, data).await,
            AgentKind::Resume => self.resume.run(action, data).await,
            AgentKind::CoverLetter => self.cover_letter.run(action, data).await,
            AgentKind::InterviewPrep => self.interview_prep.run(action, data).await,
            AgentKind::Networking => self.networking.run(action, data).await,
        }
    }

    /// Generates everything needed to apply for a saved job: resume, cover
    /// letter (written against that resume), interview material and a match
    /// analysis. Steps run in order and the first failure aborts the package.
    pub async fn generate_application_package(&self, job_id: &str) -> Result<Value, AppError> {
        let profile = Value::Object(self.user_info.get_user_info().await?);
        let job = self
            .job_search
            .find_saved_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job with ID {job_id} not found")))?;

        info!(job_id, "Generating application package");

        let resume = self.resume.generate_resume(&profile, &job).await?;
        let cover_letter = self
            .cover_letter
            .generate_cover_letter(&profile, &job, Some(&resume))
            .await?;
        let common_questions = self
            .interview_prep
            .generate_common_questions(&profile, &job)
            .await?;
        let technical_questions = self
            .interview_prep
            .generate_technical_questions(&profile, &job)
            .await?;
        let company_research = self.interview_prep.generate_company_research(&job).await?;
        let job_match = self.job_search.analyze_job_match(&job, &profile).await?;

        info!(job_id, "Application package complete");

        Ok(json!({
            "job": job,
            "resume": resume,
            "cover_letter": cover_letter,
            "interview_prep": {
                "common_questions": common_questions,
                "technical_questions": technical_questions,
                "company_research": company_research,
            },
            "job_match": job_match,
        }))
    }
}
