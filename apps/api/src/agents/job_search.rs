use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::agents::payload::Payload;
use crate::agents::prompts::{
    fill_template, JOB_MATCH_PROMPT, JOB_MATCH_SYSTEM, JOB_SEARCH_PROMPT, JOB_SEARCH_SYSTEM,
};
use crate::agents::{degraded, to_prompt_json, Agent, AgentAction, AgentContext, AgentKind, Generated};
use crate::errors::AppError;
use crate::models::artifact::timestamp;
use crate::models::job::{JobSearch, JobView};
use crate::models::user::ProfileView;
use crate::store::DocumentKey;

const SAVED_JOBS_KEY: &str = "saved_jobs";

#[derive(Debug, Clone, PartialEq)]
pub enum JobSearchAction {
    SearchJobs { query: Value, search: JobSearch },
    GetSavedJobs,
    SaveJob(Value),
    RemoveSavedJob { job_id: String },
    AnalyzeJobMatch { job: Value, user_profile: Value },
}

impl AgentAction for JobSearchAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        if name == "get_saved_jobs" {
            return Some(Self::GetSavedJobs);
        }

        let mut payload = Payload::from_data(data)?;
        match name {
            "search_jobs" => {
                let query = payload.into_value();
                let search = serde_json::from_value(query.clone()).ok()?;
                Some(Self::SearchJobs { query, search })
            }
            "save_job" => Some(Self::SaveJob(payload.into_value())),
            "remove_saved_job" => Some(Self::RemoveSavedJob {
                job_id: payload.take_id("job_id")?,
            }),
            "analyze_job_match" => Some(Self::AnalyzeJobMatch {
                job: payload.take("job")?,
                user_profile: payload.take("user_profile")?,
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SearchJobs { .. } => "search_jobs",
            Self::GetSavedJobs => "get_saved_jobs",
            Self::SaveJob(_) => "save_job",
            Self::RemoveSavedJob { .. } => "remove_saved_job",
            Self::AnalyzeJobMatch { .. } => "analyze_job_match",
        }
    }
}

/// Generates job listings, keeps the saved-jobs list and scores profile/job fit.
pub struct JobSearchAgent {
    ctx: AgentContext,
}

impl JobSearchAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn get_saved_jobs(&self) -> Result<Vec<Value>, AppError> {
        let mut doc = self.ctx.store().load(DocumentKey::SavedJobs).await?;
        Ok(take_saved(&mut doc))
    }

    /// Appends the job unless a saved job has the same url or id.
    pub async fn save_job(&self, job: Value) -> Result<Vec<Value>, AppError> {
        let saved = self
            .ctx
            .store()
            .update(DocumentKey::SavedJobs, |doc| {
                let mut saved = take_saved(doc);
                let duplicate = saved
                    .iter()
                    .any(|existing| JobView(existing).same_posting(&JobView(&job)));
                if !duplicate {
                    saved.push(job);
                }
                doc.insert(SAVED_JOBS_KEY.to_string(), Value::Array(saved.clone()));
                saved
            })
            .await?;
        Ok(saved)
    }

    pub async fn remove_saved_job(&self, job_id: &str) -> Result<Vec<Value>, AppError> {
        let saved = self
            .ctx
            .store()
            .update(DocumentKey::SavedJobs, |doc| {
                let mut saved = take_saved(doc);
                saved.retain(|job| JobView(job).id() != Some(job_id));
                doc.insert(SAVED_JOBS_KEY.to_string(), Value::Array(saved.clone()));
                saved
            })
            .await?;
        Ok(saved)
    }

    /// Looks a saved job up by id.
    pub async fn find_saved_job(&self, job_id: &str) -> Result<Option<Value>, AppError> {
        Ok(self
            .get_saved_jobs()
            .await?
            .into_iter()
            .find(|job| JobView(job).id() == Some(job_id)))
    }

    /// Asks the model for five postings and stamps each one with the query
    /// that produced it. Listings without an id get a generated one.
    pub async fn search_jobs(&self, query: Value, search: &JobSearch) -> Result<Value, AppError> {
        info!(job_title = %search.job_title, "Searching jobs");

        let mut criteria = String::new();
        if let Some(location) = search.location.as_deref().filter(|l| !l.is_empty()) {
            criteria.push_str(&format!(" in {location}"));
        }
        if !search.keywords.is_empty() {
            criteria.push_str(&format!(" with keywords: {}", search.keywords));
        }
        if let Some(level) = search.experience_level.as_deref().filter(|l| !l.is_empty()) {
            criteria.push_str(&format!(" at {level} level"));
        }

        let prompt = fill_template(
            JOB_SEARCH_PROMPT,
            &[
                ("job_title", search.job_title.as_str()),
                ("criteria", criteria.as_str()),
            ],
        );

        let jobs = match self.ctx.complete_json(JOB_SEARCH_SYSTEM, &prompt).await? {
            Generated::Json(Value::Array(jobs)) => jobs,
            Generated::Json(Value::Object(mut wrapper)) => match wrapper.remove("jobs") {
                Some(Value::Array(jobs)) => jobs,
                _ => {
                    let raw = Value::Object(wrapper).to_string();
                    return Ok(degraded("Failed to generate job listings", raw));
                }
            },
            Generated::Json(other) => {
                return Ok(degraded("Failed to generate job listings", other.to_string()))
            }
            Generated::Unparsed(raw) => return Ok(degraded("Failed to generate job listings", raw)),
        };

        let searched_at = timestamp();
        let jobs: Vec<Value> = jobs
            .into_iter()
            .map(|mut job| {
                let needs_id = JobView(&job).id().is_none();
                if let Value::Object(fields) = &mut job {
                    if needs_id {
                        fields.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
                    }
                    fields.insert("search_timestamp".to_string(), json!(searched_at));
                    fields.insert("search_query".to_string(), query.clone());
                }
                job
            })
            .collect();

        Ok(json!({ "jobs": jobs }))
    }

    /// Scores how well a profile fits a job. Not persisted.
    pub async fn analyze_job_match(&self, job: &Value, user_profile: &Value) -> Result<Value, AppError> {
        let job = JobView(job);
        let profile = ProfileView::from_value(user_profile);

        let prompt = fill_template(
            JOB_MATCH_PROMPT,
            &[
                ("title", job.title()),
                ("description", job.description()),
                ("required_skills", job.required_skills().to_string().as_str()),
                ("skills", profile.skills().join(", ").as_str()),
                ("work_experience", to_prompt_json(profile.entries("work_experience")).as_str()),
                ("education", to_prompt_json(profile.entries("education")).as_str()),
            ],
        );

        Ok(match self.ctx.complete_json(JOB_MATCH_SYSTEM, &prompt).await? {
            Generated::Json(analysis) => analysis,
            Generated::Unparsed(raw) => degraded("Failed to analyze job match", raw),
        })
    }
}

fn take_saved(doc: &mut crate::store::Document) -> Vec<Value> {
    match doc.remove(SAVED_JOBS_KEY) {
        Some(Value::Array(jobs)) => jobs,
        _ => Vec::new(),
    }
}

#[async_trait]
impl Agent for JobSearchAgent {
    type Action = JobSearchAction;

    fn kind(&self) -> AgentKind {
        AgentKind::JobSearch
    }

    async fn execute(&self, action: JobSearchAction) -> Result<Value, AppError> {
        match action {
            JobSearchAction::SearchJobs { query, search } => self.search_jobs(query, &search).await,
            JobSearchAction::GetSavedJobs => Ok(json!({ "saved_jobs": self.get_saved_jobs().await? })),
            JobSearchAction::SaveJob(job) => Ok(json!({ "saved_jobs": self.save_job(job).await? })),
            JobSearchAction::RemoveSavedJob { job_id } => {
                Ok(json!({ "saved_jobs": self.remove_saved_job(&job_id).await? }))
            }
            JobSearchAction::AnalyzeJobMatch { job, user_profile } => Ok(json!({
                "match_analysis": self.analyze_job_match(&job, &user_profile).await?
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::context;
    use crate::agents::INVALID_ACTION;

    #[tokio::test]
    async fn test_save_job_deduplicates_by_id() {
        let (ctx, _llm, _dir) = context(AgentKind::JobSearch, &[]);
        let agent = JobSearchAgent::new(ctx);

        let job = json!({"id": "job1", "title": "Backend Engineer"});
        agent.run("save_job", Some(job.clone())).await.unwrap();
        let result = agent.run("save_job", Some(job)).await.unwrap();

        assert_eq!(result["saved_jobs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_job_deduplicates_by_url() {
        let (ctx, _llm, _dir) = context(AgentKind::JobSearch, &[]);
        let agent = JobSearchAgent::new(ctx);

        agent
            .save_job(json!({"id": "a", "url": "https://jobs.example/42"}))
            .await
            .unwrap();
        let saved = agent
            .save_job(json!({"id": "b", "url": "https://jobs.example/42"}))
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);

        let saved = agent.save_job(json!({"id": "c"})).await.unwrap();
        assert_eq!(saved.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_saved_job() {
        let (ctx, _llm, _dir) = context(AgentKind::JobSearch, &[]);
        let agent = JobSearchAgent::new(ctx);

        agent.save_job(json!({"id": "keep"})).await.unwrap();
        agent.save_job(json!({"id": "drop"})).await.unwrap();
        let result = agent
            .run("remove_saved_job", Some(json!({"job_id": "drop"})))
            .await
            .unwrap();

        assert_eq!(result, json!({"saved_jobs": [{"id": "keep"}]}));
        assert!(agent.find_saved_job("drop").await.unwrap().is_none());
        assert!(agent.find_saved_job("keep").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_jobs_stamps_results() {
        let response = r#"[{"id": "j1", "title": "SRE"}, {"title": "Platform Engineer"}]"#;
        let (ctx, llm, _dir) = context(AgentKind::JobSearch, &[response]);
        let agent = JobSearchAgent::new(ctx);

        let query = json!({"job_title": "SRE", "location": "Berlin", "keywords": ["Kubernetes", "Go"]});
        let result = agent.run("search_jobs", Some(query.clone())).await.unwrap();

        let jobs = result["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["id"], "j1");
        assert!(jobs[1]["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(jobs[0]["search_query"], query);
        assert!(jobs[1]["search_timestamp"].is_string());

        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("SRE position in Berlin with keywords: Kubernetes, Go"));
        assert_eq!(llm.calls()[0].temperature, 0.2);
    }

    #[tokio::test]
    async fn test_search_jobs_degrades_on_prose() {
        let (ctx, _llm, _dir) = context(AgentKind::JobSearch, &["No jobs today."]);
        let agent = JobSearchAgent::new(ctx);

        let result = agent
            .run("search_jobs", Some(json!({"job_title": "SRE"})))
            .await
            .unwrap();
        assert_eq!(result["raw_response"], "No jobs today.");
        assert!(result["error"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_job_match_is_not_persisted() {
        let (ctx, _llm, dir) = context(AgentKind::JobSearch, &[r#"{"match_percentage": 80}"#]);
        let agent = JobSearchAgent::new(ctx);

        let result = agent
            .run(
                "analyze_job_match",
                Some(json!({"job": {"title": "SRE"}, "user_profile": {"skills": ["Go"]}})),
            )
            .await
            .unwrap();

        assert_eq!(result["match_analysis"]["match_percentage"], 80);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_under_specified_actions_skip_the_model() {
        let (ctx, llm, _dir) = context(AgentKind::JobSearch, &[]);
        let agent = JobSearchAgent::new(ctx);

        for (action, data) in [
            ("search_jobs", None),
            ("save_job", Some(json!({}))),
            ("remove_saved_job", Some(json!({"id": "job1"}))),
            ("analyze_job_match", Some(json!({"job": {"title": "SRE"}}))),
        ] {
            let result = agent.run(action, data).await.unwrap();
            assert_eq!(result, json!({"error": INVALID_ACTION}), "{action}");
        }
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_jobs_accepts_null_keywords() {
        let (ctx, llm, _dir) = context(AgentKind::JobSearch, &[r#"[{"id": "j1"}]"#]);
        let agent = JobSearchAgent::new(ctx);

        let result = agent
            .run("search_jobs", Some(json!({"job_title": "SRE", "keywords": null})))
            .await
            .unwrap();

        assert_eq!(result["jobs"][0]["id"], "j1");
        assert_eq!(llm.call_count(), 1);
        assert!(!llm.calls()[0].prompt.contains("keywords"));
    }

    #[tokio::test]
    async fn test_job_match_prompt_keeps_caller_braces() {
        let (ctx, llm, _dir) = context(AgentKind::JobSearch, &[r#"{"match_percentage": 50}"#]);
        let agent = JobSearchAgent::new(ctx);

        let job = json!({
            "title": "Compiler Engineer",
            "description": "Template engine using {skills} and {education} syntax",
        });
        let profile = json!({"skills": ["SECRET_SKILL"], "education": [{"school": "MIT"}]});
        agent.analyze_job_match(&job, &profile).await.unwrap();

        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("- Description: Template engine using {skills} and {education} syntax"));
        assert!(prompt.contains("- Skills: SECRET_SKILL"));
    }
}
