use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::agents::completeness::{compute_completeness_report, CompletenessReport};
use crate::agents::payload::Payload;
use crate::agents::{to_json, Agent, AgentAction, AgentContext, AgentKind};
use crate::errors::AppError;
use crate::models::user::{merge_basic_info, ProfileView};
use crate::store::{Document, DocumentKey};

/// List-valued profile sections that grow by appending one entry at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    WorkExperience,
    Education,
    Projects,
    Certifications,
}

impl ProfileSection {
    pub fn key(self) -> &'static str {
        match self {
            ProfileSection::WorkExperience => "work_experience",
            ProfileSection::Education => "education",
            ProfileSection::Projects => "projects",
            ProfileSection::Certifications => "certifications",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserInfoAction {
    GetUserInfo,
    CollectBasicInfo(Map<String, Value>),
    AddEntry(ProfileSection, Value),
    AddSkills(Vec<String>),
    AnalyzeProfileCompleteness,
}

impl AgentAction for UserInfoAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        let section = match name {
            "add_work_experience" => Some(ProfileSection::WorkExperience),
            "add_education" => Some(ProfileSection::Education),
            "add_projects" => Some(ProfileSection::Projects),
            "add_certifications" => Some(ProfileSection::Certifications),
            _ => None,
        };
        if let Some(section) = section {
            return Some(Self::AddEntry(section, Payload::from_data(data)?.into_value()));
        }

        match name {
            "get_user_info" => Some(Self::GetUserInfo),
            "analyze_profile_completeness" => Some(Self::AnalyzeProfileCompleteness),
            "collect_basic_info" => Some(Self::CollectBasicInfo(
                Payload::from_data(data)?.into_inner(),
            )),
            "add_skills" => Some(Self::AddSkills(
                Payload::from_data(data)?.take_as("skills")?,
            )),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::GetUserInfo => "get_user_info",
            Self::CollectBasicInfo(_) => "collect_basic_info",
            Self::AddEntry(ProfileSection::WorkExperience, _) => "add_work_experience",
            Self::AddEntry(ProfileSection::Education, _) => "add_education",
            Self::AddEntry(ProfileSection::Projects, _) => "add_projects",
            Self::AddEntry(ProfileSection::Certifications, _) => "add_certifications",
            Self::AddSkills(_) => "add_skills",
            Self::AnalyzeProfileCompleteness => "analyze_profile_completeness",
        }
    }
}

/// Owns the single user profile document.
pub struct UserInfoAgent {
    ctx: AgentContext,
}

impl UserInfoAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn get_user_info(&self) -> Result<Document, AppError> {
        Ok(self.ctx.store().load(DocumentKey::UserProfile).await?)
    }

    /// Replaces the stored basic info; fields the update omits keep their previous values.
    pub async fn collect_basic_info(&self, update: Map<String, Value>) -> Result<Value, AppError> {
        let basic_info = self
            .ctx
            .store()
            .update(DocumentKey::UserProfile, |doc| {
                let merged = Value::Object(merge_basic_info(doc.get("basic_info"), &update));
                doc.insert("basic_info".to_string(), merged.clone());
                merged
            })
            .await?;
        Ok(basic_info)
    }

    /// Appends one entry to a list section and returns the whole list.
    pub async fn add_entry(&self, section: ProfileSection, entry: Value) -> Result<Value, AppError> {
        let entries = self
            .ctx
            .store()
            .update(DocumentKey::UserProfile, |doc| {
                let mut list = match doc.remove(section.key()) {
                    Some(Value::Array(items)) => items,
                    None | Some(Value::Null) => Vec::new(),
                    Some(other) => {
                        warn!(
                            section = section.key(),
                            "Stored profile section is not a list; keeping it as the first entry"
                        );
                        vec![other]
                    }
                };
                list.push(entry);
                let list = Value::Array(list);
                doc.insert(section.key().to_string(), list.clone());
                list
            })
            .await?;
        Ok(entries)
    }

    /// Unions new skills into the stored set, keeping first-seen order.
    pub async fn add_skills(&self, skills: Vec<String>) -> Result<Vec<String>, AppError> {
        let merged = self
            .ctx
            .store()
            .update(DocumentKey::UserProfile, |doc| {
                let mut merged: Vec<String> = ProfileView::new(doc)
                    .skills()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                for skill in skills {
                    if !merged.contains(&skill) {
                        merged.push(skill);
                    }
                }
                doc.insert("skills".to_string(), json!(merged));
                merged
            })
            .await?;
        Ok(merged)
    }

    pub async fn analyze_profile_completeness(&self) -> Result<CompletenessReport, AppError> {
        let doc = self.get_user_info().await?;
        Ok(compute_completeness_report(ProfileView::new(&doc)))
    }
}

#[async_trait]
impl Agent for UserInfoAgent {
    type Action = UserInfoAction;

    fn kind(&self) -> AgentKind {
        AgentKind::UserInfo
    }

    async fn execute(&self, action: UserInfoAction) -> Result<Value, AppError> {
        match action {
            UserInfoAction::GetUserInfo => Ok(Value::Object(self.get_user_info().await?)),
            UserInfoAction::CollectBasicInfo(update) => self.collect_basic_info(update).await,
            UserInfoAction::AddEntry(section, entry) => {
                let entries = self.add_entry(section, entry).await?;
                Ok(json!({ section.key(): entries }))
            }
            UserInfoAction::AddSkills(skills) => {
                Ok(json!({ "skills": self.add_skills(skills).await? }))
            }
            UserInfoAction::AnalyzeProfileCompleteness => {
                to_json(&self.analyze_profile_completeness().await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::context;
    use crate::agents::INVALID_ACTION;

    #[tokio::test]
    async fn test_add_skills_deduplicates() {
        let (ctx, llm, _dir) = context(AgentKind::UserInfo, &[]);
        let agent = UserInfoAgent::new(ctx);

        agent
            .run("add_skills", Some(json!({"skills": ["Python"]})))
            .await
            .unwrap();
        let result = agent
            .run("add_skills", Some(json!({"skills": ["Python", "Go"]})))
            .await
            .unwrap();

        assert_eq!(result, json!({"skills": ["Python", "Go"]}));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_collect_basic_info_keeps_previous_fields() {
        let (ctx, _llm, _dir) = context(AgentKind::UserInfo, &[]);
        let agent = UserInfoAgent::new(ctx);

        agent
            .run(
                "collect_basic_info",
                Some(json!({"name": "Ada Lovelace", "email": "ada@example.com"})),
            )
            .await
            .unwrap();
        let basic = agent
            .run("collect_basic_info", Some(json!({"phone": "555-0100"})))
            .await
            .unwrap();

        assert_eq!(basic["name"], "Ada Lovelace");
        assert_eq!(basic["phone"], "555-0100");
        assert_eq!(basic["linkedin"], "");

        let profile = agent.run("get_user_info", None).await.unwrap();
        assert_eq!(profile["basic_info"], basic);
    }

    #[tokio::test]
    async fn test_add_entries_append_and_preserve_other_sections() {
        let (ctx, _llm, _dir) = context(AgentKind::UserInfo, &[]);
        let agent = UserInfoAgent::new(ctx);

        agent
            .run("add_skills", Some(json!({"skills": ["Rust"]})))
            .await
            .unwrap();
        agent
            .run("add_work_experience", Some(json!({"company": "Acme"})))
            .await
            .unwrap();
        let result = agent
            .run("add_work_experience", Some(json!({"company": "Globex"})))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"work_experience": [{"company": "Acme"}, {"company": "Globex"}]})
        );
        let profile = agent.get_user_info().await.unwrap();
        assert_eq!(profile["skills"], json!(["Rust"]));
    }

    #[tokio::test]
    async fn test_completeness_of_empty_profile() {
        let (ctx, _llm, _dir) = context(AgentKind::UserInfo, &[]);
        let agent = UserInfoAgent::new(ctx);

        let report = agent
            .run("analyze_profile_completeness", None)
            .await
            .unwrap();
        assert_eq!(report["completeness_percentage"], 0.0);
        assert_eq!(report["missing_sections"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_missing_data_is_rejected_without_touching_disk() {
        let (ctx, _llm, dir) = context(AgentKind::UserInfo, &[]);
        let agent = UserInfoAgent::new(ctx);

        for (action, data) in [
            ("collect_basic_info", None),
            ("add_education", Some(json!({}))),
            ("add_skills", Some(json!({"languages": ["Go"]}))),
            ("add_skills", Some(json!({"skills": "Go"}))),
            ("delete_profile", Some(json!({"really": true}))),
        ] {
            let result = agent.run(action, data).await.unwrap();
            assert_eq!(result, json!({"error": INVALID_ACTION}), "{action}");
        }
        assert!(!dir.path().join("user_data.json").exists());
    }

    #[tokio::test]
    async fn test_non_list_section_is_kept_as_first_entry() {
        let (ctx, _llm, dir) = context(AgentKind::UserInfo, &[]);
        std::fs::write(
            dir.path().join("user_data.json"),
            r#"{"certifications": "AWS SAA"}"#,
        )
        .unwrap();
        let agent = UserInfoAgent::new(ctx);

        let entries = agent
            .add_entry(ProfileSection::Certifications, json!({"name": "CKA"}))
            .await
            .unwrap();

        assert_eq!(entries, json!(["AWS SAA", {"name": "CKA"}]));
    }
}
