use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::agents::payload::Payload;
use crate::agents::prompts::{
    fill_template, COFFEE_CHAT_PROMPT, COFFEE_CHAT_SYSTEM, CONNECTION_MESSAGE_PROMPT,
    CONNECTION_MESSAGE_SYSTEM, CONTACT_ANALYSIS_PROMPT, CONTACT_ANALYSIS_SYSTEM, FOLLOW_UP_PROMPT,
    FOLLOW_UP_SYSTEM,
};
use crate::agents::{
    degraded, to_json, to_prompt_json, to_prompt_text, Agent, AgentAction, AgentContext,
    AgentKind, Generated,
};
use crate::errors::AppError;
use crate::models::artifact::{timestamp, ContactMetadata};
use crate::models::job::JobView;
use crate::models::user::ProfileView;
use crate::store::{ArtifactKind, DocumentKey};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkingAction {
    ConnectionMessage {
        user_profile: Value,
        contact_info: Value,
        job: Option<Value>,
    },
    CoffeeChatTopics {
        user_profile: Value,
        contact_info: Value,
        job: Option<Value>,
    },
    FollowUpMessage {
        user_profile: Value,
        contact_info: Value,
        meeting_notes: Value,
    },
    AnalyzeContactProfile {
        contact_info: Value,
    },
    GetSaved {
        contact_id: String,
    },
}

impl AgentAction for NetworkingAction {
    fn parse(name: &str, data: Option<Value>) -> Option<Self> {
        let mut payload = Payload::from_data(data)?;
        match name {
            "generate_connection_message" => Some(Self::ConnectionMessage {
                user_profile: payload.take("user_profile")?,
                contact_info: payload.take("contact_info")?,
                job: payload.take("job"),
            }),
            "generate_coffee_chat_topics" => Some(Self::CoffeeChatTopics {
                user_profile: payload.take("user_profile")?,
                contact_info: payload.take("contact_info")?,
                job: payload.take("job"),
            }),
            "generate_follow_up_message" => Some(Self::FollowUpMessage {
                user_profile: payload.take("user_profile")?,
                contact_info: payload.take("contact_info")?,
                meeting_notes: payload.take("meeting_notes")?,
            }),
            "analyze_contact_profile" => Some(Self::AnalyzeContactProfile {
                contact_info: payload.take("contact_info")?,
            }),
            "get_saved_networking_info" => Some(Self::GetSaved {
                contact_id: payload.take_id("contact_id")?,
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::ConnectionMessage { .. } => "generate_connection_message",
            Self::CoffeeChatTopics { .. } => "generate_coffee_chat_topics",
            Self::FollowUpMessage { .. } => "generate_follow_up_message",
            Self::AnalyzeContactProfile { .. } => "analyze_contact_profile",
            Self::GetSaved { .. } => "get_saved_networking_info",
        }
    }
}

/// Read-only accessors over a contact record.
#[derive(Debug, Clone, Copy)]
struct ContactView<'a>(&'a Value);

impl<'a> ContactView<'a> {
    fn field(&self, key: &str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// The caller-supplied contact id, if any.
    fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Networking material for one contact, merged into that contact's document.
struct ContactRecord<'a> {
    contact_info: &'a Value,
    job: Option<&'a Value>,
    section: &'static str,
    value: Value,
    extra: Option<(&'static str, Value)>,
    replace_metadata: bool,
}

/// Drafts outreach and keeps per-contact networking notes.
pub struct NetworkingAgent {
    ctx: AgentContext,
}

impl NetworkingAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn generate_connection_message(
        &self,
        user_profile: &Value,
        contact_info: &Value,
        job: Option<&Value>,
    ) -> Result<Value, AppError> {
        let profile = ProfileView::from_value(user_profile);
        let contact = ContactView(contact_info);

        let connection_context = match job.map(JobView) {
            Some(job) => format!(
                "I'm interested in the {} position at {}",
                job.title(),
                job.company()
            ),
            None => {
                let industry = Some(contact.field("industry"))
                    .filter(|i| !i.is_empty())
                    .unwrap_or("industry");
                format!("I'm interested in connecting with professionals in the {industry}")
            }
        };
        let recent_experience = profile
            .entries("work_experience")
            .first()
            .map(to_prompt_json)
            .unwrap_or_default();

        let prompt = fill_template(
            CONNECTION_MESSAGE_PROMPT,
            &[
                ("user_name", profile.basic_field("name")),
                ("user_title", profile.basic_field("title")),
                ("user_experience", recent_experience.as_str()),
                ("contact_name", contact.field("name")),
                ("contact_title", contact.field("title")),
                ("contact_company", contact.field("company")),
                ("connection_context", connection_context.as_str()),
            ],
        );

        let messages = match self.ctx.complete_json(CONNECTION_MESSAGE_SYSTEM, &prompt).await? {
            Generated::Json(messages) => messages,
            Generated::Unparsed(raw) => {
                return Ok(degraded("Failed to generate connection messages", raw))
            }
        };

        self.record(ContactRecord {
            contact_info,
            job,
            section: "connection_messages",
            value: messages.clone(),
            extra: None,
            replace_metadata: true,
        })
        .await?;
        Ok(messages)
    }

    pub async fn generate_coffee_chat_topics(
        &self,
        contact_info: &Value,
        job: Option<&Value>,
    ) -> Result<Value, AppError> {
        let contact = ContactView(contact_info);

        let context = match job.map(JobView) {
            Some(job) => format!(
                "The user is interested in the {} position at {}",
                job.title(),
                job.company()
            ),
            None => format!(
                "The user is interested in learning more about careers in {}",
                contact.field("industry")
            ),
        };

        let prompt = fill_template(
            COFFEE_CHAT_PROMPT,
            &[
                ("contact_name", contact.field("name")),
                ("contact_title", contact.field("title")),
                ("contact_company", contact.field("company")),
                ("context", context.as_str()),
            ],
        );

        let topics = match self.ctx.complete_json(COFFEE_CHAT_SYSTEM, &prompt).await? {
            Generated::Json(topics) => topics,
            Generated::Unparsed(raw) => {
                return Ok(degraded("Failed to generate coffee chat topics", raw))
            }
        };

        self.record(ContactRecord {
            contact_info,
            job,
            section: "coffee_chat_topics",
            value: topics.clone(),
            extra: None,
            replace_metadata: false,
        })
        .await?;
        Ok(topics)
    }

    /// Drafts follow-up emails and stores the meeting notes alongside them.
    pub async fn generate_follow_up_message(
        &self,
        user_profile: &Value,
        contact_info: &Value,
        meeting_notes: &Value,
    ) -> Result<Value, AppError> {
        let profile = ProfileView::from_value(user_profile);
        let contact = ContactView(contact_info);

        let prompt = fill_template(
            FOLLOW_UP_PROMPT,
            &[
                ("user_name", profile.basic_field("name")),
                ("contact_name", contact.field("name")),
                ("meeting_notes", to_prompt_text(meeting_notes).as_str()),
            ],
        );

        let messages = match self.ctx.complete_json(FOLLOW_UP_SYSTEM, &prompt).await? {
            Generated::Json(messages) => messages,
            Generated::Unparsed(raw) => {
                return Ok(degraded("Failed to generate follow-up messages", raw))
            }
        };

        self.record(ContactRecord {
            contact_info,
            job: None,
            section: "follow_up_messages",
            value: messages.clone(),
            extra: Some(("meeting_notes", meeting_notes.clone())),
            replace_metadata: false,
        })
        .await?;
        Ok(messages)
    }

    pub async fn analyze_contact_profile(&self, contact_info: &Value) -> Result<Value, AppError> {
        let contact = ContactView(contact_info);

        let prompt = fill_template(
            CONTACT_ANALYSIS_PROMPT,
            &[
                ("name", contact.field("name")),
                ("title", contact.field("title")),
                ("company", contact.field("company")),
                ("industry", contact.field("industry")),
                ("background", contact.field("background")),
            ],
        );

        let analysis = match self.ctx.complete_json(CONTACT_ANALYSIS_SYSTEM, &prompt).await? {
            Generated::Json(analysis) => analysis,
            Generated::Unparsed(raw) => return Ok(degraded("Failed to analyze contact profile", raw)),
        };

        self.record(ContactRecord {
            contact_info,
            job: None,
            section: "profile_analysis",
            value: analysis.clone(),
            extra: None,
            replace_metadata: false,
        })
        .await?;
        Ok(analysis)
    }

    pub async fn get_saved_networking_info(&self, contact_id: &str) -> Result<Value, AppError> {
        let doc = self
            .ctx
            .store()
            .load(DocumentKey::Artifact(ArtifactKind::Networking, contact_id))
            .await?;
        Ok(Value::Object(doc))
    }

    /// Merges generated material into the contact's document. Contacts
    /// without an id are filed under a fresh one. Returns the id used.
    async fn record(&self, record: ContactRecord<'_>) -> Result<String, AppError> {
        let contact_id = ContactView(record.contact_info)
            .id()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let metadata = to_json(&ContactMetadata {
            contact_id: contact_id.clone(),
            job_id: record
                .job
                .and_then(|job| JobView(job).id())
                .map(str::to_string),
            generated_timestamp: timestamp(),
        })?;

        let mut fields = Map::new();
        fields.insert("contact_info".to_string(), record.contact_info.clone());
        fields.insert(record.section.to_string(), record.value);
        if let Some((key, value)) = record.extra {
            fields.insert(key.to_string(), value);
        }

        let replace_metadata = record.replace_metadata;
        self.ctx
            .store()
            .update(
                DocumentKey::Artifact(ArtifactKind::Networking, &contact_id),
                |doc| {
                    doc.extend(fields);
                    if replace_metadata || !doc.contains_key("metadata") {
                        doc.insert("metadata".to_string(), metadata);
                    }
                },
            )
            .await?;
        Ok(contact_id)
    }
}

#[async_trait]
impl Agent for NetworkingAgent {
    type Action = NetworkingAction;

    fn kind(&self) -> AgentKind {
        AgentKind::Networking
    }

    async fn execute(&self, action: NetworkingAction) -> Result<Value, AppError> {
        match action {
            NetworkingAction::ConnectionMessage {
                user_profile,
                contact_info,
                job,
            } => {
                let contact_info = identify_contact(contact_info);
                Ok(json!({
                    "connection_messages": self
                        .generate_connection_message(&user_profile, &contact_info, job.as_ref())
                        .await?,
                    "contact_id": ContactView(&contact_info).id(),
                }))
            }
            // Topics depend only on the contact and the job.
            NetworkingAction::CoffeeChatTopics {
                user_profile: _,
                contact_info,
                job,
            } => {
                let contact_info = identify_contact(contact_info);
                Ok(json!({
                    "coffee_chat_topics": self
                        .generate_coffee_chat_topics(&contact_info, job.as_ref())
                        .await?,
                    "contact_id": ContactView(&contact_info).id(),
                }))
            }
            NetworkingAction::FollowUpMessage {
                user_profile,
                contact_info,
                meeting_notes,
            } => {
                let contact_info = identify_contact(contact_info);
                Ok(json!({
                    "follow_up_messages": self
                        .generate_follow_up_message(&user_profile, &contact_info, &meeting_notes)
                        .await?,
                    "contact_id": ContactView(&contact_info).id(),
                }))
            }
            NetworkingAction::AnalyzeContactProfile { contact_info } => {
                let contact_info = identify_contact(contact_info);
                Ok(json!({
                    "profile_analysis": self.analyze_contact_profile(&contact_info).await?,
                    "contact_id": ContactView(&contact_info).id(),
                }))
            }
            NetworkingAction::GetSaved { contact_id } => Ok(json!({
                "networking_info": self.get_saved_networking_info(&contact_id).await?
            })),
        }
    }
}

/// Gives an object contact without an id a generated one, so the id the
/// document is filed under is also stored in its `contact_info`.
fn identify_contact(mut contact_info: Value) -> Value {
    if ContactView(&contact_info).id().is_none() {
        if let Value::Object(fields) = &mut contact_info {
            let id = Uuid::new_v4().simple().to_string();
            fields.insert("id".to_string(), Value::String(id));
        }
    }
    contact_info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::context;

    fn contact() -> Value {
        json!({"id": "grace", "name": "Grace Hopper", "title": "Rear Admiral", "company": "US Navy"})
    }

    #[tokio::test]
    async fn test_connection_message_saves_under_contact_id() {
        let (ctx, llm, dir) = context(AgentKind::Networking, &[r#"{"direct": "Hi Grace"}"#]);
        let agent = NetworkingAgent::new(ctx);

        let result = agent
            .run(
                "generate_connection_message",
                Some(json!({
                    "user_profile": {"basic_info": {"name": "Ada"}},
                    "contact_info": contact(),
                    "job": {"id": "job1", "title": "Compiler Engineer", "company": "Navy"}
                })),
            )
            .await
            .unwrap();

        assert_eq!(result["connection_messages"]["direct"], "Hi Grace");
        assert!(dir.path().join("networking/networking_grace.json").exists());

        let info = agent.get_saved_networking_info("grace").await.unwrap();
        assert_eq!(info["metadata"]["contact_id"], "grace");
        assert_eq!(info["metadata"]["job_id"], "job1");
        assert_eq!(info["contact_info"]["name"], "Grace Hopper");

        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("I'm interested in the Compiler Engineer position at Navy"));
    }

    #[tokio::test]
    async fn test_follow_up_stores_meeting_notes_and_keeps_metadata() {
        let (ctx, _llm, _dir) = context(
            AgentKind::Networking,
            &[r#"{"direct": "Hi"}"#, r#"{"standard": "Thanks!"}"#],
        );
        let agent = NetworkingAgent::new(ctx);

        let job = json!({"id": "job1"});
        agent
            .generate_connection_message(&json!({}), &contact(), Some(&job))
            .await
            .unwrap();
        let before = agent.get_saved_networking_info("grace").await.unwrap();

        agent
            .generate_follow_up_message(&json!({}), &contact(), &json!("Talked about COBOL"))
            .await
            .unwrap();

        let after = agent.get_saved_networking_info("grace").await.unwrap();
        assert_eq!(after["meeting_notes"], "Talked about COBOL");
        assert_eq!(after["follow_up_messages"]["standard"], "Thanks!");
        assert_eq!(after["connection_messages"]["direct"], "Hi");
        assert_eq!(after["metadata"], before["metadata"]);
    }

    #[tokio::test]
    async fn test_contact_without_id_gets_generated_one() {
        let (ctx, _llm, dir) = context(AgentKind::Networking, &[r#"{"insights": []}"#]);
        let agent = NetworkingAgent::new(ctx);

        let id = agent
            .record(ContactRecord {
                contact_info: &json!({"name": "Anonymous"}),
                job: None,
                section: "profile_analysis",
                value: json!({"insights": []}),
                extra: None,
                replace_metadata: false,
            })
            .await
            .unwrap();

        assert!(!id.is_empty());
        let path = dir.path().join(format!("networking/networking_{id}.json"));
        assert!(path.exists());
        let info = agent.get_saved_networking_info(&id).await.unwrap();
        assert!(info["metadata"].get("job_id").is_none());
    }

    #[tokio::test]
    async fn test_coffee_chat_without_job_uses_industry() {
        let (ctx, llm, _dir) = context(AgentKind::Networking, &[r#"{"introduction": []}"#]);
        let agent = NetworkingAgent::new(ctx);

        let mut info = contact();
        info["industry"] = json!("defense");
        let result = agent
            .run(
                "generate_coffee_chat_topics",
                Some(json!({"user_profile": {}, "contact_info": info})),
            )
            .await
            .unwrap();

        assert!(result["coffee_chat_topics"]["introduction"].is_array());
        assert!(llm.calls()[0]
            .prompt
            .contains("learning more about careers in defense"));
    }

    #[tokio::test]
    async fn test_analysis_degrades_without_saving() {
        let (ctx, _llm, dir) = context(AgentKind::Networking, &["She is great."]);
        let agent = NetworkingAgent::new(ctx);

        let result = agent.analyze_contact_profile(&contact()).await.unwrap();
        assert_eq!(result["raw_response"], "She is great.");
        assert!(!dir.path().join("networking").exists());
    }

    #[tokio::test]
    async fn test_generated_contact_id_is_returned_and_retrievable() {
        let (ctx, _llm, _dir) = context(AgentKind::Networking, &[r#"{"insights": ["COBOL"]}"#]);
        let agent = NetworkingAgent::new(ctx);

        let result = agent
            .run(
                "analyze_contact_profile",
                Some(json!({"contact_info": {"name": "Anonymous"}})),
            )
            .await
            .unwrap();

        let id = result["contact_id"].as_str().unwrap();
        let info = agent.get_saved_networking_info(id).await.unwrap();
        assert_eq!(info["contact_info"]["id"], id);
        assert_eq!(info["profile_analysis"]["insights"][0], "COBOL");
        assert_eq!(info["metadata"]["contact_id"], id);
    }

    #[tokio::test]
    async fn test_supplied_contact_id_is_echoed() {
        let (ctx, _llm, _dir) = context(AgentKind::Networking, &[r#"{"insights": []}"#]);
        let agent = NetworkingAgent::new(ctx);

        let result = agent
            .run("analyze_contact_profile", Some(json!({"contact_info": contact()})))
            .await
            .unwrap();
        assert_eq!(result["contact_id"], "grace");
    }
}
