use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::job::JobView;

/// Metadata block attached to every job-keyed artifact
/// (resume, cover letter, interview prep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub generated_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_timestamp: Option<String>,
}

impl ArtifactMetadata {
    pub fn for_job(job: JobView<'_>) -> Self {
        Self {
            job_id: job.id().unwrap_or_default().to_string(),
            job_title: job.title().to_string(),
            company: job.company().to_string(),
            generated_timestamp: timestamp(),
            optimized_timestamp: None,
        }
    }
}

/// Metadata block attached to networking artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMetadata {
    pub contact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub generated_timestamp: String,
}

/// Carries the source document's metadata over to its optimized version and
/// stamps `optimized_timestamp`. Returns the job id the result belongs to.
pub fn carry_metadata(source: &Value, optimized: &mut Map<String, Value>) -> Option<String> {
    let Some(Value::Object(metadata)) = source.get("metadata") else {
        return None;
    };
    let mut metadata = metadata.clone();
    metadata.insert("optimized_timestamp".to_string(), Value::String(timestamp()));
    let job_id = metadata
        .get("job_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    optimized.insert("metadata".to_string(), Value::Object(metadata));
    job_id
}

/// RFC 3339 timestamp used for every generated/optimized stamp.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}
