use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::services::scorer::Score;

/// Opaque job identifier, echoed back exactly as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Value);

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text a present `null` skills value is coerced to
pub const NULL_SKILLS: &str = "None";

/// Raw pipe-delimited skills string
///
/// Non-string values are coerced to text before parsing: numbers and
/// booleans by their JSON spelling, a present `null` to `None`, arrays and
/// objects to compact JSON. Only an absent field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillsField(pub String);

impl SkillsField {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Value> for SkillsField {
    fn from(value: Value) -> Self {
        let raw = match value {
            Value::Null => NULL_SKILLS.to_string(),
            Value::String(s) => s,
            other => other.to_string(),
        };
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for SkillsField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SkillsField::from)
    }
}

/// The user being matched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub skills: SkillsField,
}

/// A candidate job posting
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub id: JobId,
    #[serde(default)]
    pub skills: SkillsField,
}

/// A job the classifier accepted, before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub job_id: JobId,
    pub score: Score,
}

// ============================================================================
// Request validation
// ============================================================================

/// Request body before validation; both fields may be absent or blank
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecommendationRequest {
    pub user_profile: Option<Value>,
    pub jobs: Option<Value>,
}

impl From<Map<String, Value>> for RawRecommendationRequest {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            user_profile: body.remove("user_profile"),
            jobs: body.remove("jobs"),
        }
    }
}

/// A validated, fully typed recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub user_profile: UserProfile,
    pub jobs: Vec<JobPosting>,
}

/// Blank values count as missing: null, false, zero, "", [] and {}
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Types a value that must be a JSON object
///
/// Derived struct deserializers also accept arrays of fields, so the shape is
/// checked first.
fn from_object<T: DeserializeOwned>(value: Value, field: &str) -> AppResult<T> {
    if !value.is_object() {
        return Err(AppError::InvalidPayload(format!(
            "{field}: expected an object, got {}",
            kind_of(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| AppError::InvalidPayload(format!("{field}: {e}")))
}

impl RawRecommendationRequest {
    /// Checks that both fields are present, then types them
    ///
    /// An empty `jobs` array is accepted. Presence is checked for both fields
    /// before either is typed, so a missing field always wins over a
    /// malformed one.
    pub fn validate(self) -> AppResult<RecommendationRequest> {
        let user_profile = self.user_profile.filter(|v| !is_blank(v));
        let jobs = self
            .jobs
            .filter(|v| !is_blank(v) || matches!(v, Value::Array(_)));

        let (Some(user_profile), Some(jobs)) = (user_profile, jobs) else {
            return Err(AppError::MissingInput);
        };

        let user_profile: UserProfile = from_object(user_profile, "user_profile")?;
        let jobs = match jobs {
            Value::Array(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| from_object(entry, &format!("jobs[{idx}]")))
                .collect::<AppResult<Vec<JobPosting>>>()?,
            other => {
                return Err(AppError::InvalidPayload(format!(
                    "jobs: expected an array, got {}",
                    kind_of(&other)
                )))
            }
        };

        Ok(RecommendationRequest { user_profile, jobs })
    }
}
