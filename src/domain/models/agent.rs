use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Platform-side agent status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentStatus {
    Active,
    Inactive,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for AgentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(anyhow::anyhow!("Invalid agent status: {s}")),
        }
    }
}

/// Language model settings of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub llm_type: String,
    #[serde(default)]
    pub model_provider: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub model_temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Remaining platform fields (tools, graph data, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Speech-to-text settings of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttSettings {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model: String,
}

/// Text-to-speech settings of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsSettings {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub voice_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_temperature: Option<f64>,
}

/// Full agent configuration as returned by the calling platform.
///
/// Fields voxdesk does not interpret are kept in `extra` so that a cached
/// record serializes back to exactly what the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Server-assigned, immutable identifier
    pub ai_agent_id: String,

    pub agent_name: String,

    #[serde(default = "default_status")]
    pub agent_status: AgentStatus,

    #[serde(default)]
    pub language_code: String,

    /// Creation time, seconds since the Unix epoch
    #[serde(default)]
    pub created_at: i64,

    /// Last modification time, seconds since the Unix epoch
    #[serde(default)]
    pub modified_at: i64,

    #[serde(default)]
    pub welcome_message: String,

    pub llm: LlmSettings,

    pub stt: SttSettings,

    pub tts: TtsSettings,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn default_status() -> AgentStatus {
    AgentStatus::Active
}

impl AgentRecord {
    pub fn id(&self) -> &str {
        &self.ai_agent_id
    }

    /// Derive the display row for this record.
    pub fn to_row(&self) -> Agent {
        Agent::from(self)
    }
}

/// Display row rendered in agent tables.
///
/// Every field is derived from an [`AgentRecord`]; none of them is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// `"{model_provider} ({language_code})"`
    pub agent_type: String,
    /// `"{voice_name} ({provider})"`
    pub voice: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AgentRecord> for Agent {
    fn from(record: &AgentRecord) -> Self {
        let agent_type = if record.llm.model_provider.is_empty() {
            "Unknown".to_string()
        } else {
            format!("{} ({})", record.llm.model_provider, record.language_code)
        };
        let voice = if record.tts.voice_name.is_empty() {
            "Unknown".to_string()
        } else {
            format!("{} ({})", record.tts.voice_name, record.tts.provider)
        };

        Self {
            id: record.ai_agent_id.clone(),
            name: record.agent_name.clone(),
            agent_type,
            voice,
            created_at: epoch_to_utc(record.created_at),
            updated_at: epoch_to_utc(record.modified_at),
        }
    }
}

fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
