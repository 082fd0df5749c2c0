//! Request and response bodies exchanged with the calling platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::agent::AgentRecord;

/// LLM section of a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLlmSettings {
    pub llm_type: String,
    pub model_provider: String,
    pub model_name: String,
    pub system_prompt: String,
    pub model_temperature: f64,
    pub max_tokens: u32,
}

/// STT section of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSttSettings {
    pub provider: String,
    pub model: String,
}

/// TTS section of a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTtsSettings {
    pub provider: String,
    pub voice_name: String,
    pub voice_id: String,
    pub voice_temperature: f64,
}

/// Body of `POST /agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub llm: NewLlmSettings,
    pub stt: NewSttSettings,
    pub tts: NewTtsSettings,
    pub welcome_message: String,
}

impl Default for CreateAgentRequest {
    /// The "Simple Agent" starter template offered by the console.
    fn default() -> Self {
        Self {
            agent_name: "Simple Agent".to_string(),
            language_code: None,
            llm: NewLlmSettings {
                llm_type: "simple".to_string(),
                model_provider: "openai".to_string(),
                model_name: "gpt-4o-mini".to_string(),
                system_prompt: "You are a simple friendly AI assistant".to_string(),
                model_temperature: 0.0,
                max_tokens: 4096,
            },
            stt: NewSttSettings {
                provider: "pia".to_string(),
                model: "pia_bangla_v1".to_string(),
            },
            tts: NewTtsSettings {
                provider: "pia".to_string(),
                voice_name: "Maria".to_string(),
                voice_id: "maria".to_string(),
                voice_temperature: 0.0,
            },
            welcome_message: "Hello, How Can I help you today?".to_string(),
        }
    }
}

impl CreateAgentRequest {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language_code = Some(code.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.llm.system_prompt = prompt.into();
        self
    }

    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    /// Check the request is well-formed. Name uniqueness is left to the server.
    pub fn validate(&self) -> Result<(), String> {
        if self.agent_name.trim().is_empty() {
            return Err("agent_name cannot be empty".to_string());
        }
        if self.llm.model_provider.trim().is_empty() {
            return Err("llm.model_provider cannot be empty".to_string());
        }
        if self.llm.model_name.trim().is_empty() {
            return Err("llm.model_name cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.llm.model_temperature) {
            return Err(format!(
                "llm.model_temperature must be between 0.0 and 2.0, got {}",
                self.llm.model_temperature
            ));
        }
        if self.tts.voice_id.trim().is_empty() {
            return Err("tts.voice_id cannot be empty".to_string());
        }
        Ok(())
    }
}

/// LLM fields that can be changed by a partial update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Body of `PATCH /agents/{id}`: only the fields being changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmPatch>,
}

impl AgentPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            agent_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = Some(message.into());
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language_code = Some(code.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.llm = Some(LlmPatch {
            system_prompt: Some(prompt.into()),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.agent_name.is_none()
            && self.language_code.is_none()
            && self.welcome_message.is_none()
            && self.llm.as_ref().map_or(true, |llm| llm.system_prompt.is_none())
    }

    /// Overlay the present fields onto `record`. Absent fields are left alone.
    pub fn apply_to(&self, record: &mut AgentRecord) {
        if let Some(name) = &self.agent_name {
            record.agent_name.clone_from(name);
        }
        if let Some(code) = &self.language_code {
            record.language_code.clone_from(code);
        }
        if let Some(message) = &self.welcome_message {
            record.welcome_message.clone_from(message);
        }
        if let Some(prompt) = self.llm.as_ref().and_then(|llm| llm.system_prompt.as_ref()) {
            record.llm.system_prompt.clone_from(prompt);
        }
    }
}

/// Response of `POST /agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentResponse {
    #[serde(alias = "agent_id")]
    pub ai_agent_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Confirmation returned by update and delete calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfirmation {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "agent_id", skip_serializing_if = "Option::is_none")]
    pub ai_agent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MutationConfirmation {
    /// Confirmation used when a delete succeeds with an empty or non-JSON body.
    pub fn deleted(agent_id: &str) -> Self {
        Self {
            status: "SUCCESS".to_string(),
            message: "AI agent deleted successfully".to_string(),
            ai_agent_id: Some(agent_id.to_string()),
            extra: Map::new(),
        }
    }
}

/// One page of `GET /agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentListPage {
    pub data: Vec<AgentRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::agent::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = AgentPatch::name("Renamed").with_system_prompt("Be terse");
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "agent_name": "Renamed", "llm": { "system_prompt": "Be terse" } })
        );
    }

    #[test]
    fn test_patch_touches_only_present_fields() {
        let original = record("a1", "old");
        let mut patched = original.clone();
        AgentPatch::name("X").apply_to(&mut patched);

        assert_eq!(patched.agent_name, "X");
        assert_eq!(patched.tts, original.tts);
        assert_eq!(patched.llm, original.llm);
        assert_eq!(patched.welcome_message, original.welcome_message);
        assert_eq!(patched.modified_at, original.modified_at);
    }

    #[test]
    fn test_patch_system_prompt_keeps_other_llm_fields() {
        let original = record("a1", "bot");
        let mut patched = original.clone();
        AgentPatch::default()
            .with_system_prompt("New prompt")
            .apply_to(&mut patched);

        assert_eq!(patched.llm.system_prompt, "New prompt");
        assert_eq!(patched.llm.model_name, original.llm.model_name);
        assert_eq!(patched.llm.max_tokens, original.llm.max_tokens);
    }

    #[test]
    fn test_empty_patch() {
        assert!(AgentPatch::default().is_empty());
        assert!(AgentPatch {
            llm: Some(LlmPatch::default()),
            ..Default::default()
        }
        .is_empty());
        assert!(!AgentPatch::name("x").is_empty());
    }

    #[test]
    fn test_default_create_request_is_valid() {
        let request = CreateAgentRequest::default();
        assert!(request.validate().is_ok());
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("language_code").is_none());
        assert_eq!(body["tts"]["voice_id"], "maria");
    }

    #[test]
    fn test_create_request_validation() {
        assert!(CreateAgentRequest::default().with_name("  ").validate().is_err());

        let mut hot = CreateAgentRequest::default();
        hot.llm.model_temperature = 3.5;
        assert!(hot.validate().unwrap_err().contains("model_temperature"));

        let mut silent = CreateAgentRequest::default();
        silent.tts.voice_id.clear();
        assert!(silent.validate().is_err());
    }

    #[test]
    fn test_create_response_accepts_agent_id_alias() {
        let resp: CreateAgentResponse = serde_json::from_value(json!({
            "agent_id": "agt_42",
            "status": "SUCCESS",
            "message": "created"
        }))
        .unwrap();
        assert_eq!(resp.ai_agent_id, "agt_42");
    }

    #[test]
    fn test_deleted_confirmation() {
        let confirmation = MutationConfirmation::deleted("agt_7");
        assert_eq!(confirmation.status, "SUCCESS");
        assert_eq!(confirmation.ai_agent_id.as_deref(), Some("agt_7"));
    }
}
