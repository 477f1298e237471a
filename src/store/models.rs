use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Development,
    Analysis,
    Optimization,
    Documentation,
    General,
}

impl PromptCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptCategory::Development => "development",
            PromptCategory::Analysis => "analysis",
            PromptCategory::Optimization => "optimization",
            PromptCategory::Documentation => "documentation",
            PromptCategory::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "development" => Some(PromptCategory::Development),
            "analysis" => Some(PromptCategory::Analysis),
            "optimization" => Some(PromptCategory::Optimization),
            "documentation" => Some(PromptCategory::Documentation),
            "general" => Some(PromptCategory::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Technical,
    Business,
    Creative,
    Academic,
    Other,
}

impl RoleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Technical => "technical",
            RoleCategory::Business => "business",
            RoleCategory::Creative => "creative",
            RoleCategory::Academic => "academic",
            RoleCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "technical" => Some(RoleCategory::Technical),
            "business" => Some(RoleCategory::Business),
            "creative" => Some(RoleCategory::Creative),
            "academic" => Some(RoleCategory::Academic),
            "other" => Some(RoleCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: PromptCategory,
    pub rule_ids: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub category: RoleCategory,
    pub expertise: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Singleton personalization record. Overwritten in place, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub profession: String,
    pub expertise: Vec<String>,
    pub interests: Vec<String>,
    pub description: String,
    pub preferred_language: String,
    pub communication_style: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            profession: String::new(),
            expertise: Vec::new(),
            interests: Vec::new(),
            description: String::new(),
            preferred_language: "English".to_string(),
            communication_style: "Balanced".to_string(),
        }
    }
}
