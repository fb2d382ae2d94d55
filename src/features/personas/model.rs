//! Persona record and conversation turn types.
//!
//! The serialized field names are the on-disk contract for
//! `<name>_persona.json` files and must not change.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::prompt_builder::persona_system_prompt;
use crate::core::{PersonaError, Result};
use crate::features::completion::ChatMessage;

/// One captured text sample (a tweet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// Style description plus the samples it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingStyle {
    pub style_analysis: String,
    pub sample_tweets: Vec<String>,
}

/// Denormalized view of the style and topics, kept for consumers of the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionGuidelines {
    pub tone: String,
    pub knowledge_base: Vec<String>,
}

/// A persona profile as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub tweets: Vec<Sample>,
    pub writing_style: WritingStyle,
    pub topics: Vec<String>,
    pub interaction_guidelines: InteractionGuidelines,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Persona {
    /// Assemble a persona, deriving `interaction_guidelines` from style and topics.
    pub fn new(
        name: impl Into<String>,
        tweets: Vec<Sample>,
        writing_style: WritingStyle,
        topics: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let interaction_guidelines = InteractionGuidelines {
            tone: writing_style.style_analysis.clone(),
            knowledge_base: topics.clone(),
        };

        Self {
            name: name.into(),
            tweets,
            writing_style,
            topics,
            interaction_guidelines,
            created_at,
        }
    }

    /// Reject records that parsed but cannot serve as a persona.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PersonaError::Storage(
                "persona record has an empty name".to_string(),
            ));
        }
        Ok(())
    }

    pub fn system_prompt(&self) -> String {
        persona_system_prompt(self)
    }
}

/// Parse a stored timestamp. RFC 3339 is preferred; a timestamp without an
/// offset (`2024-05-01T12:00:00.123456`) is read as UTC.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    raw.parse::<DateTime<Utc>>().or_else(|_| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
    })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Who spoke a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message of the rolling conversation with a loaded persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        match turn.role {
            TurnRole::User => ChatMessage::user(turn.content.clone()),
            TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
        }
    }
}
