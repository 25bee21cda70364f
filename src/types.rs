//! Closed vocabularies for chunk classification.
//!
//! `ChunkType` and `ChunkRole` are closed sets: unknown strings are
//! rejected at the boundary with `InvalidEnumValue` instead of being
//! carried along as open string constants.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The kind of content a chunk holds.
///
/// Serialized in PascalCase (`"DocBlock"`, `"CodeBlock"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkType {
    DocBlock,
    CodeBlock,
    Message,
    Comment,
    Draft,
    Task,
    Subtask,
    Metric,
    Log,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::DocBlock => "DocBlock",
            ChunkType::CodeBlock => "CodeBlock",
            ChunkType::Message => "Message",
            ChunkType::Comment => "Comment",
            ChunkType::Draft => "Draft",
            ChunkType::Task => "Task",
            ChunkType::Subtask => "Subtask",
            ChunkType::Metric => "Metric",
            ChunkType::Log => "Log",
        }
    }

    /// Parse the string form, attributing failures to `field`.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        match value {
            "DocBlock" => Ok(ChunkType::DocBlock),
            "CodeBlock" => Ok(ChunkType::CodeBlock),
            "Message" => Ok(ChunkType::Message),
            "Comment" => Ok(ChunkType::Comment),
            "Draft" => Ok(ChunkType::Draft),
            "Task" => Ok(ChunkType::Task),
            "Subtask" => Ok(ChunkType::Subtask),
            "Metric" => Ok(ChunkType::Metric),
            "Log" => Ok(ChunkType::Log),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

/// Who produced the chunk's content.
///
/// Serialized in snake_case (`"developer"`, `"reviewer"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkRole {
    System,
    Developer,
    Reviewer,
    User,
    Assistant,
    Tool,
}

impl ChunkRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkRole::System => "system",
            ChunkRole::Developer => "developer",
            ChunkRole::Reviewer => "reviewer",
            ChunkRole::User => "user",
            ChunkRole::Assistant => "assistant",
            ChunkRole::Tool => "tool",
        }
    }

    /// Parse the string form, attributing failures to `field`.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        match value {
            "system" => Ok(ChunkRole::System),
            "developer" => Ok(ChunkRole::Developer),
            "reviewer" => Ok(ChunkRole::Reviewer),
            "user" => Ok(ChunkRole::User),
            "assistant" => Ok(ChunkRole::Assistant),
            "tool" => Ok(ChunkRole::Tool),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parse_round_trip() {
        for ty in [
            ChunkType::DocBlock,
            ChunkType::CodeBlock,
            ChunkType::Message,
            ChunkType::Comment,
            ChunkType::Draft,
            ChunkType::Task,
            ChunkType::Subtask,
            ChunkType::Metric,
            ChunkType::Log,
        ] {
            assert_eq!(ChunkType::parse("type", ty.as_str()), Ok(ty));
        }
    }

    #[test]
    fn test_type_rejects_unknown() {
        let err = ChunkType::parse("type", "Paragraph").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEnumValue {
                field: "type",
                value: "Paragraph".to_string(),
            }
        );
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [
            ChunkRole::System,
            ChunkRole::Developer,
            ChunkRole::Reviewer,
            ChunkRole::User,
            ChunkRole::Assistant,
            ChunkRole::Tool,
        ] {
            assert_eq!(ChunkRole::parse("role", role.as_str()), Ok(role));
        }
    }

    #[test]
    fn test_role_is_case_sensitive() {
        assert!(ChunkRole::parse("role", "Developer").is_err());
    }

    #[test]
    fn test_serde_uses_string_forms() {
        let json = serde_json::to_string(&ChunkType::DocBlock).unwrap();
        assert_eq!(json, "\"DocBlock\"");
        let json = serde_json::to_string(&ChunkRole::Developer).unwrap();
        assert_eq!(json, "\"developer\"");
    }
}
