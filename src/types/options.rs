//! Parse options and conversation history types

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single prior conversation turn.
///
/// Only consulted for short-acknowledgement disambiguation; history never
/// influences the heuristic booster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Options for a parse request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Run entity extraction and include spans in the result. Default: true.
    pub include_entities: bool,
    /// Recent conversation turns, oldest first. Used only to disambiguate
    /// bare acknowledgements before embedding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<Message>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_entities: true,
            conversation_history: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = include;
        self
    }

    pub fn conversation_history(mut self, history: Vec<Message>) -> Self {
        self.conversation_history = history;
        self
    }

    /// The most recent assistant turn, if any.
    pub(crate) fn last_assistant_turn(&self) -> Option<&str> {
        self.conversation_history
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_entities() {
        let options = ParseOptions::default();
        assert!(options.include_entities);
        assert!(options.conversation_history.is_empty());
    }

    #[test]
    fn last_assistant_turn_skips_user_messages() {
        let options = ParseOptions::default().conversation_history(vec![
            Message::assistant("You have a meeting tomorrow."),
            Message::user("thanks"),
        ]);
        assert_eq!(
            options.last_assistant_turn(),
            Some("You have a meeting tomorrow.")
        );
    }

    #[test]
    fn last_assistant_turn_none_without_history() {
        assert_eq!(ParseOptions::default().last_assistant_turn(), None);
    }
}
