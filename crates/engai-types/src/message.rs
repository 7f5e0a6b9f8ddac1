use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation transcript.
///
/// Fields are private: a message is fixed at construction and never edited
/// after it has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    attachment_name: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>, attachment_name: Option<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachment_name,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            attachment_name: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Original file name of the attachment sent with this turn, if any.
    pub fn attachment_name(&self) -> Option<&str> {
        self.attachment_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_messages_never_carry_attachments() {
        let m = Message::assistant("$$2+2=4$$");
        assert_eq!(m.role(), Role::Assistant);
        assert_eq!(m.attachment_name(), None);
    }

    #[test]
    fn role_serializes_lowercase() {
        let m = Message::user("hi", Some("beam.pdf".into()));
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["attachment_name"], "beam.pdf");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
