use crate::section::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, time-sortable message identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

/// One entry of the chat transcript.
///
/// Fields are private so the lifecycle rules hold: the role never changes,
/// user content is fixed at creation, and `section_ref` is set at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: MessageId,
    role: MessageRole,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_ref: Option<Section>,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content.into())
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Bot, content.into())
    }

    fn with_role(role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            section_ref: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn section_ref(&self) -> Option<Section> {
        self.section_ref
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_bot(&self) -> bool {
        self.role == MessageRole::Bot
    }

    /// Appends streamed text. Only bot messages grow; returns false otherwise.
    pub(crate) fn append(&mut self, text: &str) -> bool {
        if self.role != MessageRole::Bot {
            return false;
        }
        self.content.push_str(text);
        true
    }

    /// Sets the section reference if none is set yet. Returns whether it was set.
    pub(crate) fn set_section_ref(&mut self, section: Section) -> bool {
        if self.section_ref.is_some() {
            return false;
        }
        self.section_ref = Some(section);
        true
    }
}
