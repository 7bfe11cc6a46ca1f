//! Messages exchanged with the reply service.
//!
//! Inbound frames are JSON objects `{"data": "..."}`; the literal payload
//! `[END]` closes the stream. Each user turn produces one outbound
//! [`QueryMessage`].

use crate::error::Result;
use crate::history::HistoryTurn;
use serde::{Deserialize, Serialize};

/// Payload that signals the end of a reply stream.
pub const END_SENTINEL: &str = "[END]";

/// Raw inbound frame as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundFrame {
    pub data: String,
}

impl InboundFrame {
    pub fn chunk(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn end() -> Self {
        Self {
            data: END_SENTINEL.to_string(),
        }
    }

    pub fn into_event(self) -> StreamEvent {
        if self.data == END_SENTINEL {
            StreamEvent::End
        } else {
            StreamEvent::Chunk(self.data)
        }
    }
}

/// Inbound frame after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk(String),
    End,
}

impl StreamEvent {
    /// Parses a raw JSON frame.
    pub fn parse(raw: &str) -> Result<Self> {
        let frame: InboundFrame = serde_json::from_str(raw)?;
        Ok(frame.into_event())
    }
}

/// Outbound message sent once per user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMessage {
    pub query: String,
    /// Completed exchanges, oldest first.
    pub history: Vec<HistoryTurn>,
}
