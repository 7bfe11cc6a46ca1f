use crate::types::{ChatMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// Number of completed exchanges sent along with each query.
pub const DEFAULT_HISTORY_PAIRS: usize = 5;

/// One role-tagged entry of the context sent with a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// Rebuilds the last `max_pairs` completed user/bot exchanges, oldest first.
///
/// A pair is a user message immediately followed by a bot message, found by
/// scanning from the end of the transcript. Unpaired messages (the greeting,
/// a user message still waiting for its reply) are skipped.
pub fn window_history(messages: &[ChatMessage], max_pairs: usize) -> Vec<HistoryTurn> {
    let mut pairs: Vec<(&ChatMessage, &ChatMessage)> = Vec::new();
    let mut idx = messages.len();

    while idx >= 2 && pairs.len() < max_pairs {
        let (question, answer) = (&messages[idx - 2], &messages[idx - 1]);
        if question.is_user() && answer.is_bot() {
            pairs.push((question, answer));
            idx -= 2;
        } else {
            idx -= 1;
        }
    }

    pairs
        .into_iter()
        .rev()
        .flat_map(|(question, answer)| [HistoryTurn::from(question), HistoryTurn::from(answer)])
        .collect()
}
