use proptest::prelude::*;

use portfolio_chat::demux::{DemuxOutput, StreamDemux};
use portfolio_chat::history::{HistoryTurn, window_history};
use portfolio_chat::types::{ChatMessage, MessageRole};

// --- Stream demultiplexing ---

/// Text biased towards marker characters so delimiters, lone markers and
/// unterminated captures all show up.
fn arb_stream() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => Just('$'),
            4 => prop::char::range('a', 'e'),
            1 => Just(' '),
            1 => Just('é'),
            1 => Just('S'),
        ],
        0..48,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Splits `text` at the given char positions.
fn split_at_chars(text: &str, mut cuts: Vec<usize>) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    cuts.retain(|c| *c <= chars.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(chars[start..cut].iter().collect());
        start = cut;
    }
    chunks.push(chars[start..].iter().collect());
    chunks
}

fn feed<S: AsRef<str>>(chunks: &[S]) -> DemuxOutput {
    let mut demux = StreamDemux::default();
    let mut out = DemuxOutput::default();
    for chunk in chunks {
        let step = demux.process_chunk(chunk.as_ref());
        out.visible.push_str(&step.visible);
        out.sections.extend(step.sections);
    }
    let tail = demux.finish();
    out.visible.push_str(&tail.visible);
    out.sections.extend(tail.sections);
    out
}

proptest! {
    #[test]
    fn chunking_does_not_change_output(
        text in arb_stream(),
        cuts in prop::collection::vec(0usize..48, 0..12),
    ) {
        let whole = feed(&[text.as_str()]);
        let chunks = split_at_chars(&text, cuts);
        prop_assert_eq!(feed(&chunks), whole);
    }

    #[test]
    fn char_by_char_matches_whole(text in arb_stream()) {
        let chunks: Vec<String> = text.chars().map(String::from).collect();
        prop_assert_eq!(feed(&chunks), feed(&[text.as_str()]));
    }

    #[test]
    fn identifiers_are_normalized(text in arb_stream()) {
        for id in feed(&[text.as_str()]).sections {
            prop_assert!(!id.is_empty());
            prop_assert_eq!(id.trim(), id.as_str());
            prop_assert_eq!(id.to_lowercase(), id.clone());
        }
    }

    #[test]
    fn text_without_markers_passes_through(text in "[a-z é.,!?]{0,64}") {
        let out = feed(&[text.as_str()]);
        prop_assert_eq!(out.visible, text);
        prop_assert!(out.sections.is_empty());
    }

    #[test]
    fn visible_output_never_longer_than_input(text in arb_stream()) {
        let out = feed(&[text.as_str()]);
        prop_assert!(out.visible.chars().count() <= text.chars().count());
    }
}

// --- History windowing ---

fn arb_transcript() -> impl Strategy<Value = Vec<MessageRole>> {
    prop::collection::vec(
        prop_oneof![Just(MessageRole::User), Just(MessageRole::Bot)],
        0..30,
    )
}

proptest! {
    #[test]
    fn history_is_bounded_and_paired(roles in arb_transcript(), max_pairs in 0usize..8) {
        let messages: Vec<ChatMessage> = roles
            .iter()
            .enumerate()
            .map(|(n, role)| match role {
                MessageRole::User => ChatMessage::user(format!("m{n}")),
                MessageRole::Bot => ChatMessage::bot(format!("m{n}")),
            })
            .collect();

        let history: Vec<HistoryTurn> = window_history(&messages, max_pairs);

        prop_assert!(history.len() <= max_pairs * 2);
        prop_assert_eq!(history.len() % 2, 0);
        for pair in history.chunks(2) {
            prop_assert_eq!(pair[0].role, MessageRole::User);
            prop_assert_eq!(pair[1].role, MessageRole::Bot);
        }

        // Chronological order: message indices strictly increase.
        let indices: Vec<usize> = history
            .iter()
            .map(|t| t.content[1..].parse().unwrap())
            .collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
