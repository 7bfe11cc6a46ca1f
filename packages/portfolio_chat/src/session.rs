//! Conversation controller.
//!
//! Owns the transcript and the single open reply stream. A new query is
//! refused while a stream is open; the stream closes on the end signal or
//! on [`ChatSession::abort`].

use crate::config::ChatConfig;
use crate::demux::{DemuxOutput, StreamDemux};
use crate::error::Result;
use crate::history::window_history;
use crate::navigator::{Scroller, SectionNavigator};
use crate::section::Section;
use crate::types::{ChatMessage, MessageId};
use crate::wire::{QueryMessage, StreamEvent};
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle for the reply currently being streamed.
#[derive(Debug)]
pub struct OpenStream {
    message_id: MessageId,
    demux: StreamDemux,
}

impl OpenStream {
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }
}

/// What one inbound event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub message_id: MessageId,
    /// Visible text appended to the bot message.
    pub appended: String,
    /// Section that just became the message's reference.
    pub section: Option<Section>,
    /// The stream closed with this event.
    pub finished: bool,
}

#[derive(Debug)]
pub struct ChatSession {
    config: ChatConfig,
    messages: Vec<ChatMessage>,
    open: Option<OpenStream>,
}

impl ChatSession {
    pub fn new(config: ChatConfig) -> Self {
        let messages = vec![ChatMessage::bot(config.greeting.clone())];
        Self {
            config,
            messages,
            open: None,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_message_id(&self) -> Option<MessageId> {
        self.open.as_ref().map(OpenStream::message_id)
    }

    /// Starts a new turn.
    ///
    /// Returns the message to send, or `None` if the query is blank or a
    /// reply is still streaming. A refused send leaves the transcript as is.
    pub fn send(&mut self, query: &str) -> Option<QueryMessage> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(open) = &self.open {
            debug!(message_id = %open.message_id, "send ignored, reply still streaming");
            return None;
        }

        let history = window_history(&self.messages, self.config.history_pairs);

        let reply = ChatMessage::bot("");
        let message_id = reply.id();
        self.messages.push(ChatMessage::user(query));
        self.messages.push(reply);
        self.open = Some(OpenStream {
            message_id,
            demux: StreamDemux::new(self.config.marker),
        });
        info!(%message_id, history = history.len(), "opened reply stream");

        Some(QueryMessage {
            query: query.to_string(),
            history,
        })
    }

    /// Parses and applies a raw inbound frame.
    ///
    /// A frame that fails to parse is an error and changes nothing.
    pub fn handle_frame(&mut self, raw: &str) -> Result<Option<StreamUpdate>> {
        let event = StreamEvent::parse(raw)?;
        Ok(self.handle_event(event))
    }

    /// Applies an inbound event to the open reply. Returns `None` when no
    /// stream is open.
    pub fn handle_event(&mut self, event: StreamEvent) -> Option<StreamUpdate> {
        if self.open.is_none() {
            debug!(?event, "no open stream, event dropped");
            return None;
        }

        match event {
            StreamEvent::Chunk(chunk) => {
                let open = self.open.as_mut()?;
                let message_id = open.message_id;
                let output = open.demux.process_chunk(&chunk);
                Some(self.apply(message_id, output, false))
            }
            StreamEvent::End => self.open.take().map(|open| self.close(open)),
        }
    }

    /// Closes the open stream without an end signal, e.g. when the transport
    /// drops. Returns `None` when no stream is open.
    pub fn abort(&mut self) -> Option<StreamUpdate> {
        let open = self.open.take()?;
        warn!(message_id = %open.message_id, "reply stream aborted before end signal");
        Some(self.close(open))
    }

    fn close(&mut self, mut open: OpenStream) -> StreamUpdate {
        let output = open.demux.finish();
        info!(message_id = %open.message_id, "closed reply stream");
        self.apply(open.message_id, output, true)
    }

    fn apply(&mut self, message_id: MessageId, output: DemuxOutput, finished: bool) -> StreamUpdate {
        let mut update = StreamUpdate {
            message_id,
            appended: String::new(),
            section: None,
            finished,
        };

        let Some(message) = self.messages.iter_mut().rev().find(|m| m.id() == message_id) else {
            warn!(%message_id, "open stream has no transcript entry");
            return update;
        };

        if !output.visible.is_empty() {
            message.append(&output.visible);
        }
        update.appended = output.visible;

        for id in output.sections {
            match id.parse::<Section>() {
                Ok(section) => {
                    if message.set_section_ref(section) && update.section.is_none() {
                        update.section = Some(section);
                    }
                }
                Err(_) => debug!(id = %id, "ignoring unknown section marker"),
            }
        }

        update
    }
}

/// Feeds raw frames from `frames` into the session until the reply ends.
///
/// Every update is handed to `on_update`; each newly referenced section is
/// passed to the navigator. Unparsable frames are skipped. If the source
/// runs dry before the end signal, the stream is aborted. Returns the
/// spawned navigation tasks.
pub async fn drive_stream<S, F>(
    session: &mut ChatSession,
    navigator: &SectionNavigator<S>,
    mut frames: F,
    mut on_update: impl FnMut(&StreamUpdate),
) -> Vec<JoinHandle<()>>
where
    S: Scroller,
    F: Stream<Item = String> + Unpin,
{
    let mut navigations = Vec::new();

    let mut handle = |update: StreamUpdate, navigations: &mut Vec<JoinHandle<()>>| {
        if let Some(section) = update.section {
            navigations.push(navigator.navigate_to(section));
        }
        on_update(&update);
        update.finished
    };

    while let Some(raw) = frames.next().await {
        match session.handle_frame(&raw) {
            Ok(Some(update)) => {
                if handle(update, &mut navigations) {
                    return navigations;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("skipping inbound frame: {}", e),
        }
    }

    if let Some(update) = session.abort() {
        handle(update, &mut navigations);
    }
    navigations
}
