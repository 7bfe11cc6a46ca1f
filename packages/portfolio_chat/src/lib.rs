//! # Portfolio Chat
//!
//! Streaming core of the portfolio site's chat assistant.
//!
//! ## Overview
//!
//! Replies arrive from the reply service as a live stream of text chunks.
//! A reply may carry a section marker such as `$$skills$$`, telling the page
//! to scroll to the matching section. This crate provides:
//! - An incremental demultiplexer that strips markers from the visible text,
//!   even when a delimiter is split across chunks
//! - A navigator that validates section names and runs the delayed
//!   scroll-and-highlight effect
//! - A session that owns the transcript, enforces one open stream at a time
//!   and builds the history window sent with each query
//! - An offline knowledge base answering canned questions in the same format
//!
//! ## Data Flow
//!
//! ```text
//! chunk ──► StreamDemux ──┬──► visible text ──► ChatMessage (open bot reply)
//!                         └──► section id ───► Section allow-list ──► SectionNavigator
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use portfolio_chat::{ChatConfig, ChatSession, Section, StreamEvent};
//!
//! let mut session = ChatSession::new(ChatConfig::default());
//! let query = session.send("What are his skills?").unwrap();
//! assert!(query.history.is_empty());
//!
//! session.handle_event(StreamEvent::Chunk("Hello $".into()));
//! let update = session
//!     .handle_event(StreamEvent::Chunk("$skills$$ world".into()))
//!     .unwrap();
//! assert_eq!(update.section, Some(Section::Skills));
//!
//! session.handle_event(StreamEvent::End);
//! assert_eq!(session.messages().last().unwrap().content(), "Hello  world");
//! ```
//!
//! ### Demultiplexing Alone
//!
//! ```rust
//! use portfolio_chat::StreamDemux;
//!
//! let mut demux = StreamDemux::default();
//! let first = demux.process_chunk("Hi $$proje");
//! assert_eq!(first.visible, "Hi ");
//!
//! // Unterminated markers never become visible.
//! assert!(demux.finish().is_empty());
//! ```

pub mod config;
pub mod demux;
pub mod error;
pub mod history;
pub mod knowledge;
pub mod navigator;
pub mod replay;
pub mod section;
pub mod session;
pub mod types;
pub mod wire;

pub use config::{ChatConfig, ChatFileConfig, load_config};
pub use demux::{DEFAULT_MARKER, DemuxMode, DemuxOutput, StreamDemux, normalize_section_id};
pub use error::{ChatError, Result};
pub use history::{DEFAULT_HISTORY_PAIRS, HistoryTurn, window_history};
pub use knowledge::{KnowledgeBase, Topic, chunked};
pub use navigator::{NavigationTimings, Scroller, SectionNavigator, TracingScroller};
pub use replay::FrameReader;
pub use section::Section;
pub use session::{ChatSession, OpenStream, StreamUpdate, drive_stream};
pub use types::{ChatMessage, MessageId, MessageRole};
pub use wire::{END_SENTINEL, InboundFrame, QueryMessage, StreamEvent};
