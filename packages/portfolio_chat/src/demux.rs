//! Stream demultiplexer.
//!
//! Splits a live reply stream into the text shown to the reader and the
//! out-of-band section markers embedded in it. A marker is the payload
//! between two doubled marker characters, e.g. `$$skills$$`.
//!
//! Chunks arrive with arbitrary boundaries, so a delimiter can be cut in
//! half. A marker character at the very end of a chunk is held back until
//! the next chunk (or [`StreamDemux::finish`]) decides whether it starts a
//! delimiter. Feeding a stream as one chunk or as many yields the same
//! visible text and the same ordered identifiers.

use tracing::debug;

/// Marker character used when none is configured.
pub const DEFAULT_MARKER: char = '$';

/// Scanner state between chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DemuxMode {
    /// Characters are visible text.
    #[default]
    Passthrough,
    /// Between an opening and closing delimiter; characters feed the capture buffer.
    Capturing,
}

/// Result of feeding one chunk to the demultiplexer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemuxOutput {
    /// Text to append to the open bot message, marker syntax removed.
    pub visible: String,
    /// Normalized identifiers of markers completed by this chunk, in stream order.
    pub sections: Vec<String>,
}

impl DemuxOutput {
    /// First identifier completed by this chunk, if any.
    pub fn section(&self) -> Option<&str> {
        self.sections.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.sections.is_empty()
    }

    fn merge(&mut self, other: DemuxOutput) {
        self.visible.push_str(&other.visible);
        self.sections.extend(other.sections);
    }
}

/// Incremental marker parser for a single reply stream.
#[derive(Clone, Debug)]
pub struct StreamDemux {
    marker: char,
    mode: DemuxMode,
    capture: String,
    /// A marker character ended the previous chunk and is not yet classified.
    pending_marker: bool,
}

impl Default for StreamDemux {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl StreamDemux {
    pub fn new(marker: char) -> Self {
        Self {
            marker,
            mode: DemuxMode::Passthrough,
            capture: String::new(),
            pending_marker: false,
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn mode(&self) -> DemuxMode {
        self.mode
    }

    pub fn is_capturing(&self) -> bool {
        self.mode == DemuxMode::Capturing
    }

    /// Feeds the next chunk of the stream.
    ///
    /// State carries over between calls. An empty chunk is a no-op, even
    /// when a marker character is being held.
    pub fn process_chunk(&mut self, chunk: &str) -> DemuxOutput {
        let mut out = DemuxOutput::default();
        let mut chars = chunk.chars().peekable();

        if self.pending_marker {
            match chars.peek() {
                None => return out,
                Some(&c) if c == self.marker => {
                    chars.next();
                    self.pending_marker = false;
                    self.toggle(&mut out);
                }
                Some(_) => {
                    self.pending_marker = false;
                    self.keep(self.marker, &mut out);
                }
            }
        }

        while let Some(c) = chars.next() {
            if c != self.marker {
                self.keep(c, &mut out);
                continue;
            }
            match chars.peek() {
                Some(&next) if next == self.marker => {
                    chars.next();
                    self.toggle(&mut out);
                }
                Some(_) => self.keep(c, &mut out),
                None => self.pending_marker = true,
            }
        }

        out
    }

    /// Closes the stream.
    ///
    /// A held marker character outside a marker was a lone character and is
    /// flushed as text. An unterminated marker is dropped: its captured text
    /// never becomes visible and no identifier is emitted. The demultiplexer
    /// is reset and can be reused for the next stream.
    pub fn finish(&mut self) -> DemuxOutput {
        let mut out = DemuxOutput::default();
        match self.mode {
            DemuxMode::Passthrough => {
                if self.pending_marker {
                    out.visible.push(self.marker);
                }
            }
            DemuxMode::Capturing => {
                debug!(
                    captured = self.capture.len(),
                    "stream ended inside a section marker, dropping capture"
                );
            }
        }
        self.reset();
        out
    }

    /// Parses a complete reply in one pass.
    pub fn parse_complete(&mut self, text: &str) -> DemuxOutput {
        let mut out = self.process_chunk(text);
        out.merge(self.finish());
        out
    }

    pub fn reset(&mut self) {
        self.mode = DemuxMode::Passthrough;
        self.capture.clear();
        self.pending_marker = false;
    }

    fn keep(&mut self, c: char, out: &mut DemuxOutput) {
        match self.mode {
            DemuxMode::Passthrough => out.visible.push(c),
            DemuxMode::Capturing => self.capture.push(c),
        }
    }

    fn toggle(&mut self, out: &mut DemuxOutput) {
        match self.mode {
            DemuxMode::Passthrough => {
                self.mode = DemuxMode::Capturing;
                self.capture.clear();
            }
            DemuxMode::Capturing => {
                self.mode = DemuxMode::Passthrough;
                let id = normalize_section_id(&self.capture);
                self.capture.clear();
                if id.is_empty() {
                    debug!("empty section marker ignored");
                } else {
                    out.sections.push(id);
                }
            }
        }
    }
}

/// Trims and lower-cases a raw marker payload.
pub fn normalize_section_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(chunks: &[&str]) -> DemuxOutput {
        let mut demux = StreamDemux::default();
        let mut out = DemuxOutput::default();
        for chunk in chunks {
            out.merge(demux.process_chunk(chunk));
        }
        out.merge(demux.finish());
        out
    }

    #[test]
    fn test_single_chunk_marker() {
        let mut demux = StreamDemux::default();
        let out = demux.process_chunk("Hello $$skills$$ world");
        assert_eq!(out.visible, "Hello  world");
        assert_eq!(out.section(), Some("skills"));
        assert_eq!(out.sections.len(), 1);
    }

    #[test]
    fn test_delimiters_split_across_chunks() {
        let mut demux = StreamDemux::default();

        let first = demux.process_chunk("Hello $");
        assert_eq!(first.visible, "Hello ");
        assert!(first.sections.is_empty());

        let second = demux.process_chunk("$skills$");
        assert_eq!(second.visible, "");
        assert!(second.sections.is_empty());
        assert!(demux.is_capturing());

        let third = demux.process_chunk("$ world");
        assert_eq!(third.visible, " world");
        assert_eq!(third.section(), Some("skills"));
        assert_eq!(demux.mode(), DemuxMode::Passthrough);
    }

    #[test]
    fn test_every_two_way_split_matches_whole() {
        let text = "Try the $$ Projects $$ page, it costs $5 and $$contact$$!";
        let whole = feed(&[text]);
        assert_eq!(whole.visible, "Try the  page, it costs $5 and !");
        assert_eq!(whole.sections, vec!["projects", "contact"]);

        for (idx, _) in text.char_indices().skip(1) {
            let (a, b) = text.split_at(idx);
            assert_eq!(feed(&[a, b]), whole, "split at {idx}");
        }
    }

    #[test]
    fn test_char_by_char_feed() {
        let text = "Héllo $$Éducation$$ ✓";
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let chunks: Vec<&str> = chars.iter().map(String::as_str).collect();
        let out = feed(&chunks);
        assert_eq!(out.visible, "Héllo  ✓");
        assert_eq!(out.sections, vec!["éducation"]);
    }

    #[test]
    fn test_unterminated_marker_is_dropped() {
        let mut demux = StreamDemux::default();
        let out = demux.process_chunk("Hi $$proje");
        assert_eq!(out.visible, "Hi ");
        assert!(out.sections.is_empty());

        let tail = demux.finish();
        assert!(tail.is_empty());
        assert_eq!(demux.mode(), DemuxMode::Passthrough);
    }

    #[test]
    fn test_empty_marker_emits_nothing() {
        let out = feed(&["a$$$$b", "$$   $$c"]);
        assert_eq!(out.visible, "abc");
        assert!(out.sections.is_empty());
    }

    #[test]
    fn test_lone_marker_characters_stay_visible() {
        assert_eq!(feed(&["costs $5"]).visible, "costs $5");
        assert_eq!(feed(&["costs $", "5"]).visible, "costs $5");
        assert_eq!(feed(&["ends with $"]).visible, "ends with $");
    }

    #[test]
    fn test_lone_marker_inside_capture_is_payload() {
        let out = feed(&["$$a$", "b$$"]);
        assert_eq!(out.visible, "");
        assert_eq!(out.sections, vec!["a$b"]);
    }

    #[test]
    fn test_empty_chunk_keeps_pending_marker() {
        let mut demux = StreamDemux::default();
        assert_eq!(demux.process_chunk("x$").visible, "x");
        assert!(demux.process_chunk("").is_empty());
        let out = demux.process_chunk("$skills$$");
        assert_eq!(out.section(), Some("skills"));
    }

    #[test]
    fn test_removal_is_positional() {
        // Characters equal to captured ones must survive elsewhere in the text.
        let out = feed(&["s$$skills$$s"]);
        assert_eq!(out.visible, "ss");
        assert_eq!(out.sections, vec!["skills"]);
    }

    #[test]
    fn test_custom_marker() {
        let mut demux = StreamDemux::new('#');
        let out = demux.parse_complete("see ##Contact## or $$skills$$");
        assert_eq!(out.visible, "see  or $$skills$$");
        assert_eq!(out.sections, vec!["contact"]);
    }

    #[test]
    fn test_finish_resets_for_next_stream() {
        let mut demux = StreamDemux::default();
        demux.process_chunk("$$half");
        demux.finish();
        let out = demux.parse_complete("fresh $$skills$$");
        assert_eq!(out.visible, "fresh ");
        assert_eq!(out.sections, vec!["skills"]);
    }
}
