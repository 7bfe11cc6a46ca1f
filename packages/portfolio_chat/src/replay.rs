use crate::error::{ChatError, Result};
use crate::wire::StreamEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Reads recorded reply streams: JSONL files with one inbound frame per line.
pub struct FrameReader;

impl FrameReader {
    /// Reads and classifies every frame. Lines that do not parse are logged
    /// and skipped.
    pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<StreamEvent>> {
        let path = path.as_ref();
        let events = Self::read_raw(path)?
            .iter()
            .enumerate()
            .filter_map(|(frame_num, line)| match StreamEvent::parse(line) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(
                        "Skipping frame {} in {:?}: {}",
                        frame_num + 1,
                        path.file_name().unwrap_or_default(),
                        e
                    );
                    None
                }
            })
            .collect();
        Ok(events)
    }

    /// Reads the raw frame lines without classifying them. Blank lines are
    /// dropped.
    pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ChatError::RecordingNotFound(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }
}
