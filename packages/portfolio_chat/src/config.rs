use crate::demux::DEFAULT_MARKER;
use crate::error::{ChatError, Result};
use crate::history::DEFAULT_HISTORY_PAIRS;
use crate::navigator::NavigationTimings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// =============================================================================
// File config (figment-deserialized from defaults / chat.toml / env vars)
// =============================================================================
//
//   chat.toml:       [stream]
//                    marker = "#"
//
//   env var:         PORTFOLIO_STREAM__MARKER="#"   (double underscore = nesting)

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatFileConfig {
    #[serde(default)]
    pub stream: StreamFileConfig,
    #[serde(default)]
    pub navigation: NavigationFileConfig,
    /// First bot message of every new session.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for ChatFileConfig {
    fn default() -> Self {
        Self {
            stream: StreamFileConfig::default(),
            navigation: NavigationFileConfig::default(),
            greeting: default_greeting(),
        }
    }
}

/// Stream parsing knobs (lives under `[stream]`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamFileConfig {
    #[serde(default = "default_marker")]
    pub marker: char,
    #[serde(default = "default_history_pairs")]
    pub history_pairs: usize,
}

impl Default for StreamFileConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            history_pairs: default_history_pairs(),
        }
    }
}

/// Scroll effect timings (lives under `[navigation]`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationFileConfig {
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

impl Default for NavigationFileConfig {
    fn default() -> Self {
        Self {
            scroll_delay_ms: default_scroll_delay_ms(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

fn default_marker() -> char {
    DEFAULT_MARKER
}
fn default_history_pairs() -> usize {
    DEFAULT_HISTORY_PAIRS
}
fn default_scroll_delay_ms() -> u64 {
    300
}
fn default_highlight_ms() -> u64 {
    1000
}
fn default_greeting() -> String {
    "Hi! I'm Jithin's AI assistant. Ask me anything about his experience, skills, projects, or education!"
        .to_string()
}

/// Resolved configuration (runtime view).
#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
    pub marker: char,
    pub history_pairs: usize,
    pub timings: NavigationTimings,
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            history_pairs: DEFAULT_HISTORY_PAIRS,
            timings: NavigationTimings::default(),
            greeting: default_greeting(),
        }
    }
}

impl ChatConfig {
    pub fn from_file(fc: &ChatFileConfig) -> Result<Self> {
        if fc.stream.marker.is_whitespace() {
            return Err(ChatError::InvalidMarker(fc.stream.marker));
        }
        Ok(Self {
            marker: fc.stream.marker,
            history_pairs: fc.stream.history_pairs,
            timings: NavigationTimings {
                scroll_delay: Duration::from_millis(fc.navigation.scroll_delay_ms),
                highlight_duration: Duration::from_millis(fc.navigation.highlight_ms),
            },
            greeting: fc.greeting.clone(),
        })
    }

    /// Loads defaults, then `config_path` if given, then `PORTFOLIO_*` env vars.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc: ChatFileConfig = load_config(config_path).extract()?;
        Self::from_file(&fc)
    }
}

/// Build a figment that layers: defaults → config file → PORTFOLIO_* env vars.
///
/// Env vars use double-underscore for nesting into sections:
///   `PORTFOLIO_STREAM__HISTORY_PAIRS=3`  →  `stream.history_pairs = 3`
///   `PORTFOLIO_NAVIGATION__HIGHLIGHT_MS=500`  →  `navigation.highlight_ms = 500`
pub fn load_config(config_path: Option<&Path>) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    let mut figment = Figment::from(Serialized::defaults(ChatFileConfig::default()));
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed("PORTFOLIO_").split("__"))
}
