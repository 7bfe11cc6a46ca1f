//! Section navigation.
//!
//! Validates identifiers against [`Section`] and runs the delayed
//! scroll-and-highlight effect on a background task. The page itself is
//! reached through the [`Scroller`] trait.

use crate::section::Section;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Page-side effects the navigator drives.
pub trait Scroller: Send + Sync + 'static {
    fn scroll_to(&self, anchor: &str);
    fn show_highlight(&self, anchor: &str);
    fn clear_highlight(&self, anchor: &str);
}

/// Scroller for headless runs: every effect becomes a log line.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingScroller;

impl Scroller for TracingScroller {
    fn scroll_to(&self, anchor: &str) {
        info!(anchor, "smooth scroll to section");
    }

    fn show_highlight(&self, anchor: &str) {
        debug!(anchor, "highlight on");
    }

    fn clear_highlight(&self, anchor: &str) {
        debug!(anchor, "highlight off");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationTimings {
    /// Wait before scrolling, lets the chat UI settle.
    pub scroll_delay: Duration,
    /// How long the highlight stays after the scroll.
    pub highlight_duration: Duration,
}

impl Default for NavigationTimings {
    fn default() -> Self {
        Self {
            scroll_delay: Duration::from_millis(300),
            highlight_duration: Duration::from_millis(1000),
        }
    }
}

pub struct SectionNavigator<S: Scroller> {
    scroller: Arc<S>,
    timings: NavigationTimings,
}

impl<S: Scroller> Clone for SectionNavigator<S> {
    fn clone(&self) -> Self {
        Self {
            scroller: Arc::clone(&self.scroller),
            timings: self.timings,
        }
    }
}

impl<S: Scroller> SectionNavigator<S> {
    pub fn new(scroller: S, timings: NavigationTimings) -> Self {
        Self {
            scroller: Arc::new(scroller),
            timings,
        }
    }

    pub fn timings(&self) -> NavigationTimings {
        self.timings
    }

    pub fn scroller(&self) -> &S {
        &self.scroller
    }

    /// Navigates to the section named by `id`, matched case-insensitively.
    ///
    /// Unknown identifiers do nothing and return `None`. Must be called from
    /// within a tokio runtime. Requests are not cancelled by later ones.
    pub fn navigate(&self, id: &str) -> Option<JoinHandle<()>> {
        match id.parse::<Section>() {
            Ok(section) => Some(self.navigate_to(section)),
            Err(_) => {
                debug!(id, "ignoring navigation to unknown section");
                None
            }
        }
    }

    pub fn navigate_to(&self, section: Section) -> JoinHandle<()> {
        let scroller = Arc::clone(&self.scroller);
        let timings = self.timings;
        debug!(%section, "scheduling section navigation");

        tokio::spawn(async move {
            let anchor = section.anchor();
            tokio::time::sleep(timings.scroll_delay).await;
            scroller.show_highlight(anchor);
            scroller.scroll_to(anchor);
            tokio::time::sleep(timings.highlight_duration).await;
            scroller.clear_highlight(anchor);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingScroller {
        actions: Mutex<Vec<(String, Instant)>>,
    }

    impl RecordingScroller {
        fn record(&self, action: &str, anchor: &str) {
            self.actions
                .lock()
                .unwrap()
                .push((format!("{action}:{anchor}"), Instant::now()));
        }

        fn names(&self) -> Vec<String> {
            self.actions
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
    }

    impl Scroller for RecordingScroller {
        fn scroll_to(&self, anchor: &str) {
            self.record("scroll", anchor);
        }

        fn show_highlight(&self, anchor: &str) {
            self.record("highlight", anchor);
        }

        fn clear_highlight(&self, anchor: &str) {
            self.record("clear", anchor);
        }
    }

    fn navigator() -> SectionNavigator<RecordingScroller> {
        SectionNavigator::new(RecordingScroller::default(), NavigationTimings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_runs_delayed_effect() {
        let nav = navigator();
        let start = Instant::now();

        nav.navigate("Skills").unwrap().await.unwrap();

        assert_eq!(
            nav.scroller().names(),
            vec!["highlight:skills", "scroll:skills", "clear:skills"]
        );
        let actions = nav.scroller().actions.lock().unwrap();
        let scrolled = actions[1].1 - start;
        let cleared = actions[2].1 - start;
        assert!(scrolled >= Duration::from_millis(300));
        assert!(scrolled < Duration::from_millis(1300));
        assert!(cleared >= Duration::from_millis(1300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_section_is_ignored() {
        let nav = navigator();
        assert!(nav.navigate("marketing").is_none());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(nav.scroller().names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_requests_both_complete() {
        let nav = navigator();
        let first = nav.navigate("skills").unwrap();
        let second = nav.navigate("contact").unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let names = nav.scroller().names();
        assert!(names.contains(&"scroll:skills".to_string()));
        assert!(names.contains(&"scroll:contact".to_string()));
        assert_eq!(names.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_happens_before_delay() {
        let nav = navigator();
        let handle = nav.navigate("projects").unwrap();
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(nav.scroller().names().is_empty());
        handle.await.unwrap();
        assert_eq!(nav.scroller().names().len(), 3);
    }
}
