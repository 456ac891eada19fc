use std::time::{Duration, Instant};

/// How long tooltips and transient notices stay on screen
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// A message that hides itself after [`NOTICE_DURATION`].
///
/// Time is passed in by the caller so the event loop, not the component,
/// owns the clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notice {
    shown: Option<(String, Instant)>,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` unless a notice is already visible.
    ///
    /// Returns `false` when a visible notice was left untouched; an active
    /// notice is neither replaced nor extended.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) -> bool {
        if self.is_visible(now) {
            return false;
        }
        self.shown = Some((message.into(), now));
        true
    }

    /// Replace whatever is showing and restart the window
    pub fn replace(&mut self, message: impl Into<String>, now: Instant) {
        self.shown = Some((message.into(), now));
    }

    /// Hide if visible, otherwise show
    pub fn toggle(&mut self, message: impl Into<String>, now: Instant) {
        if self.is_visible(now) {
            self.shown = None;
        } else {
            self.shown = Some((message.into(), now));
        }
    }

    pub fn hide(&mut self) {
        self.shown = None;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.message(now).is_some()
    }

    /// The message, while its window is open
    pub fn message(&self, now: Instant) -> Option<&str> {
        match &self.shown {
            Some((message, at)) if now.saturating_duration_since(*at) < NOTICE_DURATION => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Drop an expired notice
    pub fn expire(&mut self, now: Instant) {
        if !self.is_visible(now) {
            self.shown = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_hides_after_window() {
        let start = Instant::now();
        let mut notice = Notice::new();
        assert!(notice.show("hello", start));

        assert_eq!(notice.message(start + Duration::from_millis(2999)), Some("hello"));
        assert_eq!(notice.message(start + NOTICE_DURATION), None);
    }

    #[test]
    fn test_show_does_not_extend_visible_notice() {
        let start = Instant::now();
        let mut notice = Notice::new();
        assert!(notice.show("first", start));
        assert!(!notice.show("second", start + Duration::from_secs(2)));

        assert_eq!(notice.message(start + Duration::from_secs(2)), Some("first"));
        assert!(!notice.is_visible(start + Duration::from_secs(3)));
        assert!(notice.show("second", start + Duration::from_secs(3)));
    }

    #[test]
    fn test_toggle_hides_visible_notice() {
        let start = Instant::now();
        let mut notice = Notice::new();
        notice.toggle("tip", start);
        assert!(notice.is_visible(start));
        notice.toggle("tip", start + Duration::from_secs(1));
        assert!(!notice.is_visible(start + Duration::from_secs(1)));
    }
}
