use std::time::{Duration, Instant};

/// Default on-screen time for a notice
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    posted_at: Instant,
}

/// Holds at most one transient notice.
///
/// Replace-latest: posting while a notice is showing swaps the text and
/// restarts the timer. Nothing is queued.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    duration: Duration,
    current: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        NoticeBoard {
            duration,
            current: None,
        }
    }

    pub fn post(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            message: message.into(),
            posted_at: now,
        });
    }

    /// The message on screen at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.posted_at) < self.duration)
            .map(|n| n.message.as_str())
    }

    /// Drop an expired notice. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.visible(now).is_none() {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
