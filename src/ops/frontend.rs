//! The collaborators a `TaskStore` drives: a rendering surface, blocking
//! prompts, and transient notices. The TUI, the CLI, and tests each provide
//! their own implementation.

use crate::model::task::{Summary, Task};

/// Answer to a yes/no prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

/// A projection of the working list. Never read back.
pub trait RenderSurface {
    /// Replace every visible row with one row per task, in order
    fn render_tasks(&mut self, tasks: &[Task]);
    /// Show the counts; an empty list shows the empty-state placeholder
    fn render_summary(&mut self, summary: &Summary);
}

/// Blocking user interaction
pub trait Prompter {
    /// Informational notice with a single acknowledgement
    fn alert(&mut self, message: &str);
    /// Yes/no question
    fn confirm(&mut self, message: &str) -> Confirmation;
    /// Text input seeded with `initial`; `None` when the user cancels
    fn prompt(&mut self, message: &str, initial: &str) -> Option<String>;
}

/// Short-lived status messages
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Everything a store operation talks to
pub trait Frontend: RenderSurface + Prompter + Notifier {}

impl<T: RenderSurface + Prompter + Notifier + ?Sized> Frontend for T {}
