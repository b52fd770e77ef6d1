//! View port interface

use crate::domain::analysis::ResultView;
use crate::domain::interview::{Layout, PhaseState, TimerKind};

/// Port for whatever draws the interview screen.
///
/// The controller pushes every visible change through this trait; a view
/// holds no state of its own about the flow.
pub trait InterviewView: Send {
    /// The phase changed; show the matching sections
    fn layout(&self, phase: PhaseState, layout: Layout);

    /// Show the question being answered
    fn question(&self, text: &str);

    /// Replace the status line
    fn status(&self, message: &str);

    /// Update a countdown display (`MM:SS`)
    fn countdown(&self, kind: TimerKind, clock: &str);

    /// Blocking notice the user must see (e.g. end of questions)
    fn alert(&self, message: &str);

    /// Replace the result area
    fn result(&self, view: &ResultView);
}

/// Blanket implementation for boxed view types
impl InterviewView for Box<dyn InterviewView> {
    fn layout(&self, phase: PhaseState, layout: Layout) {
        self.as_ref().layout(phase, layout)
    }

    fn question(&self, text: &str) {
        self.as_ref().question(text)
    }

    fn status(&self, message: &str) {
        self.as_ref().status(message)
    }

    fn countdown(&self, kind: TimerKind, clock: &str) {
        self.as_ref().countdown(kind, clock)
    }

    fn alert(&self, message: &str) {
        self.as_ref().alert(message)
    }

    fn result(&self, view: &ResultView) {
        self.as_ref().result(view)
    }
}
