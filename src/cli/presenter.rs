//! CLI presenter for output formatting, and the terminal interview view

use std::sync::Mutex;
use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::InterviewView;
use crate::domain::analysis::{ResultLine, ResultView};
use crate::domain::interview::{Layout, PhaseState, Section, TimerKind};

/// Presenter for CLI output formatting
#[derive(Debug, Default, Clone, Copy)]
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{}", info_line(message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{}", warn_line(message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the interactive command help
    pub fn commands_help(&self) {
        eprintln!("{}", "Commands:".bold());
        eprintln!("  {}  start the interview", "s".cyan());
        eprintln!("  {}  next question (after results are shown)", "n".cyan());
        eprintln!("  {}  quit", "q".cyan());
        eprintln!("  {}  show this help", "h".cyan());
    }
}

fn info_line(message: &str) -> String {
    format!("{} {}", "ℹ".cyan(), message)
}

fn warn_line(message: &str) -> String {
    format!("{} {}", "⚠".yellow(), message)
}

/// One styled line of the result area
pub fn styled_result_line(line: &ResultLine) -> String {
    let text = line.to_string();
    match line {
        ResultLine::Heading(_) => text.bold().to_string(),
        ResultLine::Score { .. } => format!("  {}", text),
        ResultLine::Bullet(_) => format!("  {}", text),
        ResultLine::Paragraph(_) => text,
        ResultLine::Notice(_) => text.dimmed().to_string(),
        ResultLine::Error(_) => text.red().to_string(),
    }
}

/// Interview screen drawn on the terminal.
///
/// Status lines go to stderr, results to stdout. Countdowns are a single
/// redrawn spinner line.
pub struct TerminalView {
    presenter: Presenter,
    countdown: Mutex<Option<(TimerKind, ProgressBar)>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            presenter: Presenter::new(),
            countdown: Mutex::new(None),
        }
    }

    fn new_countdown_bar() -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(StdDuration::from_millis(80));
        bar
    }

    /// Print above the countdown line if one is showing
    fn say(&self, line: String) {
        match self.countdown.lock() {
            Ok(guard) => match guard.as_ref() {
                Some((_, bar)) => bar.println(line),
                None => eprintln!("{}", line),
            },
            Err(_) => eprintln!("{}", line),
        }
    }

    fn clear_countdown(&self) {
        if let Ok(mut guard) = self.countdown.lock() {
            if let Some((_, bar)) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewView for TerminalView {
    fn layout(&self, phase: PhaseState, layout: Layout) {
        if !matches!(phase, PhaseState::Preparing | PhaseState::Recording) {
            self.clear_countdown();
        }

        match layout.section {
            Section::Start => self.say(info_line("Type 's' and press Enter to start the interview.")),
            Section::Interview if layout.capture_preview => {
                self.say(format!("{} {}", "●".red(), "Camera and microphone are live".bold()))
            }
            Section::Interview | Section::Result => {}
        }

        if layout.next_control && phase == PhaseState::AwaitingNext {
            self.say(info_line("Type 'n' for the next question, 'q' to quit."));
        }
    }

    fn question(&self, text: &str) {
        self.say(String::new());
        self.say(format!("{} {}", "Question:".bold(), text));
    }

    fn status(&self, message: &str) {
        self.say(info_line(message));
    }

    fn countdown(&self, kind: TimerKind, clock: &str) {
        let Ok(mut guard) = self.countdown.lock() else {
            return;
        };

        let stale = guard.as_ref().is_some_and(|(k, _)| *k != kind);
        if stale {
            if let Some((_, bar)) = guard.take() {
                bar.finish_and_clear();
            }
        }

        let (_, bar) = guard.get_or_insert_with(|| (kind, Self::new_countdown_bar()));
        bar.set_message(format!("{}: {}", kind.label(), clock.bold()));
    }

    fn alert(&self, message: &str) {
        self.clear_countdown();
        self.presenter.warn(message);
    }

    fn result(&self, view: &ResultView) {
        self.clear_countdown();
        for line in view.lines() {
            self.presenter.output(&styled_result_line(line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_score_keeps_plain_text() {
        let line = ResultLine::Score {
            label: "Speech Rate".to_string(),
            value: "N/A".to_string(),
        };
        assert!(styled_result_line(&line).contains("Speech Rate: N/A/10"));
    }

    #[test]
    fn styled_error_keeps_message() {
        let line = ResultLine::Error("boom".to_string());
        assert!(styled_result_line(&line).contains("Error: boom"));
    }

    #[test]
    fn countdown_bar_is_replaced_on_kind_change() {
        let view = TerminalView::new();
        view.countdown(TimerKind::Preparation, "00:20");
        view.countdown(TimerKind::Recording, "00:30");

        let guard = view.countdown.lock().unwrap();
        assert_eq!(guard.as_ref().map(|(k, _)| *k), Some(TimerKind::Recording));
    }

    #[test]
    fn idle_layout_clears_countdown() {
        let view = TerminalView::new();
        view.countdown(TimerKind::Preparation, "00:05");
        view.layout(PhaseState::Idle, Layout::for_phase(PhaseState::Idle));

        assert!(view.countdown.lock().unwrap().is_none());
    }
}
