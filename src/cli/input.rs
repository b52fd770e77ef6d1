//! Keyboard commands read from stdin

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ControllerEvent;

use super::presenter::Presenter;

/// A line the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Next,
    Quit,
    Help,
}

impl UserCommand {
    /// Parse one input line; blank or unknown input yields `None`
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "s" | "start" => Some(Self::Start),
            "n" | "next" => Some(Self::Next),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }

    /// Controller event for this command, if it maps to one
    pub fn event(self) -> Option<ControllerEvent> {
        match self {
            Self::Start => Some(ControllerEvent::Start),
            Self::Next => Some(ControllerEvent::Next),
            Self::Quit => Some(ControllerEvent::Shutdown),
            Self::Help => None,
        }
    }
}

/// Read commands from `reader` and post them to the controller until quit or EOF.
///
/// EOF counts as quit.
pub fn pump_commands<R: BufRead>(
    reader: R,
    tx: &mpsc::UnboundedSender<ControllerEvent>,
    presenter: &Presenter,
) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match UserCommand::parse(&line) {
            Some(UserCommand::Help) => presenter.commands_help(),
            Some(command) => {
                debug!(?command, "user command");
                let quit = command == UserCommand::Quit;
                if let Some(event) = command.event() {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                if quit {
                    return;
                }
            }
            None => presenter.warn(&format!("Unknown command '{}'. Type 'h' for help.", line.trim())),
        }
    }

    let _ = tx.send(ControllerEvent::Shutdown);
}

/// Read stdin on a dedicated thread; a blocking read must not hold up the runtime
pub fn spawn_stdin_pump(
    tx: mpsc::UnboundedSender<ControllerEvent>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let presenter = Presenter::new();
            pump_commands(io::stdin().lock(), &tx, &presenter);
        })
}
