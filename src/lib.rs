//! Interview Coach - timed mock interviews from the terminal
//!
//! This crate asks an interview server for a question, gives the user a
//! preparation window, records a timed camera+microphone answer with FFmpeg,
//! uploads it, and renders the server's scoring.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Phases, layout projection, analysis report and rendering, config values, errors
//! - **Application**: Phase controller, countdown timers, capture manager, upload pipeline, port traits
//! - **Infrastructure**: Adapter implementations (FFmpeg capture, HTTP endpoints, XDG config)
//! - **CLI**: Command-line interface, terminal view, keyboard input, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
