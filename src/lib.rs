//! promptline - an interactive line-editing console
//!
//! promptline turns a raw, unbuffered terminal character stream into
//! discrete submitted lines, with in-place editing, history recall, and log
//! output that interleaves cleanly with the line being edited.
//!
//! # Features
//!
//! - **Line editing**: cursor movement, insertion, backspace and forward
//!   delete, Home/End, Ctrl+Arrow word jumps
//! - **History**: Up/Down recall of submitted lines, with the in-progress
//!   draft preserved while browsing
//! - **Log interleaving**: [`Console::log`] writes above the prompt line
//!   without corrupting it, including same-line progress output
//! - **Escape decoding**: an explicit CSI state machine that survives
//!   partial and malformed sequences
//!
//! # Quick Start
//!
//! ```no_run
//! use promptline::{Console, Options};
//!
//! let options = Options {
//!     prompt: "my-app> ".to_string(),
//!     ..Options::default()
//! };
//! let (mut console, lines) = Console::new(options, std::io::stdout())?;
//! console.start()?;
//!
//! // Deliver raw input (the caller owns raw-mode setup and the read loop)
//! console.process_bytes(b"hello\r")?;
//!
//! for line in lines.try_iter() {
//!     console.log(&format!("Received: {line}"))?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Raw terminal mode, signal handling, and the read loop belong to the
//! caller; see `src/bin/demo.rs` for a complete crossterm-based example.

use std::io;

use thiserror::Error;

pub mod config;
pub mod console;
pub mod core;
pub mod history;
pub mod ui;

pub use crate::config::Options;
pub use crate::console::Console;
pub use crate::core::decode::{Encoding, StreamDecoder};
pub use crate::core::escape::{CsiSequence, Decoded, EscapeParser, Modifiers};
pub use crate::core::line::{Boundary, LineBuffer};
pub use crate::history::History;
pub use crate::ui::render::Renderer;

/// Construction and configuration errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported encoding: {0:?}")]
    UnknownEncoding(String),

    #[error("failed to read config file: {0}")]
    ConfigRead(#[source] io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[source] toml::de::Error),

    #[error("failed to write to output: {0}")]
    Write(#[from] io::Error),
}
