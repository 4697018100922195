//! Core input-processing components.
//!
//! This module contains the low-level input pipeline:
//!
//! - **decode**: incremental byte-to-text decoding (UTF-8 and friends)
//! - **escape**: ANSI/VT CSI escape sequence state machine
//! - **line**: the line edit buffer with cursor and word-wise motion
//!
//! # Architecture
//!
//! ```text
//! Console
//! ├── StreamDecoder (bytes → characters)
//! ├── EscapeParser  (characters → input / control commands)
//! └── LineBuffer    (edited line + cursor)
//! ```

pub mod decode;
pub mod escape;
pub mod line;
