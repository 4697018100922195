//! Prompt-line rendering and log interleaving
//!
//! Writes the control output that keeps the displayed prompt line in sync
//! with the edit state, and lets asynchronous log text slide in above the
//! line being edited.
//!
//! The wire format is plain ANSI: `ESC[0G` (column 1), `ESC[K` (erase to
//! end of line), `ESC[0m` (reset attributes), `ESC[<n>G` (absolute column),
//! `ESC[1A` (cursor up).

use std::io::{self, Write};

use crate::core::escape::ESC;

/// Where the last log write left the cursor.
#[derive(Debug)]
struct LogCursor {
    /// The last write ended with a newline.
    had_newline: bool,
    /// 1-based column on the log line after the last write.
    column: usize,
}

impl Default for LogCursor {
    fn default() -> Self {
        Self {
            had_newline: true,
            column: 1,
        }
    }
}

/// Renders the prompt line and arbitrates it against log output.
pub struct Renderer<W: Write> {
    out: W,
    prompt: String,
    after_input: String,
    /// Display width of `prompt`: CSI sequences and control characters
    /// stripped, one column per code point.
    visible_len: usize,
    log_cursor: LogCursor,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, prompt: String, after_input: String) -> Self {
        let visible_len = visible_len(&prompt);
        Self {
            out,
            prompt,
            after_input,
            visible_len,
            log_cursor: LogCursor::default(),
        }
    }

    /// Replace the prompt; the visible length is recomputed.
    pub fn set_prompt(&mut self, prompt: String) {
        self.visible_len = visible_len(&prompt);
        self.prompt = prompt;
    }

    /// Replace the suffix written after the edited line. The suffix exists
    /// to close any style codes the prompt opened.
    pub fn set_after_input(&mut self, after_input: String) {
        self.after_input = after_input;
    }

    pub fn visible_len(&self) -> usize {
        self.visible_len
    }

    /// Erase the current line and repaint prompt + line + suffix, leaving
    /// the terminal cursor at the edit cursor's column.
    pub fn redisplay(&mut self, line: &str, cursor: usize) -> io::Result<()> {
        write!(
            self.out,
            "{esc}[0G{esc}[K{esc}[0m{}{}{}{esc}[{}G",
            self.prompt,
            line,
            self.after_input,
            self.visible_len + cursor + 1,
            esc = ESC,
        )?;
        self.out.flush()
    }

    /// Move the terminal cursor only; the displayed text is unchanged.
    pub fn reposition_cursor(&mut self, cursor: usize) -> io::Result<()> {
        write!(self.out, "{}[{}G", ESC, self.visible_len + cursor + 1)?;
        self.out.flush()
    }

    /// Write log text above the prompt line, then repaint the prompt line
    /// (passed in as `line` + `cursor`) beneath it.
    ///
    /// With `newline` false the cursor column is remembered so the next log
    /// write continues on the same line, which is what progress-style
    /// output wants.
    pub fn log(&mut self, text: &str, newline: bool, line: &str, cursor: usize) -> io::Result<()> {
        if self.log_cursor.had_newline {
            // Fresh line: clear whatever the prompt left here
            write!(self.out, "{esc}[1G{esc}[K", esc = ESC)?;
        } else {
            // Continue the previous log line, one row above the prompt
            write!(self.out, "{esc}[1A{esc}[{}G", self.log_cursor.column, esc = ESC)?;
        }
        write!(self.out, "{}\n", text)?;

        if newline {
            self.log_cursor.column = 1;
        } else {
            self.log_cursor.column += text.chars().count();
        }
        self.log_cursor.had_newline = newline;

        self.redisplay(line, cursor)
    }

    /// Move to the next terminal line (submission echo).
    pub fn advance_line(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    /// Forget any remembered log position; the next log write starts on a
    /// fresh line. Called after submission.
    pub fn reset_log_cursor(&mut self) {
        self.log_cursor = LogCursor::default();
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the renderer, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Display width of a prompt: CSI sequences (`ESC [` through the final
/// byte), other two-character escapes, and Unicode control characters are
/// stripped; every remaining code point counts one column.
pub fn visible_len(prompt: &str) -> usize {
    let mut count = 0;
    let mut chars = prompt.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ESC {
            if chars.peek() == Some(&'[') {
                chars.next();
                for c in chars.by_ref() {
                    if matches!(c as u32, 0x40..=0x7E) {
                        break;
                    }
                }
            } else {
                chars.next();
            }
        } else if !ch.is_control() {
            count += 1;
        }
    }
    count
}
