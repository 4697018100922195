//! Console facade
//!
//! Wires the byte decoder, escape parser, line buffer, history, and
//! renderer together, and owns the per-keystroke dispatch. Submitted lines
//! are delivered on an mpsc channel; log output is accepted at any time and
//! interleaved above the prompt line.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, trace};

use crate::config::Options;
use crate::core::decode::{Encoding, StreamDecoder};
use crate::core::escape::{CsiSequence, Decoded, EscapeParser, Modifiers, ESC};
use crate::core::line::{Boundary, LineBuffer};
use crate::history::History;
use crate::ui::render::Renderer;
use crate::Error;

const CTRL_C: char = '\u{3}';

/// Interactive line-editing console over a writable sink.
///
/// The caller delivers input with [`process_bytes`](Console::process_bytes)
/// or [`process_str`](Console::process_str); each chunk is handled to
/// completion before the call returns. Submitted lines arrive on the
/// receiver returned by [`Console::new`].
pub struct Console<W: Write> {
    line: LineBuffer,
    parser: EscapeParser,
    decoder: StreamDecoder,
    history: History,
    renderer: Renderer<W>,
    double_ctrl_c: bool,
    ctrl_c_armed: bool,
    line_tx: Sender<String>,
}

impl<W: Write> Console<W> {
    /// Build a console writing to `out`. Fails on an unrecognized encoding
    /// name in the options.
    pub fn new(options: Options, out: W) -> Result<(Self, Receiver<String>), Error> {
        let encoding = Encoding::from_name(&options.encoding)
            .ok_or_else(|| Error::UnknownEncoding(options.encoding.clone()))?;
        let (line_tx, line_rx) = mpsc::channel();

        let console = Self {
            line: LineBuffer::new(),
            parser: EscapeParser::new(),
            decoder: StreamDecoder::new(encoding),
            history: History::new(),
            renderer: Renderer::new(out, options.prompt, options.after_input),
            double_ctrl_c: options.double_ctrl_c,
            ctrl_c_armed: false,
            line_tx,
        };
        Ok((console, line_rx))
    }

    /// Draw the initial prompt line.
    pub fn start(&mut self) -> io::Result<()> {
        self.redisplay()
    }

    /// Decode and process a chunk of raw input bytes.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let text = self.decoder.decode(bytes);
        self.process_str(&text)
    }

    /// Process a chunk of decoded input text, character by character.
    pub fn process_str(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            self.process_char(ch)?;
        }
        Ok(())
    }

    /// Write a log line above the prompt; the prompt line is repainted
    /// beneath it.
    pub fn log(&mut self, text: &str) -> io::Result<()> {
        self.log_inline(text, true)
    }

    /// Like [`log`](Console::log), but with `newline` false the next log
    /// write continues on the same line (progress-style output).
    pub fn log_inline(&mut self, text: &str, newline: bool) -> io::Result<()> {
        let line = self.line.text();
        let cursor = self.line.cursor();
        self.renderer.log(text, newline, &line, cursor)
    }

    /// Replace the prompt and repaint.
    pub fn change_prompt(&mut self, prompt: impl Into<String>) -> io::Result<()> {
        self.renderer.set_prompt(prompt.into());
        self.redisplay()
    }

    /// Replace the after-input suffix and repaint.
    pub fn change_after_input(&mut self, after_input: impl Into<String>) -> io::Result<()> {
        self.renderer.set_after_input(after_input.into());
        self.redisplay()
    }

    /// Current content of the edit buffer.
    pub fn buffer(&self) -> String {
        self.line.text()
    }

    /// Current cursor index within the edit buffer.
    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &W {
        self.renderer.get_ref()
    }

    fn process_char(&mut self, ch: char) -> io::Result<()> {
        if self.parser.in_sequence() {
            match self.parser.feed(ch) {
                Decoded::Incomplete => return Ok(()),
                Decoded::Command(seq) => return self.dispatch(seq),
                Decoded::Unknown(raw) => return self.report_unknown(&raw),
                // The aborting character was not consumed; report the
                // fragment and fall through to handle it normally.
                Decoded::Aborted(raw) => self.report_unknown(&raw)?,
                Decoded::Char(c) => return self.process_normal(c),
            }
        }
        self.process_normal(ch)
    }

    fn process_normal(&mut self, ch: char) -> io::Result<()> {
        if ch != CTRL_C {
            self.ctrl_c_armed = false;
        }
        match ch {
            CTRL_C => {
                if self.ctrl_c_terminates() {
                    std::process::exit(0);
                }
                self.log("^C")
            }
            ESC => {
                self.parser.begin();
                Ok(())
            }
            '\r' | '\n' => self.submit(),
            '\u{7f}' | '\u{8}' => {
                if self.line.delete_before() {
                    self.redisplay()?;
                }
                Ok(())
            }
            // TODO: autocomplete
            '\t' => Ok(()),
            _ => {
                if ch.is_control() {
                    self.log(&caret_notation(ch))?;
                }
                self.line.insert(ch);
                self.redisplay()
            }
        }
    }

    /// Register a Ctrl+C press. Returns true when the press terminates:
    /// always in single-press mode, and on the second consecutive press in
    /// double-press mode (the first press arms; any other input disarms).
    fn ctrl_c_terminates(&mut self) -> bool {
        if !self.double_ctrl_c || self.ctrl_c_armed {
            return true;
        }
        self.ctrl_c_armed = true;
        false
    }

    fn dispatch(&mut self, seq: CsiSequence) -> io::Result<()> {
        match seq.final_byte {
            // History: older
            'A' => {
                let n = seq.param(0) as usize;
                let recalled = self.history.older(n, self.line.chars());
                self.line.replace(recalled);
                self.redisplay()
            }
            // History: newer
            'B' => {
                let n = seq.param(0) as usize;
                let recalled = self.history.newer(n);
                self.line.replace(recalled);
                self.redisplay()
            }
            // Cursor right (word-wise with Ctrl)
            'C' => {
                let boundary = boundary_for(seq.modifiers());
                self.line.move_right(seq.param(0) as usize, boundary);
                self.reposition()
            }
            // Cursor left
            'D' => {
                let boundary = boundary_for(seq.modifiers());
                self.line.move_left(seq.param(0) as usize, boundary);
                self.reposition()
            }
            // Forward delete (Delete key); only the unmodified form
            '~' if seq.params == "3" => {
                self.line.delete_at();
                self.redisplay()
            }
            // Home
            'H' => {
                self.line.set_cursor(0);
                self.reposition()
            }
            // End
            'F' => {
                self.line.move_to_end();
                self.reposition()
            }
            _ => self.report_unknown(&seq.raw),
        }
    }

    fn submit(&mut self) -> io::Result<()> {
        let chars = self.line.take();
        let text: String = chars.iter().collect();
        self.history.record(chars);

        self.renderer.advance_line()?;
        self.renderer.reset_log_cursor();

        trace!(line = %text, "line submitted");
        // The receiver may be gone; input processing carries on regardless
        let _ = self.line_tx.send(text);

        self.redisplay()
    }

    fn report_unknown(&mut self, raw: &str) -> io::Result<()> {
        debug!(sequence = ?raw, "unrecognized escape sequence");
        self.log(&format!("Unknown escape sequence: {raw}"))
    }

    fn redisplay(&mut self) -> io::Result<()> {
        let line = self.line.text();
        self.renderer.redisplay(&line, self.line.cursor())
    }

    fn reposition(&mut self) -> io::Result<()> {
        self.renderer.reposition_cursor(self.line.cursor())
    }
}

fn boundary_for(mods: Modifiers) -> Option<Boundary> {
    if !mods.word_motion() {
        return None;
    }
    if mods.contains(Modifiers::SHIFT) {
        Some(Boundary::Space)
    } else {
        Some(Boundary::Word)
    }
}

fn caret_notation(ch: char) -> String {
    match char::from_u32(ch as u32 + 0x40) {
        Some(c) => format!("^{c}"),
        None => "^?".to_string(),
    }
}
