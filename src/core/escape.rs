//! CSI escape sequence decoder
//!
//! Recognizes ANSI/VT control sequences one character at a time and hands
//! everything else back as ordinary input.

use bitflags::bitflags;

/// ESC (0x1B), the control sequence introducer prefix.
pub const ESC: char = '\u{1b}';

bitflags! {
    /// Modifier keys encoded in a CSI parameter.
    ///
    /// Terminals encode held modifiers as `1 + bitfield` in the second
    /// parameter of cursor-key sequences (xterm convention), so `ESC[1;5C`
    /// is Ctrl+Right and `ESC[1;6C` is Ctrl+Shift+Right.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

impl Modifiers {
    /// Decode an xterm modifier parameter (`1` means no modifiers held).
    pub fn from_param(param: u32) -> Self {
        Self::from_bits_truncate(param.saturating_sub(1) as u8)
    }

    /// Whether this combination requests word-wise cursor motion.
    ///
    /// Matches exactly the parameter values 5 (Ctrl) and 6 (Ctrl+Shift)
    /// that terminal emulators send for Ctrl+Arrow.
    pub fn word_motion(self) -> bool {
        self == Modifiers::CTRL || self == (Modifiers::CTRL | Modifiers::SHIFT)
    }
}

/// A complete CSI sequence: `ESC [ <parameters> <final>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSequence {
    /// Raw accumulated text, `ESC [` and final byte included.
    pub raw: String,
    /// Parameter bytes (0x30-0x3F) between `ESC [` and the final byte.
    /// Intermediate bytes are dropped.
    pub params: String,
    /// Final byte (0x40-0x7E) identifying the command.
    pub final_byte: char,
}

impl CsiSequence {
    /// Numeric parameters: the parameter string split on `;`, each piece
    /// parsed as a leading decimal integer. Absent, unparsable, and zero
    /// values all become 1.
    pub fn numeric_params(&self) -> Vec<u32> {
        self.params
            .split(';')
            .map(|piece| {
                let digits: String =
                    piece.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u32>().ok().filter(|&n| n != 0).unwrap_or(1)
            })
            .collect()
    }

    /// The `i`-th numeric parameter, defaulting to 1.
    pub fn param(&self, i: usize) -> u32 {
        self.numeric_params().get(i).copied().unwrap_or(1)
    }

    /// Modifier keys from the second parameter.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::from_param(self.param(1))
    }
}

/// Result of feeding one character to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Ordinary input character (decoder was idle).
    Char(char),
    /// A sequence is being accumulated; nothing to do yet.
    Incomplete,
    /// A complete CSI sequence.
    Command(CsiSequence),
    /// A complete non-CSI escape (`ESC` followed by anything but `[`).
    /// The character was consumed.
    Unknown(String),
    /// The sequence was abandoned on an illegal continuation byte. The
    /// character that caused the abort was NOT consumed and must be fed
    /// again once the caller has reported the fragment.
    Aborted(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    EscSeen,
    Csi,
}

/// Escape sequence state machine.
///
/// Characters are fed one at a time; the parser is idle between sequences
/// and accumulates from `ESC` to the final byte. Illegal continuation bytes
/// abandon the sequence rather than swallowing input.
#[derive(Debug, Default)]
pub struct EscapeParser {
    state: State,
    pending: Vec<char>,
}

impl EscapeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sequence is currently being accumulated.
    pub fn in_sequence(&self) -> bool {
        self.state != State::Idle
    }

    /// Begin accumulating as if `ESC` had just been fed.
    pub fn begin(&mut self) {
        self.state = State::EscSeen;
        self.pending.clear();
        self.pending.push(ESC);
    }

    /// Feed a single character.
    pub fn feed(&mut self, ch: char) -> Decoded {
        match self.state {
            State::Idle => self.idle(ch),
            State::EscSeen => self.esc_seen(ch),
            State::Csi => self.csi(ch),
        }
    }

    fn idle(&mut self, ch: char) -> Decoded {
        if ch == ESC {
            self.begin();
            Decoded::Incomplete
        } else {
            Decoded::Char(ch)
        }
    }

    fn esc_seen(&mut self, ch: char) -> Decoded {
        if ch == '[' {
            self.state = State::Csi;
            self.pending.push(ch);
            Decoded::Incomplete
        } else {
            let mut raw = self.reset();
            raw.push(ch);
            Decoded::Unknown(raw)
        }
    }

    fn csi(&mut self, ch: char) -> Decoded {
        if is_final_byte(ch) {
            self.pending.push(ch);
            let raw = self.reset();
            return Decoded::Command(split_sequence(raw, ch));
        }

        // A parameter byte may follow `[` or another parameter byte; an
        // intermediate byte may follow `[`, a parameter, or another
        // intermediate. A parameter byte after an intermediate is illegal,
        // as is anything outside both ranges.
        let prev = self.pending.last().copied().unwrap_or('[');
        let accept = if prev == '[' || is_param_byte(prev) {
            is_param_byte(ch) || is_intermediate_byte(ch)
        } else if is_intermediate_byte(prev) {
            is_intermediate_byte(ch)
        } else {
            false
        };

        if accept {
            self.pending.push(ch);
            Decoded::Incomplete
        } else {
            Decoded::Aborted(self.reset())
        }
    }

    /// Return to idle, draining the accumulator.
    fn reset(&mut self) -> String {
        self.state = State::Idle;
        self.pending.drain(..).collect()
    }
}

fn split_sequence(raw: String, final_byte: char) -> CsiSequence {
    let params = raw
        .chars()
        .skip(2) // ESC [
        .filter(|&c| is_param_byte(c))
        .collect();
    CsiSequence {
        raw,
        params,
        final_byte,
    }
}

fn is_param_byte(ch: char) -> bool {
    matches!(ch as u32, 0x30..=0x3F)
}

fn is_intermediate_byte(ch: char) -> bool {
    matches!(ch as u32, 0x20..=0x2F)
}

fn is_final_byte(ch: char) -> bool {
    matches!(ch as u32, 0x40..=0x7E)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut EscapeParser, input: &str) -> Vec<Decoded> {
        input.chars().map(|c| parser.feed(c)).collect()
    }

    #[test]
    fn test_passthrough_when_idle() {
        let mut parser = EscapeParser::new();
        assert_eq!(parser.feed('a'), Decoded::Char('a'));
        assert_eq!(parser.feed('あ'), Decoded::Char('あ'));
        assert!(!parser.in_sequence());
    }

    #[test]
    fn test_csi_with_params() {
        let mut parser = EscapeParser::new();
        let results = feed_all(&mut parser, "\x1b[5;10H");

        // Everything before the final byte accumulates silently
        assert!(results[..6].iter().all(|r| *r == Decoded::Incomplete));
        let seq = match &results[6] {
            Decoded::Command(seq) => seq,
            other => panic!("expected command, got {:?}", other),
        };
        assert_eq!(seq.params, "5;10");
        assert_eq!(seq.final_byte, 'H');
        assert_eq!(seq.numeric_params(), vec![5, 10]);
        assert!(!parser.in_sequence());
    }

    #[test]
    fn test_csi_without_params() {
        let mut parser = EscapeParser::new();
        let results = feed_all(&mut parser, "\x1b[A");
        let seq = match &results[2] {
            Decoded::Command(seq) => seq,
            other => panic!("expected command, got {:?}", other),
        };
        assert_eq!(seq.params, "");
        assert_eq!(seq.final_byte, 'A');
        assert_eq!(seq.param(0), 1);
    }

    #[test]
    fn test_non_csi_escape() {
        let mut parser = EscapeParser::new();
        assert_eq!(parser.feed(ESC), Decoded::Incomplete);
        assert_eq!(parser.feed('x'), Decoded::Unknown("\x1bx".to_string()));
        assert!(!parser.in_sequence());
    }

    #[test]
    fn test_abort_on_illegal_byte() {
        let mut parser = EscapeParser::new();
        assert_eq!(parser.feed(ESC), Decoded::Incomplete);
        assert_eq!(parser.feed('['), Decoded::Incomplete);
        assert_eq!(parser.feed('3'), Decoded::Incomplete);
        // Control character can't continue a CSI sequence
        assert_eq!(parser.feed('\u{8}'), Decoded::Aborted("\x1b[3".to_string()));
        // The aborting character was not consumed; re-feeding it now works
        assert_eq!(parser.feed('\u{8}'), Decoded::Char('\u{8}'));
    }

    #[test]
    fn test_param_after_intermediate_aborts() {
        let mut parser = EscapeParser::new();
        feed_all(&mut parser, "\x1b[ ");
        assert_eq!(parser.feed('5'), Decoded::Aborted("\x1b[ ".to_string()));
        assert_eq!(parser.feed('5'), Decoded::Char('5'));
    }

    #[test]
    fn test_intermediate_after_param_accepted() {
        let mut parser = EscapeParser::new();
        let results = feed_all(&mut parser, "\x1b[1 q");
        let seq = match &results[4] {
            Decoded::Command(seq) => seq,
            other => panic!("expected command, got {:?}", other),
        };
        // Intermediate bytes are dropped from the parameter string
        assert_eq!(seq.params, "1");
        assert_eq!(seq.final_byte, 'q');
    }

    #[test]
    fn test_numeric_param_defaults() {
        let seq = CsiSequence {
            raw: "\x1b[0;;?C".to_string(),
            params: "0;;?".to_string(),
            final_byte: 'C',
        };
        // Zero, empty, and non-numeric pieces all default to 1
        assert_eq!(seq.numeric_params(), vec![1, 1, 1]);
    }

    #[test]
    fn test_modifier_decoding() {
        assert_eq!(Modifiers::from_param(1), Modifiers::empty());
        assert_eq!(Modifiers::from_param(2), Modifiers::SHIFT);
        assert_eq!(Modifiers::from_param(5), Modifiers::CTRL);
        assert_eq!(Modifiers::from_param(6), Modifiers::CTRL | Modifiers::SHIFT);

        assert!(Modifiers::from_param(5).word_motion());
        assert!(Modifiers::from_param(6).word_motion());
        assert!(!Modifiers::from_param(1).word_motion());
        // Ctrl+Alt does not trigger word motion
        assert!(!Modifiers::from_param(7).word_motion());
    }

    #[test]
    fn test_ctrl_arrow_sequence() {
        let mut parser = EscapeParser::new();
        let results = feed_all(&mut parser, "\x1b[1;5C");
        let seq = match &results[5] {
            Decoded::Command(seq) => seq,
            other => panic!("expected command, got {:?}", other),
        };
        assert_eq!(seq.param(0), 1);
        assert_eq!(seq.modifiers(), Modifiers::CTRL);
    }
}
