//! Incremental byte-to-text decoding
//!
//! Input arrives as raw byte chunks; a multi-byte UTF-8 sequence can be
//! split across chunk boundaries, so the decoder keeps the incomplete tail
//! until the rest arrives.

/// Supported input encodings, selected by name in the console options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    /// One byte, one code point (also selected by the name `binary`).
    Latin1,
    /// Seven-bit: the high bit is stripped.
    Ascii,
}

impl Encoding {
    /// Look up an encoding by name. Case-insensitive, dashes ignored, so
    /// `utf8` and `UTF-8` both work.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|&c| c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Some(Encoding::Utf8),
            "latin1" | "binary" => Some(Encoding::Latin1),
            "ascii" => Some(Encoding::Ascii),
            _ => None,
        }
    }
}

/// Streaming decoder for one input channel.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    encoding: Encoding,
    /// Incomplete trailing UTF-8 sequence from the previous chunk.
    pending: Vec<u8>,
}

impl StreamDecoder {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            pending: Vec::new(),
        }
    }

    /// Decode a chunk. Invalid bytes become U+FFFD; an incomplete trailing
    /// sequence is held back for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        match self.encoding {
            Encoding::Utf8 => self.decode_utf8(bytes),
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Encoding::Ascii => bytes.iter().map(|&b| (b & 0x7f) as char).collect(),
        }
    }

    fn decode_utf8(&mut self, bytes: &[u8]) -> String {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let mut out = String::with_capacity(data.len());
        let mut i = 0;
        while i < data.len() {
            let b = data[i];
            let seq_len = if b < 0x80 {
                1
            } else if b & 0xE0 == 0xC0 {
                2
            } else if b & 0xF0 == 0xE0 {
                3
            } else if b & 0xF8 == 0xF0 {
                4
            } else {
                // Stray continuation or invalid lead byte
                out.push(char::REPLACEMENT_CHARACTER);
                i += 1;
                continue;
            };

            if i + seq_len > data.len() {
                // Incomplete tail; wait for the next chunk
                self.pending = data[i..].to_vec();
                break;
            }

            match std::str::from_utf8(&data[i..i + seq_len]) {
                Ok(s) => {
                    out.push_str(s);
                    i += seq_len;
                }
                Err(_) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    i += 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_names() {
        assert_eq!(Encoding::from_name("utf8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_name("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_name("latin1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_name("binary"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_name("ascii"), Some(Encoding::Ascii));
        assert_eq!(Encoding::from_name("utf16le"), None);
    }

    #[test]
    fn test_plain_ascii() {
        let mut decoder = StreamDecoder::new(Encoding::Utf8);
        assert_eq!(decoder.decode(b"hello"), "hello");
    }

    #[test]
    fn test_split_multibyte_sequence() {
        let mut decoder = StreamDecoder::new(Encoding::Utf8);
        // "あ" is E3 81 82; split it across three chunks
        assert_eq!(decoder.decode(&[0xE3]), "");
        assert_eq!(decoder.decode(&[0x81]), "");
        assert_eq!(decoder.decode(&[0x82]), "あ");
    }

    #[test]
    fn test_invalid_bytes_become_replacement() {
        let mut decoder = StreamDecoder::new(Encoding::Utf8);
        let decoded = decoder.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(decoded, "a\u{fffd}b");
    }

    #[test]
    fn test_truncated_sequence_not_lost() {
        let mut decoder = StreamDecoder::new(Encoding::Utf8);
        // C3 starts a two-byte sequence but '(' can't continue it
        assert_eq!(decoder.decode(&[0xC3]), "");
        assert_eq!(decoder.decode(&[b'(']), "\u{fffd}(");
    }

    #[test]
    fn test_latin1_passthrough() {
        let mut decoder = StreamDecoder::new(Encoding::Latin1);
        assert_eq!(decoder.decode(&[0x61, 0xE9]), "aé");
    }

    #[test]
    fn test_ascii_strips_high_bit() {
        let mut decoder = StreamDecoder::new(Encoding::Ascii);
        assert_eq!(decoder.decode(&[0x61, 0xE1]), "aa");
    }
}
