//! Incremental frame decoder for the chat event stream
//!
//! Wire format:
//! ```text
//! data: {"type":"token","text":"Hello"}\n
//! \n
//! ```
//!
//! Frames are separated by a blank line (`\n\n`, `\r\n\r\n` also accepted).
//! Inside a frame only `data:` lines carry payload; any other line is dropped.
//!
//! This decoder handles:
//! - Frames split across network chunks at any byte position
//! - UTF-8 characters split across chunk boundaries

/// Line prefix marking a payload line
pub const DATA_MARKER: &str = "data:";

/// Buffered frame decoder that handles partial chunks
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet terminated by a blank line
    buffer: String,
    /// Trailing bytes of a UTF-8 character whose remaining bytes have not arrived
    incomplete_utf8: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes into the decoder and extract complete frame payloads
    ///
    /// Incomplete frames are buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let bytes_to_decode = if self.incomplete_utf8.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.incomplete_utf8);
            combined.extend_from_slice(chunk);
            combined
        };

        self.incomplete_utf8 = Self::decode_utf8_into(&bytes_to_decode, &mut self.buffer);

        let mut payloads = Vec::new();
        while let Some((end, delimiter_len)) = self.find_frame_boundary() {
            let frame_text: String = self.buffer.drain(..end).collect();
            self.buffer.drain(..delimiter_len);

            if let Some(payload) = Self::parse_frame(&frame_text) {
                payloads.push(payload);
            }
        }

        payloads
    }

    /// Decode `bytes` into `out`, returning a trailing incomplete sequence.
    ///
    /// Invalid sequences become U+FFFD so a single bad byte cannot stall the
    /// stream; only a sequence truncated at the very end is held back.
    fn decode_utf8_into(bytes: &[u8], out: &mut String) -> Vec<u8> {
        let mut rest = bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    return Vec::new();
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap_or_default());
                    match e.error_len() {
                        None => return rest[valid_up_to..].to_vec(),
                        Some(invalid_len) => {
                            tracing::warn!(
                                "Invalid UTF-8 in stream at offset {}, replacing {} byte(s)",
                                valid_up_to,
                                invalid_len
                            );
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid_up_to + invalid_len..];
                        }
                    }
                }
            }
        }
    }

    /// Find the earliest frame boundary, returning its position and delimiter length
    fn find_frame_boundary(&self) -> Option<(usize, usize)> {
        let lf = self.buffer.find("\n\n").map(|pos| (pos, 2));
        let crlf = self.buffer.find("\r\n\r\n").map(|pos| (pos, 4));
        match (lf, crlf) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    /// Extract the payload of a single frame, if it has any `data:` lines
    fn parse_frame(text: &str) -> Option<String> {
        let data_lines: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix(DATA_MARKER))
            .map(|value| value.strip_prefix(' ').unwrap_or(value))
            .collect();

        if data_lines.is_empty() {
            return None;
        }

        Some(data_lines.join("\n"))
    }

    /// Clear all buffered state
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.incomplete_utf8.clear();
    }

    /// Check if there's remaining data in the buffer
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty() || !self.incomplete_utf8.is_empty()
    }

    /// Number of bytes buffered without a terminating blank line
    pub fn remaining_len(&self) -> usize {
        self.buffer.len() + self.incomplete_utf8.len()
    }

    /// Get remaining buffered text (for debugging)
    pub fn remaining(&self) -> &str {
        &self.buffer
    }
}
