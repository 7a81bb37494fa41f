//! Line framing over a TCP byte stream.
//!
//! TCP delivers arbitrary fragments; the reader buffers bytes until a full
//! `\n`-terminated line is available. Buffer growth is capped so a
//! malformed or hostile stream cannot grow memory without bound - on
//! overflow the partial line is dropped and framing restarts at the next
//! newline.

/// Incremental line reassembler.
#[derive(Debug)]
pub struct LineReader {
    buffer: Vec<u8>,
    max_buffer: usize,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader {
    /// Cap on the unframed tail; a legitimate message never gets close.
    pub const MAX_BUFFER: usize = 16 * 1024;

    pub fn new() -> Self {
        Self::with_max_buffer(Self::MAX_BUFFER)
    }

    pub fn with_max_buffer(max_buffer: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_buffer,
        }
    }

    /// Feeds received bytes in and returns every complete line, without
    /// terminators. Empty lines and lines that are not valid UTF-8 are
    /// dropped.
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            raw.pop(); // the newline itself
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            if raw.is_empty() {
                continue;
            }
            match String::from_utf8(raw) {
                Ok(line) => lines.push(line),
                Err(err) => log::warn!("dropping non-UTF-8 line: {err}"),
            }
        }

        if self.buffer.len() > self.max_buffer {
            log::warn!(
                "receive buffer overflow ({} bytes), dropping partial message",
                self.buffer.len()
            );
            self.buffer.clear();
        }

        lines
    }

    /// Bytes currently waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
