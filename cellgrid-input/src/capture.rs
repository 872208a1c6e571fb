//! Bounded per-frame text capture.

pub const DEFAULT_TEXT_CAPACITY: usize = 256;

/// A reusable UTF-8 buffer with a fixed byte capacity.
///
/// Text is appended one whole codepoint at a time. The first codepoint that
/// does not fit marks the buffer truncated, and everything after it in the
/// same frame is dropped so the captured text stays a prefix of what was typed.
#[derive(Debug, Clone)]
pub struct TextCapture {
    buf: String,
    capacity: usize,
    truncated: bool,
}

impl TextCapture {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            capacity,
            truncated: false,
        }
    }

    /// Empty the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.truncated = false;
    }

    /// Append `text`, returning the number of bytes accepted.
    pub fn push_str(&mut self, text: &str) -> usize {
        if self.truncated {
            return 0;
        }
        let start = self.buf.len();
        for ch in text.chars() {
            if self.buf.len() + ch.len_utf8() > self.capacity {
                self.truncated = true;
                break;
            }
            self.buf.push(ch);
        }
        self.buf.len() - start
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Default for TextCapture {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_CAPACITY)
    }
}
