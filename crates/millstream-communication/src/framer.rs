//! Response framing
//!
//! GRBL replies arrive as raw bytes in arbitrary-sized chunks, and a single
//! logical response can straddle several polling ticks. The framer
//! accumulates chunks until the text forms a complete response: trimmed text
//! ending with `ok` (acknowledgement, including status reports the firmware
//! suffixes with `ok`) or beginning with `error`. Anything else is retained
//! and concatenated with the next chunk.

/// Accumulates raw response bytes into complete logical frames
#[derive(Debug, Default)]
pub struct ResponseFramer {
    pending: String,
}

impl ResponseFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of raw bytes, returning a completed frame if one formed
    ///
    /// The returned frame is the trimmed accumulation of every chunk since
    /// the last completed frame. Returns `None` while the response is still
    /// partial or when the chunk is empty.
    pub fn push_chunk(&mut self, data: &[u8]) -> Option<String> {
        if data.is_empty() {
            return None;
        }

        self.pending.push_str(&String::from_utf8_lossy(data));

        let text = self.pending.trim();
        if text.ends_with("ok") || text.starts_with("error") {
            let frame = text.to_string();
            self.pending.clear();
            Some(frame)
        } else {
            tracing::debug!(partial = %text, "Partial response retained");
            None
        }
    }

    /// Check whether any partial response is buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.trim().is_empty()
    }

    /// Drop any buffered partial response
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
