//! Line reconstruction across chunk boundaries (Bytes -> lines)

/// Carry-over state for one stream.
///
/// Bytes are decoded as UTF-8 incrementally: a multi-byte character split between
/// two reads is held back until it completes. Decoded text is split on `\n`; the
/// trailing fragment after the last newline stays in `carry` until more data (or
/// end of stream) arrives.
#[derive(Debug, Default, Clone)]
pub struct LineDecoder {
    carry: String,
    partial: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read and return every line it completed, in order, without the `\n`.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.decode_utf8(bytes);

        let Some(pos) = self.carry.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.carry.split_off(pos + 1);
        let complete = std::mem::replace(&mut self.carry, rest);
        complete[..complete.len() - 1]
            .split('\n')
            .map(String::from)
            .collect()
    }

    /// End of stream: hand back the final fragment if the stream did not end on a newline.
    pub fn finish(&mut self) -> Option<String> {
        if !self.partial.is_empty() {
            let tail = String::from_utf8_lossy(&self.partial).into_owned();
            self.carry.push_str(&tail);
            self.partial.clear();
        }
        let last = std::mem::take(&mut self.carry);
        if last.is_empty() {
            None
        } else {
            Some(last)
        }
    }

    /// Text received but not yet terminated by a newline.
    pub fn carry(&self) -> &str {
        &self.carry
    }

    fn decode_utf8(&mut self, bytes: &[u8]) {
        self.partial.extend_from_slice(bytes);

        loop {
            let err = match std::str::from_utf8(&self.partial) {
                Ok(s) => {
                    self.carry.push_str(s);
                    self.partial.clear();
                    return;
                }
                Err(e) => e,
            };

            let valid = err.valid_up_to();
            let prefix = String::from_utf8_lossy(&self.partial[..valid]).into_owned();
            self.carry.push_str(&prefix);
            match err.error_len() {
                // Incomplete sequence at the end: wait for the next read.
                None => {
                    self.partial.drain(..valid);
                    return;
                }
                Some(bad) => {
                    self.carry.push(char::REPLACEMENT_CHARACTER);
                    self.partial.drain(..valid + bad);
                }
            }
        }
    }
}
