//! Console output pane contents.

pub const CONSOLE_LIMIT_DEFAULT: usize = 1024;

/// Text shown under the editor: interpreter output and file errors.
/// Never holds more than `limit` bytes; overflow is cut at a char boundary.
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    text: String,
    limit: usize,
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(CONSOLE_LIMIT_DEFAULT)
    }
}

impl ConsoleOutput {
    pub fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the contents.
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.append(text);
    }

    /// Append a line (a trailing `'\n'` is added when missing).
    pub fn push_line(&mut self, line: &str) {
        self.append(line);
        if !line.ends_with('\n') {
            self.append("\n");
        }
    }

    fn append(&mut self, text: &str) {
        let room = self.limit.saturating_sub(self.text.len());
        self.text.push_str(truncate_to_boundary(text, room));
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
