use super::error::RangeError;

/// Append-only store of the raw log lines, indexed from zero.
#[derive(Debug, Default, Clone)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a line and return the index it was given.
    pub fn append(&mut self, line: impl Into<String>) -> usize {
        let index = self.lines.len();
        self.lines.push(line.into());
        index
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Rebuild the text of lines `[start, end)`, joined by `\n`.
    pub fn slice(&self, start: usize, end: usize) -> Result<String, RangeError> {
        if start > end || end > self.lines.len() {
            return Err(RangeError {
                start,
                end,
                len: self.lines.len(),
            });
        }
        Ok(self.lines[start..end].join("\n"))
    }
}
