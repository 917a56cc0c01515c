use thiserror::Error;

/// Fatal conditions hit while indexing a hydrogen log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line after a begin tag does not carry `name "<value>"`.
    #[error("line {line}: expected `name \"...\"`")]
    MissingName { line: usize },

    #[error("line {line}: end tag without a preceding begin_compilation or begin_cfg")]
    MissingBeginTag { line: usize },

    #[error("line {line}: end_cfg outside of any compilation record")]
    OrphanPhase { line: usize },
}

/// A `[start, end)` line range that does not fit the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid line range {start}..{end} (log has {len} lines)")]
pub struct RangeError {
    pub start: usize,
    pub end: usize,
    pub len: usize,
}
