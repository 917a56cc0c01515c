use crate::parser::{LineStore, Method, ParseError, RangeError, TraceParser};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Extension of hydrogen trace files.
pub const LOG_EXTENSION: &str = "cfg";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line} is not valid UTF-8")]
    Encoding { line: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A parsed hydrogen log: the method index plus the text it was built from.
#[derive(Debug, Default, Clone)]
pub struct HydrogenLog {
    lines: LineStore,
    methods: Vec<Method>,
}

impl HydrogenLog {
    /// Read and index a log file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let log = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {}: {} lines, {} methods",
            path.display(),
            log.lines.len(),
            log.methods.len()
        );
        Ok(log)
    }

    /// Index a log streamed from `reader`.
    ///
    /// Lines are split on `\n` only; a `\r` before it stays in the line.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, LoadError> {
        let mut parser = TraceParser::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }

            let index = parser.lines().len();
            let line = String::from_utf8(std::mem::take(&mut buf))
                .map_err(|_| LoadError::Encoding { line: index })?;
            parser.observe(line)?;
        }

        let parsed = parser.finish();
        Ok(Self {
            lines: parsed.lines,
            methods: parsed.methods,
        })
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<&Method> {
        self.methods.get(index)
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    /// Verbatim text of lines `[start, end)`.
    pub fn phase_text(&self, start: usize, end: usize) -> Result<String, RangeError> {
        self.lines.slice(start, end)
    }
}

/// What a file turned out to be when loaded by extension.
#[derive(Debug)]
pub enum Loaded {
    Log(HydrogenLog),
    Code(String),
}

pub fn is_hydrogen_log(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(LOG_EXTENSION)
}

/// Load `path` as a hydrogen log if it has the `.cfg` extension, otherwise
/// as plain source text.
pub fn load(path: impl AsRef<Path>) -> Result<Loaded, LoadError> {
    let path = path.as_ref();
    if is_hydrogen_log(path) {
        log::info!("load hydrogen log '{}'", path.display());
        Ok(Loaded::Log(HydrogenLog::load(path)?))
    } else {
        log::info!("load code '{}'", path.display());
        Ok(Loaded::Code(fs::read_to_string(path)?))
    }
}
