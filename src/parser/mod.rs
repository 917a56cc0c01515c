mod error;
mod lines;
mod names;
mod trace;
mod types;

pub use error::{ParseError, RangeError};
pub use lines::LineStore;
pub use names::decode_name;
pub use trace::{parse_lines, ParsedLog, ParserState, Tag, TraceParser};
pub use types::{Method, MethodName, Phase};
