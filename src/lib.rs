//! Index hydrogen logs (JIT compiler cfg traces) into compiled methods and
//! their optimization phases, and serve phase text on demand.

pub mod browser;
pub mod config;
pub mod host;
pub mod hydrogen;
pub mod parser;

pub use hydrogen::{load, HydrogenLog, LoadError, Loaded};
pub use parser::{decode_name, LineStore, Method, MethodName, ParseError, Phase, TraceParser};
