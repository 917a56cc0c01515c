use crate::hydrogen::HydrogenLog;
use std::io::{self, BufRead, Write};

const HELP: &str = "Commands: (m)ethods, (p)hases <method>, (s)how <method> <phase>, (t)ext <start> <end>, (h)elp, (q)uit";

/// A parsed prompt command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Methods,
    Phases(usize),
    Show(usize, usize),
    Text(usize, usize),
    Help,
    Quit,
}

impl Command {
    /// Parse one prompt line. Blank input yields `Ok(None)`.
    pub fn parse(input: &str) -> Result<Option<Command>, String> {
        let words = shlex::split(input).ok_or_else(|| "unbalanced quotes".to_string())?;
        let Some((head, rest)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (head.as_str(), rest.len()) {
            ("m" | "methods", 0) => Command::Methods,
            ("p" | "phases", 1) => Command::Phases(index(&rest[0])?),
            ("s" | "show", 2) => Command::Show(index(&rest[0])?, index(&rest[1])?),
            ("t" | "text", 2) => Command::Text(index(&rest[0])?, index(&rest[1])?),
            ("h" | "help" | "?", 0) => Command::Help,
            ("q" | "quit" | "exit", 0) => Command::Quit,
            _ => return Err(format!("bad command: {}", input.trim())),
        };
        Ok(Some(command))
    }
}

fn index(word: &str) -> Result<usize, String> {
    word.parse()
        .map_err(|_| format!("expected a number, got '{}'", word))
}

/// Prompt-driven view over a loaded log.
pub struct Browser {
    log: HydrogenLog,
}

impl Browser {
    pub fn new(log: HydrogenLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &HydrogenLog {
        &self.log
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.execute(Command::Methods)?)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => return Ok(()),
                Ok(Some(command)) => match self.execute(command) {
                    Ok(text) => writeln!(out, "{}", text)?,
                    Err(e) => writeln!(out, "error: {}", e)?,
                },
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    writeln!(out, "{}", HELP)?;
                }
            }
        }
    }

    /// Render the output of a single command.
    pub fn execute(&self, command: Command) -> Result<String, BrowseError> {
        let text = match command {
            Command::Methods => {
                if self.log.methods().is_empty() {
                    return Ok("no methods".to_string());
                }
                let rows: Vec<String> = self
                    .log
                    .methods()
                    .iter()
                    .enumerate()
                    .map(|(i, method)| {
                        let source = match &method.name.source {
                            Some(source) => format!(" [{}]", source),
                            None => String::new(),
                        };
                        format!(
                            "{:>4}: {}{} ({} phases)",
                            i,
                            method.label(),
                            source,
                            method.phases.len()
                        )
                    })
                    .collect();
                rows.join("\n")
            }
            Command::Phases(m) => {
                let method = self.log.method(m).ok_or(BrowseError::NoMethod(m))?;
                let mut rows = vec![method.name.full.clone()];
                for (i, phase) in method.phases.iter().enumerate() {
                    rows.push(format!(
                        "{:>4}: {} (lines {}..{})",
                        i, phase.name, phase.start_line, phase.end_line
                    ));
                }
                rows.join("\n")
            }
            Command::Show(m, p) => {
                let method = self.log.method(m).ok_or(BrowseError::NoMethod(m))?;
                let phase = method
                    .phases
                    .get(p)
                    .ok_or(BrowseError::NoPhase { method: m, phase: p })?;
                self.log.phase_text(phase.start_line, phase.end_line)?
            }
            Command::Text(start, end) => self.log.phase_text(start, end)?,
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error("no method #{0}")]
    NoMethod(usize),

    #[error("method #{method} has no phase #{phase}")]
    NoPhase { method: usize, phase: usize },

    #[error(transparent)]
    Range(#[from] crate::parser::RangeError),
}

impl From<BrowseError> for io::Error {
    fn from(e: BrowseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, e)
    }
}
