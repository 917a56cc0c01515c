use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a file to append log output to.
pub const LOG_FILE_ENV: &str = "HYDROGEN_VIEWER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Prompt-driven browsing of a single log.
    #[default]
    Interactive,
    /// Framed JSON requests on stdin, responses on stdout.
    Server,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} needs a value")]
    MissingValue(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

impl Config {
    /// Parse command-line arguments, not including the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ipc" | "--server" => config.mode = Mode::Server,
                "--log-file" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue(arg))?;
                    config.log_file = Some(PathBuf::from(value));
                }
                _ if arg.starts_with("--") => return Err(ConfigError::UnknownOption(arg)),
                _ if config.path.is_none() => config.path = Some(PathBuf::from(arg)),
                _ => return Err(ConfigError::UnexpectedArgument(arg)),
            }
        }

        Ok(config)
    }

    /// Fill unset options from the environment.
    pub fn with_env(mut self) -> Self {
        if self.log_file.is_none() {
            self.log_file = std::env::var_os(LOG_FILE_ENV).map(PathBuf::from);
        }
        self
    }

    /// Set up `env_logger`. Output goes to stderr unless a log file is set,
    /// since stdout carries protocol traffic in server mode.
    pub fn init_logging(&self) -> io::Result<()> {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

        if let Some(path) = &self.log_file {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        } else {
            builder.target(env_logger::Target::Stderr);
        }

        // A second init (e.g. in tests) keeps the first logger.
        let _ = builder.try_init();
        Ok(())
    }
}
