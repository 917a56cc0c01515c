use anyhow::{bail, Context, Result};
use hydrogen_viewer::browser::Browser;
use hydrogen_viewer::config::{Config, Mode};
use hydrogen_viewer::{host, HydrogenLog};
use std::io;

fn main() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1))?.with_env();
    config
        .init_logging()
        .context("failed to open log file")?;

    log::info!("starting in {:?} mode", config.mode);

    match config.mode {
        Mode::Server => host::run_server_mode()?,
        Mode::Interactive => run_interactive_mode(&config)?,
    }

    log::info!("exiting");
    Ok(())
}

fn run_interactive_mode(config: &Config) -> Result<()> {
    let Some(path) = &config.path else {
        bail!("usage: hydrogen-viewer [--ipc] [--log-file <path>] <hydrogen.cfg>");
    };

    let log = HydrogenLog::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let browser = Browser::new(log);
    browser.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
