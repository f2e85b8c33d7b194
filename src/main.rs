use anyhow::{Context, Result};
use std::process::ExitCode;
use transcribe::app;
use transcribe::cli::{Invocation, parse_invocation};
use transcribe::config::Config;

/// Exit status for failures outside the transcription contract.
const BOOTSTRAP_FAILURE: u8 = 1;

fn main() -> ExitCode {
    transcribe::logging::init();
    log::debug!("transcribe {}", transcribe::version_string());

    let cli = match parse_invocation(std::env::args_os()) {
        Ok(Invocation::Transcribe(cli)) => cli,
        Ok(Invocation::Info(info)) => {
            if let Err(e) = info.print() {
                eprintln!("{e}");
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => return app::report(&e),
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::from(BOOTSTRAP_FAILURE);
        }
    };

    // Returning (not `process::exit`) lets the temp-file guard run its drop.
    app::run(&cli, &config)
}

/// Load configuration from the default path, falling back to defaults.
///
/// Priority order:
/// 1. Environment variables (TRANSCRIBE_*)
/// 2. ~/.config/transcribe/config.toml
/// 3. Built-in defaults
fn load_config() -> Result<Config> {
    let config = match Config::default_path() {
        Ok(path) => Config::load_or_default(&path)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?,
        Err(e) => {
            log::debug!("{e}; using built-in defaults");
            Config::default()
        }
    };
    Ok(config.with_env_overrides())
}
