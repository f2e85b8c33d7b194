//! Command-line interface for transcribe
//!
//! Provides argument parsing using clap derive macros. Any argument error is
//! collapsed into [`TranscribeError::Usage`] so the process reports the
//! usage exit status instead of clap's own. A single argument is always the
//! audio path, even when it starts with `-`, unless it is a help or version
//! flag.

use crate::error::{Result, TranscribeError};
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::path::PathBuf;

/// Transcribe an audio file with a remote speech recognizer
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "transcribe",
    version,
    about = "Transcribe an audio file (WAV, MP3, M4A) and print the text"
)]
pub struct Cli {
    /// Audio file to transcribe (.wav, .mp3 or .m4a)
    #[arg(value_name = "AUDIO_FILE", allow_hyphen_values = true)]
    pub audio_file: PathBuf,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Transcribe the given file.
    Transcribe(Cli),
    /// `--help` or `--version`: print and exit successfully.
    Info(clap::Error),
}

/// Parse process arguments (including the program name).
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Invocation::Transcribe(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Info(e))
        }
        Err(e) => {
            log::debug!("Argument error: {:?}", e.kind());
            Err(TranscribeError::Usage)
        }
    }
}
