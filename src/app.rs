//! Composition root: wires config, recognizer and pipeline, and turns the
//! outcome into a process exit status.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, TranscribeError};
use crate::pipeline::{PipelineOptions, transcribe_file};
use crate::stt::google::GoogleRecognizer;
use crate::stt::transcriber::Transcriber;
use std::io::Write;
use std::process::ExitCode;

/// Run a transcription with the configured remote recognizer.
///
/// Prints the transcript to stdout on success and a diagnostic to stderr
/// otherwise.
pub fn run(cli: &Cli, config: &Config) -> ExitCode {
    let recognizer = match GoogleRecognizer::new(config.recognizer.clone()) {
        Ok(recognizer) => recognizer,
        Err(e) => return report(&e),
    };

    let options = PipelineOptions::from(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match execute(cli, &recognizer, &options, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Transcribe `cli.audio_file` with `transcriber` and write the transcript
/// followed by a newline to `out`.
///
/// Nothing is written to `out` unless the whole pipeline succeeds.
pub fn execute<W: Write>(
    cli: &Cli,
    transcriber: &dyn Transcriber,
    options: &PipelineOptions,
    out: &mut W,
) -> Result<()> {
    let transcript = transcribe_file(&cli.audio_file, transcriber, options)?;
    writeln!(out, "{transcript}")?;
    out.flush()?;
    Ok(())
}

/// Print the error on stderr and return its exit status.
pub fn report(error: &TranscribeError) -> ExitCode {
    eprintln!("{error}");
    ExitCode::from(error.exit_code())
}
