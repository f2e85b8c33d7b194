//! Transcription pipeline implementation.
//!
//! Orchestrates the complete file-to-text flow:
//! detect → transcode (if compressed) → load → recognize → clean up

use crate::audio::format::{SourceFormat, is_waveform_extension};
use crate::audio::transcode::transcode_to_wav;
use crate::audio::wav::AudioData;
use crate::config::Config;
use crate::error::Result;
use crate::stt::transcriber::Transcriber;
use std::path::{Path, PathBuf};

/// Knobs for a pipeline run that don't belong to the recognizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    /// Where transcoded WAV files go. System temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            temp_dir: config.audio.temp_dir.clone(),
        }
    }
}

/// Transcribe one audio file.
///
/// `.mp3` and `.m4a` inputs are first transcoded into a temporary WAV file;
/// everything else is loaded as-is. The temporary file is removed before
/// this function returns, whatever the outcome.
///
/// # Errors
/// * `Conversion` if the compressed input cannot be decoded or re-encoded
/// * `AudioRead` if the waveform cannot be opened or parsed
/// * `UnrecognizedSpeech` / `RecognitionService` from the transcriber
pub fn transcribe_file(
    path: &Path,
    transcriber: &dyn Transcriber,
    options: &PipelineOptions,
) -> Result<String> {
    log::info!("Processing audio file {}", path.display());

    let transcoded = match SourceFormat::detect(path) {
        SourceFormat::NeedsDecode(codec) => {
            log::info!("Converting {codec} to WAV...");
            let wav = transcode_to_wav(path, codec, options.temp_dir.as_deref())?;
            log::debug!(
                "Decoded {} frame(s) at {} Hz, {} channel(s)",
                wav.frames(),
                wav.sample_rate(),
                wav.channels()
            );
            Some(wav)
        }
        SourceFormat::Raw => {
            if !is_waveform_extension(path) {
                log::warn!(
                    "{} does not look like a WAV file; reading it as one",
                    path.display()
                );
            }
            None
        }
    };

    let wav_path = transcoded.as_ref().map_or(path, |wav| wav.path());
    let outcome = load_and_recognize(wav_path, transcriber);

    if let Some(wav) = transcoded {
        let temp_path = wav.path().to_path_buf();
        match wav.cleanup() {
            Ok(()) => log::debug!("Removed temporary file {}", temp_path.display()),
            Err(e) => log::warn!(
                "Failed to remove temporary file {}: {e}",
                temp_path.display()
            ),
        }
    }

    outcome
}

fn load_and_recognize(wav_path: &Path, transcriber: &dyn Transcriber) -> Result<String> {
    let audio = AudioData::from_path(wav_path)?;
    log::debug!(
        "Loaded {:.2}s of audio ({} Hz, {} channel(s) at source)",
        audio.duration().as_secs_f64(),
        audio.source_rate(),
        audio.source_channels()
    );

    log::debug!("Recognizing with {}", transcriber.backend_name());
    transcriber.transcribe(&audio)
}
