//! MP3 / M4A to WAV transcoding.
//!
//! Compressed input is decoded with symphonia and re-encoded as 16-bit PCM
//! WAV into a temporary file. The file keeps the source sample rate and
//! channel layout; downmixing and resampling happen in the loader.

use crate::audio::format::Codec;
use crate::defaults::{TEMP_PREFIX, TEMP_SUFFIX};
use crate::error::{Result, TranscribeError};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::TempPath;

/// A transcoded WAV file on disk, removed when dropped.
///
/// Holding this value is what keeps the file alive. Every exit path out of
/// the pipeline drops it, so the file never outlives the invocation.
#[derive(Debug)]
pub struct TranscodedWav {
    path: TempPath,
    frames: u64,
    sample_rate: u32,
    channels: u16,
}

impl TranscodedWav {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of sample frames written.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Delete the file now and report the outcome.
    ///
    /// A file that is already gone counts as cleaned up.
    pub fn cleanup(self) -> io::Result<()> {
        match self.path.close() {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

fn conversion_error(message: impl Into<String>) -> TranscribeError {
    TranscribeError::Conversion {
        message: message.into(),
    }
}

/// Decode `source` with the demuxer for `codec` and write it as WAV.
///
/// The temporary file is created in `temp_dir`, or the system temp
/// directory when `None`. Any failure after creation removes it again.
pub fn transcode_to_wav(
    source: &Path,
    codec: Codec,
    temp_dir: Option<&Path>,
) -> Result<TranscodedWav> {
    let file = File::open(source)
        .map_err(|e| conversion_error(format!("Failed to open {}: {}", source.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(codec.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| conversion_error(format!("probe failed: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| conversion_error("no audio track found"))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| conversion_error(format!("codec init failed: {e}")))?;

    let mut output: Option<WavOutput> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(conversion_error(format!("packet read: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                skipped_packets += 1;
                log::debug!("Skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(conversion_error(format!("decode: {e}"))),
        };

        let spec = *decoded.spec();
        if decoded.frames() == 0 {
            continue;
        }

        if output.is_none() {
            let channels = u16::try_from(spec.channels.count())
                .map_err(|_| conversion_error("too many channels"))?;
            output = Some(WavOutput::create(temp_dir, spec.rate, channels)?);
        }

        let mut sample_buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        if let Some(out) = output.as_mut() {
            out.write(sample_buf.samples())?;
        }
    }

    if skipped_packets > 0 {
        log::warn!("Skipped {skipped_packets} corrupt packet(s) in {}", source.display());
    }

    let output = output.ok_or_else(|| conversion_error("no audio samples decoded"))?;
    output.finish()
}

/// WAV writer bound to its temp file.
///
/// `path` is declared last so the writer's file handle is closed before the
/// file is unlinked on drop.
struct WavOutput {
    writer: hound::WavWriter<BufWriter<File>>,
    samples: u64,
    sample_rate: u32,
    channels: u16,
    path: TempPath,
}

impl WavOutput {
    fn create(temp_dir: Option<&Path>, sample_rate: u32, channels: u16) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);

        let named = match temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| conversion_error(format!("Failed to create temporary WAV file: {e}")))?;

        let (file, path) = named.into_parts();
        log::debug!(
            "Writing {} Hz, {} channel WAV to {}",
            sample_rate,
            channels,
            path.display()
        );

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::new(BufWriter::new(file), spec)
            .map_err(|e| conversion_error(format!("Failed to start WAV file: {e}")))?;

        Ok(Self {
            writer,
            samples: 0,
            sample_rate,
            channels,
            path,
        })
    }

    fn write(&mut self, samples: &[i16]) -> Result<()> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .map_err(|e| conversion_error(format!("Failed to write WAV data: {e}")))?;
        }
        self.samples += samples.len() as u64;
        Ok(())
    }

    fn finish(self) -> Result<TranscodedWav> {
        let WavOutput {
            writer,
            samples,
            sample_rate,
            channels,
            path,
        } = self;

        writer
            .finalize()
            .map_err(|e| conversion_error(format!("Failed to finalize WAV file: {e}")))?;

        Ok(TranscodedWav {
            path,
            frames: samples / u64::from(channels.max(1)),
            sample_rate,
            channels,
        })
    }
}
