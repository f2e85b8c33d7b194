//! WAV loading: waveform file to recognition buffer.

use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, TranscribeError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

/// Decoded audio ready for recognition.
///
/// Always 16-bit PCM, mono, at [`SAMPLE_RATE`], whatever the file held.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    samples: Vec<i16>,
    source_rate: u32,
    source_channels: u16,
}

impl AudioData {
    /// Open a WAV file and read all of it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| TranscribeError::AudioRead {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Create from any reader (for testing/flexibility).
    ///
    /// Accepts integer PCM up to 32 bits and 32-bit float. Channels are
    /// averaged to mono, then the signal is resampled to 16kHz.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| TranscribeError::AudioRead {
                message: format!("Failed to parse WAV file: {}", e),
            })?;

        let spec = wav_reader.spec();
        let raw_samples = read_pcm16(&mut wav_reader, spec)?;
        let mono_samples = downmix(raw_samples, spec.channels);

        let samples = if spec.sample_rate != SAMPLE_RATE {
            resample(&mono_samples, spec.sample_rate, SAMPLE_RATE)
        } else {
            mono_samples
        };

        Ok(Self {
            samples,
            source_rate: spec.sample_rate,
            source_channels: spec.channels,
        })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Sample rate of the file the buffer was loaded from.
    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }

    /// Channel count of the file the buffer was loaded from.
    pub fn source_channels(&self) -> u16 {
        self.source_channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / SAMPLE_RATE as f64)
    }

    /// Raw little-endian 16-bit PCM, the body of an `audio/l16` request.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Read every sample of the file as 16-bit PCM.
fn read_pcm16<R: Read>(reader: &mut hound::WavReader<R>, spec: hound::WavSpec) -> Result<Vec<i16>> {
    let read_error = |e: hound::Error| TranscribeError::AudioRead {
        message: format!("Failed to read WAV samples: {}", e),
    };

    match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = u32::from(spec.bits_per_sample);
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| scale_to_i16(s, bits)))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(read_error)
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(read_error),
    }
}

/// Rescale an integer sample of `bits` width to the 16-bit range.
fn scale_to_i16(sample: i32, bits: u32) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

/// Average interleaved channels into one.
fn downmix(samples: Vec<i16>, channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples;
    }

    let channels = usize::from(channels);
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_wav_data(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn from_reader_16khz_mono_matches_exactly() {
        let input_samples = vec![100i16, 200, 300, 400, 500];
        let wav_data = make_wav_data(16000, 1, &input_samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(audio.samples(), input_samples.as_slice());
        assert_eq!(audio.source_rate(), 16000);
        assert_eq!(audio.source_channels(), 1);
    }

    #[test]
    fn from_reader_16khz_stereo_downmixes_to_mono() {
        // Stereo pairs: (100, 200), (300, 400), (500, 600)
        let stereo_samples = vec![100i16, 200, 300, 400, 500, 600];
        let wav_data = make_wav_data(16000, 2, &stereo_samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(audio.samples(), [150i16, 350, 550]);
    }

    #[test]
    fn from_reader_four_channels_averages_all() {
        let samples = vec![100i16, 200, 300, 400, -400, -400, 0, 0];
        let wav_data = make_wav_data(16000, 4, &samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(audio.samples(), [250i16, -200]);
    }

    #[test]
    fn from_reader_48khz_mono_resamples_to_16khz() {
        let input_samples = vec![0i16; 48000]; // 1 second at 48kHz
        let wav_data = make_wav_data(48000, 1, &input_samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert!(audio.samples().len() >= 15900 && audio.samples().len() <= 16100);
        assert_eq!(audio.sample_rate(), 16000);
        assert_eq!(audio.source_rate(), 48000);
    }

    #[test]
    fn from_reader_44100hz_mono_resamples_correctly() {
        let input_samples = vec![1000i16; 44100]; // 1 second at 44.1kHz
        let wav_data = make_wav_data(44100, 1, &input_samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert!(audio.samples().len() >= 15900 && audio.samples().len() <= 16100);
        assert!(audio.samples().iter().all(|&s| (900..=1100).contains(&s)));
    }

    #[test]
    fn from_reader_reads_8bit_pcm() {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in [-128i8, 0, 127] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let audio = AudioData::from_reader(Cursor::new(cursor.into_inner())).unwrap();

        assert_eq!(audio.samples(), [-32768i16, 0, 32512]);
    }

    #[test]
    fn from_reader_reads_24bit_pcm() {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in [0x7FFF00i32, -0x800000, 256] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let audio = AudioData::from_reader(Cursor::new(cursor.into_inner())).unwrap();

        assert_eq!(audio.samples(), [0x7FFFi16, -32768, 1]);
    }

    #[test]
    fn from_reader_reads_float_pcm() {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in [0.0f32, 1.0, -1.0, 2.0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let audio = AudioData::from_reader(Cursor::new(cursor.into_inner())).unwrap();

        assert_eq!(audio.samples(), [0i16, 32767, -32767, 32767]);
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        std::fs::write(&path, make_wav_data(16000, 1, &[7i16; 32])).unwrap();

        let audio = AudioData::from_path(&path).unwrap();

        assert_eq!(audio.samples().len(), 32);
    }

    #[test]
    fn from_path_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.wav");

        match AudioData::from_path(&path) {
            Err(TranscribeError::AudioRead { message }) => {
                assert!(message.contains("nope.wav"), "got: {message}");
            }
            other => panic!("Expected AudioRead error, got {other:?}"),
        }
    }

    #[test]
    fn empty_data_chunk_loads_as_empty_buffer() {
        let wav_data = make_wav_data(16000, 1, &[]);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert!(audio.is_empty());
        assert_eq!(audio.duration(), Duration::ZERO);
    }

    #[test]
    fn duration_counts_16khz_samples() {
        let wav_data = make_wav_data(16000, 1, &vec![0i16; 8000]);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(audio.duration(), Duration::from_millis(500));
    }

    #[test]
    fn le_bytes_are_interleaved_low_byte_first() {
        let wav_data = make_wav_data(16000, 1, &[1i16, -2, 0x1234]);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(
            audio.to_le_bytes(),
            vec![0x01, 0x00, 0xFE, 0xFF, 0x34, 0x12]
        );
    }

    #[test]
    fn invalid_wav_data_returns_error() {
        let invalid_data = vec![0u8, 1, 2, 3, 4, 5];

        match AudioData::from_reader(Cursor::new(invalid_data)) {
            Err(TranscribeError::AudioRead { message }) => {
                assert!(message.contains("Failed to parse WAV file"));
            }
            other => panic!("Expected AudioRead error, got {other:?}"),
        }
    }

    #[test]
    fn empty_wav_data_returns_error() {
        let result = AudioData::from_reader(Cursor::new(Vec::new()));
        assert!(result.is_err());
    }

    #[test]
    fn resample_identity_same_rate() {
        let samples = vec![100i16, 200, 300, 400, 500];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn resample_upsample_verification() {
        let samples = vec![0i16, 1000, 2000];
        let resampled = resample(&samples, 8000, 16000);

        assert_eq!(resampled.len(), 6);
        assert_eq!(resampled[0], 0);
        assert!(resampled[1] > 0 && resampled[1] < 1000);
        assert_eq!(resampled[2], 1000);
    }

    #[test]
    fn resample_downsample_verification() {
        let samples = vec![0i16; 3200];
        assert_eq!(resample(&samples, 16000, 8000).len(), 1600);
    }

    #[test]
    fn resample_handles_edge_cases() {
        assert!(resample(&[], 16000, 8000).is_empty());

        let single = resample(&[100i16], 16000, 8000);
        assert_eq!(single, vec![100]);
    }

    #[test]
    fn stereo_downmix_handles_negative_values() {
        let stereo_samples = vec![-100i16, 100, 300, -300];
        let wav_data = make_wav_data(16000, 2, &stereo_samples);

        let audio = AudioData::from_reader(Cursor::new(wav_data)).unwrap();

        assert_eq!(audio.samples(), [0i16, 0]);
    }

    #[test]
    fn downmix_drops_trailing_partial_frame() {
        assert_eq!(downmix(vec![10, 20, 30], 2), vec![15]);
    }

    #[test]
    fn test_malformed_wav_missing_riff_header() {
        let bad_data = b"XXXX\x00\x00\x00\x00WAVEfmt ";
        match AudioData::from_reader(Cursor::new(bad_data.to_vec())) {
            Err(TranscribeError::AudioRead { message }) => {
                assert!(
                    message.contains("Failed to parse WAV"),
                    "Error should mention WAV parsing: {}",
                    message
                );
            }
            other => panic!("Expected AudioRead error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_wav_truncated_header() {
        let truncated = b"RIFF\x00\x00";
        assert!(AudioData::from_reader(Cursor::new(truncated.to_vec())).is_err());
    }

    #[test]
    fn test_malformed_wav_missing_fmt_chunk() {
        let no_fmt = b"RIFF\x24\x00\x00\x00WAVEdata\x10\x00\x00\x00\x00\x00\x00\x00";
        assert!(AudioData::from_reader(Cursor::new(no_fmt.to_vec())).is_err());
    }

    #[test]
    fn test_malformed_wav_all_zeros() {
        let zeros = vec![0u8; 1000];
        assert!(AudioData::from_reader(Cursor::new(zeros)).is_err());
    }

    #[test]
    fn test_mp3_bytes_are_not_a_wav() {
        let mut garbage = vec![0xFFu8, 0xFB, 0x90, 0x64];
        garbage.extend((0..500).map(|i| ((i * 17 + 42) % 256) as u8));

        assert!(AudioData::from_reader(Cursor::new(garbage)).is_err());
    }
}
