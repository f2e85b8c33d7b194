//! Audio preparation: format detection, transcoding and WAV loading.

pub mod format;
pub mod transcode;
pub mod wav;

pub use format::{Codec, SourceFormat};
pub use transcode::{TranscodedWav, transcode_to_wav};
pub use wav::AudioData;
