//! Speech-to-text backends.

pub mod google;
pub mod transcriber;

pub use google::GoogleRecognizer;
pub use transcriber::{MockTranscriber, Transcriber};
