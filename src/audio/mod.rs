//! Audio pipeline — capture → decode → resample → canonical WAV.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → AudioCapture → AudioChunk (mpsc) → concat
//!           → AudioDecoder → DecodedAudioBuffer
//!           → resample_to_rate (16 kHz, channel 0)
//!           → encode_wav_mono_16bit → CanonicalAudioAsset
//! ```
//!
//! The canonical asset (16 kHz mono 16-bit PCM WAV) is the only audio format
//! that ever leaves the client.

pub mod capture;
pub mod decode;
pub mod resample;
pub mod wav;

pub use capture::{AudioCapture, AudioChunk, CaptureError, CaptureHandle, CpalCapture};
pub use decode::{AudioDecoder, DecodeError, DecodedAudioBuffer, InterleavedF32Decoder};
pub use resample::{resample_to_rate, TARGET_SAMPLE_RATE};
pub use wav::{encode_wav_mono_16bit, CanonicalAudioAsset, BYTES_PER_SAMPLE, WAV_HEADER_LEN};

// test-only re-export so session/pipeline test modules can inject the mock
// without reaching into `audio::capture` directly.
#[cfg(test)]
pub use capture::MockCapture;
