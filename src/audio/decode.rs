//! Raw-asset decoding into sample buffers.
//!
//! Capture backends deliver opaque [`AudioChunk`](crate::audio::AudioChunk)
//! bytes; an [`AudioDecoder`] turns the concatenated raw asset into a
//! [`DecodedAudioBuffer`] of per-channel `f32` samples.  The decoder is a
//! trait so the session controller never depends on a concrete byte layout
//! — the cpal backend pairs with [`InterleavedF32Decoder`], tests pair with
//! whatever double they need.

use thiserror::Error;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors produced while decoding a raw audio asset.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The raw byte length is not a whole number of frames.
    #[error("raw audio is not a whole number of frames: {len} bytes, {frame_bytes} bytes/frame")]
    TruncatedFrame { len: usize, frame_bytes: usize },

    /// The decoder was configured with zero channels or a zero sample rate.
    #[error("invalid decoder configuration: {0}")]
    InvalidConfig(String),

    /// Channel buffers of differing lengths were supplied.
    #[error("channel length mismatch: expected {expected} frames, got {got}")]
    ChannelLengthMismatch { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// DecodedAudioBuffer
// ---------------------------------------------------------------------------

/// Multi-channel floating-point sample data at a source sample rate.
///
/// Invariant: every channel holds exactly `frame_count()` samples.  The
/// constructor enforces it, so downstream code (resampler, encoder) can
/// index channel 0 without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudioBuffer {
    sample_rate: u32,
    channel_data: Vec<Vec<f32>>,
}

impl DecodedAudioBuffer {
    /// Build a buffer, validating that all channels are the same length.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidConfig`] — zero sample rate or no channels.
    /// - [`DecodeError::ChannelLengthMismatch`] — unequal channel lengths.
    pub fn new(sample_rate: u32, channel_data: Vec<Vec<f32>>) -> Result<Self, DecodeError> {
        if sample_rate == 0 {
            return Err(DecodeError::InvalidConfig("sample rate is 0".into()));
        }
        if channel_data.is_empty() {
            return Err(DecodeError::InvalidConfig("no channels".into()));
        }

        let expected = channel_data[0].len();
        for ch in &channel_data[1..] {
            if ch.len() != expected {
                return Err(DecodeError::ChannelLengthMismatch {
                    expected,
                    got: ch.len(),
                });
            }
        }

        Ok(Self {
            sample_rate,
            channel_data,
        })
    }

    /// Source sample rate in Hz.  Always > 0.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.  Always ≥ 1.
    pub fn channel_count(&self) -> usize {
        self.channel_data.len()
    }

    /// Number of frames per channel.
    pub fn frame_count(&self) -> usize {
        self.channel_data[0].len()
    }

    /// Samples of channel `index`, or `None` when out of range.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channel_data.get(index).map(|c| c.as_slice())
    }
}

// ---------------------------------------------------------------------------
// AudioDecoder trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe decoder from raw captured bytes to samples.
pub trait AudioDecoder: Send + Sync {
    /// Decode the concatenated raw asset of a finished recording.
    fn decode(&self, raw: &[u8]) -> Result<DecodedAudioBuffer, DecodeError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioDecoder>) {}
};

// ---------------------------------------------------------------------------
// InterleavedF32Decoder
// ---------------------------------------------------------------------------

/// Decoder for interleaved little-endian `f32` frames, the layout emitted by
/// the cpal capture backend.
///
/// Each frame is `channels × 4` bytes.  A byte length that is not a whole
/// number of frames fails with [`DecodeError::TruncatedFrame`] — a truncated
/// asset means the recording was corrupted in flight and the user should
/// record again.
#[derive(Debug, Clone)]
pub struct InterleavedF32Decoder {
    sample_rate: u32,
    channels: u16,
}

impl InterleavedF32Decoder {
    /// Create a decoder for the given stream geometry.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

impl AudioDecoder for InterleavedF32Decoder {
    fn decode(&self, raw: &[u8]) -> Result<DecodedAudioBuffer, DecodeError> {
        if self.sample_rate == 0 || self.channels == 0 {
            return Err(DecodeError::InvalidConfig(format!(
                "sample_rate={}, channels={}",
                self.sample_rate, self.channels
            )));
        }

        let channels = self.channels as usize;
        let frame_bytes = channels * 4;
        if raw.len() % frame_bytes != 0 {
            return Err(DecodeError::TruncatedFrame {
                len: raw.len(),
                frame_bytes,
            });
        }

        let frame_count = raw.len() / frame_bytes;
        let mut channel_data: Vec<Vec<f32>> = vec![Vec::with_capacity(frame_count); channels];

        for frame in raw.chunks_exact(frame_bytes) {
            for (ch, sample_bytes) in frame.chunks_exact(4).enumerate() {
                let sample = f32::from_le_bytes([
                    sample_bytes[0],
                    sample_bytes[1],
                    sample_bytes[2],
                    sample_bytes[3],
                ]);
                channel_data[ch].push(sample);
            }
        }

        DecodedAudioBuffer::new(self.sample_rate, channel_data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
