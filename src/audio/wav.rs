//! Canonical WAV encoding.
//!
//! Every recording leaves the client in exactly one format: **16 kHz, mono,
//! 16-bit signed PCM WAV** with the standard 44-byte RIFF/WAVE header.  The
//! external scoring service is paired with this exact byte layout, so the
//! encoder here is deterministic down to the bit.
//!
//! [`encode_wav_mono_16bit`] is a pure function; [`CanonicalAudioAsset`]
//! wraps the resulting bytes so the type system keeps arbitrary buffers out
//! of the scoring client.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the RIFF/WAVE header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

/// Bytes per encoded sample (16-bit PCM).
pub const BYTES_PER_SAMPLE: usize = 2;

// ---------------------------------------------------------------------------
// CanonicalAudioAsset
// ---------------------------------------------------------------------------

/// A WAV byte buffer in the canonical wire format (16 kHz mono 16-bit PCM).
///
/// Invariant: `bytes.len() == 44 + 2 * frame_count`.  Instances are only
/// produced by [`CanonicalAudioAsset::encode`], which upholds it by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAudioAsset {
    bytes: Vec<u8>,
}

impl CanonicalAudioAsset {
    /// Encode `samples` at `sample_rate` into a canonical asset.
    pub fn encode(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            bytes: encode_wav_mono_16bit(samples, sample_rate),
        }
    }

    /// The raw WAV bytes (header + PCM data).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the asset, returning the WAV bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of encoded PCM frames.
    pub fn frame_count(&self) -> usize {
        (self.bytes.len() - WAV_HEADER_LEN) / BYTES_PER_SAMPLE
    }
}

// ---------------------------------------------------------------------------
// encode_wav_mono_16bit
// ---------------------------------------------------------------------------

/// Encode a mono `f32` sample buffer as a 16-bit PCM WAV byte buffer.
///
/// Each sample is clamped to `[-1.0, 1.0]` and quantised asymmetrically:
/// negative values scale by 32 768 (full `i16` negative range), non-negative
/// values by 32 767.  This matches standard PCM practice and, more
/// importantly, the bytes the paired scoring service was tuned against —
/// do not change the scaling without redesigning the whole wire contract.
///
/// Never fails; an empty input produces a valid 44-byte header-only file.
///
/// # Example
///
/// ```rust
/// use voca_speech::audio::encode_wav_mono_16bit;
///
/// let wav = encode_wav_mono_16bit(&[0.0, 0.5, -0.5], 16_000);
/// assert_eq!(wav.len(), 44 + 2 * 3);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(&wav[8..12], b"WAVE");
/// ```
pub fn encode_wav_mono_16bit(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() * BYTES_PER_SAMPLE;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len);

    // ── RIFF chunk descriptor ────────────────────────────────────────────
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // ── fmt sub-chunk ────────────────────────────────────────────────────
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // sub-chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&1u16.to_le_bytes()); // channels
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * BYTES_PER_SAMPLE as u32).to_le_bytes()); // byte rate
    out.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // ── data sub-chunk ───────────────────────────────────────────────────
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());

    for &sample in samples {
        let s = sample.clamp(-1.0, 1.0);
        let q = if s < 0.0 {
            (s * 32_768.0) as i16
        } else {
            (s * 32_767.0) as i16
        };
        out.extend_from_slice(&q.to_le_bytes());
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
