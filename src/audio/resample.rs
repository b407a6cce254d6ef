//! Resampling to the canonical scoring rate.
//!
//! The scoring service expects **16 kHz mono** audio.  [`resample_to_rate`]
//! converts a [`DecodedAudioBuffer`] at any source rate to a mono sample
//! sequence at the target rate by nearest-sample selection:
//!
//! - output length = `ceil(frame_count / source_rate * target_rate)`
//! - output `i` takes the channel-0 sample at `floor(i * source/target)`
//! - indices past the end of the source map to silence
//!
//! Multi-channel input is downmixed by taking channel 0 only — no channel
//! averaging.  Nearest-sample selection is not bandlimited resampling; it is
//! a known quality limitation kept deliberately, because the paired scoring
//! service was tuned against exactly these bytes.

use crate::audio::decode::DecodedAudioBuffer;

/// The canonical sample rate all recordings are normalised to before they
/// leave the client.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// resample_to_rate
// ---------------------------------------------------------------------------

/// Resample `buffer` to `target_rate` Hz mono by nearest-sample selection.
///
/// Never fails; a zero-duration buffer yields an empty vector.
///
/// # Example
///
/// ```rust
/// use voca_speech::audio::{resample_to_rate, DecodedAudioBuffer, TARGET_SAMPLE_RATE};
///
/// // 480 frames @ 48 kHz = 10 ms → 160 frames @ 16 kHz
/// let buf = DecodedAudioBuffer::new(48_000, vec![vec![0.5; 480]]).unwrap();
/// let out = resample_to_rate(&buf, TARGET_SAMPLE_RATE);
/// assert_eq!(out.len(), 160);
/// ```
pub fn resample_to_rate(buffer: &DecodedAudioBuffer, target_rate: u32) -> Vec<f32> {
    let source_rate = buffer.sample_rate();
    let frame_count = buffer.frame_count();

    let duration_secs = frame_count as f64 / source_rate as f64;
    let output_len = (duration_secs * target_rate as f64).ceil() as usize;

    // Channel 0 downmix; the buffer guarantees at least one channel.
    let source = buffer.channel(0).unwrap_or(&[]);
    let ratio = source_rate as f64 / target_rate as f64;

    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let src_idx = (i as f64 * ratio).floor() as usize;
        output.push(if src_idx < source.len() {
            source[src_idx]
        } else {
            0.0
        });
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
