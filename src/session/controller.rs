//! Recording session lifecycle controller.
//!
//! [`RecordingSession`] owns the capture stream for the duration of a
//! recording and walks the [`SessionState`] machine: `start()` acquires the
//! microphone, `stop()` releases it and converts the buffered chunks into a
//! [`CanonicalAudioAsset`], `cancel()` aborts from any state back to `Idle`.
//!
//! The microphone is the one exclusively-held resource in the application.
//! Every exit path — stop, cancel, permission failure, decode failure —
//! drops the [`CaptureHandle`] so that no stream outlives its session.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::audio::{
    resample_to_rate, AudioCapture, AudioChunk, AudioDecoder, CanonicalAudioAsset, CaptureError,
    CaptureHandle, DecodeError, TARGET_SAMPLE_RATE,
};

use super::state::SessionState;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced by the session controller.
///
/// All variants are recoverable: the user can cancel and start a new session
/// at any time.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start()` was called while a session was already active.  The active
    /// session is left untouched.
    #[error("a recording session is already active")]
    Busy,

    /// `stop()` was called while not recording.
    #[error("no recording in progress")]
    NotRecording,

    /// The microphone was denied or no capture device exists.  The session
    /// returned to `Idle`; ask the user to grant microphone permission.
    #[error("microphone unavailable: {0}")]
    Permission(#[from] CaptureError),

    /// The captured audio could not be decoded.  The session moved to
    /// `Failed`; ask the user to record again.
    #[error("could not decode recording: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// RecordingSession
// ---------------------------------------------------------------------------

/// Controller for one microphone session at a time.
///
/// Capture and decode capabilities are injected so the controller is fully
/// testable without hardware or a browser-style global audio environment.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voca_speech::audio::CpalCapture;
/// use voca_speech::session::RecordingSession;
///
/// let capture = Arc::new(CpalCapture::new().unwrap());
/// let decoder = capture.decoder();
/// let mut session = RecordingSession::new(capture, decoder);
///
/// session.start().unwrap();
/// // … user speaks …
/// let asset = session.stop().unwrap();
/// assert!(asset.as_bytes().len() >= 44);
/// ```
pub struct RecordingSession {
    capture: Arc<dyn AudioCapture>,
    decoder: Arc<dyn AudioDecoder>,
    state: SessionState,
    handle: Option<Box<dyn CaptureHandle>>,
    chunk_rx: Option<mpsc::Receiver<AudioChunk>>,
    started_at: Option<Instant>,
}

impl RecordingSession {
    /// Create an idle session with injected capture and decode capabilities.
    pub fn new(capture: Arc<dyn AudioCapture>, decoder: Arc<dyn AudioDecoder>) -> Self {
        Self {
            capture,
            decoder,
            state: SessionState::Idle,
            handle: None,
            chunk_rx: None,
            started_at: None,
        }
    }

    /// Current state of the session machine.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whole seconds since recording started, for display only.
    ///
    /// Returns 0 outside of an active recording.  Deliberately coarse —
    /// scoring never reads this.
    pub fn elapsed_secs(&self) -> u64 {
        match (self.state, self.started_at) {
            (SessionState::Recording, Some(t)) => t.elapsed().as_secs(),
            _ => 0,
        }
    }

    /// Begin a new recording: `Idle → Requesting → Recording`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Busy`] when not `Idle`; the existing session is not
    ///   disturbed.
    /// - [`SessionError::Permission`] when the stream cannot be acquired;
    ///   state returns to `Idle` and no stream is left open.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            log::warn!("session: start rejected while {:?}", self.state);
            return Err(SessionError::Busy);
        }

        self.state = SessionState::Requesting;
        let (tx, rx) = mpsc::channel();

        match self.capture.start(tx) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.chunk_rx = Some(rx);
                self.started_at = Some(Instant::now());
                self.state = SessionState::Recording;
                log::info!("session: recording started");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Idle;
                log::warn!("session: microphone unavailable: {e}");
                Err(SessionError::Permission(e))
            }
        }
    }

    /// Stop recording and convert the buffered chunks into a canonical asset:
    /// `Recording → Stopping → Converting → Complete`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotRecording`] when the session is not `Recording`.
    /// - [`SessionError::Decode`] when the raw asset cannot be decoded; the
    ///   session moves to `Failed` (stream already released).
    pub fn stop(&mut self) -> Result<CanonicalAudioAsset, SessionError> {
        if self.state != SessionState::Recording {
            return Err(SessionError::NotRecording);
        }

        // ── Stopping: release the microphone before any processing ───────
        self.state = SessionState::Stopping;
        self.handle = None;
        self.started_at = None;

        // ── Concatenate buffered chunks into one raw asset ───────────────
        let raw: Vec<u8> = match self.chunk_rx.take() {
            Some(rx) => {
                let mut raw = Vec::new();
                for chunk in rx.try_iter() {
                    raw.extend_from_slice(chunk.as_bytes());
                }
                raw
            }
            None => Vec::new(),
        };
        log::debug!("session: {} raw bytes buffered", raw.len());

        // ── Converting: decode → resample → encode ───────────────────────
        self.state = SessionState::Converting;

        let decoded = match self.decoder.decode(&raw) {
            Ok(buf) => buf,
            Err(e) => {
                self.state = SessionState::Failed;
                log::warn!("session: decode failed: {e}");
                return Err(SessionError::Decode(e));
            }
        };

        let samples = resample_to_rate(&decoded, TARGET_SAMPLE_RATE);
        let asset = CanonicalAudioAsset::encode(&samples, TARGET_SAMPLE_RATE);

        self.state = SessionState::Complete;
        log::info!(
            "session: converted {} source frames @ {} Hz into {} canonical frames",
            decoded.frame_count(),
            decoded.sample_rate(),
            asset.frame_count()
        );
        Ok(asset)
    }

    /// Abort from any state back to `Idle`, releasing the stream and
    /// discarding buffered chunks.
    pub fn cancel(&mut self) {
        if self.handle.is_some() {
            log::info!("session: cancelled while {:?}", self.state);
        }
        self.handle = None;
        self.chunk_rx = None;
        self.started_at = None;
        self.state = SessionState::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{InterleavedF32Decoder, MockCapture, WAV_HEADER_LEN};

    fn f32_chunk(samples: &[f32]) -> AudioChunk {
        let mut bytes = Vec::with_capacity(samples.len() * 4);
        for &s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        AudioChunk::from_bytes(bytes)
    }

    fn make_session(capture: Arc<MockCapture>, rate: u32, channels: u16) -> RecordingSession {
        let decoder = Arc::new(InterleavedF32Decoder::new(rate, channels));
        RecordingSession::new(capture, decoder)
    }

    // ---- happy path --------------------------------------------------------

    #[test]
    fn start_stop_produces_canonical_asset() {
        // 48 kHz mono: 480 source frames → 160 canonical frames.
        let capture = Arc::new(MockCapture::with_chunks(vec![
            f32_chunk(&vec![0.25; 240]),
            f32_chunk(&vec![0.25; 240]),
        ]));
        let mut session = make_session(Arc::clone(&capture), 48_000, 1);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Recording);
        assert_eq!(capture.open_streams(), 1);

        let asset = session.stop().unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(capture.open_streams(), 0);
        assert_eq!(asset.frame_count(), 160);
        assert_eq!(asset.as_bytes().len(), WAV_HEADER_LEN + 2 * 160);
    }

    #[test]
    fn empty_recording_yields_header_only_asset() {
        let capture = Arc::new(MockCapture::with_chunks(vec![]));
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);

        session.start().unwrap();
        let asset = session.stop().unwrap();
        assert_eq!(asset.frame_count(), 0);
        assert_eq!(asset.as_bytes().len(), WAV_HEADER_LEN);
    }

    // ---- permission path ---------------------------------------------------

    #[test]
    fn permission_denial_returns_to_idle_with_no_open_stream() {
        let capture = Arc::new(MockCapture::denied());
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);

        let err = session.start().unwrap_err();
        assert!(matches!(err, SessionError::Permission(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(capture.open_streams(), 0);

        // The session remains usable: cancel is a no-op and a later start on
        // a working capture would be accepted (state is Idle).
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);
    }

    // ---- concurrency guard -------------------------------------------------

    #[test]
    fn second_start_is_rejected_without_disturbing_the_session() {
        let capture = Arc::new(MockCapture::with_chunks(vec![f32_chunk(&[0.1; 160])]));
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);

        session.start().unwrap();
        let err = session.start().unwrap_err();
        assert!(matches!(err, SessionError::Busy));
        assert_eq!(session.state(), SessionState::Recording);
        assert_eq!(capture.open_streams(), 1);

        // The original session still completes normally.
        let asset = session.stop().unwrap();
        assert_eq!(asset.frame_count(), 160);
    }

    // ---- cancel ------------------------------------------------------------

    #[test]
    fn cancel_releases_stream_and_discards_chunks() {
        let capture = Arc::new(MockCapture::with_chunks(vec![f32_chunk(&[0.5; 320])]));
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);

        session.start().unwrap();
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(capture.open_streams(), 0);

        // Stop after cancel is NotRecording, not a stale conversion.
        assert!(matches!(session.stop(), Err(SessionError::NotRecording)));
    }

    #[test]
    fn cancel_from_idle_is_a_noop() {
        let capture = Arc::new(MockCapture::with_chunks(vec![]));
        let mut session = make_session(capture, 16_000, 1);
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);
    }

    // ---- decode failure ----------------------------------------------------

    #[test]
    fn decode_failure_moves_to_failed_with_stream_released() {
        // 3 bytes is not a whole f32 frame → decoder rejects the raw asset.
        let capture = Arc::new(MockCapture::with_chunks(vec![AudioChunk::from_bytes(
            vec![1, 2, 3],
        )]));
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);

        session.start().unwrap();
        let err = session.stop().unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(capture.open_streams(), 0);

        // Recovery: cancel returns to Idle and a fresh start is accepted.
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);
    }

    // ---- misc --------------------------------------------------------------

    #[test]
    fn stop_without_start_is_rejected() {
        let capture = Arc::new(MockCapture::with_chunks(vec![]));
        let mut session = make_session(capture, 16_000, 1);
        assert!(matches!(session.stop(), Err(SessionError::NotRecording)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn elapsed_secs_is_zero_outside_recording() {
        let capture = Arc::new(MockCapture::with_chunks(vec![]));
        let mut session = make_session(Arc::clone(&capture), 16_000, 1);
        assert_eq!(session.elapsed_secs(), 0);

        session.start().unwrap();
        // Freshly started: still within the first second.
        assert_eq!(session.elapsed_secs(), 0);
        session.cancel();
        assert_eq!(session.elapsed_secs(), 0);
    }

    #[test]
    fn stereo_recording_downmixes_to_first_channel() {
        // Interleaved stereo: L = 0.5, R = -0.5.  The canonical asset must
        // carry channel 0 (0.5), not an average (0.0).
        let mut frames = Vec::new();
        for _ in 0..160 {
            frames.push(0.5f32);
            frames.push(-0.5f32);
        }
        let capture = Arc::new(MockCapture::with_chunks(vec![f32_chunk(&frames)]));
        let mut session = make_session(capture, 16_000, 2);

        session.start().unwrap();
        let asset = session.stop().unwrap();
        assert_eq!(asset.frame_count(), 160);

        let first = i16::from_le_bytes([asset.as_bytes()[44], asset.as_bytes()[45]]);
        assert_eq!(first, (0.5f32 * 32_767.0) as i16);
    }
}
