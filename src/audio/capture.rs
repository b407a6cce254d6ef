//! Microphone capture behind the [`AudioCapture`] trait.
//!
//! The session controller never talks to hardware directly — it is handed an
//! `Arc<dyn AudioCapture>` and an `Arc<dyn AudioDecoder>`.  [`CpalCapture`]
//! is the production implementation on top of `cpal`; tests inject
//! [`MockCapture`] and never open a device.
//!
//! [`AudioCapture::start`] streams opaque [`AudioChunk`]s over an mpsc
//! channel and returns a [`CaptureHandle`] — a RAII guard whose drop releases
//! the microphone.  The guard is the single point through which the
//! "at most one open stream" invariant is enforced.

use std::sync::mpsc;
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::decode::{AudioDecoder, InterleavedF32Decoder};

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One buffer of raw captured audio, opaque to everything but the paired
/// [`AudioDecoder`].
///
/// The cpal backend fills chunks with interleaved little-endian `f32` frames;
/// other backends may use any layout their decoder understands.  Chunks are
/// buffered by the session controller and concatenated when recording stops.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    bytes: Vec<u8>,
}

impl AudioChunk {
    /// Wrap raw captured bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw bytes of this chunk.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of this chunk.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the chunk holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring or starting a capture stream.
///
/// All variants mean the microphone could not be obtained; the session
/// controller surfaces them uniformly as a permission/availability failure.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// No input device exists, or access to it was denied by the platform.
    #[error("no usable input device: {0}")]
    DeviceUnavailable(String),

    /// The platform rejected the stream configuration.
    #[error("failed to build input stream: {0}")]
    BuildStream(String),

    /// The stream was built but could not be started.
    #[error("failed to start input stream: {0}")]
    PlayStream(String),
}

// ---------------------------------------------------------------------------
// CaptureHandle / AudioCapture
// ---------------------------------------------------------------------------

/// RAII guard for an open capture stream.  Dropping it releases the
/// microphone; there is no other way to do so.
pub trait CaptureHandle: Send {}

/// Object-safe, thread-safe capture capability.
///
/// `start` acquires the input device and begins delivering [`AudioChunk`]s to
/// `tx` until the returned handle is dropped.  At most one successful `start`
/// is expected to be outstanding at a time — the session controller enforces
/// this.
pub trait AudioCapture: Send + Sync {
    fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>, CaptureError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioCapture>) {}
};

// ---------------------------------------------------------------------------
// CpalCapture
// ---------------------------------------------------------------------------

/// Default-input-device capture built on `cpal`.
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated capture
/// thread; the returned handle owns a shutdown channel and joins the thread
/// on drop.  Chunk bytes are interleaved little-endian `f32` frames — pair
/// with [`CpalCapture::decoder`].
pub struct CpalCapture {
    sample_rate: u32,
    channels: u16,
}

impl CpalCapture {
    /// Probe the system default input device and its preferred configuration.
    ///
    /// # Errors
    ///
    /// [`CaptureError::DeviceUnavailable`] when there is no input device or
    /// it cannot report a default configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no default input device".into()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        Ok(Self {
            sample_rate: supported.sample_rate().0,
            channels: supported.channels(),
        })
    }

    /// Native sample rate of the capture stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each chunk.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// The decoder matching this backend's chunk layout.
    pub fn decoder(&self) -> Arc<dyn AudioDecoder> {
        Arc::new(InterleavedF32Decoder::new(self.sample_rate, self.channels))
    }
}

/// Handle for a cpal stream running on its capture thread.
struct CpalHandle {
    stop_tx: Option<mpsc::Sender<()>>,
    join: Option<std::thread::JoinHandle<()>>,
}

impl CaptureHandle for CpalHandle {}

impl Drop for CpalHandle {
    fn drop(&mut self) {
        // Closing the channel wakes the capture thread, which drops the
        // stream and exits.
        self.stop_tx.take();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("capture thread panicked during shutdown");
            }
        }
    }
}

impl AudioCapture for CpalCapture {
    fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), CaptureError>>();

        let join = std::thread::spawn(move || {
            let build = || -> Result<cpal::Stream, CaptureError> {
                let host = cpal::default_host();
                let device = host.default_input_device().ok_or_else(|| {
                    CaptureError::DeviceUnavailable("no default input device".into())
                })?;
                let supported = device
                    .default_input_config()
                    .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
                let config: cpal::StreamConfig = supported.into();

                let stream = device
                    .build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            let mut bytes = Vec::with_capacity(data.len() * 4);
                            for &s in data {
                                bytes.extend_from_slice(&s.to_le_bytes());
                            }
                            // Receiver dropped means the session ended; the
                            // audio thread must never panic over it.
                            let _ = tx.send(AudioChunk::from_bytes(bytes));
                        },
                        |err: cpal::StreamError| {
                            log::error!("cpal stream error: {err}");
                        },
                        None,
                    )
                    .map_err(|e| CaptureError::BuildStream(e.to_string()))?;

                stream
                    .play()
                    .map_err(|e| CaptureError::PlayStream(e.to_string()))?;
                Ok(stream)
            };

            match build() {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    // Block until the handle is dropped, then release.
                    let _ = stop_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Box::new(CpalHandle {
                stop_tx: Some(stop_tx),
                join: Some(join),
            })),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e)
            }
            Err(_) => {
                let _ = join.join();
                Err(CaptureError::BuildStream(
                    "capture thread exited before reporting readiness".into(),
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MockCapture  (test-only)
// ---------------------------------------------------------------------------

/// Test double that delivers pre-baked chunks without touching hardware.
///
/// Tracks how many streams are currently open via an `AtomicUsize`, so tests
/// can assert the single-stream invariant holds on every exit path.
#[cfg(test)]
pub struct MockCapture {
    chunks: Vec<AudioChunk>,
    deny: bool,
    open_streams: Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl MockCapture {
    /// A capture that succeeds and delivers `chunks` immediately.
    pub fn with_chunks(chunks: Vec<AudioChunk>) -> Self {
        Self {
            chunks,
            deny: false,
            open_streams: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    /// A capture that fails `start` as if the user denied microphone access.
    pub fn denied() -> Self {
        Self {
            chunks: Vec::new(),
            deny: true,
            open_streams: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    /// Number of streams currently open (should be 0 or 1 at all times).
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
struct MockHandle {
    open_streams: Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl CaptureHandle for MockHandle {}

#[cfg(test)]
impl Drop for MockHandle {
    fn drop(&mut self) {
        self.open_streams
            .fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl AudioCapture for MockCapture {
    fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        if self.deny {
            return Err(CaptureError::DeviceUnavailable(
                "microphone access denied".into(),
            ));
        }

        self.open_streams
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        for chunk in &self.chunks {
            let _ = tx.send(chunk.clone());
        }

        Ok(Box::new(MockHandle {
            open_streams: Arc::clone(&self.open_streams),
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
