//! VocaCare speech-practice pipeline.
//!
//! Records microphone audio, canonicalises it to 16 kHz mono 16-bit PCM
//! WAV, submits it to the external scoring service, and fuses the response
//! into a pass/fail verdict that drives level/prompt progression.
//!
//! # Subsystems
//!
//! * [`audio`] — capture, decode, resample, canonical WAV encoding.
//! * [`session`] — the recording session state machine.
//! * [`scoring`] — scoring/feedback HTTP clients and the decision heuristic.
//! * [`game`] — practice content and progression.
//! * [`pipeline`] — the async orchestrator gluing it all together.
//! * [`config`] — TOML settings.

pub mod audio;
pub mod config;
pub mod game;
pub mod pipeline;
pub mod scoring;
pub mod session;
