//! CLI demo driver — one practice round from the terminal.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Probe the default microphone and build the pipeline subsystems.
//! 4. Record until the user presses Enter.
//! 5. Submit, decide, and print transcript / score / verdict.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use voca_speech::{
    audio::CpalCapture,
    config::AppConfig,
    pipeline::{new_shared_state, GamePipeline, PipelineCommand},
    scoring::{FeedbackClient, HttpScoringClient, ScoringClient},
    session::RecordingSession,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("failed to load settings")?;
    let cohort = config.game.age_cohort;

    // ── Wire up subsystems ───────────────────────────────────────────────
    let capture = Arc::new(CpalCapture::new().context("no usable microphone")?);
    log::info!(
        "microphone: {} Hz, {} channel(s)",
        capture.sample_rate(),
        capture.channels()
    );
    let decoder = capture.decoder();
    let session = RecordingSession::new(capture, decoder);

    let scoring: Arc<dyn ScoringClient> = Arc::new(HttpScoringClient::from_config(&config.scoring));
    let feedback = config.feedback.enabled.then(|| {
        Arc::new(FeedbackClient::new(
            &config.feedback.effective_base_url(&config.scoring),
            config.feedback.timeout_secs,
        ))
    });

    let state = new_shared_state(cohort);
    let pipeline = GamePipeline::new(Arc::clone(&state), session, scoring, feedback, cohort);

    let prompt = {
        let st = state.lock().unwrap();
        st.progression
            .current_prompt(cohort.levels())
            .map(str::to_owned)
            .context("no practice content for this cohort")?
    };

    // ── One round: record until Enter, then stop and score ───────────────
    let (tx, rx) = mpsc::channel(8);
    let run = tokio::spawn(pipeline.run(rx));

    println!("Say: \"{prompt}\"  (press Enter to stop recording)");
    tx.send(PipelineCommand::Start).await?;

    wait_for_enter().await?;
    tx.send(PipelineCommand::Stop).await?;
    drop(tx);
    run.await?;

    // ── Report ───────────────────────────────────────────────────────────
    let st = state.lock().unwrap();
    if let Some(message) = &st.error_message {
        println!("{message}");
        return Ok(());
    }
    if let Some(result) = &st.last_result {
        if let Some(asr) = &result.asr_text {
            println!("Heard:   {asr:?}");
        }
        if let Some(score) = result.normalized_scores().first() {
            println!("Score:   {:.0}%", score * 100.0);
        }
    }
    match st.last_verdict {
        Some(true) => println!("Verdict: correct — score is now {}", st.progression.score),
        Some(false) => println!("Verdict: not quite — try \"{prompt}\" again"),
        None => println!("No verdict (scoring did not complete)"),
    }
    if let Some(feedback) = &st.feedback_text {
        println!("Coach:   {feedback}");
    }

    Ok(())
}

/// Block on stdin until the user presses Enter, off the async runtime.
async fn wait_for_enter() -> Result<()> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await?
    .context("failed to read stdin")
}
