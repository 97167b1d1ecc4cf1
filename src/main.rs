//! Application entry point — Voice Emotion Recognition.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`SharedModel`] handle (artifact is read lazily on the
//!    first classification, then cached for the process lifetime).
//! 4. Open the default microphone.
//! 5. Run the prompt loop — Enter records a 3-second clip and prints the
//!    detected emotion with its icon.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use voice_emotion::{
    audio::AudioCapture,
    classifier::SharedModel,
    config::AppConfig,
    pipeline::EmotionPipeline,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Emotion Recognition starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config
        .audio
        .validate()
        .context("invalid audio configuration")?;

    // 3. Shared model handle — nothing is read from disk yet.
    let model = Arc::new(SharedModel::new(&config.model.path));
    log::info!("classifier artifact: {}", model.path().display());

    // 4. Microphone
    let capture = AudioCapture::new().context(
        "no usable audio input device — connect a microphone and retry",
    )?;
    log::info!(
        "audio input ready ({} Hz, {} ch)",
        capture.sample_rate(),
        capture.channels()
    );

    let mut pipeline = EmotionPipeline::new(Arc::new(capture), model, config.audio.clone());

    // 5. Prompt loop
    println!("🎤 Voice Emotion Recognition");
    println!(
        "Press Enter to record your voice ({:.0} seconds), or type q to quit.",
        config.audio.record_secs
    );

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        println!("Recording... speak now!");
        match pipeline.run_once() {
            Ok(recognition) => {
                println!(
                    "Detected emotion: {} {}",
                    recognition.emotion.icon(),
                    recognition.emotion.name().to_uppercase()
                );
            }
            Err(e) if e.is_fatal() => {
                // Missing/corrupt artifact: no retry path, halt the process.
                eprintln!("{}", e.user_message());
                return Err(e.into());
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
            }
        }
    }

    log::info!("shutting down");
    Ok(())
}
