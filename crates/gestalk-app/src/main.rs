//! Gestalk application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the frame source (JSON-lines replay or the demo script) with
//!    detector limits and optional real-time pacing
//! 4. Start the speech worker for the configured engine
//! 5. Run the frame loop until quit, end of stream or capture failure

use clap::Parser;

use gestalk_app::cli::{CliArgs, InputSource};
use gestalk_app::{ControlEvent, Controls, FrameLoop, RunSummary, TerminalOverlay};
use gestalk_capture::{
    LandmarkProvider, LimitedProvider, PacedProvider, ReplayLandmarkProvider,
    ScriptedLandmarkProvider,
};
use gestalk_core::config::GestalkConfig;
use gestalk_core::error::Result;
use gestalk_recognizer::Interpreter;
use gestalk_speech::{
    CommandSpeechEngine, LogSpeechEngine, MuteSpeechEngine, SpeechDispatcher,
};

fn start_speech(config: &GestalkConfig) -> SpeechDispatcher {
    let capacity = config.speech.queue_capacity;
    match config.speech.engine.as_str() {
        "command" => {
            SpeechDispatcher::spawn(CommandSpeechEngine::from_config(&config.speech), capacity)
        }
        "mute" => SpeechDispatcher::spawn(MuteSpeechEngine, capacity),
        _ => SpeechDispatcher::spawn(LogSpeechEngine, capacity),
    }
}

async fn run_session<P: LandmarkProvider>(
    provider: P,
    config: &GestalkConfig,
    controls: Controls,
) -> Result<RunSummary> {
    let provider = LimitedProvider::new(
        PacedProvider::new(provider, config.capture.realtime),
        &config.capture,
    );
    let interpreter = Interpreter::new(&config.recognition)?;
    let speech = start_speech(config);
    let overlay = TerminalOverlay::stdout(config.display.clone());

    FrameLoop::new(provider, interpreter, speech, overlay, controls)
        .run()
        .await
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = GestalkConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // Tracing. RUST_LOG wins over --log-level and the config file.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Gestalk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");
    config.validate()?;

    let source = args.resolve_source()?;

    // Controls: keyboard on stdin, plus Ctrl-C as quit.
    let (sender, controls) = Controls::stdin();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            sender.send(ControlEvent::Quit);
        }
    });

    let summary = match source {
        InputSource::Replay(path) => {
            let provider = ReplayLandmarkProvider::open(&path).await?;
            run_session(provider, &config, controls).await?
        }
        InputSource::Demo => {
            tracing::info!(fps = config.capture.fps, "Running demo script");
            let provider = ScriptedLandmarkProvider::demo(config.capture.fps)?;
            run_session(provider, &config, controls).await?
        }
    };

    println!("{summary}");
    Ok(())
}
