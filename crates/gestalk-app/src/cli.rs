//! CLI argument definitions for the Gestalk application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use gestalk_core::config::GestalkConfig;
use gestalk_core::error::{GestalkError, Result};

/// Gestalk - turns hand gestures into spoken words and a running sentence.
#[derive(Parser, Debug)]
#[command(name = "gestalk", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Replay recorded hand landmarks from a JSON-lines file.
    #[arg(short = 'r', long = "replay", conflicts_with = "demo")]
    pub replay: Option<PathBuf>,

    /// Run the built-in demo script of synthetic hands.
    #[arg(long = "demo")]
    pub demo: bool,

    /// Speech engine (log, command, mute).
    #[arg(long = "speech")]
    pub speech: Option<String>,

    /// Pace frames by their timestamps instead of as fast as possible.
    #[arg(long = "realtime")]
    pub realtime: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Replay(PathBuf),
    Demo,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > GESTALK_CONFIG env var > platform default (~/.gestalk/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("GESTALK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the frame source. No live detector is linked into this build,
    /// so one of `--replay` or `--demo` is required.
    pub fn resolve_source(&self) -> Result<InputSource> {
        match (&self.replay, self.demo) {
            (Some(path), _) => Ok(InputSource::Replay(path.clone())),
            (None, true) => Ok(InputSource::Demo),
            (None, false) => Err(GestalkError::Config(
                "no frame source: pass --replay <file.jsonl> or --demo".to_string(),
            )),
        }
    }

    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut GestalkConfig) {
        if let Some(ref engine) = self.speech {
            config.speech.engine = engine.clone();
        }
        if self.realtime {
            config.capture.realtime = true;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".gestalk").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".gestalk").join("config.toml");
    }
    PathBuf::from("config.toml")
}
