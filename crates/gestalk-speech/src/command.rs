//! Speech through an external text-to-speech program (espeak, say, ...).

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use gestalk_core::config::SpeechConfig;
use gestalk_core::error::GestalkError;

use crate::SpeechEngine;

/// Upper bound on one utterance.
const SPEAK_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `program` once per utterance with a templated argument list.
///
/// Placeholders in the arguments: `{text}`, `{rate}` (words per minute),
/// `{volume}` (0.0 to 1.0) and `{amplitude}` (volume scaled to 0..=100).
#[derive(Debug, Clone)]
pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
    rate: u32,
    volume: f32,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            rate: 150,
            volume: 1.0,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
            .with_rate(config.rate)
            .with_volume(config.volume)
    }

    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list for one utterance with every placeholder filled in.
    pub fn render_args(&self, text: &str) -> Vec<String> {
        let rate = self.rate.to_string();
        let volume = format!("{:.2}", self.volume);
        let amplitude = ((self.volume * 100.0).round() as u32).to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{rate}", &rate)
                    .replace("{volume}", &volume)
                    .replace("{amplitude}", &amplitude)
                    .replace("{text}", text)
            })
            .collect()
    }
}

impl SpeechEngine for CommandSpeechEngine {
    async fn speak(&self, text: &str) -> Result<(), GestalkError> {
        let args = self.render_args(text);

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GestalkError::Speech(format!("failed to spawn {}: {e}", self.program)))?;

        let output = timeout(SPEAK_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| {
                GestalkError::Speech(format!("{} timed out after {SPEAK_TIMEOUT:?}", self.program))
            })?
            .map_err(|e| GestalkError::Speech(format!("{} failed: {e}", self.program)))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GestalkError::Speech(format!(
                "{} exited with code {code}: {}",
                self.program,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_args_fills_placeholders() {
        let engine = CommandSpeechEngine::new("espeak", args(&["-s", "{rate}", "-a", "{amplitude}", "{text}"]))
            .with_rate(180)
            .with_volume(0.5);
        assert_eq!(
            engine.render_args("Hello"),
            args(&["-s", "180", "-a", "50", "Hello"])
        );
    }

    #[test]
    fn test_render_args_keeps_text_literal() {
        let engine = CommandSpeechEngine::new("say", args(&["--volume={volume}", "{text}"]));
        // A word containing a placeholder is not expanded again.
        assert_eq!(
            engine.render_args("{rate}"),
            args(&["--volume=1.00", "{rate}"])
        );
    }

    #[test]
    fn test_from_config_uses_speech_section() {
        let engine = CommandSpeechEngine::from_config(&SpeechConfig::default());
        assert_eq!(engine.program(), "espeak");
        assert_eq!(
            engine.render_args("OK"),
            args(&["-s", "150", "-a", "100", "OK"])
        );
    }

    #[test]
    fn test_volume_is_clamped() {
        let engine = CommandSpeechEngine::new("espeak", args(&["{amplitude}"])).with_volume(3.0);
        assert_eq!(engine.render_args("x"), args(&["100"]));
    }

    #[tokio::test]
    async fn test_missing_program_is_speech_error() {
        let engine = CommandSpeechEngine::new("/nonexistent/gestalk-tts", args(&["{text}"]));
        let err = engine.speak("Hello").await.unwrap_err();
        assert!(matches!(err, GestalkError::Speech(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let engine = CommandSpeechEngine::new("sh", args(&["-c", "test -n \"$0\"", "{text}"]));
        engine.speak("Thanks").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_reports_exit_code() {
        let engine = CommandSpeechEngine::new("sh", args(&["-c", "echo no voice >&2; exit 3"]));
        let err = engine.speak("Bye").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("code 3"), "{msg}");
        assert!(msg.contains("no voice"), "{msg}");
    }
}
