use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GestalkError, Result};

/// Top-level configuration for the gestalk interpreter.
///
/// Loaded from `~/.gestalk/config.toml` by default. Every section falls back
/// to its defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestalkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub recognition: RecognizerConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl GestalkConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GestalkConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.capture.validate()?;
        self.recognition.validate()?;
        self.speech.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Landmark source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Maximum number of hands passed to the recognizer per frame.
    pub max_hands: usize,
    /// Hands scored below this are dropped before recognition.
    pub min_detection_confidence: f32,
    /// Pace recorded frames at their timestamps instead of as fast as possible.
    pub realtime: bool,
    /// Frame rate of the synthetic demo stream.
    pub fps: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.7,
            realtime: false,
            fps: 30.0,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_hands == 0 {
            return Err(GestalkError::Config(
                "capture.max_hands must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(GestalkError::Config(format!(
                "capture.min_detection_confidence must be within [0, 1], got {}",
                self.min_detection_confidence
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(GestalkError::Config(format!(
                "capture.fps must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

/// Recognition thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Seconds a candidate must be held before it is confirmed.
    pub dwell_secs: f64,
    /// Seconds before the same word may be dispatched again.
    pub cooldown_secs: f64,
    /// Number of open/closed samples kept for wave detection.
    pub motion_capacity: usize,
    /// Minimum open samples and minimum closed samples for a wave.
    pub motion_min_each: usize,
    /// Middle/ring fingertip gap (normalized x) that marks the split-finger salute.
    pub split_gap: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            dwell_secs: 2.0,
            cooldown_secs: 1.5,
            motion_capacity: 20,
            motion_min_each: 6,
            split_gap: 0.07,
        }
    }
}

fn seconds(key: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|e| {
        GestalkError::Config(format!("recognition.{key} out of range, got {secs}: {e}"))
    })
}

impl RecognizerConfig {
    /// How long a pose must be held before it is confirmed.
    pub fn dwell(&self) -> Result<Duration> {
        let dwell = seconds("dwell_secs", self.dwell_secs)?;
        if dwell.is_zero() {
            return Err(GestalkError::Config(format!(
                "recognition.dwell_secs must be positive, got {}",
                self.dwell_secs
            )));
        }
        Ok(dwell)
    }

    /// Minimum gap between two spoken repeats of the same word.
    pub fn cooldown(&self) -> Result<Duration> {
        seconds("cooldown_secs", self.cooldown_secs)
    }

    pub fn validate(&self) -> Result<()> {
        self.dwell()?;
        self.cooldown()?;
        if self.motion_capacity == 0 {
            return Err(GestalkError::Config(
                "recognition.motion_capacity must be at least 1".to_string(),
            ));
        }
        if self.motion_min_each == 0 {
            return Err(GestalkError::Config(
                "recognition.motion_min_each must be at least 1".to_string(),
            ));
        }
        if self.motion_min_each > self.motion_capacity {
            return Err(GestalkError::Config(format!(
                "recognition.motion_min_each ({}) exceeds motion_capacity ({})",
                self.motion_min_each, self.motion_capacity
            )));
        }
        Ok(())
    }
}

/// Speech output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Engine: "log", "command" or "mute".
    pub engine: String,
    /// Program run by the command engine.
    pub command: String,
    /// Arguments; `{text}`, `{rate}`, `{volume}` and `{amplitude}` are substituted.
    pub args: Vec<String>,
    /// Speaking rate in words per minute.
    pub rate: u32,
    /// Volume in `[0, 1]`.
    pub volume: f32,
    /// Words that may wait for the speech worker before dispatch blocks.
    pub queue_capacity: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: "log".to_string(),
            command: "espeak".to_string(),
            args: vec![
                "-s".to_string(),
                "{rate}".to_string(),
                "-a".to_string(),
                "{amplitude}".to_string(),
                "{text}".to_string(),
            ],
            rate: 150,
            volume: 1.0,
            queue_capacity: 16,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.engine.as_str(), "log" | "command" | "mute") {
            return Err(GestalkError::Config(format!(
                "speech.engine must be one of log, command, mute; got '{}'",
                self.engine
            )));
        }
        if self.engine == "command" && self.command.trim().is_empty() {
            return Err(GestalkError::Config(
                "speech.command must be set for the command engine".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(GestalkError::Config(format!(
                "speech.volume must be within [0, 1], got {}",
                self.volume
            )));
        }
        if self.queue_capacity == 0 {
            return Err(GestalkError::Config(
                "speech.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Draw the glyph next to a confirmed word.
    pub show_emoji: bool,
    /// Draw the running sentence banner.
    pub show_sentence: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_emoji: true,
            show_sentence: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = GestalkConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.capture.max_hands, 2);
        assert!((config.capture.min_detection_confidence - 0.7).abs() < f32::EPSILON);
        assert!(!config.capture.realtime);
        assert!((config.recognition.dwell_secs - 2.0).abs() < f64::EPSILON);
        assert!((config.recognition.cooldown_secs - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.recognition.motion_capacity, 20);
        assert_eq!(config.recognition.motion_min_each, 6);
        assert!((config.recognition.split_gap - 0.07).abs() < f32::EPSILON);
        assert_eq!(config.speech.engine, "log");
        assert_eq!(config.speech.rate, 150);
        assert!((config.speech.volume - 1.0).abs() < f32::EPSILON);
        assert!(config.display.show_emoji);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[capture]
max_hands = 1
min_detection_confidence = 0.5
realtime = true

[recognition]
dwell_secs = 1.0
cooldown_secs = 0.5

[speech]
engine = "command"
command = "say"
args = ["-r", "{rate}", "{text}"]
rate = 180
"#;
        let file = create_temp_config(content);
        let config = GestalkConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.capture.max_hands, 1);
        assert!(config.capture.realtime);
        assert!((config.recognition.dwell_secs - 1.0).abs() < f64::EPSILON);
        // Unset fields in a present section keep their defaults.
        assert_eq!(config.recognition.motion_capacity, 20);
        assert_eq!(config.speech.command, "say");
        assert_eq!(config.speech.args, vec!["-r", "{rate}", "{text}"]);
        assert_eq!(config.speech.rate, 180);
        assert_eq!(config.speech.queue_capacity, 16);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = GestalkConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.capture.max_hands, 2);
        assert_eq!(config.recognition, RecognizerConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = GestalkConfig::load(file.path());
        assert!(matches!(result, Err(GestalkError::Config(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = create_temp_config("[recognition]\ndwell_secs = 0.0\n");
        let err = GestalkConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("dwell_secs"));

        let file = create_temp_config("[speech]\nengine = \"festival\"\n");
        let err = GestalkConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("festival"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = GestalkConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.capture.max_hands, 2);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = GestalkConfig::default();
        config.recognition.cooldown_secs = 3.0;
        config.speech.engine = "mute".to_string();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = GestalkConfig::load(&path).unwrap();
        assert!((reloaded.recognition.cooldown_secs - 3.0).abs() < f64::EPSILON);
        assert_eq!(reloaded.speech.engine, "mute");
        assert_eq!(reloaded.speech.args, config.speech.args);
    }

    #[test]
    fn test_recognizer_validation() {
        let ok = RecognizerConfig::default();
        assert!(ok.validate().is_ok());

        let negative_cooldown = RecognizerConfig {
            cooldown_secs: -1.0,
            ..RecognizerConfig::default()
        };
        assert!(negative_cooldown.validate().is_err());

        let zero_cooldown = RecognizerConfig {
            cooldown_secs: 0.0,
            ..RecognizerConfig::default()
        };
        assert!(zero_cooldown.validate().is_ok());
        assert_eq!(zero_cooldown.cooldown().unwrap(), Duration::ZERO);

        for (dwell_secs, cooldown_secs) in [(1e30, 1.5), (2.0, 1e30), (f64::MAX, 1.5)] {
            let huge = RecognizerConfig {
                dwell_secs,
                cooldown_secs,
                ..RecognizerConfig::default()
            };
            let err = huge.validate().unwrap_err();
            assert!(matches!(err, GestalkError::Config(_)));
            assert!(err.to_string().contains("out of range"), "{err}");
        }

        let tiny_dwell = RecognizerConfig {
            dwell_secs: 1e-12,
            ..RecognizerConfig::default()
        };
        assert!(tiny_dwell.validate().is_err());

        let impossible_wave = RecognizerConfig {
            motion_capacity: 4,
            motion_min_each: 5,
            ..RecognizerConfig::default()
        };
        assert!(impossible_wave.validate().is_err());

        let empty_buffer = RecognizerConfig {
            motion_capacity: 0,
            motion_min_each: 0,
            ..RecognizerConfig::default()
        };
        assert!(empty_buffer.validate().is_err());
    }

    #[test]
    fn test_capture_and_speech_validation() {
        let capture = CaptureConfig {
            max_hands: 0,
            ..CaptureConfig::default()
        };
        assert!(capture.validate().is_err());

        let capture = CaptureConfig {
            min_detection_confidence: 1.5,
            ..CaptureConfig::default()
        };
        assert!(capture.validate().is_err());

        let speech = SpeechConfig {
            engine: "command".to_string(),
            command: "  ".to_string(),
            ..SpeechConfig::default()
        };
        assert!(speech.validate().is_err());

        let speech = SpeechConfig {
            queue_capacity: 0,
            ..SpeechConfig::default()
        };
        assert!(speech.validate().is_err());
    }
}
