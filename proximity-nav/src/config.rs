//! Runtime settings, read once at startup from a JSON file.

use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_MOTOR_PWM, MAX_MOTOR_PWM};
use crate::device::RplidarSettings;
use crate::error::FusionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/settings.json";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    /// LiDAR serial port, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Detector model handed to the detector backend.
    pub model_path: PathBuf,
    /// Sector distance (mm) below which an obstacle triggers an alert.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    #[serde(default)]
    pub log_enabled: bool,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_motor_pwm")]
    pub motor_pwm: u16,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_target_fps")]
    pub target_fps: f64,
    #[serde(default)]
    pub alert_sound: bool,
}

fn default_alert_threshold() -> f64 {
    1000.
}

fn default_frame_width() -> u32 {
    640
}

fn default_frame_height() -> u32 {
    480
}

fn default_log_path() -> PathBuf {
    PathBuf::from("logs/lidar_log.csv")
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_motor_pwm() -> u16 {
    DEFAULT_MOTOR_PWM
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_target_fps() -> f64 {
    30.
}

impl Config {
    /// Settings with the given port and model and defaults everywhere else.
    pub fn new(port: &str, model_path: &str) -> Self {
        Config {
            port: port.to_string(),
            model_path: PathBuf::from(model_path),
            alert_threshold: default_alert_threshold(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            log_enabled: false,
            log_path: default_log_path(),
            baud_rate: default_baud_rate(),
            motor_pwm: default_motor_pwm(),
            settle_delay_ms: default_settle_delay_ms(),
            target_fps: default_target_fps(),
            alert_sound: false,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FusionError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            FusionError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, FusionError> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FusionError> {
        let invalid = |msg: &str| Err(FusionError::Configuration(msg.to_string()));

        if self.port.trim().is_empty() {
            return invalid("PORT must not be empty");
        }
        if self.model_path.as_os_str().is_empty() {
            return invalid("MODEL_PATH must not be empty");
        }
        if !self.alert_threshold.is_finite() || self.alert_threshold <= 0. {
            return invalid("ALERT_THRESHOLD must be a positive number");
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return invalid("FRAME_WIDTH and FRAME_HEIGHT must be positive");
        }
        if self.log_enabled && self.log_path.as_os_str().is_empty() {
            return invalid("LOG_PATH must be set when LOG_ENABLED is true");
        }
        if self.baud_rate == 0 {
            return invalid("BAUD_RATE must be positive");
        }
        if self.motor_pwm > MAX_MOTOR_PWM {
            return invalid("MOTOR_PWM must be at most 1023");
        }
        if !self.target_fps.is_finite() || self.target_fps <= 0. {
            return invalid("TARGET_FPS must be a positive number");
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn rplidar_settings(&self) -> RplidarSettings {
        RplidarSettings {
            baud_rate: self.baud_rate,
            motor_pwm: self.motor_pwm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_full_settings() {
        let config = Config::from_json(
            r#"{
                "PORT": "COM3",
                "MODEL_PATH": "models/yolov8n.pt",
                "ALERT_THRESHOLD": 1500,
                "FRAME_WIDTH": 1280,
                "FRAME_HEIGHT": 720,
                "LOG_ENABLED": true,
                "LOG_PATH": "logs/run.csv"
            }"#,
        )
        .unwrap();
        assert_eq!(config.port, "COM3");
        assert_eq!(config.model_path, PathBuf::from("models/yolov8n.pt"));
        assert_eq!(config.alert_threshold, 1500.);
        assert_eq!((config.frame_width, config.frame_height), (1280, 720));
        assert!(config.log_enabled);
        assert_eq!(config.log_path, PathBuf::from("logs/run.csv"));
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.motor_pwm, 660);
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_json(r#"{"PORT": "/dev/ttyUSB0", "MODEL_PATH": "m.pt"}"#).unwrap();
        assert_eq!(config, Config::new("/dev/ttyUSB0", "m.pt"));
        assert!(!config.log_enabled);
        assert_eq!(config.alert_threshold, 1000.);
    }

    #[test]
    fn test_missing_port() {
        assert!(matches!(
            Config::from_json(r#"{"MODEL_PATH": "m.pt"}"#),
            Err(FusionError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            r#"{"PORT": "", "MODEL_PATH": "m.pt"}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "ALERT_THRESHOLD": 0}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "ALERT_THRESHOLD": -5}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "FRAME_WIDTH": 0}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "LOG_ENABLED": true, "LOG_PATH": ""}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "MOTOR_PWM": 2000}"#,
            r#"{"PORT": "COM3", "MODEL_PATH": "m.pt", "TARGET_FPS": 0}"#,
        ];
        for case in cases {
            assert!(
                matches!(Config::from_json(case), Err(FusionError::Configuration(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"PORT": "COM4", "MODEL_PATH": "m.pt"}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.port, "COM4");

        assert!(matches!(
            Config::load("does/not/exist.json"),
            Err(FusionError::Configuration(_))
        ));
    }
}
