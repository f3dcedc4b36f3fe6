use devkit_gpio::buttons::{ButtonTiming, PressMode};
use dotenv::var;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// GPIO character device, e.g. `/dev/gpiochip0`.
    pub chip: String,
    pub buttons: Vec<ButtonEntry>,
    pub encoder: Option<EncoderEntry>,
    pub timing: TimingConfig,
    pub poll_interval_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ButtonEntry {
    pub line: usize,
    pub mode: ButtonMode,
    /// Button pulls the line to ground; a pull-up is enabled.
    #[serde(default = "default_active_low")]
    pub active_low: bool,
}

fn default_active_low() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonMode {
    SinglePress,
    Repetitive,
    LongPress,
}

impl From<ButtonMode> for PressMode {
    fn from(mode: ButtonMode) -> Self {
        match mode {
            ButtonMode::SinglePress => PressMode::SinglePress,
            ButtonMode::Repetitive => PressMode::Repetitive,
            ButtonMode::LongPress => PressMode::LongPress,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct EncoderEntry {
    pub line_a: usize,
    pub line_b: usize,
    /// Count up when turning counter-clockwise.
    #[serde(default)]
    pub counter_clockwise: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct TimingConfig {
    pub press_ms: u32,
    pub after_press_ms: u32,
    pub longpress_ms: u32,
    pub repetitive_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = ButtonTiming::DEFAULT;
        TimingConfig {
            press_ms: timing.press_ms,
            after_press_ms: timing.after_press_ms,
            longpress_ms: timing.longpress_ms,
            repetitive_ms: timing.repetitive_ms,
        }
    }
}

impl From<TimingConfig> for ButtonTiming {
    fn from(config: TimingConfig) -> Self {
        ButtonTiming {
            press_ms: config.press_ms,
            after_press_ms: config.after_press_ms,
            longpress_ms: config.longpress_ms,
            repetitive_ms: config.repetitive_ms,
        }
    }
}

impl Config {
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("config.json"));
        let config_path = Path::new(config_str);
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Invalid config at {}: {}", config_path.display(), e);
                    None
                }
            }
        } else {
            None
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let config_str = var("CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());
        let config_path = Path::new(&config_str);
        let file = std::fs::File::create(config_path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chip: "/dev/gpiochip0".to_string(),
            buttons: vec![
                ButtonEntry {
                    line: 25,
                    mode: ButtonMode::LongPress,
                    active_low: true,
                },
                ButtonEntry {
                    line: 24,
                    mode: ButtonMode::Repetitive,
                    active_low: true,
                },
            ],
            encoder: Some(EncoderEntry {
                line_a: 5,
                line_b: 6,
                counter_clockwise: false,
            }),
            timing: TimingConfig::default(),
            poll_interval_ms: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "buttons": [ { "line": 3, "mode": "repetitive" } ], "timing": { "press_ms": 50 } }"#,
        )
        .unwrap();

        assert_eq!(config.chip, "/dev/gpiochip0");
        assert_eq!(config.buttons.len(), 1);
        assert!(config.buttons[0].active_low);
        assert_eq!(PressMode::from(config.buttons[0].mode), PressMode::Repetitive);

        let timing: ButtonTiming = config.timing.into();
        assert_eq!(timing.press_ms, 50);
        assert_eq!(timing.longpress_ms, ButtonTiming::DEFAULT.longpress_ms);
    }

    #[test]
    fn default_config_round_trips() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.buttons.len(), 2);
        assert_eq!(config.buttons[0].mode, ButtonMode::LongPress);
        assert_eq!(config.encoder.map(|e| e.line_b), Some(6));
    }
}
