use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::domain::{default_segments, Rgb, Segment, WheelTheme};
use crate::wheel::SpinSettings;

/// Everything the host decides about a wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    pub segments: Vec<Segment>,
    pub settings: SpinSettings,
    pub seed: Option<u64>,
    pub tick_bell: bool,
    pub theme: WheelTheme,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            settings: SpinSettings::default(),
            seed: None,
            tick_bell: false,
            theme: WheelTheme::default(),
        }
    }
}

/// JSON config file layout; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    segments: Option<Vec<Segment>>,
    min_spins: Option<u32>,
    spin_duration: Option<f64>,
    debug_result: Option<i64>,
    disable_sound: Option<bool>,
    disable_confetti: Option<bool>,
    #[serde(alias = "primaryColor")]
    rim_color: Option<Rgb>,
    #[serde(alias = "secondaryColor")]
    knob_color: Option<Rgb>,
    #[serde(alias = "pointerColor")]
    pointer_color: Option<Rgb>,
    #[serde(alias = "textColor")]
    text_color: Option<Rgb>,
}

/// Loads `.env`, then builds the configuration from the file named by
/// `WHEEL_CONFIG` (if any) and the remaining `WHEEL_*` variables.
pub fn init_wheel_config() -> color_eyre::eyre::Result<WheelConfig> {
    dotenv().ok();

    let path = get_config_path();
    load_wheel_config(path.as_deref(), |key| env::var(key).ok())
}

/// Gets the config file path from the environment
pub fn get_config_path() -> Option<PathBuf> {
    env::var("WHEEL_CONFIG").ok().map(PathBuf::from)
}

/// Gets the log file path from the environment. Read before the rest of the
/// configuration so that configuration warnings are captured.
pub fn get_log_file_path() -> Option<PathBuf> {
    log_file_path(|key| env::var(key).ok())
}

fn log_file_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("WHEEL_LOG_FILE")
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Defaults, overlaid by the file at `path`, overlaid by `lookup`.
pub fn load_wheel_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> color_eyre::eyre::Result<WheelConfig> {
    let mut config = WheelConfig::default();

    if let Some(path) = path {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read wheel config {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("Invalid wheel config {}", path.display()))?;
        apply_file(&mut config, file)?;
    }

    apply_env(&mut config, &lookup)?;

    config
        .settings
        .validate()
        .wrap_err("Invalid spin settings")?;

    Ok(config)
}

fn apply_file(config: &mut WheelConfig, file: ConfigFile) -> color_eyre::eyre::Result<()> {
    if let Some(segments) = file.segments {
        config.segments = segments;
    }
    if let Some(min_spins) = file.min_spins {
        config.settings.min_spins = min_spins;
    }
    if let Some(seconds) = file.spin_duration {
        config.settings.spin_duration = seconds_to_duration(seconds)?;
    }
    if file.debug_result.is_some() {
        config.settings.forced_result = file.debug_result;
    }
    if let Some(disabled) = file.disable_sound {
        config.settings.sound = !disabled;
    }
    if let Some(disabled) = file.disable_confetti {
        config.settings.confetti = !disabled;
    }

    let theme = &mut config.theme;
    theme.rim = file.rim_color.unwrap_or(theme.rim);
    theme.knob = file.knob_color.unwrap_or(theme.knob);
    theme.pointer = file.pointer_color.unwrap_or(theme.pointer);
    theme.text = file.text_color.unwrap_or(theme.text);
    Ok(())
}

fn apply_env(
    config: &mut WheelConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> color_eyre::eyre::Result<()> {
    if let Some(min_spins) = parse_var::<u32>(lookup, "WHEEL_MIN_SPINS") {
        config.settings.min_spins = min_spins;
    }
    if let Some(seconds) = parse_var::<f64>(lookup, "WHEEL_SPIN_DURATION") {
        config.settings.spin_duration = seconds_to_duration(seconds)?;
    }
    if let Some(index) = parse_var::<i64>(lookup, "WHEEL_DEBUG_RESULT") {
        config.settings.forced_result = Some(index);
    }
    if let Some(disabled) = parse_flag(lookup, "WHEEL_DISABLE_SOUND") {
        config.settings.sound = !disabled;
    }
    if let Some(disabled) = parse_flag(lookup, "WHEEL_DISABLE_CONFETTI") {
        config.settings.confetti = !disabled;
    }
    if let Some(enabled) = parse_flag(lookup, "WHEEL_TICK_BELL") {
        config.tick_bell = enabled;
    }
    if let Some(seed) = parse_var::<u64>(lookup, "WHEEL_SEED") {
        config.seed = Some(seed);
    }
    Ok(())
}

fn seconds_to_duration(seconds: f64) -> color_eyre::eyre::Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| eyre!("Invalid spin duration {seconds}: {e}"))
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring unparsable setting");
            None
        }
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => {
            warn!(key, value = %raw, "ignoring unparsable flag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("spin-wheel-{}-{name}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = load_wheel_config(None, env_of(&[])).unwrap();
        assert_eq!(config, WheelConfig::default());
        assert_eq!(config.settings.min_spins, 5);
        assert_eq!(config.settings.spin_duration, Duration::from_secs(4));
        assert_eq!(config.segments.len(), 8);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = write_config(
            "file",
            r##"{
                "segments": [
                    {"id": "a", "label": "Apple", "color": "#ff0000"},
                    {"id": "b", "label": "Banana", "color": "#ffff00"}
                ],
                "min_spins": 3,
                "spin_duration": 2.5,
                "debug_result": 1,
                "disable_confetti": true
            }"##,
        );

        let config = load_wheel_config(Some(&path), env_of(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.segments.len(), 2);
        assert_eq!(config.settings.min_spins, 3);
        assert_eq!(config.settings.spin_duration, Duration::from_millis(2_500));
        assert_eq!(config.settings.forced_result, Some(1));
        assert!(config.settings.sound);
        assert!(!config.settings.confetti);
    }

    #[test]
    fn env_overrides_file() {
        let path = write_config("env", r#"{"min_spins": 3, "debug_result": 1}"#);
        let lookup = env_of(&[
            ("WHEEL_MIN_SPINS", "7"),
            ("WHEEL_DEBUG_RESULT", "-1"),
            ("WHEEL_DISABLE_SOUND", "yes"),
            ("WHEEL_TICK_BELL", "1"),
            ("WHEEL_SEED", "99"),
        ]);

        let config = load_wheel_config(Some(&path), lookup).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.settings.min_spins, 7);
        assert_eq!(config.settings.forced_result, Some(-1));
        assert!(!config.settings.sound);
        assert!(config.tick_bell);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn theme_colours_come_from_the_file() {
        let path = write_config(
            "theme",
            r##"{
                "rim_color": "#102030",
                "secondaryColor": "#405060",
                "pointer_color": "#708090",
                "textColor": "#abcdef"
            }"##,
        );

        let config = load_wheel_config(Some(&path), env_of(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            config.theme,
            WheelTheme {
                rim: Rgb(0x10, 0x20, 0x30),
                knob: Rgb(0x40, 0x50, 0x60),
                pointer: Rgb(0x70, 0x80, 0x90),
                text: Rgb(0xab, 0xcd, 0xef),
            }
        );
    }

    #[test]
    fn partial_theme_keeps_default_colours() {
        let path = write_config("partial-theme", r##"{"pointer_color": "#000000"}"##);
        let config = load_wheel_config(Some(&path), env_of(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.theme.pointer, Rgb(0, 0, 0));
        assert_eq!(config.theme.rim, WheelTheme::ROYALE.rim);
        assert_eq!(config.theme.text, Rgb::WHITE);
    }

    #[test]
    fn bad_theme_colour_is_an_error() {
        let path = write_config("bad-theme", r#"{"rim_color": "gold"}"#);
        let result = load_wheel_config(Some(&path), env_of(&[]));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn log_file_path_ignores_blank_values() {
        assert_eq!(
            log_file_path(env_of(&[("WHEEL_LOG_FILE", "/tmp/wheel.log")])),
            Some(PathBuf::from("/tmp/wheel.log"))
        );
        assert_eq!(log_file_path(env_of(&[("WHEEL_LOG_FILE", "  ")])), None);
        assert_eq!(log_file_path(env_of(&[])), None);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let lookup = env_of(&[("WHEEL_MIN_SPINS", "lots"), ("WHEEL_DISABLE_SOUND", "maybe")]);
        let config = load_wheel_config(None, lookup).unwrap();
        assert_eq!(config.settings.min_spins, 5);
        assert!(config.settings.sound);
    }

    #[test]
    fn zero_min_spins_is_an_error() {
        let lookup = env_of(&[("WHEEL_MIN_SPINS", "0")]);
        assert!(load_wheel_config(None, lookup).is_err());
    }

    #[test]
    fn negative_duration_is_an_error() {
        let lookup = env_of(&[("WHEEL_SPIN_DURATION", "-2")]);
        assert!(load_wheel_config(None, lookup).is_err());
    }

    #[test]
    fn unknown_file_fields_are_an_error() {
        let path = write_config("unknown", r#"{"min_spin": 3}"#);
        let result = load_wheel_config(Some(&path), env_of(&[]));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = env::temp_dir().join("spin-wheel-does-not-exist.json");
        assert!(load_wheel_config(Some(&path), env_of(&[])).is_err());
    }
}
