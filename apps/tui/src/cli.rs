use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "spin-wheel", version, about = "Terminal prize wheel")]
pub struct CliArgs {
    /// Spin without a UI and print the outcomes
    #[arg(long)]
    pub headless: bool,

    /// Print headless outcomes as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of headless spins
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub spins: u32,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// JSON file with segments and settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Force the winning segment index
    #[arg(long = "debug-result", value_name = "INDEX", allow_hyphen_values = true)]
    pub debug_result: Option<i64>,

    /// Minimum full turns per spin
    #[arg(long = "min-spins", value_name = "N")]
    pub min_spins: Option<u32>,

    /// Spin duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Start with sound disabled
    #[arg(long = "no-sound")]
    pub no_sound: bool,

    /// Start with confetti disabled
    #[arg(long = "no-confetti")]
    pub no_confetti: bool,

    /// Ring the bell on every boundary tick, not just the win
    #[arg(long = "tick-bell")]
    pub tick_bell: bool,

    /// Seed for reproducible outcomes
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Flags win over `.env` and the config file, so they are pushed into the
    /// environment before either is read.
    pub fn apply_env_overrides(&self) {
        for (key, value) in self.env_overrides() {
            std::env::set_var(key, value);
        }
    }

    fn env_overrides(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(path) = &self.config {
            vars.push(("WHEEL_CONFIG", path.display().to_string()));
        }
        if let Some(index) = self.debug_result {
            vars.push(("WHEEL_DEBUG_RESULT", index.to_string()));
        }
        if let Some(turns) = self.min_spins {
            vars.push(("WHEEL_MIN_SPINS", turns.to_string()));
        }
        if let Some(seconds) = self.duration {
            vars.push(("WHEEL_SPIN_DURATION", seconds.to_string()));
        }
        if self.no_sound {
            vars.push(("WHEEL_DISABLE_SOUND", "1".to_string()));
        }
        if self.no_confetti {
            vars.push(("WHEEL_DISABLE_CONFETTI", "1".to_string()));
        }
        if self.tick_bell {
            vars.push(("WHEEL_TICK_BELL", "1".to_string()));
        }
        if let Some(seed) = self.seed {
            vars.push(("WHEEL_SEED", seed.to_string()));
        }
        if let Some(path) = &self.log_file {
            vars.push(("WHEEL_LOG_FILE", path.display().to_string()));
        }
        if self.debug {
            vars.push(("DEBUG", "1".to_string()));
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one_spin() {
        let args = CliArgs::parse_from(["spin-wheel"]);
        assert_eq!(args.spins, 1);
        assert!(args.env_overrides().is_empty());
    }

    #[test]
    fn flags_become_wheel_variables() {
        let args = CliArgs::parse_from([
            "spin-wheel",
            "--headless",
            "--debug-result",
            "4",
            "--min-spins",
            "3",
            "--no-sound",
            "--seed",
            "7",
        ]);
        assert!(args.headless);

        let vars = args.env_overrides();
        assert!(vars.contains(&("WHEEL_DEBUG_RESULT", "4".to_string())));
        assert!(vars.contains(&("WHEEL_MIN_SPINS", "3".to_string())));
        assert!(vars.contains(&("WHEEL_DISABLE_SOUND", "1".to_string())));
        assert!(vars.contains(&("WHEEL_SEED", "7".to_string())));
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn negative_debug_result_is_accepted() {
        let args = CliArgs::parse_from(["spin-wheel", "--debug-result", "-1"]);
        assert_eq!(args.debug_result, Some(-1));
    }
}
