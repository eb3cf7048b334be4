//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Cli;

/// Environment variable holding the daily target.
const TARGET_ENV: &str = "TIMELY_TARGET";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Daily target in the short time grammar (`8`, `0800`, `7:42`).
    #[serde(deserialize_with = "string_or_number")]
    pub target: String,

    /// Path to the log file.
    pub log_file: PathBuf,

    /// Seed an empty day with the system boot time.
    pub boot_probe: bool,
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = dirs_state_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            target: "08:00".to_string(),
            log_file: state_dir.join("timely.log"),
            boot_probe: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMELY_*)
        figment = figment.merge(Env::prefixed("TIMELY_").ignore(&["target"]));

        // Env parsing would read `0030` as the number 30, so the target is taken verbatim.
        if let Ok(target) = std::env::var(TARGET_ENV) {
            figment = figment.merge(Serialized::default("target", target));
        }

        figment.extract()
    }

    /// Applies command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(target) = &cli.target {
            self.target.clone_from(target);
        }
        if cli.no_boot_probe {
            self.boot_probe = false;
        }
        self
    }
}

/// Accepts `target = 8` as well as `target = "8:00"` in config files.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Returns the platform-specific config directory for timely.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timely"))
}

/// Returns the platform-specific state directory for timely.
///
/// On Linux: `~/.local/state/timely`. Platforms without a state directory
/// fall back to the local data directory.
pub fn dirs_state_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join("timely"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use clap::Parser;
    use figment::Jail;

    #[test]
    fn test_dirs_state_path_ends_with_timely() {
        let path = dirs_state_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "timely");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.target, "08:00");
        assert_eq!(config.log_file, dirs_state_path().unwrap().join("timely.log"));
        assert!(config.boot_probe);
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            let config = Config::load_from(None)?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.create_file(
                "timely.toml",
                r#"
                target = "7:42"
                boot_probe = false
                "#,
            )?;

            let config = Config::load_from(Some(Path::new("timely.toml")))?;
            assert_eq!(config.target, "7:42");
            assert!(!config.boot_probe);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_target_is_accepted() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.create_file("timely.toml", "target = 8")?;

            let config = Config::load_from(Some(Path::new("timely.toml")))?;
            assert_eq!(config.target, "8");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.create_file("timely.toml", r#"target = "7:42""#)?;
            jail.set_env("TIMELY_TARGET", "6:30");
            jail.set_env("TIMELY_LOG_FILE", "/tmp/timely-test.log");

            let config = Config::load_from(Some(Path::new("timely.toml")))?;
            assert_eq!(config.target, "6:30");
            assert_eq!(config.log_file, PathBuf::from("/tmp/timely-test.log"));
            Ok(())
        });
    }

    #[test]
    fn test_env_target_keeps_leading_zeros() {
        let cases = [
            ("0030", Duration::minutes(30)),
            ("0005", Duration::minutes(5)),
            ("0800", Duration::hours(8)),
            ("8", Duration::hours(8)),
        ];

        for (raw, expected) in cases {
            Jail::expect_with(|jail| {
                let dir = jail.directory().to_path_buf();
                jail.set_env("XDG_CONFIG_HOME", dir.display());
                jail.set_env(TARGET_ENV, raw);

                let config = Config::load_from(None)?;
                assert_eq!(config.target, raw);
                assert_eq!(timely_core::parse_target(&config.target).unwrap(), expected);
                Ok(())
            });
        }
    }

    #[test]
    fn test_env_target_overrides_numeric_config_file() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.create_file("timely.toml", "target = 8")?;
            jail.set_env(TARGET_ENV, "0745");

            let config = Config::load_from(Some(Path::new("timely.toml")))?;
            assert_eq!(config.target, "0745");
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::parse_from(["timely", "--no-boot-probe", "7:42"]);
        let config = Config::default().with_cli_overrides(&cli);
        assert_eq!(config.target, "7:42");
        assert!(!config.boot_probe);
    }

    #[test]
    fn test_absent_cli_overrides_keep_config() {
        let cli = Cli::parse_from(["timely"]);
        let config = Config::default().with_cli_overrides(&cli);
        assert_eq!(config, Config::default());
    }
}
