//! Application configuration resolved at startup.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the review CSV.
pub const DATA_ENV_VAR: &str = "COFFEE_DASHBOARD_DATA";
pub const DEFAULT_DATA_FILE: &str = "df_arabica_clean.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            window_size: [1400.0, 900.0],
            min_window_size: [1000.0, 700.0],
        }
    }
}

impl AppConfig {
    /// First CLI argument, then `COFFEE_DASHBOARD_DATA`, then the default
    /// file in the working directory.
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), env::var(DATA_ENV_VAR).ok())
    }

    fn resolve(arg: Option<String>, env_value: Option<String>) -> Self {
        let data_path = arg
            .into_iter()
            .chain(env_value)
            .find(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Self {
            data_path,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_environment() {
        let config = AppConfig::resolve(Some("a.csv".into()), Some("b.csv".into()));
        assert_eq!(config.data_path, PathBuf::from("a.csv"));
    }

    #[test]
    fn environment_then_default() {
        let config = AppConfig::resolve(None, Some("b.csv".into()));
        assert_eq!(config.data_path, PathBuf::from("b.csv"));

        let config = AppConfig::resolve(Some("  ".into()), None);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
