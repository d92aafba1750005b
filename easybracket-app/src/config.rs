use std::env;
use std::fs;
use std::io;
use std::path::Path;

use easybracket_core::predict::DEFAULT_TARGET_SCORE;
use easybracket_core::{BracketOptions, ByePlacement};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    match value.parse() {
                        Ok(value) => $config.$name = value,
                        Err(_) => log::warn!("Ignoring invalid value for {}: {:?}", $key, value),
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub bracket: Bracket,
    pub predictions: Predictions,
}

impl Config {
    /// Reads the [`Config`] from the TOML file at `path`. Missing fields use their default
    /// values.
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read(path)?;
        Ok(toml::from_slice(&buf)?)
    }

    /// Reads the [`Config`] from the file at `path` if one is given, then applies all
    /// `EB_*` environment variables.
    pub fn load<P>(path: Option<P>) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Ok(config.with_environment())
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "EB_LOGLEVEL", loglevel);
        self.bracket = self.bracket.with_environment();
        self.predictions = self.predictions.with_environment();

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            bracket: Bracket::default(),
            predictions: Predictions::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bracket {
    /// Whether a completed match may be recorded again with different scores.
    pub overwrite_allowed: bool,
    pub bye_placement: ByePlacement,
}

impl Bracket {
    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "EB_OVERWRITE_ALLOWED",
            overwrite_allowed,
            "EB_BYE_PLACEMENT",
            bye_placement,
        );

        self
    }

    #[inline]
    pub fn options(&self) -> BracketOptions {
        BracketOptions::new()
            .overwrite_allowed(self.overwrite_allowed)
            .bye_placement(self.bye_placement)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Predictions {
    /// The score a game is played to.
    pub target_score: u32,
}

impl Predictions {
    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "EB_TARGET_SCORE", target_score);

        self
    }
}

impl Default for Predictions {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_toml() {
        let input = r#"
            loglevel = "debug"

            [bracket]
            overwrite_allowed = true
            bye_placement = "trailing"

            [predictions]
            target_score = 11
        "#;

        let config: Config = toml::from_str(input).unwrap();

        assert_eq!(config.loglevel, LevelFilter::Debug);
        assert!(config.bracket.overwrite_allowed);
        assert_eq!(config.bracket.bye_placement, ByePlacement::Trailing);
        assert_eq!(config.predictions.target_score, 11);

        let options = config.bracket.options();
        assert!(options.overwrite_allowed);
        assert_eq!(options.bye_placement, ByePlacement::Trailing);
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());

        assert_eq!(config.loglevel, LevelFilter::Info);
        assert!(!config.bracket.overwrite_allowed);
        assert_eq!(config.bracket.bye_placement, ByePlacement::Standard);
        assert_eq!(config.predictions.target_score, 21);

        let config: Config = toml::from_str("[bracket]\noverwrite_allowed = true").unwrap();
        assert!(config.bracket.overwrite_allowed);
        assert_eq!(config.bracket.bye_placement, ByePlacement::Standard);
    }

    #[test]
    fn test_config_invalid() {
        assert!(toml::from_str::<Config>("[bracket]\nbye_placement = \"random\"").is_err());
    }

    #[test]
    fn test_config_from_environment() {
        env::set_var("EB_TARGET_SCORE", "15");
        env::set_var("EB_BYE_PLACEMENT", "trailing");
        env::set_var("EB_OVERWRITE_ALLOWED", "not-a-bool");

        let config = Config::default().with_environment();

        env::remove_var("EB_TARGET_SCORE");
        env::remove_var("EB_BYE_PLACEMENT");
        env::remove_var("EB_OVERWRITE_ALLOWED");

        assert_eq!(config.predictions.target_score, 15);
        assert_eq!(config.bracket.bye_placement, ByePlacement::Trailing);
        assert!(!config.bracket.overwrite_allowed);
    }
}
