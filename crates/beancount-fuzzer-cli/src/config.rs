use anyhow::{Context, Result};
use beancount_fuzzer::FuzzerConfig;
use beancount_fuzzer::pipeline::DEFAULT_THRESHOLD;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TRAINING: &str = "master.beancount";
pub const DEFAULT_BLOCKED_TAGS: [&str; 2] = ["john", "fiona"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub struct Threshold(pub u8);

impl TryFrom<u8> for Threshold {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 100 {
            return Err(format!("threshold must be between 0 and 100, got {value}"));
        }
        Ok(Threshold(value))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub training: Option<PathBuf>,
    pub threshold: Option<Threshold>,
    pub blocked_tags: Option<Vec<String>>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<(PathBuf, Self)> {
        let base_dir = path.parent().map(ToOwned::to_owned).unwrap_or_default();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok((base_dir, config))
    }

    pub fn find_and_load() -> Result<Option<(PathBuf, Self)>> {
        let config_locations = [
            Path::new("beancount-fuzzer.toml"),
            Path::new(".beancount-fuzzer.toml"),
        ];

        for location in &config_locations {
            if location.exists() {
                return Self::load_from_file(location).map(Some);
            }
        }

        Ok(None)
    }
}

/// Values given on the command line, taking precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub training: Option<PathBuf>,
    pub threshold: Option<u8>,
    pub blocked_tags: Vec<String>,
}

#[derive(Debug)]
pub struct Settings {
    pub training: PathBuf,
    pub fuzzer: FuzzerConfig,
}

impl Settings {
    pub fn resolve(config: Option<(PathBuf, Config)>, overrides: Overrides) -> Settings {
        let (base_dir, config) = config.unwrap_or_default();

        let training = match (overrides.training, config.training) {
            (Some(training), _) => training,
            (None, Some(training)) => base_dir.join(training),
            (None, None) => PathBuf::from(DEFAULT_TRAINING),
        };
        let threshold = overrides
            .threshold
            .or(config.threshold.map(|Threshold(value)| value))
            .unwrap_or(DEFAULT_THRESHOLD);
        let blocked_tags = if !overrides.blocked_tags.is_empty() {
            overrides.blocked_tags.into_iter().collect()
        } else if let Some(tags) = config.blocked_tags {
            tags.into_iter().collect()
        } else {
            DEFAULT_BLOCKED_TAGS.map(String::from).into()
        };

        Settings {
            training,
            fuzzer: FuzzerConfig {
                threshold,
                blocked_tags,
            },
        }
    }
}
