use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gomoku_brain::BrainParams;
use gomoku_engine::STANDARD_SIZE;
use gomoku_training::trainer::{Exploration, TrainingParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("failed to read config file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[display("invalid configuration: {reason}")]
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: STANDARD_SIZE,
            cols: STANDARD_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed of the run's random number generator.
    pub seed: u64,
    /// Games between two progress reports.
    pub report_interval: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            report_interval: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub dir: PathBuf,
    /// Games between two saved models.
    pub interval: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            interval: 1000,
        }
    }
}

/// Everything a run needs, loadable from TOML. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub run: RunConfig,
    pub board: BoardConfig,
    pub brain: BrainParams,
    pub training: TrainingParams,
    pub checkpoint: CheckpointConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let AppConfig {
            run,
            board,
            brain,
            training,
            checkpoint,
        } = self;

        if board.rows == 0 || board.cols == 0 {
            return Err(invalid("board.rows and board.cols must be > 0"));
        }
        if brain.hidden_layers > 0 && brain.hidden_neurons == 0 {
            return Err(invalid("brain.hidden_neurons must be > 0"));
        }

        if training.games == 0 {
            return Err(invalid("training.games must be > 0"));
        }
        if !(0.0..=1.0).contains(&training.gamma) {
            return Err(invalid("training.gamma must be in [0, 1]"));
        }
        if !(training.learning_rate.is_finite() && training.learning_rate > 0.0) {
            return Err(invalid("training.learning_rate must be > 0"));
        }
        if training.train_iterations == 0 {
            return Err(invalid("training.train_iterations must be > 0"));
        }
        if training.batch_size == 0 {
            return Err(invalid("training.batch_size must be > 0"));
        }
        if training.pool_capacity < training.batch_size {
            return Err(invalid(
                "training.pool_capacity must be >= training.batch_size",
            ));
        }
        if training.training_threshold > training.pool_capacity {
            return Err(invalid(
                "training.training_threshold must be <= training.pool_capacity",
            ));
        }
        if let Exploration::Constant { epsilon } = training.exploration
            && !(0.0..=1.0).contains(&epsilon)
        {
            return Err(invalid("training.exploration.epsilon must be in [0, 1]"));
        }

        if checkpoint.interval == 0 {
            return Err(invalid("checkpoint.interval must be > 0"));
        }
        if run.report_interval == 0 {
            return Err(invalid("run.report_interval must be > 0"));
        }
        Ok(())
    }

    /// The default configuration as a TOML document.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
