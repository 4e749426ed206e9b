//! Engine configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use skillpilot_error::{ConfigError, SkillPilotResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SKILLPILOT";

/// Placeholder replaced by the step name in the starter template.
pub const STEP_NAME_PLACEHOLDER: &str = "{step_name}";

const DEFAULT_STARTER_TEMPLATE: &str = "# {step_name}
# Follow the guidelines to complete this step

def main():
    # Your code here
    pass

if __name__ == \"__main__\":
    main()";

/// Configuration for the progression engine.
///
/// Values come from, in increasing precedence: built-in defaults, an
/// optional TOML file, and `SKILLPILOT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct QuestConfig {
    /// Simulated grading delay for completion attempts (milliseconds)
    #[builder(default = "1500")]
    completion_delay_ms: u64,
    /// Pass probability for an attempt whose content changed
    #[builder(default = "0.8")]
    success_rate: f64,
    /// XP for steps whose definition omits it
    #[builder(default = "10")]
    default_step_xp: u32,
    /// Reward for tasks whose definition omits it
    #[builder(default = "50")]
    default_task_reward: u32,
    /// Ceiling for the number of revealed hints
    #[builder(default = "3")]
    max_hints_level: u8,
    /// Starter code used when a step defines none
    #[builder(default = "DEFAULT_STARTER_TEMPLATE.to_string()")]
    starter_template: String,
    /// Directory holding persisted progress
    #[builder(default = "default_progress_dir()")]
    progress_dir: PathBuf,
}

fn default_progress_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("skillpilot"))
        .unwrap_or_else(|| PathBuf::from(".skillpilot"))
}

impl QuestConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.success_rate {
            Some(rate) if !(0.0..=1.0).contains(&rate) => {
                Err(format!("success_rate must be within [0, 1], got {}", rate))
            }
            _ => Ok(()),
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            completion_delay_ms: 1500,
            success_rate: 0.8,
            default_step_xp: 10,
            default_task_reward: 50,
            max_hints_level: 3,
            starter_template: DEFAULT_STARTER_TEMPLATE.to_string(),
            progress_dir: default_progress_dir(),
        }
    }
}

impl QuestConfig {
    /// Load configuration from defaults, an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed, or if a
    /// value is out of range.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> SkillPilotResult<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("completion_delay_ms", defaults.completion_delay_ms as i64)
            .and_then(|b| b.set_default("success_rate", defaults.success_rate))
            .and_then(|b| b.set_default("default_step_xp", defaults.default_step_xp as i64))
            .and_then(|b| {
                b.set_default("default_task_reward", defaults.default_task_reward as i64)
            })
            .and_then(|b| b.set_default("max_hints_level", defaults.max_hints_level as i64))
            .and_then(|b| b.set_default("starter_template", defaults.starter_template.clone()))
            .and_then(|b| {
                b.set_default(
                    "progress_dir",
                    defaults.progress_dir.to_string_lossy().to_string(),
                )
            })
            .map_err(|e| ConfigError::new(format!("Failed to set defaults: {}", e)))?;

        if let Some(path) = path {
            debug!(path = %path.display(), "Adding configuration file source");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let loaded: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        loaded.validate()?;
        debug!(?loaded, "Configuration loaded");
        Ok(loaded)
    }

    /// Check that every value is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(ConfigError::new(format!(
                "success_rate must be within [0, 1], got {}",
                self.success_rate
            )));
        }
        Ok(())
    }

    /// Simulated grading delay.
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Starter code for a step with the given name.
    pub fn starter_code_for(&self, step_name: &str) -> String {
        self.starter_template
            .replace(STEP_NAME_PLACEHOLDER, step_name)
    }

    /// Returns a copy pointing the progress store at `dir`.
    pub fn with_progress_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.progress_dir = dir.into();
        self
    }
}
