use super::{
    evolution::EvolutionConfig,
    featurize::FeaturizeConfig,
    traits::ConfigSection,
};
use crate::error::FreqgenError;
use crate::genetic_code::{GeneticCode, DEFAULT_GENETIC_CODE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment variables overriding file settings,
/// e.g. `FREQGEN__EVOLUTION__POPULATION_SIZE=200`.
pub const ENV_PREFIX: &str = "FREQGEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub genetic_code: u8,
    pub evolution: EvolutionConfig,
    pub featurize: FeaturizeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            genetic_code: DEFAULT_GENETIC_CODE,
            evolution: EvolutionConfig::default(),
            featurize: FeaturizeConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), FreqgenError> {
        GeneticCode::from_id(self.genetic_code)?;
        validate_section(&self.evolution)?;
        validate_section(&self.featurize)?;
        Ok(())
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), FreqgenError> {
    section.validate().map_err(|e| match e {
        FreqgenError::Configuration(msg) => {
            FreqgenError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Loads defaults, then `path` (TOML or JSON by extension) if given, then
    /// `FREQGEN__*` environment variables.
    pub fn load(&self, path: Option<&Path>) -> Result<(), FreqgenError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        *self.write_lock()? = config;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FreqgenError> {
        self.load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FreqgenError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| FreqgenError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| FreqgenError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), FreqgenError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.write_lock()? = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, FreqgenError> {
        self.config
            .write()
            .map_err(|_| FreqgenError::Configuration("Config lock poisoned".to_string()))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
