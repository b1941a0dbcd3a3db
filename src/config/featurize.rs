use super::traits::ConfigSection;
use crate::error::FreqgenError;
use serde::{Deserialize, Serialize};

/// Which profiles `featurize` computes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizeConfig {
    pub k_values: Vec<usize>,
    pub codon_usage: bool,
}

impl ConfigSection for FeaturizeConfig {
    fn section_name() -> &'static str {
        "featurize"
    }

    fn validate(&self) -> Result<(), FreqgenError> {
        if let Some(&k) = self.k_values.iter().find(|&&k| k == 0) {
            return Err(FreqgenError::Configuration(format!(
                "k values must be positive, got {}",
                k
            )));
        }
        Ok(())
    }
}
