use super::traits::ConfigSection;
use crate::error::FreqgenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    /// Generations without a strict improvement before the run stops.
    pub patience: usize,
    pub selection_method: SelectionMethod,
    pub tournament_size: usize,
    pub seed: Option<u64>,
    /// Evaluate fitness on the rayon thread pool.
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    Tournament,
    Roulette,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.3,
            crossover_rate: 0.8,
            patience: 50,
            selection_method: SelectionMethod::Tournament,
            tournament_size: 3,
            seed: None,
            parallel: true,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), FreqgenError> {
        if self.population_size < 2 {
            return Err(FreqgenError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(FreqgenError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(FreqgenError::Configuration(
                "Crossover rate must be between 0 and 1".to_string()
            ));
        }
        if self.patience == 0 {
            return Err(FreqgenError::Configuration(
                "Patience must be at least 1 generation".to_string()
            ));
        }
        if self.selection_method == SelectionMethod::Tournament && self.tournament_size < 2 {
            return Err(FreqgenError::Configuration(
                "Tournament size must be at least 2".to_string()
            ));
        }
        Ok(())
    }
}
