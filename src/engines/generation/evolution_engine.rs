use crate::config::evolution::{EvolutionConfig, SelectionMethod};
use crate::config::traits::ConfigSection;
use crate::engines::generation::{
    champion::ChampionTracker,
    fitness::ProfileObjective,
    genome::{Genome, ProteinTemplate},
    operators::{crossover, mutate, roulette_selection, tournament_selection},
    progress::ProgressCallback,
};
use crate::error::{FreqgenError, Result};
use crate::genetic_code::GeneticCode;
use crate::types::ProfileSet;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Phenotype of the champion; translates to the target protein.
    pub sequence: String,
    pub fitness: f64,
    /// Number of generations evaluated.
    pub generations: usize,
    /// Generation in which the champion was found.
    pub last_improvement: usize,
    pub cancelled: bool,
}

/// Genetic algorithm over synonymous codon choices.
///
/// Holds the run-invariant inputs: hyperparameters, genetic code and target
/// profiles. Each [`run`](Self::run) designs a sequence for one protein.
pub struct SequenceOptimizer {
    config: EvolutionConfig,
    code: GeneticCode,
    targets: ProfileSet,
    rng: StdRng,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl SequenceOptimizer {
    pub fn new(config: EvolutionConfig, code: GeneticCode, targets: ProfileSet) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            code,
            targets,
            rng,
            cancel_flag: None,
        })
    }

    /// Stops the run at the next generation boundary once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn genetic_code(&self) -> &GeneticCode {
        &self.code
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        protein: &str,
        mut callback: C,
    ) -> Result<OptimizationResult> {
        let template = ProteinTemplate::new(protein, &self.code)?;
        let objective = ProfileObjective::compile(&self.targets, template.phenotype_len())?;
        if objective.is_empty() {
            log::warn!("No target profiles given; every sequence scores 0");
        }

        log::info!(
            "Optimizing {} codons under genetic code {} against {} target profile(s)",
            template.len(),
            self.code.id(),
            self.targets.len()
        );

        // Initialize population
        let mut population = self.initialize_population(&template);
        let mut champion = ChampionTracker::new();
        let mut generation = 0;
        let mut cancelled = false;

        // Evolution loop
        loop {
            callback.on_generation_start(generation);

            let fitness = self.evaluate_population(&population, &template, &objective);

            for (genome, &score) in population.iter().zip(&fitness) {
                if champion.offer(genome, score, generation) {
                    log::debug!("Generation {}: new best fitness {:.6}", generation, score);
                }
            }

            callback.on_generation_complete(generation, champion.best_fitness());

            // Check termination
            if champion.generations_since_improvement(generation) >= self.config.patience {
                break;
            }
            if self.is_cancelled() {
                log::info!("Cancelled after generation {}", generation);
                cancelled = true;
                break;
            }

            population = self.create_next_generation(&population, &fitness, &template, &champion);
            generation += 1;
        }

        let best = champion.into_best().ok_or_else(|| {
            FreqgenError::InvalidProfile("fitness evaluation produced no comparable value".to_string())
        })?;

        log::info!(
            "Finished after {} generations; best fitness {:.6} found in generation {}",
            generation + 1,
            best.fitness,
            best.generation
        );

        Ok(OptimizationResult {
            sequence: template.express_string(&best.genome),
            fitness: best.fitness,
            generations: generation + 1,
            last_improvement: best.generation,
            cancelled,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn initialize_population(&mut self, template: &ProteinTemplate) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| template.random_genome(&mut self.rng))
            .collect()
    }

    fn evaluate_population(
        &self,
        population: &[Genome],
        template: &ProteinTemplate,
        objective: &ProfileObjective,
    ) -> Vec<f64> {
        let score = |genome: &Genome| objective.evaluate(&template.express(genome));

        if self.config.parallel {
            population.par_iter().map(score).collect()
        } else {
            population.iter().map(score).collect()
        }
    }

    fn select_parent(&mut self, fitness: &[f64]) -> usize {
        match self.config.selection_method {
            SelectionMethod::Tournament => {
                tournament_selection(fitness, self.config.tournament_size, &mut self.rng)
            }
            SelectionMethod::Roulette => roulette_selection(fitness, &mut self.rng),
        }
    }

    fn create_next_generation(
        &mut self,
        population: &[Genome],
        fitness: &[f64],
        template: &ProteinTemplate,
        champion: &ChampionTracker,
    ) -> Vec<Genome> {
        let mut next_generation = Vec::with_capacity(self.config.population_size);

        // Elitism: the champion survives unchanged
        if let Some(best) = champion.best() {
            next_generation.push(best.genome.clone());
        }

        // Generate offspring
        while next_generation.len() < self.config.population_size {
            let parent1 = self.select_parent(fitness);
            let parent2 = self.select_parent(fitness);

            let (mut child1, mut child2) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                crossover(&population[parent1], &population[parent2], &mut self.rng)
            } else {
                (population[parent1].clone(), population[parent2].clone())
            };

            mutate(&mut child1, template, self.config.mutation_rate, &mut self.rng);
            mutate(&mut child2, template, self.config.mutation_rate, &mut self.rng);

            next_generation.push(child1);
            if next_generation.len() < self.config.population_size {
                next_generation.push(child2);
            }
        }

        next_generation
    }
}

/// Designs a DNA sequence encoding `protein` whose profiles approach `targets`.
///
/// Convenience wrapper that looks up the genetic code by ID and returns only
/// the sequence.
pub fn generate<C: ProgressCallback>(
    targets: ProfileSet,
    protein: &str,
    genetic_code: u8,
    config: EvolutionConfig,
    callback: C,
) -> Result<String> {
    let code = GeneticCode::from_id(genetic_code)?;
    let mut optimizer = SequenceOptimizer::new(config, code, targets)?;
    Ok(optimizer.run(protein, callback)?.sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgress;
    use crate::engines::profiling::k_mer_frequencies;

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 20,
            patience: 5,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut targets = ProfileSet::new();
        targets.insert(k_mer_frequencies(&["ATGCCCGGGAAATTT"], 2, true).unwrap());

        let run = |parallel: bool| {
            let config = EvolutionConfig { parallel, ..small_config(11) };
            let mut optimizer =
                SequenceOptimizer::new(config, GeneticCode::standard(), targets.clone()).unwrap();
            optimizer.run("MPGKF", SilentProgress).unwrap()
        };

        let serial = run(false);
        let parallel = run(true);
        assert_eq!(serial.sequence, parallel.sequence);
        assert_eq!(serial.generations, parallel.generations);
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let config = EvolutionConfig { population_size: 0, ..Default::default() };
        assert!(matches!(
            SequenceOptimizer::new(config, GeneticCode::standard(), ProfileSet::new()),
            Err(FreqgenError::Configuration(_))
        ));
    }

    #[test]
    fn test_cancel_flag_stops_after_first_generation() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut targets = ProfileSet::new();
        targets.insert(k_mer_frequencies(&["ACGT"], 1, true).unwrap());
        let mut optimizer = SequenceOptimizer::new(small_config(3), GeneticCode::standard(), targets)
            .unwrap()
            .with_cancel_flag(flag);

        let result = optimizer.run("MKLV", SilentProgress).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 1);
        assert_eq!(GeneticCode::standard().translate(&result.sequence).unwrap(), "MKLV");
    }
}
