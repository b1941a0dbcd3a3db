use crate::engines::generation::genome::Genome;

/// Best individual seen so far in a run.
#[derive(Clone, Debug)]
pub struct Champion {
    pub genome: Genome,
    pub fitness: f64,
    /// Generation in which this individual was first seen.
    pub generation: usize,
}

/// Keeps the run-wide champion and when it last improved.
///
/// The champion only ever changes to a strictly lower fitness, so the tracked
/// best fitness is non-increasing over a run.
#[derive(Debug, Default)]
pub struct ChampionTracker {
    best: Option<Champion>,
}

impl ChampionTracker {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Replaces the champion if `fitness` is strictly better. Returns whether it did.
    pub fn offer(&mut self, genome: &Genome, fitness: f64, generation: usize) -> bool {
        if fitness.is_nan() {
            return false;
        }
        let improved = match &self.best {
            Some(champion) => fitness < champion.fitness,
            None => true,
        };
        if improved {
            self.best = Some(Champion {
                genome: genome.clone(),
                fitness,
                generation,
            });
        }
        improved
    }

    pub fn best(&self) -> Option<&Champion> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Champion> {
        self.best
    }

    /// Best fitness so far, `f64::INFINITY` before anything was offered.
    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |c| c.fitness)
    }

    pub fn last_improvement(&self) -> usize {
        self.best.as_ref().map_or(0, |c| c.generation)
    }

    pub fn generations_since_improvement(&self, current_generation: usize) -> usize {
        current_generation.saturating_sub(self.last_improvement())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strict_improvement_replaces() {
        let mut tracker = ChampionTracker::new();
        assert_eq!(tracker.best_fitness(), f64::INFINITY);

        assert!(tracker.offer(&vec![0, 1], 2.0, 0));
        assert!(!tracker.offer(&vec![1, 1], 2.0, 1));
        assert!(!tracker.offer(&vec![1, 0], 3.0, 2));
        assert_eq!(tracker.best().unwrap().genome, vec![0, 1]);
        assert_eq!(tracker.last_improvement(), 0);

        assert!(tracker.offer(&vec![1, 0], 1.5, 3));
        assert_eq!(tracker.last_improvement(), 3);
        assert_eq!(tracker.generations_since_improvement(10), 7);
    }

    #[test]
    fn test_nan_is_ignored() {
        let mut tracker = ChampionTracker::new();
        assert!(!tracker.offer(&vec![0], f64::NAN, 0));
        assert!(tracker.best().is_none());
    }
}
