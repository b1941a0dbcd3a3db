use crate::engines::generation::genome::{Genome, ProteinTemplate};
use rand::Rng;

/// Tournament selection: index of the lowest fitness among K random draws
pub fn tournament_selection<R: Rng>(fitness: &[f64], tournament_size: usize, rng: &mut R) -> usize {
    let mut best_idx = rng.gen_range(0..fitness.len());
    let mut best_fitness = fitness[best_idx];

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..fitness.len());
        if fitness[idx] < best_fitness {
            best_idx = idx;
            best_fitness = fitness[idx];
        }
    }

    best_idx
}

/// Roulette wheel selection: probability proportional to 1 / fitness
pub fn roulette_selection<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    const EPSILON: f64 = 1e-9;

    let weights: Vec<f64> = fitness
        .iter()
        .map(|f| if f.is_finite() { 1.0 / (f.max(0.0) + EPSILON) } else { 0.0 })
        .collect();
    let total_weight: f64 = weights.iter().sum();

    if total_weight <= 0.0 || !total_weight.is_finite() {
        return rng.gen_range(0..fitness.len());
    }

    let mut spin = rng.gen::<f64>() * total_weight;

    for (idx, weight) in weights.iter().enumerate() {
        spin -= weight;
        if spin <= 0.0 {
            return idx;
        }
    }

    // Fallback
    fitness.len() - 1
}

/// Single-point crossover: swap gene ranges after a codon boundary
pub fn crossover<R: Rng>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[point..len].copy_from_slice(&parent2[point..len]);
    child2[point..len].copy_from_slice(&parent1[point..len]);

    (child1, child2)
}

/// Mutation: redraw genes as a different synonym of the same amino acid
///
/// Positions whose amino acid has a single codon are never changed.
pub fn mutate<R: Rng>(genome: &mut Genome, template: &ProteinTemplate, mutation_rate: f64, rng: &mut R) {
    for (position, gene) in genome.iter_mut().enumerate() {
        let choices = template.choices_at(position);
        if choices < 2 || rng.gen::<f64>() >= mutation_rate {
            continue;
        }
        let mut replacement = rng.gen_range(0..choices - 1) as u8;
        if replacement >= *gene {
            replacement += 1;
        }
        *gene = replacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_code::GeneticCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tournament_prefers_lower_fitness() {
        let fitness = vec![5.0, 0.1, 3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(1);
        let mut wins = [0usize; 4];
        for _ in 0..2000 {
            wins[tournament_selection(&fitness, 3, &mut rng)] += 1;
        }
        assert!(wins[1] > wins[0]);
        assert!(wins[1] > wins[2]);
        assert!(wins[1] > wins[3]);
    }

    #[test]
    fn test_roulette_gives_everyone_a_chance() {
        let fitness = vec![0.5, 1.0, 2.0];
        let mut rng = StdRng::seed_from_u64(2);
        let mut wins = [0usize; 3];
        for _ in 0..3000 {
            wins[roulette_selection(&fitness, &mut rng)] += 1;
        }
        assert!(wins.iter().all(|&w| w > 0));
        assert!(wins[0] > wins[2]);
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let p1: Genome = vec![0, 0, 0, 0];
        let p2: Genome = vec![1, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(3);
        let (c1, c2) = crossover(&p1, &p2, &mut rng);
        let point = c1.iter().position(|&g| g == 1).unwrap();
        assert!(point >= 1 && point < 4);
        assert!(c1[point..].iter().all(|&g| g == 1));
        assert!(c2[..point].iter().all(|&g| g == 1));
        assert!(c2[point..].iter().all(|&g| g == 0));
    }

    #[test]
    fn test_mutation_changes_to_a_different_synonym() {
        let template = ProteinTemplate::new("LMK", &GeneticCode::standard()).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let mut genome: Genome = vec![2, 0, 1];
            mutate(&mut genome, &template, 1.0, &mut rng);
            assert_ne!(genome[0], 2);
            assert!((genome[0] as usize) < 6);
            assert_eq!(genome[1], 0);
            assert_eq!(genome[2], 0);
        }
    }

    #[test]
    fn test_offspring_still_encode_the_protein() {
        let code = GeneticCode::standard();
        let protein = "MLKSRW*";
        let template = ProteinTemplate::new(protein, &code).unwrap();
        let mut rng = StdRng::seed_from_u64(6);

        let mut population: Vec<Genome> = (0..8).map(|_| template.random_genome(&mut rng)).collect();
        for _ in 0..20 {
            let mut next = Vec::with_capacity(population.len());
            for pair in population.chunks(2) {
                let (mut c1, mut c2) = crossover(&pair[0], &pair[1], &mut rng);
                mutate(&mut c1, &template, 1.0, &mut rng);
                mutate(&mut c2, &template, 1.0, &mut rng);
                next.push(c1);
                next.push(c2);
            }
            for genome in &next {
                let dna = template.express_string(genome);
                assert_eq!(code.translate(&dna).unwrap(), protein);
            }
            population = next;
        }
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let template = ProteinTemplate::new("LLLL", &GeneticCode::standard()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome: Genome = vec![0, 1, 2, 3];
        mutate(&mut genome, &template, 0.0, &mut rng);
        assert_eq!(genome, vec![0, 1, 2, 3]);
    }
}
