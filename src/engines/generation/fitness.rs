//! Target profiles compiled for fast scoring of phenotypes.
//!
//! Phenotypes only ever contain `A`, `C`, `G`, `T`, so k-mers are packed into
//! `u64` (two bits per base) instead of being hashed as strings.

use std::collections::HashMap;

use crate::error::{FreqgenError, Result};
use crate::types::{Domain, FrequencyProfile, ProfileSet};

/// Largest k that fits two bits per base in a `u64`.
pub const MAX_ENCODED_K: usize = 31;

#[derive(Debug, Clone)]
enum CompiledTarget {
    KMer {
        k: usize,
        weights: HashMap<u64, f64>,
        /// Sum of squares of every target frequency.
        norm: f64,
    },
    Codons {
        target: [f64; 64],
        /// Squared mass on keys no phenotype can contain.
        unreachable: f64,
    },
}

/// Sum of profile distances between a phenotype and a fixed set of targets.
#[derive(Debug, Clone)]
pub struct ProfileObjective {
    targets: Vec<CompiledTarget>,
}

impl ProfileObjective {
    /// Compiles `targets` for phenotypes of `phenotype_len` nucleotides.
    ///
    /// Fails with `DomainMismatch` when a target k is longer than the phenotype.
    pub fn compile(targets: &ProfileSet, phenotype_len: usize) -> Result<Self> {
        let compiled = targets
            .iter()
            .map(|profile| match profile.domain() {
                Domain::KMer(k) => compile_kmer(profile, k, phenotype_len),
                Domain::Codons => Ok(compile_codons(profile)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { targets: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Fitness of a phenotype; lower is better, 0.0 is a perfect match.
    pub fn evaluate(&self, phenotype: &[u8]) -> f64 {
        self.targets
            .iter()
            .map(|target| match target {
                CompiledTarget::KMer { k, weights, norm } => {
                    kmer_distance(phenotype, *k, weights, *norm)
                }
                CompiledTarget::Codons {
                    target,
                    unreachable,
                } => codon_distance(phenotype, target, *unreachable),
            })
            .sum()
    }
}

/// Two-bit code of a phenotype base. Phenotypes are uppercase DNA, so any
/// other symbol in a target key (`U`, `N`, ...) can never be observed.
fn phenotype_base(base: u8) -> Option<u64> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

fn encode_kmer(kmer: &[u8]) -> Option<u64> {
    kmer.iter()
        .try_fold(0u64, |code, &base| Some((code << 2) | phenotype_base(base)?))
}

fn compile_kmer(profile: &FrequencyProfile, k: usize, phenotype_len: usize) -> Result<CompiledTarget> {
    if k > phenotype_len {
        return Err(FreqgenError::DomainMismatch {
            k,
            len: phenotype_len,
        });
    }
    if k > MAX_ENCODED_K {
        return Err(FreqgenError::UnsupportedK {
            k,
            max: MAX_ENCODED_K,
        });
    }

    let mut weights = HashMap::new();
    let mut norm = 0.0;
    for (kmer, frequency) in profile.iter() {
        norm += frequency * frequency;
        if frequency > 0.0 {
            if let Some(code) = encode_kmer(kmer.as_bytes()) {
                *weights.entry(code).or_insert(0.0) += frequency;
            }
        }
    }

    Ok(CompiledTarget::KMer { k, weights, norm })
}

fn compile_codons(profile: &FrequencyProfile) -> CompiledTarget {
    let mut target = [0.0; 64];
    let mut unreachable = 0.0;
    for (codon, frequency) in profile.iter() {
        match encode_kmer(codon.as_bytes()) {
            Some(idx) => target[idx as usize] += frequency,
            None => unreachable += frequency * frequency,
        }
    }
    CompiledTarget::Codons {
        target,
        unreachable,
    }
}

/// `Σ (f - t)²` expanded as `Σt² + Σ_observed (f² - 2ft)`, so only k-mers
/// present in the phenotype are visited.
fn kmer_distance(phenotype: &[u8], k: usize, weights: &HashMap<u64, f64>, norm: f64) -> f64 {
    if phenotype.len() < k {
        return norm;
    }
    let mask = if k >= 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };

    let mut codes = Vec::with_capacity(phenotype.len() + 1 - k);
    let mut code = 0u64;
    for (i, &base) in phenotype.iter().enumerate() {
        let bits = phenotype_base(base).unwrap_or(0);
        code = ((code << 2) | bits) & mask;
        if i + 1 >= k {
            codes.push(code);
        }
    }
    codes.sort_unstable();

    let total = codes.len() as f64;
    let mut sum = norm;
    for run in codes.chunk_by(|a, b| a == b) {
        let f = run.len() as f64 / total;
        let t = weights.get(&run[0]).copied().unwrap_or(0.0);
        sum += f * f - 2.0 * f * t;
    }
    sum.max(0.0)
}

fn codon_distance(phenotype: &[u8], target: &[f64; 64], unreachable: f64) -> f64 {
    let mut counts = [0usize; 64];
    let mut total = 0usize;
    for codon in phenotype.chunks_exact(3) {
        if let Some(idx) = encode_kmer(codon) {
            counts[idx as usize] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return target.iter().map(|t| t * t).sum::<f64>() + unreachable;
    }

    counts
        .iter()
        .zip(target)
        .map(|(&count, &t)| {
            let diff = count as f64 / total as f64 - t;
            diff * diff
        })
        .sum::<f64>()
        + unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::profiling::{combined_distance, k_mer_frequencies};
    use std::collections::BTreeMap;

    fn targets_from(reference: &str, ks: &[usize], codons: bool) -> ProfileSet {
        let mut set = ProfileSet::new();
        for &k in ks {
            set.insert(k_mer_frequencies(&[reference], k, true).unwrap());
        }
        if codons {
            set.insert(crate::engines::profiling::codon_frequencies(reference).unwrap());
        }
        set
    }

    #[test]
    fn test_matches_reference_distance() {
        let targets = targets_from("ATGGCTGCAAAGTTTTAA", &[1, 2, 3], true);
        let objective = ProfileObjective::compile(&targets, 18).unwrap();
        for candidate in ["ATGGCAGCGAAATTCTGA", "ATGGCTGCAAAGTTTTAA", "ATGGCCGCCAAGTTCTAG"] {
            let fast = objective.evaluate(candidate.as_bytes());
            let slow = combined_distance(candidate, &targets).unwrap();
            assert!((fast - slow).abs() < 1e-12, "{}: {} vs {}", candidate, fast, slow);
        }
    }

    #[test]
    fn test_identical_sequence_scores_zero() {
        let reference = "ATGAAACCCGGGTTTTAA";
        let targets = targets_from(reference, &[2], true);
        let objective = ProfileObjective::compile(&targets, reference.len()).unwrap();
        assert!(objective.evaluate(reference.as_bytes()) < 1e-12);
    }

    #[test]
    fn test_k_longer_than_phenotype() {
        let targets = targets_from("ATGAAATAA", &[7], false);
        assert!(matches!(
            ProfileObjective::compile(&targets, 6),
            Err(FreqgenError::DomainMismatch { k: 7, len: 6 })
        ));
    }

    #[test]
    fn test_sparse_target_with_ambiguous_keys() {
        let mut map = BTreeMap::new();
        map.insert("A".to_string(), 0.5);
        map.insert("N".to_string(), 0.5);
        let mut targets = ProfileSet::new();
        targets.insert(FrequencyProfile::new(Domain::KMer(1), map).unwrap());

        let objective = ProfileObjective::compile(&targets, 3).unwrap();
        // AAA: (1 - 0.5)^2 + 0.5^2
        assert!((objective.evaluate(b"AAA") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rna_keys_are_unreachable() {
        let mut kmers = BTreeMap::new();
        kmers.insert("A".to_string(), 0.5);
        kmers.insert("U".to_string(), 0.5);
        let mut codons = BTreeMap::new();
        codons.insert("AUG".to_string(), 0.5);
        codons.insert("ATG".to_string(), 0.5);

        let mut targets = ProfileSet::new();
        targets.insert(FrequencyProfile::new(Domain::KMer(1), kmers).unwrap());
        let objective = ProfileObjective::compile(&targets, 3).unwrap();
        let slow = combined_distance("ATT", &targets).unwrap();
        assert!((objective.evaluate(b"ATT") - slow).abs() < 1e-12);
        // (1/3 - 1/2)^2 + (2/3)^2 + (1/2)^2
        assert!((slow - 13.0 / 18.0).abs() < 1e-12);

        targets.insert(FrequencyProfile::new(Domain::Codons, codons).unwrap());
        let objective = ProfileObjective::compile(&targets, 6).unwrap();
        for candidate in ["ATGATG", "ATTCTG"] {
            let fast = objective.evaluate(candidate.as_bytes());
            let slow = combined_distance(candidate, &targets).unwrap();
            assert!((fast - slow).abs() < 1e-12, "{}: {} vs {}", candidate, fast, slow);
        }
    }

    #[test]
    fn test_k_beyond_encoding_limit() {
        let mut map = BTreeMap::new();
        map.insert("A".repeat(32), 1.0);
        let mut targets = ProfileSet::new();
        targets.insert(FrequencyProfile::new(Domain::KMer(32), map).unwrap());
        assert!(matches!(
            ProfileObjective::compile(&targets, 99),
            Err(FreqgenError::UnsupportedK { k: 32, max: MAX_ENCODED_K })
        ));
    }
}
