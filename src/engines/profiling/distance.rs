use std::cmp::Ordering;

use crate::error::{FreqgenError, Result};
use crate::types::{FrequencyProfile, ProfileSet};

use super::frequency::profile_for_targets;

/// Sum of squared differences between two profiles over the same domain.
///
/// Keys missing from one side count as 0.0, so a sparse profile compares
/// correctly against a dense one. Keys are visited in sorted order, which
/// makes the result identical for either argument order.
pub fn distance(a: &FrequencyProfile, b: &FrequencyProfile) -> Result<f64> {
    if a.domain() != b.domain() {
        return Err(FreqgenError::IncompatibleProfiles {
            left: a.domain(),
            right: b.domain(),
        });
    }

    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();
    let mut sum = 0.0;

    loop {
        let diff = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(&(_, x)), None) => {
                left.next();
                x
            }
            (None, Some(&(_, y))) => {
                right.next();
                y
            }
            (Some(&(ka, x)), Some(&(kb, y))) => match ka.cmp(kb) {
                Ordering::Less => {
                    left.next();
                    x
                }
                Ordering::Greater => {
                    right.next();
                    y
                }
                Ordering::Equal => {
                    left.next();
                    right.next();
                    x - y
                }
            },
        };
        sum += diff * diff;
    }

    Ok(sum)
}

/// Unweighted sum of [`distance`] over every target domain.
pub fn combined_distance(sequence: &str, targets: &ProfileSet) -> Result<f64> {
    let observed = profile_for_targets(sequence, targets)?;
    targets
        .iter()
        .map(|target| {
            let own = observed
                .get(target.domain())
                .ok_or(FreqgenError::IncompatibleProfiles {
                    left: target.domain(),
                    right: target.domain(),
                })?;
            distance(own, target)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::profiling::{codon_frequencies, k_mer_frequencies};
    use crate::types::Domain;
    use std::collections::BTreeMap;

    fn profile(domain: Domain, entries: &[(&str, f64)]) -> FrequencyProfile {
        let map: BTreeMap<String, f64> = entries.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        FrequencyProfile::new(domain, map).unwrap()
    }

    #[test]
    fn test_self_distance_is_zero() {
        let p = k_mer_frequencies(&["ACGTTGCA"], 2, true).unwrap();
        assert_eq!(distance(&p, &p).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = k_mer_frequencies(&["AAAACGT"], 2, true).unwrap();
        let b = profile(Domain::KMer(2), &[("AA", 0.3), ("GT", 0.7)]);
        assert_eq!(distance(&a, &b).unwrap(), distance(&b, &a).unwrap());
    }

    #[test]
    fn test_sparse_matches_dense() {
        let dense = k_mer_frequencies(&["ACGT"], 1, true).unwrap();
        let sparse = k_mer_frequencies(&["ACGT"], 1, false).unwrap();
        assert_eq!(distance(&dense, &sparse).unwrap(), 0.0);

        let only_a = profile(Domain::KMer(1), &[("A", 1.0)]);
        // (0.25 - 1)^2 + 3 * 0.25^2
        assert!((distance(&dense, &only_a).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_domain_mismatch() {
        let kmers = k_mer_frequencies(&["ACG"], 3, true).unwrap();
        let codons = codon_frequencies("ACG").unwrap();
        assert!(matches!(
            distance(&kmers, &codons),
            Err(FreqgenError::IncompatibleProfiles { .. })
        ));
    }
}
