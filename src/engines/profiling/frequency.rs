use std::collections::{BTreeMap, HashMap};

use crate::error::{FreqgenError, Result};
use crate::genetic_code::{codon_index, index_to_codon, NUCLEOTIDES};
use crate::types::{Domain, FrequencyProfile, ProfileSet};

/// Uppercases a nucleotide sequence and reads `U` as `T`, so RNA references
/// profile over the same alphabet as designed DNA.
pub fn to_dna(sequence: &str) -> String {
    sequence
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'U' => 'T',
            other => other,
        })
        .collect()
}

/// Every k-mer over `A`, `C`, `G`, `T`, in lexicographic order.
pub fn enumerate_kmers(k: usize) -> Vec<String> {
    let mut kmers = vec![String::with_capacity(k)];
    for _ in 0..k {
        kmers = kmers
            .iter()
            .flat_map(|prefix| {
                NUCLEOTIDES.iter().map(move |&base| {
                    let mut next = prefix.clone();
                    next.push(base as char);
                    next
                })
            })
            .collect();
    }
    kmers
}

/// Frequencies of overlapping k-mers across `sequences`.
///
/// Windows never span two sequences; counts are pooled and divided by the
/// total number of windows. Matching is case-insensitive. With
/// `include_missing`, every one of the `4^k` DNA k-mers is present and
/// unobserved ones are 0.0.
pub fn k_mer_frequencies<S: AsRef<str>>(
    sequences: &[S],
    k: usize,
    include_missing: bool,
) -> Result<FrequencyProfile> {
    let shortest = sequences
        .iter()
        .map(|s| s.as_ref().len())
        .min()
        .ok_or(FreqgenError::EmptySequence)?;
    if k == 0 || k > shortest {
        return Err(FreqgenError::InvalidK { k, len: shortest });
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for sequence in sequences {
        let upper = sequence.as_ref().to_ascii_uppercase();
        for window in upper.as_bytes().windows(k) {
            *counts
                .entry(String::from_utf8_lossy(window).into_owned())
                .or_insert(0) += 1;
            total += 1;
        }
    }

    let mut frequencies: BTreeMap<String, f64> = counts
        .into_iter()
        .map(|(kmer, count)| (kmer, count as f64 / total as f64))
        .collect();

    if include_missing {
        for kmer in enumerate_kmers(k) {
            frequencies.entry(kmer).or_insert(0.0);
        }
    }

    Ok(FrequencyProfile::from_parts(Domain::KMer(k), frequencies))
}

/// Codon usage of a single in-frame coding sequence.
///
/// Always returns all 64 codons. Triplets containing an ambiguous base are
/// skipped and left out of the normalization.
pub fn codon_frequencies(sequence: &str) -> Result<FrequencyProfile> {
    let bytes = sequence.as_bytes();
    if bytes.is_empty() {
        return Err(FreqgenError::EmptySequence);
    }
    if bytes.len() % 3 != 0 {
        return Err(FreqgenError::Frame(bytes.len()));
    }

    let mut counts = [0usize; 64];
    let mut skipped = 0usize;
    for codon in bytes.chunks_exact(3) {
        match codon_index(codon) {
            Some(idx) => counts[idx] += 1,
            None => skipped += 1,
        }
    }

    let valid: usize = counts.iter().sum();
    if valid == 0 {
        return Err(FreqgenError::InvalidProfile(
            "sequence contains no unambiguous codon".to_string(),
        ));
    }
    if skipped > 0 {
        log::warn!("Skipped {} ambiguous codons out of {}", skipped, skipped + valid);
    }

    let frequencies = counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            let codon = index_to_codon(idx);
            (
                String::from_utf8_lossy(&codon).into_owned(),
                count as f64 / valid as f64,
            )
        })
        .collect();

    Ok(FrequencyProfile::from_parts(Domain::Codons, frequencies))
}

/// Codon usage pooled over several coding sequences.
///
/// Every sequence must be in frame on its own, so no codon straddles two records.
pub fn pooled_codon_frequencies<S: AsRef<str>>(sequences: &[S]) -> Result<FrequencyProfile> {
    for sequence in sequences {
        let len = sequence.as_ref().len();
        if len % 3 != 0 {
            return Err(FreqgenError::Frame(len));
        }
    }
    let joined: String = sequences.iter().map(|s| s.as_ref()).collect();
    codon_frequencies(&joined)
}

/// Profiles `sequence` over every domain present in `targets`.
pub fn profile_for_targets(sequence: &str, targets: &ProfileSet) -> Result<ProfileSet> {
    targets
        .domains()
        .map(|domain| match domain {
            Domain::KMer(k) => k_mer_frequencies(&[sequence], k, true),
            Domain::Codons => codon_frequencies(sequence),
        })
        .collect()
}
