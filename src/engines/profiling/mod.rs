//! Frequency profiles of sequences and the distance between them.

pub mod distance;
pub mod frequency;

pub use distance::{combined_distance, distance};
pub use frequency::{
    codon_frequencies, enumerate_kmers, k_mer_frequencies, pooled_codon_frequencies,
    profile_for_targets, to_dna,
};
