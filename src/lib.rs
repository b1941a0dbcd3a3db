//! # freqgen
//!
//! Designs DNA sequences that encode a given protein while matching the
//! k-mer and codon usage "fingerprint" of a reference sequence set.
//!
//! - `genetic_code`: NCBI codon tables and synonymous codon groups
//! - `engines::profiling`: k-mer and codon frequency profiles, profile distance
//! - `engines::generation`: genetic algorithm over synonymous codon choices
//! - `engines::sampling`: random protein sequences from residue frequencies
//! - `data`: FASTA and profile-set file formats
//! - `config`: layered run configuration

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod genetic_code;
pub mod types;

pub use engines::generation::{generate, OptimizationResult, SequenceOptimizer};
pub use engines::profiling::{codon_frequencies, distance, k_mer_frequencies};
pub use engines::sampling::amino_acid_seq;
pub use error::{FreqgenError, Result};
pub use genetic_code::GeneticCode;
pub use types::{Domain, FrequencyProfile, ProfileSet};
