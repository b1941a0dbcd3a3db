//! Random amino-acid sequences drawn from residue frequencies.

pub mod amino_acid;

pub use amino_acid::{amino_acid_seq, residues_from_references};
