use thiserror::Error;

use crate::types::Domain;

#[derive(Error, Debug)]
pub enum FreqgenError {
    #[error("Unknown genetic code: {0}")]
    UnknownGeneticCode(u8),

    #[error("Invalid k: {k} (shortest sequence has length {len})")]
    InvalidK { k: usize, len: usize },

    #[error("Sequence length {0} is not divisible by 3")]
    Frame(usize),

    #[error("Target protein is empty")]
    EmptyProtein,

    #[error("Target k = {k} exceeds phenotype length {len}")]
    DomainMismatch { k: usize, len: usize },

    #[error("k = {k} exceeds the largest k the optimizer can encode ({max})")]
    UnsupportedK { k: usize, max: usize },

    #[error("No sequence to profile")]
    EmptySequence,

    #[error("Amino acid '{symbol}' at position {position} is not encoded by the genetic code")]
    UnknownAminoAcid { symbol: char, position: usize },

    #[error("Cannot compare profiles over {left} and {right}")]
    IncompatibleProfiles { left: Domain, right: Domain },

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, FreqgenError>;
