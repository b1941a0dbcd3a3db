use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{FreqgenError, Result};
use crate::genetic_code::{GeneticCode, STOP};
use crate::types::{Domain, FrequencyProfile};

/// Draws `length` residues independently from a single-residue profile.
///
/// Stop symbols in the profile are ignored.
pub fn amino_acid_seq<R: Rng>(
    length: usize,
    frequencies: &FrequencyProfile,
    rng: &mut R,
) -> Result<String> {
    if frequencies.domain() != Domain::KMer(1) {
        return Err(FreqgenError::InvalidProfile(format!(
            "residue sampling needs a 1-mer profile, got {}",
            frequencies.domain()
        )));
    }

    let (symbols, weights): (Vec<char>, Vec<f64>) = frequencies
        .iter()
        .filter_map(|(key, weight)| {
            let symbol = key.chars().next()?;
            (symbol != STOP as char && weight > 0.0).then_some((symbol, weight))
        })
        .unzip();

    let distribution = WeightedIndex::new(&weights).map_err(|e| {
        FreqgenError::InvalidProfile(format!("cannot sample from residue frequencies: {}", e))
    })?;

    Ok((0..length).map(|_| symbols[distribution.sample(rng)]).collect())
}

/// Residues of a set of reference records, concatenated with stops removed.
///
/// Records that translate cleanly under `code` are treated as coding DNA;
/// anything else is taken to be protein already.
pub fn residues_from_references<S: AsRef<str>>(records: &[S], code: &GeneticCode) -> String {
    records
        .iter()
        .map(|record| {
            let record = record.as_ref();
            code.translate(record).unwrap_or_else(|_| {
                log::debug!("Reference record of length {} read as protein", record.len());
                record.to_ascii_uppercase()
            })
        })
        .collect::<String>()
        .replace(STOP as char, "")
}
