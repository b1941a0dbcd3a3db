//! Genetic code tables and synonymous codon groups.
//!
//! This module provides:
//! - NCBI genetic code tables (1-6, 9-16, 21-33)
//! - Codon to amino acid translation
//! - For every amino acid (and the stop symbol `*`), the codons encoding it

use std::collections::BTreeMap;

use crate::error::{FreqgenError, Result};

/// Three nucleotides over `A`, `C`, `G`, `T`.
pub type Codon = [u8; 3];

/// Symbol used for stop codons.
pub const STOP: u8 = b'*';

/// Genetic code used when none is requested.
pub const DEFAULT_GENETIC_CODE: u8 = 11;

/// DNA alphabet in the order used for k-mer and codon indexing.
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

// NCBI tables list amino acids for codons ordered TTT, TTC, TTA, TTG, TCT, ...
// (bases in T, C, A, G order). Position i of NCBI_ORDER gives the index of that
// base in NUCLEOTIDES.
const NCBI_ORDER: [usize; 4] = [3, 1, 0, 2];

const NCBI_TABLES: &[(u8, &str, &str)] = &[
    (1, "Standard",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (2, "Vertebrate Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG"),
    (3, "Yeast Mitochondrial",
        "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (4, "Mold/Protozoan/Coelenterate Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (5, "Invertebrate Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG"),
    (6, "Ciliate/Dasycladacean/Hexamita Nuclear",
        "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (9, "Echinoderm/Flatworm Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (10, "Euplotid Nuclear",
        "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (11, "Bacterial/Archaeal/Plant Plastid",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (12, "Alternative Yeast Nuclear",
        "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (13, "Ascidian Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG"),
    (14, "Alternative Flatworm Mitochondrial",
        "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (15, "Blepharisma Macronuclear",
        "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (16, "Chlorophycean Mitochondrial",
        "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (21, "Trematode Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (22, "Scenedesmus obliquus Mitochondrial",
        "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (23, "Thraustochytrium Mitochondrial",
        "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (24, "Rhabdopleuridae Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
    (25, "Candidate Division SR1/Gracilibacteria",
        "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (26, "Pachysolen tannophilus Nuclear",
        "FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (27, "Karyorelict Nuclear",
        "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (28, "Condylostoma Nuclear",
        "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (29, "Mesodinium Nuclear",
        "FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (30, "Peritrich Nuclear",
        "FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (31, "Blastocrithidia Nuclear",
        "FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (32, "Balanophoraceae Plastid",
        "FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (33, "Cephalodiscidae Mitochondrial",
        "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
];

/// Index of a nucleotide in [`NUCLEOTIDES`]. Case-insensitive, `U` reads as `T`.
pub fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// Index of a codon in `[0, 64)`, ordered AAA, AAC, ..., TTT.
pub fn codon_index(codon: &[u8]) -> Option<usize> {
    if codon.len() != 3 {
        return None;
    }
    Some(base_index(codon[0])? * 16 + base_index(codon[1])? * 4 + base_index(codon[2])?)
}

pub fn index_to_codon(index: usize) -> Codon {
    [
        NUCLEOTIDES[(index >> 4) & 3],
        NUCLEOTIDES[(index >> 2) & 3],
        NUCLEOTIDES[index & 3],
    ]
}

/// IDs of every genetic code this crate knows, with their names.
pub fn available_codes() -> impl Iterator<Item = (u8, &'static str)> {
    NCBI_TABLES.iter().map(|(id, name, _)| (*id, *name))
}

/// A genetic code: the codon to amino acid map plus its synonymous groups.
///
/// Immutable after construction; safe to share between threads.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    id: u8,
    name: &'static str,
    amino_acids: [u8; 64],
    synonyms: BTreeMap<u8, Vec<Codon>>,
}

impl GeneticCode {
    /// Looks up an NCBI genetic code by ID.
    pub fn from_id(id: u8) -> Result<Self> {
        let (_, name, ncbieaa) = NCBI_TABLES
            .iter()
            .find(|(table_id, _, _)| *table_id == id)
            .ok_or(FreqgenError::UnknownGeneticCode(id))?;

        let symbols = ncbieaa.as_bytes();
        let mut amino_acids = [b'X'; 64];
        for (ncbi_idx, &aa) in symbols.iter().enumerate().take(64) {
            let index = NCBI_ORDER[ncbi_idx >> 4] * 16
                + NCBI_ORDER[(ncbi_idx >> 2) & 3] * 4
                + NCBI_ORDER[ncbi_idx & 3];
            amino_acids[index] = aa;
        }

        let mut synonyms: BTreeMap<u8, Vec<Codon>> = BTreeMap::new();
        for (index, &aa) in amino_acids.iter().enumerate() {
            synonyms.entry(aa).or_default().push(index_to_codon(index));
        }

        Ok(Self {
            id,
            name,
            amino_acids,
            synonyms,
        })
    }

    /// The standard code (NCBI table 1).
    pub fn standard() -> Self {
        Self::from_id(1).expect("table 1 is always present")
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Amino acid (or `*`) for a codon; `None` for anything but three unambiguous bases.
    pub fn translate_codon(&self, codon: &[u8]) -> Option<u8> {
        codon_index(codon).map(|idx| self.amino_acids[idx])
    }

    /// Codons encoding `amino_acid`, in AAA..TTT order. Case-insensitive.
    pub fn synonyms(&self, amino_acid: u8) -> Option<&[Codon]> {
        self.synonyms
            .get(&amino_acid.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Every symbol with at least one codon, including `*` when the code has stops.
    pub fn amino_acids(&self) -> impl Iterator<Item = u8> + '_ {
        self.synonyms.keys().copied()
    }

    /// Translates a DNA sequence in frame 0.
    ///
    /// Fails on a trailing partial codon or an ambiguous base.
    pub fn translate(&self, sequence: &str) -> Result<String> {
        let bytes = sequence.as_bytes();
        if bytes.len() % 3 != 0 {
            return Err(FreqgenError::Frame(bytes.len()));
        }

        bytes
            .chunks_exact(3)
            .enumerate()
            .map(|(i, codon)| {
                self.translate_codon(codon).map(char::from).ok_or_else(|| {
                    FreqgenError::Translation(format!(
                        "codon '{}' at position {} is not translatable",
                        String::from_utf8_lossy(codon),
                        i * 3
                    ))
                })
            })
            .collect()
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::from_id(DEFAULT_GENETIC_CODE).expect("default table is always present")
    }
}
