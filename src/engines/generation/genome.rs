use rand::Rng;

use crate::error::{FreqgenError, Result};
use crate::genetic_code::{Codon, GeneticCode};

/// Genome representation for the synonymous-codon search
///
/// A genome holds one gene per amino-acid position of the target protein. Each
/// gene is an index into that position's synonymous codon group, so any genome
/// of the right length expresses a DNA sequence that translates back to the
/// protein:
/// - **Crossover**: swapping gene ranges keeps every index inside its group
/// - **Mutation**: redrawing a gene only picks among synonyms
/// - **No invalid states**: there is no gene value meaning "some other amino acid"
///
/// Use [`ProteinTemplate::express`] to turn a genome into its phenotype.
///
/// # Example
///
/// ```
/// use freqgen::engines::generation::ProteinTemplate;
/// use freqgen::genetic_code::GeneticCode;
///
/// let template = ProteinTemplate::new("MK*", &GeneticCode::standard()).unwrap();
/// // M has one codon, K has AAA/AAG, * has TAA/TAG/TGA
/// assert_eq!(template.express_string(&vec![0, 1, 2]), "ATGAAGTGA");
/// ```
pub type Genome = Vec<u8>;

/// The target protein laid out as synonymous codon groups, one per position.
#[derive(Debug, Clone)]
pub struct ProteinTemplate {
    protein: String,
    groups: Vec<Vec<Codon>>,
    positions: Vec<usize>,
}

impl ProteinTemplate {
    /// Fails with `EmptyProtein` for an empty protein and `UnknownAminoAcid`
    /// for a symbol no codon of `code` encodes.
    pub fn new(protein: &str, code: &GeneticCode) -> Result<Self> {
        let protein: String = protein
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if protein.is_empty() {
            return Err(FreqgenError::EmptyProtein);
        }

        let mut groups: Vec<Vec<Codon>> = Vec::new();
        let mut group_of: [Option<usize>; 256] = [None; 256];
        let mut positions = Vec::with_capacity(protein.len());

        for (position, symbol) in protein.chars().enumerate() {
            if !symbol.is_ascii() {
                return Err(FreqgenError::UnknownAminoAcid { symbol, position });
            }
            let byte = symbol as u8;
            let group = match group_of[byte as usize] {
                Some(group) => group,
                None => {
                    let synonyms = code
                        .synonyms(byte)
                        .ok_or_else(|| FreqgenError::UnknownAminoAcid { symbol, position })?;
                    groups.push(synonyms.to_vec());
                    group_of[byte as usize] = Some(groups.len() - 1);
                    groups.len() - 1
                }
            };
            positions.push(group);
        }

        Ok(Self {
            protein,
            groups,
            positions,
        })
    }

    pub fn protein(&self) -> &str {
        &self.protein
    }

    /// Number of codon positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Length of every phenotype in nucleotides.
    pub fn phenotype_len(&self) -> usize {
        self.positions.len() * 3
    }

    /// Codons allowed at `position`.
    pub fn synonyms_at(&self, position: usize) -> &[Codon] {
        &self.groups[self.positions[position]]
    }

    pub fn choices_at(&self, position: usize) -> usize {
        self.synonyms_at(position).len()
    }

    /// A genome with an independent uniform synonym at every position.
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Genome {
        self.positions
            .iter()
            .map(|&group| rng.gen_range(0..self.groups[group].len()) as u8)
            .collect()
    }

    /// Concatenated codons of `genome`.
    pub fn express(&self, genome: &Genome) -> Vec<u8> {
        debug_assert_eq!(genome.len(), self.positions.len());
        let mut phenotype = Vec::with_capacity(self.phenotype_len());
        for (&group, &choice) in self.positions.iter().zip(genome) {
            phenotype.extend_from_slice(&self.groups[group][choice as usize]);
        }
        phenotype
    }

    pub fn express_string(&self, genome: &Genome) -> String {
        // Codons are built from NUCLEOTIDES only.
        self.express(genome).into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_template_rejects_empty_and_unknown() {
        let code = GeneticCode::standard();
        assert!(matches!(
            ProteinTemplate::new("", &code),
            Err(FreqgenError::EmptyProtein)
        ));
        assert!(matches!(
            ProteinTemplate::new("MXK", &code),
            Err(FreqgenError::UnknownAminoAcid { symbol: 'X', position: 1 })
        ));
    }

    #[test]
    fn test_random_genome_translates_back() {
        let code = GeneticCode::standard();
        let template = ProteinTemplate::new("mkLLSRW*", &code).unwrap();
        assert_eq!(template.protein(), "MKLLSRW*");
        assert_eq!(template.phenotype_len(), 24);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let genome = template.random_genome(&mut rng);
            let dna = template.express_string(&genome);
            assert_eq!(code.translate(&dna).unwrap(), "MKLLSRW*");
        }
    }

    #[test]
    fn test_groups_are_shared() {
        let template = ProteinTemplate::new("LKLK", &GeneticCode::standard()).unwrap();
        assert_eq!(template.groups.len(), 2);
        assert_eq!(template.choices_at(0), 6);
        assert_eq!(template.choices_at(3), 2);
    }
}
