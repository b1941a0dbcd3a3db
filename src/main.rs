//! freqgen - design synthetic genes with a target sequence fingerprint
//!
//! ## Usage
//!
//! ```bash
//! freqgen featurize reference.fasta -k 1 -k 2 -c -o freqs.yaml
//! freqgen aa reference.fasta --mode freq -l 300 -o protein.fasta
//! freqgen generate -a protein.fasta -f freqs.yaml -v -o designed.fasta
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use freqgen::config::{AppConfig, ConfigManager};
use freqgen::data::{
    load_profiles, parse_fasta_file, profiles_to_string, read_single_record, save_profiles,
    write_fasta, write_fasta_file, FastaRecord, ProfileFormat,
};
use freqgen::engines::generation::{ConsoleProgressCallback, SequenceOptimizer, SilentProgress};
use freqgen::engines::profiling::{k_mer_frequencies, pooled_codon_frequencies, to_dna};
use freqgen::engines::sampling::{amino_acid_seq, residues_from_references};
use freqgen::genetic_code::{GeneticCode, STOP};
use freqgen::types::ProfileSet;

/// Residue source for the `aa` command
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AaMode {
    /// Sample residues from the reference residue frequencies
    Freq,
    /// Use the translated reference sequence itself
    Seq,
}

/// freqgen - generate DNA sequences matching a k-mer and codon usage profile
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML or JSON); FREQGEN__* variables override it
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Featurize a FASTA file
    Featurize {
        /// Reference sequences (FASTA)
        file: PathBuf,

        /// Values of k to featurize the sequences for. May be repeated.
        #[arg(short = 'k')]
        k: Vec<usize>,

        /// Include a codon frequency featurization
        #[arg(short = 'c', long = "codon-usage")]
        codon_usage: bool,

        /// Output file (.json for JSON, YAML otherwise). Prints YAML if omitted.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Generate an amino acid sequence from FASTA
    Aa {
        /// Reference sequences (FASTA)
        file: PathBuf,

        /// Whether to use the exact sequence or its residue frequencies
        #[arg(long = "mode", value_enum, default_value = "freq")]
        mode: AaMode,

        /// Genetic code (NCBI table ID, default 11)
        #[arg(short = 't', long = "trans-table")]
        trans_table: Option<u8>,

        /// Length of the generated sequence, excluding the stop codon (freq mode)
        #[arg(short = 'l', long = "length")]
        length: Option<usize>,

        /// Do not append a stop symbol
        #[arg(long = "no-stop")]
        no_stop: bool,

        /// Print the result even when writing to a file
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,

        /// Seed for residue sampling
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Output FASTA file
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Generate a new DNA sequence with matching features
    Generate {
        /// Target protein (FASTA, one record)
        #[arg(short = 'a', long = "aa-seq")]
        aa_seq: PathBuf,

        /// Target profiles written by `featurize`
        #[arg(short = 'f', long = "freqs")]
        freqs: PathBuf,

        /// Show optimization progress
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,

        /// Generations without improvement before stopping (default 50)
        #[arg(short = 'i')]
        patience: Option<usize>,

        /// Population size (default 100)
        #[arg(short = 'p')]
        population_size: Option<usize>,

        /// Mutation rate (default 0.3)
        #[arg(short = 'm')]
        mutation_rate: Option<f64>,

        /// Crossover rate (default 0.8)
        #[arg(short = 'c')]
        crossover_rate: Option<f64>,

        /// Genetic code (NCBI table ID, default 11)
        #[arg(short = 't', long = "trans-table")]
        trans_table: Option<u8>,

        /// Seed for a reproducible run
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Evaluate fitness on a single thread
        #[arg(long = "serial")]
        serial: bool,

        /// Output FASTA file
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<ConfigManager> {
    let manager = ConfigManager::new();
    manager
        .load(path)
        .context("Failed to load configuration")?;
    Ok(manager)
}

fn run_featurize(
    config: &AppConfig,
    file: &Path,
    k: Vec<usize>,
    codon_usage: bool,
    output: Option<&Path>,
) -> Result<()> {
    let k_values = if k.is_empty() {
        config.featurize.k_values.clone()
    } else {
        k
    };
    let codon_usage = codon_usage || config.featurize.codon_usage;
    if k_values.is_empty() && !codon_usage {
        anyhow::bail!("Nothing to featurize: pass -k and/or --codon-usage");
    }

    let sequences: Vec<String> = parse_fasta_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))?
        .into_iter()
        .map(|record| to_dna(&record.sequence))
        .collect();

    let mut profiles = ProfileSet::new();
    for k in k_values {
        profiles.insert(k_mer_frequencies(&sequences, k, true)?);
    }
    if codon_usage {
        profiles.insert(pooled_codon_frequencies(&sequences)?);
    }

    match output {
        Some(path) => {
            save_profiles(path, &profiles)?;
            log::info!("Wrote {} profiles to {}", profiles.len(), path.display());
        }
        None => print!("{}", profiles_to_string(&profiles, ProfileFormat::Yaml)?),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_aa(
    config: &AppConfig,
    file: &Path,
    mode: AaMode,
    trans_table: Option<u8>,
    length: Option<usize>,
    no_stop: bool,
    verbose: bool,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let code = GeneticCode::from_id(trans_table.unwrap_or(config.genetic_code))?;

    let mut aa_seq = match mode {
        AaMode::Seq => {
            let record = read_single_record(file)?;
            code.translate(&record.sequence)
                .context("Sequence is not able to be translated! Is it already an amino acid sequence?")?
                .replace(STOP as char, "")
        }
        AaMode::Freq => {
            let length = length.context("--length is required with --mode freq")?;
            let records: Vec<String> = parse_fasta_file(file)?
                .into_iter()
                .map(|record| record.sequence)
                .collect();
            let residues = residues_from_references(&records, &code);
            let frequencies = k_mer_frequencies(&[residues], 1, false)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            amino_acid_seq(length, &frequencies, &mut rng)?
        }
    };

    if !no_stop {
        aa_seq.push(STOP as char);
    }

    if let Some(path) = output {
        let record = FastaRecord {
            id: "generated".to_string(),
            description: format!("Generated by Freqgen from {}", file.display()),
            sequence: aa_seq.clone(),
        };
        write_fasta_file(path, &[record])?;
    }

    if verbose || output.is_none() {
        println!("{}", aa_seq);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    mut config: AppConfig,
    aa_seq: &Path,
    freqs: &Path,
    verbose: bool,
    patience: Option<usize>,
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    crossover_rate: Option<f64>,
    trans_table: Option<u8>,
    seed: Option<u64>,
    serial: bool,
    output: Option<&Path>,
) -> Result<()> {
    // Command-line flags take precedence over the loaded configuration
    let evolution = &mut config.evolution;
    if let Some(patience) = patience {
        evolution.patience = patience;
    }
    if let Some(population_size) = population_size {
        evolution.population_size = population_size;
    }
    if let Some(mutation_rate) = mutation_rate {
        evolution.mutation_rate = mutation_rate;
    }
    if let Some(crossover_rate) = crossover_rate {
        evolution.crossover_rate = crossover_rate;
    }
    if seed.is_some() {
        evolution.seed = seed;
    }
    if serial {
        evolution.parallel = false;
    }
    if let Some(trans_table) = trans_table {
        config.genetic_code = trans_table;
    }
    config.validate()?;

    let targets = load_profiles(freqs)
        .with_context(|| format!("Failed to load profiles from {}", freqs.display()))?;
    let protein = read_single_record(aa_seq)?.sequence;

    let code = GeneticCode::from_id(config.genetic_code)?;
    let mut optimizer = SequenceOptimizer::new(config.evolution, code, targets)?;
    let result = if verbose {
        optimizer.run(&protein, ConsoleProgressCallback)?
    } else {
        optimizer.run(&protein, SilentProgress)?
    };

    if verbose {
        eprintln!(
            "Best fitness {:.6} after {} generations",
            result.fitness, result.generations
        );
        println!("Optimized sequence: {}", result.sequence);
    }

    let record = FastaRecord {
        id: "optimized".to_string(),
        description: "Optimized by Freqgen".to_string(),
        sequence: result.sequence,
    };
    match output {
        Some(path) => write_fasta_file(path, &[record])?,
        None if !verbose => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_fasta(&mut handle, &[record])?;
            handle.flush()?;
        }
        None => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let manager = load_config(args.config.as_deref())?;
    let config = manager.get();

    match args.command {
        Command::Featurize {
            file,
            k,
            codon_usage,
            output,
        } => run_featurize(&config, &file, k, codon_usage, output.as_deref()),
        Command::Aa {
            file,
            mode,
            trans_table,
            length,
            no_stop,
            verbose,
            seed,
            output,
        } => run_aa(
            &config,
            &file,
            mode,
            trans_table,
            length,
            no_stop,
            verbose,
            seed,
            output.as_deref(),
        ),
        Command::Generate {
            aa_seq,
            freqs,
            verbose,
            patience,
            population_size,
            mutation_rate,
            crossover_rate,
            trans_table,
            seed,
            serial,
            output,
        } => run_generate(
            config,
            &aa_seq,
            &freqs,
            verbose,
            patience,
            population_size,
            mutation_rate,
            crossover_rate,
            trans_table,
            seed,
            serial,
            output.as_deref(),
        ),
    }
}
