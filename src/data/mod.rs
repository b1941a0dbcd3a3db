pub mod fasta;
pub mod profile_io;

pub use fasta::{parse_fasta, parse_fasta_file, read_single_record, write_fasta, write_fasta_file, FastaRecord};
pub use profile_io::{load_profiles, profiles_from_str, profiles_to_string, save_profiles, ProfileFormat};
