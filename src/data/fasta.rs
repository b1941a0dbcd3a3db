//! FASTA reading and writing.
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FreqgenError, Result};

/// Residues per line when writing.
pub const LINE_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            sequence: sequence.into(),
        }
    }
}

/// Parses FASTA content from a reader.
///
/// Handles single-line and multi-line sequences; blank lines are skipped and
/// whitespace inside sequence lines is dropped.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }

            let mut parts = header.splitn(2, char::is_whitespace);
            let id = parts.next().unwrap_or_default().to_string();
            if id.is_empty() {
                return Err(FreqgenError::Fasta(format!(
                    "Empty sequence identifier at line {}",
                    line_idx + 1
                )));
            }
            current = Some(FastaRecord {
                id,
                description: parts.next().unwrap_or_default().trim().to_string(),
                sequence: String::new(),
            });
        } else {
            let record = current.as_mut().ok_or_else(|| {
                FreqgenError::Fasta(format!("Sequence without header at line {}", line_idx + 1))
            })?;
            record
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    if records.is_empty() {
        return Err(FreqgenError::Fasta("Empty FASTA file".to_string()));
    }

    Ok(records)
}

pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

/// Reads a file expected to hold exactly one record.
pub fn read_single_record<P: AsRef<Path>>(path: P) -> Result<FastaRecord> {
    let mut records = parse_fasta_file(&path)?;
    if records.len() != 1 {
        return Err(FreqgenError::Fasta(format!(
            "Expected one record in {}, found {}",
            path.as_ref().display(),
            records.len()
        )));
    }
    Ok(records.remove(0))
}

pub fn write_fasta<W: Write>(mut writer: W, records: &[FastaRecord]) -> Result<()> {
    for record in records {
        if record.description.is_empty() {
            writeln!(writer, ">{}", record.id)?;
        } else {
            writeln!(writer, ">{} {}", record.id, record.description)?;
        }
        for chunk in record.sequence.as_bytes().chunks(LINE_WIDTH) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_fasta_file<P: AsRef<Path>>(path: P, records: &[FastaRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_fasta(BufWriter::new(file), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_multiline() {
        let input = ">seq1 first one\nACGT\nAC GT\n\n>seq2\nTTTT\n";
        let records = parse_fasta(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "seq1");
        assert_eq!(records[0].description, "first one");
        assert_eq!(records[0].sequence, "ACGTACGT");
        assert_eq!(records[1].sequence, "TTTT");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_fasta(Cursor::new("ACGT\n")).is_err());
        assert!(parse_fasta(Cursor::new(">\nACGT\n")).is_err());
        assert!(parse_fasta(Cursor::new("\n\n")).is_err());
    }

    #[test]
    fn test_write_wraps_lines() {
        let record = FastaRecord::new("long", "A".repeat(130));
        let mut out = Vec::new();
        write_fasta(&mut out, &[record]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let expected = vec![">long".to_string(), "A".repeat(60), "A".repeat(60), "A".repeat(10)];
        assert_eq!(lines, expected);
    }
}
