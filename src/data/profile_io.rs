//! Reading and writing profile sets.
//!
//! A profile set is stored as a two-level map: the outer key is the domain (a
//! k value, or `codons`), the inner map goes from k-mer or codon to frequency.
//!
//! ```yaml
//! 1:
//!   A: 0.25
//!   C: 0.25
//!   G: 0.25
//!   T: 0.25
//! codons:
//!   AAA: 0.0
//!   ...
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{FreqgenError, Result};
use crate::types::ProfileSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Yaml,
    Json,
}

impl ProfileFormat {
    /// JSON for a `.json` extension, YAML otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ProfileFormat::Json,
            _ => ProfileFormat::Yaml,
        }
    }
}

pub fn profiles_to_string(profiles: &ProfileSet, format: ProfileFormat) -> Result<String> {
    let raw = profiles.to_raw();
    match format {
        ProfileFormat::Yaml => Ok(serde_yaml::to_string(&raw)?),
        ProfileFormat::Json => Ok(serde_json::to_string_pretty(&raw)?),
    }
}

pub fn profiles_from_str(content: &str, format: ProfileFormat) -> Result<ProfileSet> {
    match format {
        ProfileFormat::Json => ProfileSet::from_raw(serde_json::from_str(content)?),
        ProfileFormat::Yaml => ProfileSet::from_raw(yaml_to_raw(content)?),
    }
}

/// YAML outer keys may be plain integers, which a string-keyed map rejects.
fn yaml_to_raw(content: &str) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
    let document: serde_yaml::Mapping = serde_yaml::from_str(content)?;
    let mut raw = BTreeMap::new();

    for (key, value) in document {
        let domain = match key {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            other => {
                return Err(FreqgenError::InvalidProfile(format!(
                    "unsupported profile key {:?}",
                    other
                )))
            }
        };
        let frequencies: BTreeMap<String, f64> = serde_yaml::from_value(value)?;
        raw.insert(domain, frequencies);
    }

    Ok(raw)
}

pub fn save_profiles<P: AsRef<Path>>(path: P, profiles: &ProfileSet) -> Result<()> {
    let content = profiles_to_string(profiles, ProfileFormat::from_path(&path))?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<ProfileSet> {
    let content = std::fs::read_to_string(&path)?;
    let profiles = profiles_from_str(&content, ProfileFormat::from_path(&path))?;
    if profiles.is_empty() {
        log::warn!("No profiles found in {}", path.as_ref().display());
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Domain;

    #[test]
    fn test_integer_keys_accepted() {
        let yaml = "1:\n  A: 0.5\n  T: 0.5\ncodons:\n  ATG: 1\n";
        let set = profiles_from_str(yaml, ProfileFormat::Yaml).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(Domain::KMer(1)).unwrap().get("A"), 0.5);
        assert_eq!(set.get(Domain::Codons).unwrap().get("ATG"), 1.0);
    }

    #[test]
    fn test_bad_keys_rejected() {
        let yaml = "2:\n  A: 1.0\n";
        assert!(matches!(
            profiles_from_str(yaml, ProfileFormat::Yaml),
            Err(FreqgenError::InvalidProfile(_))
        ));
        let json = r#"{"kmers": {"A": 1.0}}"#;
        assert!(profiles_from_str(json, ProfileFormat::Json).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ProfileFormat::from_path("a/b.JSON"), ProfileFormat::Json);
        assert_eq!(ProfileFormat::from_path("freqs.yaml"), ProfileFormat::Yaml);
        assert_eq!(ProfileFormat::from_path("freqs"), ProfileFormat::Yaml);
    }
}
