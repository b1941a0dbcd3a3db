use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FreqgenError, Result};

/// Key under which codon usage is stored in a profile set.
pub const CODON_DOMAIN_KEY: &str = "codons";

/// What a frequency profile is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Overlapping windows of length k.
    KMer(usize),
    /// Non-overlapping triplets in frame 0.
    Codons,
}

impl Domain {
    /// Length of every key in a profile over this domain.
    pub fn key_len(&self) -> usize {
        match self {
            Domain::KMer(k) => *k,
            Domain::Codons => 3,
        }
    }

    /// Serialized form: the k value, or `codons`.
    pub fn as_key(&self) -> String {
        match self {
            Domain::KMer(k) => k.to_string(),
            Domain::Codons => CODON_DOMAIN_KEY.to_string(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::KMer(k) => write!(f, "{}-mers", k),
            Domain::Codons => write!(f, "codons"),
        }
    }
}

impl FromStr for Domain {
    type Err = FreqgenError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(CODON_DOMAIN_KEY) || s.eq_ignore_ascii_case("codon") {
            return Ok(Domain::Codons);
        }
        match s.parse::<usize>() {
            Ok(0) => Err(FreqgenError::InvalidK { k: 0, len: 0 }),
            Ok(k) => Ok(Domain::KMer(k)),
            Err(_) => Err(FreqgenError::InvalidProfile(format!(
                "unrecognized profile domain '{}'",
                s
            ))),
        }
    }
}

/// Normalized distribution over the keys of one [`Domain`].
///
/// Keys are stored upper-cased. A profile built with missing keys included is
/// dense over the 4-letter alphabet; one read from a file may be sparse, and
/// absent keys are read as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyProfile {
    domain: Domain,
    frequencies: BTreeMap<String, f64>,
}

impl FrequencyProfile {
    /// Builds a profile, checking key lengths and values against the domain.
    pub fn new(domain: Domain, frequencies: BTreeMap<String, f64>) -> Result<Self> {
        let key_len = domain.key_len();
        if key_len == 0 {
            return Err(FreqgenError::InvalidK { k: 0, len: 0 });
        }

        let mut normalized = BTreeMap::new();
        for (key, value) in frequencies {
            if key.len() != key_len {
                return Err(FreqgenError::InvalidProfile(format!(
                    "key '{}' does not belong to {}",
                    key, domain
                )));
            }
            if !value.is_finite() || value < 0.0 {
                return Err(FreqgenError::InvalidProfile(format!(
                    "frequency of '{}' must be a non-negative number, got {}",
                    key, value
                )));
            }
            *normalized.entry(key.to_ascii_uppercase()).or_insert(0.0) += value;
        }

        Ok(Self {
            domain,
            frequencies: normalized,
        })
    }

    pub(crate) fn from_parts(domain: Domain, frequencies: BTreeMap<String, f64>) -> Self {
        Self {
            domain,
            frequencies,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Frequency of `key`, 0.0 if unobserved.
    pub fn get(&self, key: &str) -> f64 {
        self.frequencies
            .get(&key.to_ascii_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.frequencies.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frequencies.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.frequencies
    }
}

/// Target profiles keyed by domain, at most one per domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSet {
    profiles: BTreeMap<Domain, FrequencyProfile>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile, replacing any previous one for the same domain.
    pub fn insert(&mut self, profile: FrequencyProfile) -> Option<FrequencyProfile> {
        self.profiles.insert(profile.domain(), profile)
    }

    pub fn get(&self, domain: Domain) -> Option<&FrequencyProfile> {
        self.profiles.get(&domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.profiles.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequencyProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Largest k among the k-mer targets, if any.
    pub fn max_k(&self) -> Option<usize> {
        self.profiles
            .keys()
            .filter_map(|d| match d {
                Domain::KMer(k) => Some(*k),
                Domain::Codons => None,
            })
            .max()
    }

    /// String-keyed form used for serialization.
    pub fn to_raw(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.profiles
            .iter()
            .map(|(domain, profile)| (domain.as_key(), profile.as_map().clone()))
            .collect()
    }

    pub fn from_raw(raw: BTreeMap<String, BTreeMap<String, f64>>) -> Result<Self> {
        let mut set = Self::new();
        for (key, frequencies) in raw {
            let domain: Domain = key.parse()?;
            set.insert(FrequencyProfile::new(domain, frequencies)?);
        }
        Ok(set)
    }
}

impl FromIterator<FrequencyProfile> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = FrequencyProfile>>(iter: I) -> Self {
        let mut set = Self::new();
        for profile in iter {
            set.insert(profile);
        }
        set
    }
}
