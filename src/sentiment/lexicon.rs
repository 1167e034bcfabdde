//! # Valence lexicon
//!
//! Word → valence mapping on the VADER scale (about -4 to +4), read from a
//! `vader_lexicon.txt`-format file.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::ScoringError;

/// Word → valence lookup used by the analyzer.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Build a lexicon from explicit entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let valences = entries
            .into_iter()
            .map(|(w, v)| (w.as_ref().to_lowercase(), v))
            .collect();
        Lexicon { valences }
    }

    /// Read a `vader_lexicon.txt`-style file: `token<TAB>mean<TAB>...`.
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let file = std::fs::File::open(path).map_err(|e| ScoringError::Lexicon {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|reason| ScoringError::Lexicon {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse lexicon lines; the error is a human-readable reason.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut valences = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("line {}: {e}", line_no + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default();
            let mean = fields
                .next()
                .ok_or_else(|| format!("line {}: missing valence", line_no + 1))?;
            let valence: f64 = mean
                .trim()
                .parse()
                .map_err(|_| format!("line {}: '{mean}' is not a number", line_no + 1))?;
            valences.insert(token.to_lowercase(), valence);
        }
        if valences.is_empty() {
            return Err("no entries".to_string());
        }
        Ok(Lexicon { valences })
    }

    /// Valence of a lower-cased token.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.valences.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}
