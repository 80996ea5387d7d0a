//! Genome text files.
//!
//! One arena row per line. Surrounding whitespace is trimmed and blank
//! lines are skipped; every remaining row must have the same length and
//! contain only alphabet symbols.

use crate::error::{IoError, Result};
use mycora_data::{is_valid_symbol, Extent};
use std::path::Path;

/// A parsed, rectangular genome ready for [`mycora_core::Simulation::seed_genome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    rows: Vec<Vec<char>>,
}

impl Genome {
    #[must_use]
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        let width = self.rows.first().map_or(0, Vec::len);
        Extent::new(
            u16::try_from(width).unwrap_or(u16::MAX),
            u16::try_from(self.rows.len()).unwrap_or(u16::MAX),
        )
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<char>> {
        self.rows
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.iter().collect::<String>())?;
        }
        Ok(())
    }
}

pub fn parse_genome(text: &str) -> Result<Genome> {
    let mut rows: Vec<Vec<char>> = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(bad) = line.chars().find(|c| !is_valid_symbol(*c)) {
            return Err(IoError::genome(n + 1, format!("unknown symbol {bad:?}")));
        }
        let row: Vec<char> = line.chars().collect();
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(IoError::genome(
                    n + 1,
                    format!("row has {} symbols, expected {}", row.len(), first.len()),
                ));
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(IoError::validation("genome is empty"));
    }
    Ok(Genome { rows })
}

pub fn load_genome<P: AsRef<Path>>(path: P) -> Result<Genome> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IoError::not_found(path.display().to_string()),
        _ => IoError::FileSystem(e).with_context(format!("reading genome from {}", path.display())),
    })?;
    let genome = parse_genome(&text)
        .map_err(|e| e.with_context(format!("parsing genome {}", path.display())))?;
    tracing::debug!(path = %path.display(), extent = ?genome.extent(), "genome loaded");
    Ok(genome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let genome = parse_genome("  @C$ \n\n  ..: \n").unwrap();
        assert_eq!(genome.extent(), Extent::new(3, 2));
        assert_eq!(genome.to_string(), "@C$\n..:");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_genome("@C$\n..").unwrap_err();
        assert!(matches!(err, IoError::Genome { line: 2, .. }));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let err = parse_genome("@Z$").unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(parse_genome(" \n"), Err(IoError::Validation(_))));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_genome("/nonexistent/mycora/initial.gen").unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
        assert!(err.to_string().contains("initial.gen"));
    }

    #[test]
    fn test_shipped_genome_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../genomes/initial.gen");
        let genome = load_genome(path).unwrap();
        assert!(genome.extent().area() > 0);
    }
}
