//! Protein metadata from UniProt-style FASTA description lines, e.g.
//! `A0A1D8PCA8 Uncharacterized protein OS=Candida albicans OX=237561 GN=ORF19.1`

use crate::fasta::Fasta;
use crate::Error;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct ProteinInfo {
    pub accession: String,
    pub description: String,
    /// Empty if the record carries no `GN=` field
    pub gene_symbol: String,
}

pub struct DescriptorParser {
    description: Regex,
    gene: Regex,
    strict: Regex,
}

impl Default for DescriptorParser {
    fn default() -> Self {
        DescriptorParser {
            description: Regex::new(r"^\S+ (.+) OS=").expect("valid description regex"),
            gene: Regex::new(r"GN=(\S+)").expect("valid gene regex"),
            strict: Regex::new(
                r"^[A-Z0-9-]* (.*) OS=[A-Za-z0-9/\-() ]*OX=[0-9]*(?: GN=([A-Za-z0-9]*))?",
            )
            .expect("valid header regex"),
        }
    }
}

impl DescriptorParser {
    /// Parse a description line that starts with the accession.
    ///
    /// A missing gene symbol is tolerated, a missing description is not.
    pub fn parse(&self, line: &str) -> Result<ProteinInfo, Error> {
        let line = line.trim();
        let accession = line.split_whitespace().next().unwrap_or_default();

        let description = self
            .description
            .captures(line)
            .and_then(|cap| cap.get(1))
            .ok_or_else(|| Error::Description(line.into()))?;

        let gene_symbol = self
            .gene
            .captures(line)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .unwrap_or_default();

        Ok(ProteinInfo {
            accession: accession.into(),
            description: description.as_str().into(),
            gene_symbol: gene_symbol.into(),
        })
    }

    /// Parse a description line that must follow the full
    /// `ACCESSION description OS=organism OX=taxid[ GN=symbol]` layout
    pub fn parse_strict(&self, line: &str) -> Result<ProteinInfo, Error> {
        let line = line.trim();
        let cap = self
            .strict
            .captures(line)
            .ok_or_else(|| Error::Description(line.into()))?;

        Ok(ProteinInfo {
            accession: line.split_whitespace().next().unwrap_or_default().into(),
            description: cap.get(1).map(|m| m.as_str()).unwrap_or_default().into(),
            gene_symbol: cap.get(2).map(|m| m.as_str()).unwrap_or_default().into(),
        })
    }
}

impl ProteinInfo {
    pub fn parse(line: &str) -> Result<Self, Error> {
        DescriptorParser::default().parse(line)
    }

    pub fn parse_strict(line: &str) -> Result<Self, Error> {
        DescriptorParser::default().parse_strict(line)
    }
}

/// Extract metadata for every protein in a parsed FASTA database
pub fn protein_info(fasta: &Fasta) -> Result<Vec<ProteinInfo>, Error> {
    let parser = DescriptorParser::default();
    fasta
        .proteins
        .iter()
        .map(|protein| {
            let mut info = parser.parse(&protein.header())?;
            info.accession = protein.accession.clone();
            Ok(info)
        })
        .collect()
}

/// Read a FASTA file and parse every header with the strict UniProt layout
pub fn read_descriptions<P: AsRef<Path>>(path: P) -> Result<Vec<ProteinInfo>, Error> {
    let fasta = crate::read_fasta(path)?;
    let parser = DescriptorParser::default();
    fasta
        .proteins
        .iter()
        .map(|protein| parser.parse_strict(&protein.header()))
        .collect()
}
