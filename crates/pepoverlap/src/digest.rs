//! Parser for EMBOSS `pepdigest` reports
//!
//! A report consists of one block per protein. Each block starts with a
//! header line (`# Sequence: A0A087WPF7     from: 1   to: 1261`) and is
//! followed by a fixed-width table of fragments:
//!
//! ```text
//!   Start     End  Mol_W Cterm Nterm Sequence
//!      57      78  2541.862 K     E     EDNGKPPSSAPSRPRPPRRKRR
//! ```
//!
//! Everything else (program banner, hit counts, table headings, blank lines)
//! is boilerplate and is skipped without error.

use fnv::FnvHashMap;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Debug)]
/// A single fragment from an in-silico digest
pub struct PeptideRecord {
    /// Protein accession the fragment was cleaved from
    pub protein: Arc<String>,
    /// 1-based rank of this fragment within its protein, in file order
    pub occurrence: usize,
    /// Cleaved peptide sequence
    pub peptide: String,
    /// Number of rows in the whole proteome sharing this peptide sequence
    pub frequency: usize,
}

/// The shape of a single report line
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Line<'a> {
    /// Start of a new protein block, carrying the accession
    Header(&'a str),
    /// Fragment table row, carrying the peptide sequence
    Peptide(&'a str),
    Ignored,
}

pub struct LineClassifier {
    header: Regex,
    peptide: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        LineClassifier {
            header: Regex::new(r"^# Sequence: (\S+)").expect("valid header regex"),
            // three numeric columns, C/N-terminal residues ('.' at protein
            // termini), then the fragment sequence
            peptide: Regex::new(r"^(?:\s+[\d.]+){3}\s+(?:[A-Z.]\s+){2}([A-Z]+)")
                .expect("valid peptide regex"),
        }
    }
}

impl LineClassifier {
    pub fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if let Some(cap) = self.header.captures(line) {
            if let Some(m) = cap.get(1) {
                return Line::Header(m.as_str());
            }
        }
        if let Some(cap) = self.peptide.captures(line) {
            if let Some(m) = cap.get(1) {
                return Line::Peptide(m.as_str());
            }
        }
        Line::Ignored
    }
}

#[derive(Clone, Debug, Default)]
/// All fragments produced by digesting one organism's proteome, in file order
pub struct OrganismDigest {
    pub organism: String,
    pub records: Vec<PeptideRecord>,
}

impl OrganismDigest {
    pub fn parse<S: Into<String>>(organism: S, contents: &str) -> OrganismDigest {
        let organism = organism.into();
        let classifier = LineClassifier::default();

        let mut records = Vec::new();
        let mut protein: Option<Arc<String>> = None;
        let mut occurrence = 0;

        for line in contents.lines() {
            match classifier.classify(line) {
                Line::Header(accession) => {
                    protein = Some(Arc::new(accession.to_string()));
                    occurrence = 0;
                }
                Line::Peptide(peptide) => match &protein {
                    Some(protein) => {
                        occurrence += 1;
                        records.push(PeptideRecord {
                            protein: protein.clone(),
                            occurrence,
                            peptide: peptide.into(),
                            frequency: 0,
                        });
                    }
                    None => {
                        log::trace!(
                            "{}: skipping fragment `{}` before first sequence header",
                            organism,
                            peptide
                        );
                    }
                },
                Line::Ignored => {}
            }
        }

        assign_frequencies(&mut records);
        log::trace!("{}: parsed {} fragments", organism, records.len());

        OrganismDigest { organism, records }
    }

    /// Read and parse a `pepdigest` report from disk
    pub fn read<P: AsRef<Path>, S: Into<String>>(path: P, organism: S) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(organism, &contents))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn peptides(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.peptide.as_str())
    }
}

/// Broadcast the size of each peptide group to every member row
fn assign_frequencies(records: &mut [PeptideRecord]) {
    let mut counts: FnvHashMap<&str, usize> = FnvHashMap::default();
    for record in records.iter() {
        *counts.entry(record.peptide.as_str()).or_default() += 1;
    }
    let frequencies = records
        .iter()
        .map(|record| counts[record.peptide.as_str()])
        .collect::<Vec<_>>();

    for (record, frequency) in records.iter_mut().zip(frequencies) {
        record.frequency = frequency;
    }
}

/// Number of distinct protein accessions among `records`
pub fn count_proteins<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a PeptideRecord>,
{
    records
        .into_iter()
        .map(|r| r.protein.as_str())
        .collect::<fnv::FnvHashSet<_>>()
        .len()
}
