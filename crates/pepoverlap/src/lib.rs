pub mod descriptor;
pub mod digest;
pub mod fasta;
pub mod overlap;
pub mod peptide;

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("failed to parse identifier: {0}")]
    Identifier(String),
    #[error("no description in `{0}`")]
    Description(String),
    #[error("organism `{0}` has not been summarized")]
    UnknownOrganism(String),
    #[error("cannot compare {0} sets, at most {max} are supported", max = overlap::MAX_VENN_SETS)]
    TooManySets(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a FASTA file from the local filesystem
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<fasta::Fasta> {
    let contents = std::fs::read_to_string(path)?;
    Ok(fasta::Fasta::parse(contents))
}
