use crate::{DataDir, Error, Source};
use pepoverlap_core::fasta::Fasta;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Residues per line when writing FASTA
pub const LINE_WIDTH: usize = 60;

/// Seconds allowed to establish a connection to the proteome server
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Whole-proteome streams can take many minutes, so only connecting is bounded;
/// reads have no overall or per-chunk deadline.
pub fn http_client() -> Result<reqwest::blocking::Client, Error> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(None)
        .user_agent(concat!("pepoverlap/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Reduce UniProt identifiers to bare accessions, so that downstream tools
/// report `A0A1D8PCA8` rather than `tr|A0A1D8PCA8|A0A1D8PCA8_CANAL`
pub fn simplify_identifiers(mut fasta: Fasta) -> Result<Fasta, Error> {
    let id = Regex::new(r"(sp|tr)\|([A-Z0-9\-]*)").expect("valid identifier regex");
    for protein in fasta.proteins.iter_mut() {
        let accession = id
            .captures(&protein.accession)
            .and_then(|cap| cap.get(2))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| pepoverlap_core::Error::Identifier(protein.accession.clone()))?;
        protein.accession = accession;
    }
    Ok(fasta)
}

/// Fetch the proteome for `organism` into the data directory, unless it has
/// already been downloaded. Returns the path of the cached FASTA file.
pub fn download(source: &Source, organism: &str, data: &DataDir) -> Result<PathBuf, Error> {
    let local = data.fasta(organism);
    if local.exists() {
        log::info!("{}: using cached sequences at {}", organism, local.display());
        return Ok(local);
    }
    data.mkdir()?;

    // Both temporary files are deleted when dropped, including on error paths
    let mut raw = NamedTempFile::new_in(data.root())?;
    match source {
        Source::Http(url) => {
            log::info!("{}: downloading sequences from {}", organism, url);
            let mut response = http_client()?
                .get(url.clone())
                .send()?
                .error_for_status()?;
            let bytes = response.copy_to(raw.as_file_mut())?;
            log::trace!("{}: received {} bytes", organism, bytes);
        }
        Source::Local(path) => {
            log::info!("{}: reading sequences from {}", organism, path.display());
            let mut file = std::fs::File::open(path)?;
            std::io::copy(&mut file, raw.as_file_mut())?;
        }
    }
    raw.as_file_mut().flush()?;

    let contents = std::fs::read_to_string(raw.path())?;
    let fasta = simplify_identifiers(Fasta::parse(contents))?;
    log::info!("{}: {} sequences", organism, fasta.len());

    let mut out = NamedTempFile::new_in(data.root())?;
    out.write_all(fasta.to_fasta_string(LINE_WIDTH).as_bytes())?;
    out.flush()?;
    out.persist(&local).map_err(|e| e.error)?;

    Ok(local)
}
