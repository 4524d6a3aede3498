use crate::{DataDir, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Settings for the EMBOSS `pepdigest` in-silico digest
pub struct Pepdigest {
    /// Executable name or path
    pub program: String,
    /// Enzyme selection from the pepdigest menu - 1 is trypsin
    pub menu: u8,
    /// Report monoisotopic rather than average masses
    pub mono: bool,
}

impl Default for Pepdigest {
    fn default() -> Self {
        Self {
            program: "pepdigest".into(),
            menu: 1,
            mono: false,
        }
    }
}

impl Pepdigest {
    pub fn command(&self, fasta: &Path, report: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-auto")
            .arg("-seqall")
            .arg(fasta)
            .arg("-menu")
            .arg(self.menu.to_string())
            .arg("-mono")
            .arg(match self.mono {
                true => "Y",
                false => "N",
            })
            .arg("-outfile")
            .arg(report);
        cmd
    }

    /// Digest `<data>/<organism>.fa` into `<data>/<organism>.pepdigest`,
    /// unless the report already exists
    pub fn run(&self, organism: &str, data: &DataDir) -> Result<PathBuf, Error> {
        let report = data.digest(organism);
        if report.exists() {
            log::info!("{}: using cached digest at {}", organism, report.display());
            return Ok(report);
        }
        data.mkdir()?;

        // Write to a scratch file first so that a failed run never leaves a
        // truncated report behind to be mistaken for a cached result
        let scratch = NamedTempFile::new_in(data.root())?;
        let fasta = data.fasta(organism);

        log::info!("{}: running {}", organism, self.program);
        let status = self.command(&fasta, scratch.path()).status()?;
        if !status.success() {
            return Err(Error::Tool {
                program: self.program.clone(),
                status,
            });
        }

        scratch.persist(&report).map_err(|e| e.error)?;
        Ok(report)
    }
}
