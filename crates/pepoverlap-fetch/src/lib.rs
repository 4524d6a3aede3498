use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod download;
pub mod pepdigest;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid source: {0}")]
    InvalidSource(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] pepoverlap_core::Error),
    #[error("`{program}` exited with {status}")]
    Tool {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Where a proteome FASTA file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(reqwest::Url),
    Local(PathBuf),
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("://") {
            Some(("http", _)) | Some(("https", _)) => reqwest::Url::parse(s)
                .map(Self::Http)
                .map_err(|_| Error::InvalidSource(s.into())),
            Some(("file", path)) => Ok(Self::Local(path.into())),
            Some(_) => Err(Error::InvalidSource(s.into())),
            None => Ok(Self::Local(s.into())),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{}", url),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Flat-file cache: `<root>/<organism>.fa` and `<root>/<organism>.pepdigest`.
/// The presence of a file suppresses re-downloading or re-digesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl Default for DataDir {
    fn default() -> Self {
        DataDir::new("data")
    }
}

impl DataDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DataDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively create the cache directory as needed
    pub fn mkdir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    pub fn fasta(&self, organism: &str) -> PathBuf {
        self.root.join(format!("{}.fa", organism))
    }

    pub fn digest(&self, organism: &str) -> PathBuf {
        self.root.join(format!("{}.pepdigest", organism))
    }
}
