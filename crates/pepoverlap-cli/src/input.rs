use anyhow::{ensure, Context};
use clap::ArgMatches;
use pepoverlap_core::overlap::MAX_VENN_SETS;
use pepoverlap_fetch::pepdigest::Pepdigest;
use pepoverlap_fetch::Source;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Organism {
    /// Used for cache file names and as the label in every output
    pub name: String,
    /// URL or local path of the proteome FASTA. Optional if the sequences or
    /// the digest report are already cached in the data directory
    pub source: Option<String>,
}

#[derive(Serialize, Debug)]
/// Actual analysis parameters - may include overrides or default values not set by user
pub struct Analysis {
    pub version: String,
    pub organisms: Vec<Organism>,
    pub data_directory: PathBuf,
    pub pepdigest: Pepdigest,
    pub annotate: bool,
    pub output_paths: Vec<String>,

    #[serde(skip_serializing)]
    pub output_directory: PathBuf,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct PepdigestOptions {
    program: Option<String>,
    menu: Option<u8>,
    mono: Option<bool>,
}

impl From<PepdigestOptions> for Pepdigest {
    fn from(value: PepdigestOptions) -> Pepdigest {
        let default = Pepdigest::default();
        let settings = Pepdigest {
            program: value.program.unwrap_or(default.program),
            menu: value.menu.unwrap_or(default.menu),
            mono: value.mono.unwrap_or(default.mono),
        };
        if settings.mono {
            log::warn!("`pepdigest.mono` is set - masses in the digest reports will be monoisotopic");
        }
        settings
    }
}

#[derive(Deserialize, Default)]
/// Input parameters deserialized from JSON file
pub struct Input {
    organisms: Vec<Organism>,
    data_directory: Option<String>,
    output_directory: Option<String>,
    pepdigest: Option<PepdigestOptions>,
    annotate: Option<bool>,
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let path = matches
            .get_one::<String>("parameters")
            .context("`parameters` must be set. For more information try '--help'")?;
        let mut input = Input::load(path)
            .with_context(|| format!("Failed to read parameters from `{path}`"))?;

        // Handle JSON configuration overrides
        if let Some(output_directory) = matches.get_one::<String>("output_directory") {
            log::trace!("overriding `output_directory` parameter.");
            input.output_directory = Some(output_directory.into());
        }
        if let Some(data_directory) = matches.get_one::<String>("data_directory") {
            log::trace!("overriding `data_directory` parameter.");
            input.data_directory = Some(data_directory.into());
        }
        if matches.get_flag("no_annotate") {
            log::trace!("overriding `annotate` parameter.");
            input.annotate = Some(false);
        }
        if let Some(names) = matches.get_many::<String>("organisms") {
            log::trace!("restricting analysis to organisms given on the command line.");
            let names = names.collect::<Vec<_>>();
            for name in &names {
                ensure!(
                    input.organisms.iter().any(|o| &&o.name == name),
                    "organism `{}` is not listed in `{}`",
                    name,
                    path
                );
            }
            input.organisms.retain(|o| names.contains(&&o.name));
        }

        Ok(input)
    }

    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn check_organisms(organisms: &[Organism]) -> anyhow::Result<()> {
        ensure!(
            !organisms.is_empty(),
            "`organisms` must list at least one organism"
        );
        ensure!(
            organisms.len() <= MAX_VENN_SETS,
            "cannot compare {} organisms, at most {} are supported",
            organisms.len(),
            MAX_VENN_SETS
        );
        for (ix, organism) in organisms.iter().enumerate() {
            ensure!(
                !organism.name.is_empty()
                    && !organism
                        .name
                        .contains(|c: char| c == '/' || c == '\\' || c.is_whitespace()),
                "organism name `{}` cannot be used as a file name",
                organism.name
            );
            // Summaries are append-only, so a repeated organism would be
            // reported twice
            ensure!(
                !organisms[..ix].iter().any(|o| o.name == organism.name),
                "organism `{}` is listed more than once",
                organism.name
            );
            if let Some(source) = &organism.source {
                source
                    .parse::<Source>()
                    .with_context(|| format!("invalid source for `{}`", organism.name))?;
            }
        }
        if organisms.len() == 1 {
            log::warn!("only one organism given - overlap statistics will be trivial");
        }
        Ok(())
    }

    pub fn build(self) -> anyhow::Result<Analysis> {
        Self::check_organisms(&self.organisms)?;

        let output_directory = match self.output_directory {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::create_dir_all(&path)?;
                path
            }
            None => std::env::current_dir()?,
        };

        Ok(Analysis {
            version: clap::crate_version!().into(),
            organisms: self.organisms,
            data_directory: self.data_directory.unwrap_or_else(|| "data".into()).into(),
            pepdigest: self.pepdigest.map(Into::into).unwrap_or_default(),
            annotate: self.annotate.unwrap_or(true),
            output_paths: Vec::new(),
            output_directory,
        })
    }
}
