use super::input::{Analysis, Organism};
use anyhow::{bail, Context};
use log::info;
use pepoverlap_core::descriptor::{protein_info, ProteinInfo};
use pepoverlap_core::digest::OrganismDigest;
use pepoverlap_core::overlap::{Category, PepOverlap};
use pepoverlap_fetch::download::download;
use pepoverlap_fetch::{DataDir, Source};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Protein metadata keyed by accession
pub type Annotations = HashMap<String, ProteinInfo>;

pub struct Runner {
    pub parameters: Analysis,
    pub overlap: PepOverlap,
    data: DataDir,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Analysis) -> Self {
        let data = DataDir::new(&parameters.data_directory);
        Self {
            parameters,
            overlap: PepOverlap::new(),
            data,
            start: Instant::now(),
        }
    }

    /// Make sure sequences and a digest report exist for `organism`. Both
    /// steps are no-ops when their cache file is already present.
    fn prepare(&self, organism: &Organism) -> anyhow::Result<PathBuf> {
        if let Some(source) = &organism.source {
            let source = source.parse::<Source>()?;
            download(&source, &organism.name, &self.data).with_context(|| {
                format!("Failed to fetch sequences for `{}` from `{}`", organism.name, source)
            })?;
        }

        let report = self.data.digest(&organism.name);
        let fasta = self.data.fasta(&organism.name);
        if !report.exists() && !fasta.exists() {
            bail!(
                "no `source` given for `{}` and neither {} nor {} exist",
                organism.name,
                fasta.display(),
                report.display()
            );
        }

        self.parameters
            .pepdigest
            .run(&organism.name, &self.data)
            .with_context(|| format!("Failed to digest sequences for `{}`", organism.name))
    }

    /// Protein descriptions & gene symbols from the cached FASTA file, if any
    fn annotations(&self, organism: &str) -> anyhow::Result<Option<Annotations>> {
        if !self.parameters.annotate {
            return Ok(None);
        }
        let path = self.data.fasta(organism);
        if !path.exists() {
            log::warn!(
                "{}: no sequences at {}, skipping protein annotation",
                organism,
                path.display()
            );
            return Ok(None);
        }

        let fasta = pepoverlap_core::read_fasta(&path)?;
        let info = protein_info(&fasta)
            .with_context(|| format!("Failed to parse protein descriptions in `{}`", path.display()))?;
        Ok(Some(
            info.into_iter()
                .map(|info| (info.accession.clone(), info))
                .collect(),
        ))
    }

    pub fn run(mut self) -> anyhow::Result<PepOverlap> {
        let organisms = self.parameters.organisms.clone();
        let mut annotations = HashMap::new();

        for organism in &organisms {
            let report = self.prepare(organism)?;
            let digest = OrganismDigest::read(&report, organism.name.as_str())
                .with_context(|| format!("Failed to read digest report `{}`", report.display()))?;
            if digest.is_empty() {
                log::warn!("{}: no peptides found in {}", organism.name, report.display());
            }
            self.overlap.summarize(digest);

            if let Some(info) = self.annotations(&organism.name)? {
                annotations.insert(organism.name.clone(), info);
            }
        }
        info!("summarized {} organisms in {:#?}", organisms.len(), self.start.elapsed());

        log::trace!("writing outputs");
        self.parameters
            .output_paths
            .push(self.write_summary(self.overlap.summaries())?);

        for organism in &organisms {
            let annotations = annotations.get(&organism.name);
            if let Some(unique) = self.overlap.unique(&organism.name) {
                let file_name = format!("{}.unique.tsv", organism.name);
                self.parameters
                    .output_paths
                    .push(self.write_peptides(&file_name, unique, annotations)?);
            }
            if let Some(high_frequency) = self.overlap.high_frequency(&organism.name) {
                let file_name = format!("{}.high_frequency.tsv", organism.name);
                self.parameters
                    .output_paths
                    .push(self.write_peptides(&file_name, high_frequency, annotations)?);
            }
        }

        let names = organisms.iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
        let venns = Category::ALL
            .iter()
            .map(|category| self.overlap.venn(*category, &names))
            .collect::<Result<Vec<_>, _>>()?;
        for venn in &venns {
            for region in venn.regions.iter().filter(|r| r.organisms.len() > 1) {
                info!(
                    "{} peptides shared by {}: {}",
                    venn.category,
                    region.organisms.join(", "),
                    region.count
                );
            }
        }
        self.parameters.output_paths.push(self.write_venn(&venns)?);

        let shared = self.overlap.shared_unique_peptides();
        info!(
            "{} unique peptides are shared with another organism",
            shared.len()
        );
        self.parameters
            .output_paths
            .push(self.write_shared(&shared)?);

        let path = self.make_path("results.json");
        self.parameters.output_paths.push(path.display().to_string());
        println!("{}", serde_json::to_string_pretty(&self.parameters)?);

        let bytes = serde_json::to_vec_pretty(&self.parameters)?;
        std::fs::write(&path, bytes)?;

        info!("finished in {}s", self.start.elapsed().as_secs());
        Ok(self.overlap)
    }
}
