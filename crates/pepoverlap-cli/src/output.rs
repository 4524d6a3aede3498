use crate::runner::{Annotations, Runner};
use pepoverlap_core::digest::PeptideRecord;
use pepoverlap_core::overlap::{Summary, Venn};
use std::path::PathBuf;

impl Runner {
    // Create a path for `file_name` in the specified output directory
    pub fn make_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.parameters.output_directory.join(file_name.as_ref())
    }

    fn write_tsv(&self, file_name: &str, wtr: csv::Writer<Vec<u8>>) -> anyhow::Result<String> {
        let path = self.make_path(file_name);
        let bytes = wtr.into_inner()?;
        std::fs::write(&path, bytes)?;
        Ok(path.display().to_string())
    }

    fn tsv_writer() -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(vec![])
    }

    pub fn write_summary(&self, summaries: &[Summary]) -> anyhow::Result<String> {
        let mut wtr = Self::tsv_writer();
        wtr.write_byte_record(&csv::ByteRecord::from(vec![
            "organism",
            "peptide_count",
            "protein_count",
            "unique_peptides",
            "unique_proteins",
        ]))?;

        for summary in summaries {
            let mut record = csv::ByteRecord::new();
            record.push_field(summary.organism.as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.peptide_count).as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.protein_count).as_bytes());
            record.push_field(
                itoa::Buffer::new()
                    .format(summary.unique_peptide_count)
                    .as_bytes(),
            );
            record.push_field(
                itoa::Buffer::new()
                    .format(summary.unique_protein_count)
                    .as_bytes(),
            );
            wtr.write_byte_record(&record)?;
        }

        wtr.flush()?;
        self.write_tsv("summary.tsv", wtr)
    }

    pub fn serialize_peptide(
        &self,
        peptide: &PeptideRecord,
        annotations: Option<&Annotations>,
    ) -> csv::ByteRecord {
        let mut record = csv::ByteRecord::new();
        record.push_field(peptide.protein.as_bytes());
        record.push_field(itoa::Buffer::new().format(peptide.occurrence).as_bytes());
        record.push_field(peptide.peptide.as_bytes());
        record.push_field(itoa::Buffer::new().format(peptide.frequency).as_bytes());
        if let Some(annotations) = annotations {
            match annotations.get(peptide.protein.as_str()) {
                Some(info) => {
                    record.push_field(info.gene_symbol.as_bytes());
                    record.push_field(info.description.as_bytes());
                }
                None => {
                    record.push_field(b"");
                    record.push_field(b"");
                }
            }
        }
        record
    }

    pub fn write_peptides(
        &self,
        file_name: &str,
        peptides: &[PeptideRecord],
        annotations: Option<&Annotations>,
    ) -> anyhow::Result<String> {
        let mut wtr = Self::tsv_writer();

        let mut headers = csv::ByteRecord::from(vec!["protein", "occurrence", "peptide", "frequency"]);
        if annotations.is_some() {
            headers.push_field(b"gene_symbol");
            headers.push_field(b"description");
        }
        wtr.write_byte_record(&headers)?;

        for peptide in peptides {
            wtr.write_byte_record(&self.serialize_peptide(peptide, annotations))?;
        }

        wtr.flush()?;
        self.write_tsv(file_name, wtr)
    }

    pub fn write_venn(&self, venns: &[Venn]) -> anyhow::Result<String> {
        let mut wtr = Self::tsv_writer();
        wtr.write_byte_record(&csv::ByteRecord::from(vec![
            "category",
            "region",
            "organisms",
            "peptides",
        ]))?;

        for venn in venns {
            for region in &venn.regions {
                let mut record = csv::ByteRecord::new();
                record.push_field(venn.category.as_str().as_bytes());
                record.push_field(region.id.as_bytes());
                record.push_field(region.organisms.join(";").as_bytes());
                record.push_field(itoa::Buffer::new().format(region.count).as_bytes());
                wtr.write_byte_record(&record)?;
            }
        }

        wtr.flush()?;
        self.write_tsv("overlap.tsv", wtr)
    }

    pub fn write_shared(&self, shared: &[(&str, &PeptideRecord)]) -> anyhow::Result<String> {
        let mut wtr = Self::tsv_writer();
        wtr.write_byte_record(&csv::ByteRecord::from(vec![
            "organism",
            "protein",
            "occurrence",
            "peptide",
        ]))?;

        for (organism, peptide) in shared {
            let mut record = csv::ByteRecord::new();
            record.push_field(organism.as_bytes());
            record.push_field(peptide.protein.as_bytes());
            record.push_field(itoa::Buffer::new().format(peptide.occurrence).as_bytes());
            record.push_field(peptide.peptide.as_bytes());
            wtr.write_byte_record(&record)?;
        }

        wtr.flush()?;
        self.write_tsv("shared_unique.tsv", wtr)
    }
}
