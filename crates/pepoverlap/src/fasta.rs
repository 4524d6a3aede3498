use std::fmt::Write;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Protein {
    /// First whitespace-delimited token of the header
    pub accession: String,
    /// Remainder of the header line, without the accession
    pub description: String,
    pub sequence: String,
}

impl Protein {
    /// Full header line, as it appears after the '>'
    pub fn header(&self) -> String {
        match self.description.is_empty() {
            true => self.accession.clone(),
            false => format!("{} {}", self.accession, self.description),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Fasta {
    pub proteins: Vec<Protein>,
}

impl Fasta {
    // Parse a string into a fasta database
    pub fn parse<S: AsRef<str>>(contents: S) -> Fasta {
        let mut proteins = Vec::new();
        let mut last_id: Option<&str> = None;
        let mut s = String::new();

        for line in contents.as_ref().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(id) = line.strip_prefix('>') {
                if let Some(header) = last_id {
                    proteins.push(Self::record(header, std::mem::take(&mut s)));
                }
                last_id = Some(id);
            } else if last_id.is_some() {
                s.push_str(line);
            } else {
                log::trace!("skipping sequence line before first header: `{}`", line);
            }
        }

        if let Some(header) = last_id {
            proteins.push(Self::record(header, s));
        }

        Fasta { proteins }
    }

    fn record(header: &str, sequence: String) -> Protein {
        let header = header.trim();
        let (accession, description) = match header.split_once(char::is_whitespace) {
            Some((acc, desc)) => (acc, desc.trim()),
            None => (header, ""),
        };
        Protein {
            accession: accession.into(),
            description: description.into(),
            sequence,
        }
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    /// Serialize to FASTA text, wrapping sequences at `width` residues
    pub fn to_fasta_string(&self, width: usize) -> String {
        let width = width.max(1);
        let mut out = String::new();
        for protein in &self.proteins {
            // Writing to a String cannot fail
            let _ = writeln!(out, ">{}", protein.header());
            let residues = protein.sequence.chars().collect::<Vec<_>>();
            for chunk in residues.chunks(width) {
                out.extend(chunk);
                out.push('\n');
            }
        }
        out
    }
}
