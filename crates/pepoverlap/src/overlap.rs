use crate::digest::{count_proteins, OrganismDigest, PeptideRecord};
use crate::Error;
use fnv::{FnvHashMap, FnvHashSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Peptides occurring more often than this are considered non-specific
pub const HIGH_FREQUENCY_THRESHOLD: usize = 2;

/// Venn regions are enumerated exhaustively, so keep the number of sets sane
pub const MAX_VENN_SETS: usize = 16;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Total,
    Unique,
    HighFrequency,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Total, Category::Unique, Category::HighFrequency];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Total => "total",
            Category::Unique => "unique",
            Category::HighFrequency => "high_frequency",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
/// Flat peptide sequence lists, in table order, for set comparisons
pub struct PeptideLists {
    pub total: Vec<String>,
    pub unique: Vec<String>,
    pub high_frequency: Vec<String>,
}

impl PeptideLists {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Total => &self.total,
            Category::Unique => &self.unique,
            Category::HighFrequency => &self.high_frequency,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Summary {
    pub organism: String,
    pub peptide_count: usize,
    pub protein_count: usize,
    pub unique_peptide_count: usize,
    pub unique_protein_count: usize,
}

#[derive(Clone, Debug)]
/// Peptides occurring exactly once within an organism's proteome
pub struct UniqueSubset {
    pub organism: String,
    pub records: Vec<PeptideRecord>,
}

#[derive(Clone, Debug)]
/// Derived subsets and statistics for a single organism
pub struct OverlapResult {
    pub unique_peptides: Vec<PeptideRecord>,
    pub high_frequency_peptides: Vec<PeptideRecord>,
    pub peptide_lists: PeptideLists,
    pub summary: Summary,
}

impl OverlapResult {
    pub fn new(digest: &OrganismDigest) -> Self {
        // Drop every row belonging to a duplicated peptide group - not just
        // the extra copies
        let unique_peptides = digest
            .records
            .iter()
            .filter(|r| r.frequency == 1)
            .cloned()
            .collect::<Vec<_>>();

        let mut high_frequency_peptides = digest
            .records
            .iter()
            .filter(|r| r.frequency > HIGH_FREQUENCY_THRESHOLD)
            .cloned()
            .collect::<Vec<_>>();
        // Stable - ties keep table order
        high_frequency_peptides.sort_by_key(|r| r.frequency);

        let peptide_lists = PeptideLists {
            total: digest.peptides().map(String::from).collect(),
            unique: unique_peptides.iter().map(|r| r.peptide.clone()).collect(),
            high_frequency: high_frequency_peptides
                .iter()
                .map(|r| r.peptide.clone())
                .collect(),
        };

        let summary = Summary {
            organism: digest.organism.clone(),
            peptide_count: digest.len(),
            protein_count: count_proteins(&digest.records),
            unique_peptide_count: unique_peptides.len(),
            unique_protein_count: count_proteins(&unique_peptides),
        };

        OverlapResult {
            unique_peptides,
            high_frequency_peptides,
            peptide_lists,
            summary,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Region {
    /// One character per compared organism: '1' if the region lies inside
    /// that organism's set, '0' otherwise - e.g. "10", "01", "11"
    pub id: String,
    pub organisms: Vec<String>,
    /// Number of distinct peptides in this region
    pub count: usize,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Venn {
    pub category: Category,
    pub organisms: Vec<String>,
    pub regions: Vec<Region>,
}

impl Venn {
    pub fn count(&self, id: &str) -> Option<usize> {
        self.regions.iter().find(|r| r.id == id).map(|r| r.count)
    }
}

#[derive(Default, Debug)]
/// Accumulates per-organism digests and their derived subsets
///
/// Tables, high-frequency subsets and peptide lists are keyed by organism, so
/// summarizing an organism twice replaces them. Unique subsets and summaries
/// are append-only: a second call adds another entry for the same organism.
pub struct PepOverlap {
    total: BTreeMap<String, OrganismDigest>,
    high_frequency: BTreeMap<String, Vec<PeptideRecord>>,
    peptide_lists: BTreeMap<String, PeptideLists>,
    unique: Vec<UniqueSubset>,
    summaries: Vec<Summary>,
}

impl PepOverlap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `digest` and derive its unique & high-frequency subsets
    pub fn summarize(&mut self, digest: OrganismDigest) -> &Summary {
        let organism = digest.organism.clone();
        if self.total.contains_key(&organism) {
            log::warn!(
                "`{}` has already been summarized - replacing stored tables, appending a second summary",
                organism
            );
        }

        let result = OverlapResult::new(&digest);
        log::info!(
            "{}: {} peptides from {} proteins, {} unique peptides from {} proteins, {} high-frequency",
            organism,
            result.summary.peptide_count,
            result.summary.protein_count,
            result.summary.unique_peptide_count,
            result.summary.unique_protein_count,
            result.high_frequency_peptides.len(),
        );

        self.total.insert(organism.clone(), digest);
        self.high_frequency
            .insert(organism.clone(), result.high_frequency_peptides);
        self.peptide_lists
            .insert(organism.clone(), result.peptide_lists);
        self.unique.push(UniqueSubset {
            organism,
            records: result.unique_peptides,
        });
        self.summaries.push(result.summary);
        &self.summaries[self.summaries.len() - 1]
    }

    pub fn total(&self, organism: &str) -> Option<&OrganismDigest> {
        self.total.get(organism)
    }

    pub fn high_frequency(&self, organism: &str) -> Option<&[PeptideRecord]> {
        self.high_frequency.get(organism).map(Vec::as_slice)
    }

    pub fn peptide_lists(&self, organism: &str) -> Option<&PeptideLists> {
        self.peptide_lists.get(organism)
    }

    /// Most recently computed unique subset for `organism`
    pub fn unique(&self, organism: &str) -> Option<&[PeptideRecord]> {
        self.unique
            .iter()
            .rev()
            .find(|u| u.organism == organism)
            .map(|u| u.records.as_slice())
    }

    pub fn unique_subsets(&self) -> &[UniqueSubset] {
        &self.unique
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    /// Summarized organisms, in lexicographic order
    pub fn organisms(&self) -> impl Iterator<Item = &str> {
        self.total.keys().map(String::as_str)
    }

    /// Count distinct peptides in every region of a Venn diagram over the
    /// given organisms' `category` peptide sets
    pub fn venn<S: AsRef<str>>(&self, category: Category, organisms: &[S]) -> crate::Result<Venn> {
        if organisms.len() > MAX_VENN_SETS {
            return Err(Error::TooManySets(organisms.len()));
        }

        let mut membership: FnvHashMap<&str, u32> = FnvHashMap::default();
        for (ix, organism) in organisms.iter().enumerate() {
            let organism = organism.as_ref();
            let lists = self
                .peptide_lists
                .get(organism)
                .ok_or_else(|| Error::UnknownOrganism(organism.into()))?;
            for peptide in lists.get(category) {
                *membership.entry(peptide.as_str()).or_default() |= 1 << ix;
            }
        }

        let mut counts = vec![0usize; 1 << organisms.len()];
        for mask in membership.values() {
            counts[*mask as usize] += 1;
        }

        let regions = counts
            .into_iter()
            .enumerate()
            .skip(1)
            .map(|(mask, count)| {
                let id = (0..organisms.len())
                    .map(|ix| match mask & (1 << ix) {
                        0 => '0',
                        _ => '1',
                    })
                    .collect::<String>();
                let members = organisms
                    .iter()
                    .enumerate()
                    .filter(|(ix, _)| mask & (1 << ix) != 0)
                    .map(|(_, o)| o.as_ref().to_string())
                    .collect();
                Region {
                    id,
                    organisms: members,
                    count,
                }
            })
            .collect();

        Ok(Venn {
            category,
            organisms: organisms.iter().map(|o| o.as_ref().to_string()).collect(),
            regions,
        })
    }

    /// Rows from the unique subsets whose peptide is also unique to at least
    /// one other organism - i.e. peptides that do not discriminate between
    /// the compared proteomes
    pub fn shared_unique_peptides(&self) -> Vec<(&str, &PeptideRecord)> {
        // Only the latest unique subset for each organism participates
        let mut latest: Vec<&UniqueSubset> = Vec::new();
        for subset in self.unique.iter().rev() {
            if !latest.iter().any(|s| s.organism == subset.organism) {
                latest.push(subset);
            }
        }
        latest.reverse();

        let mut owners: FnvHashMap<&str, FnvHashSet<&str>> = FnvHashMap::default();
        for subset in &latest {
            for record in &subset.records {
                owners
                    .entry(record.peptide.as_str())
                    .or_default()
                    .insert(subset.organism.as_str());
            }
        }

        latest
            .iter()
            .flat_map(|subset| {
                subset
                    .records
                    .iter()
                    .map(move |record| (subset.organism.as_str(), record))
            })
            .filter(|(_, record)| owners[record.peptide.as_str()].len() > 1)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::sync::Arc;

    fn digest(organism: &str, proteins: &[(&str, &[&str])]) -> OrganismDigest {
        let mut report = String::new();
        for (protein, peptides) in proteins {
            report.push_str(&format!("# Sequence: {}     from: 1   to: 100\n", protein));
            for (ix, peptide) in peptides.iter().enumerate() {
                report.push_str(&format!(
                    "      {}      {}   500.000 K     R     {}\n",
                    ix,
                    ix + peptide.len(),
                    peptide
                ));
            }
        }
        OrganismDigest::parse(organism, &report)
    }

    #[test]
    fn summarize_example() {
        let mut overlap = PepOverlap::new();
        let summary = overlap
            .summarize(digest("mouse", &[("P1", &["AAA", "BBB", "AAA"]), ("P2", &["CCC"])]))
            .clone();

        assert_eq!(
            summary,
            Summary {
                organism: "mouse".into(),
                peptide_count: 4,
                protein_count: 2,
                unique_peptide_count: 2,
                unique_protein_count: 2,
            }
        );

        let unique = overlap.unique("mouse").unwrap();
        assert_eq!(
            unique.iter().map(|r| r.peptide.as_str()).collect::<Vec<_>>(),
            vec!["BBB", "CCC"]
        );
        assert!(overlap.high_frequency("mouse").unwrap().is_empty());

        let lists = overlap.peptide_lists("mouse").unwrap();
        assert_eq!(lists.total, vec!["AAA", "BBB", "AAA", "CCC"]);
        assert_eq!(lists.unique, vec!["BBB", "CCC"]);
        assert!(lists.high_frequency.is_empty());
    }

    #[test]
    fn high_frequency_sorted() {
        let result = OverlapResult::new(&digest(
            "yeast",
            &[
                ("P1", &["KKK", "MMM", "KKK", "MMM"]),
                ("P2", &["MMM", "KKK", "MMM", "LLL"]),
            ],
        ));
        // KKK x3, MMM x4
        let rows = result
            .high_frequency_peptides
            .iter()
            .map(|r| (r.protein.as_str(), r.occurrence, r.peptide.as_str(), r.frequency))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                ("P1", 1, "KKK", 3),
                ("P1", 3, "KKK", 3),
                ("P2", 2, "KKK", 3),
                ("P1", 2, "MMM", 4),
                ("P1", 4, "MMM", 4),
                ("P2", 1, "MMM", 4),
                ("P2", 3, "MMM", 4),
            ]
        );
        assert_eq!(result.peptide_lists.unique, vec!["LLL"]);
        assert_eq!(result.summary.unique_protein_count, 1);
    }

    #[test]
    fn resummarize_appends() {
        let mut overlap = PepOverlap::new();
        overlap.summarize(digest("candida", &[("P1", &["AAA"])]));
        overlap.summarize(digest("candida", &[("P1", &["AAA", "CCC"]), ("P2", &["DDD"])]));

        assert_eq!(overlap.organisms().collect::<Vec<_>>(), vec!["candida"]);
        assert_eq!(overlap.total("candida").unwrap().len(), 3);
        assert_eq!(overlap.summaries().len(), 2);
        assert_eq!(overlap.unique_subsets().len(), 2);
        assert_eq!(overlap.summaries()[0].peptide_count, 1);
        assert_eq!(overlap.summaries()[1].peptide_count, 3);
        assert_eq!(overlap.unique("candida").unwrap().len(), 3);
    }

    #[test]
    fn venn_two_sets() {
        let mut overlap = PepOverlap::new();
        overlap.summarize(digest("mouse", &[("M1", &["AAA", "BBB", "AAA", "EEE"])]));
        overlap.summarize(digest("candida", &[("C1", &["AAA", "CCC", "DDD"])]));

        let venn = overlap.venn(Category::Total, &["mouse", "candida"]).unwrap();
        assert_eq!(venn.organisms, vec!["mouse", "candida"]);
        assert_eq!(venn.count("10"), Some(2));
        assert_eq!(venn.count("01"), Some(2));
        assert_eq!(venn.count("11"), Some(1));
        assert_eq!(venn.regions[2].organisms, vec!["mouse", "candida"]);

        // AAA is duplicated within mouse, so it only counts as unique to candida
        let venn = overlap.venn(Category::Unique, &["mouse", "candida"]).unwrap();
        assert_eq!(venn.count("10"), Some(2));
        assert_eq!(venn.count("01"), Some(3));
        assert_eq!(venn.count("11"), Some(0));

        let venn = overlap
            .venn(Category::HighFrequency, &["mouse", "candida"])
            .unwrap();
        assert!(venn.regions.iter().all(|r| r.count == 0));
        assert_eq!(venn.regions.len(), 3);
    }

    #[test]
    fn venn_three_sets_order() {
        let mut overlap = PepOverlap::new();
        overlap.summarize(digest("a", &[("A1", &["XXX", "YYY"])]));
        overlap.summarize(digest("b", &[("B1", &["XXX"])]));
        overlap.summarize(digest("c", &[("C1", &["XXX", "ZZZ"])]));

        let venn = overlap.venn(Category::Total, &["a", "b", "c"]).unwrap();
        let ids = venn.regions.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["100", "010", "110", "001", "101", "011", "111"]);
        assert_eq!(venn.count("111"), Some(1));
        assert_eq!(venn.count("100"), Some(1));
        assert_eq!(venn.count("001"), Some(1));
        assert_eq!(venn.count("010"), Some(0));
    }

    #[test]
    fn venn_unknown_organism() {
        let overlap = PepOverlap::new();
        assert!(matches!(
            overlap.venn(Category::Total, &["human"]),
            Err(Error::UnknownOrganism(o)) if o == "human"
        ));
    }

    #[test]
    fn shared_unique() {
        let mut overlap = PepOverlap::new();
        overlap.summarize(digest("mouse", &[("M1", &["AAA", "BBB"])]));
        overlap.summarize(digest("candida", &[("C1", &["AAA", "CCC", "CCC"])]));

        let shared = overlap
            .shared_unique_peptides()
            .into_iter()
            .map(|(o, r)| (o, r.protein.as_str(), r.peptide.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(shared, vec![("mouse", "M1", "AAA"), ("candida", "C1", "AAA")]);
    }

    fn qc_digest(peptides: &[(u8, u8)]) -> OrganismDigest {
        let records = peptides
            .iter()
            .enumerate()
            .map(|(ix, (protein, peptide))| PeptideRecord {
                protein: Arc::new(format!("P{}", protein % 8)),
                occurrence: ix + 1,
                peptide: format!("K{}", (b'A' + peptide % 6) as char),
                frequency: 0,
            })
            .collect::<Vec<_>>();
        let frequencies = records
            .iter()
            .map(|r| records.iter().filter(|o| o.peptide == r.peptide).count())
            .collect::<Vec<_>>();
        OrganismDigest {
            organism: "qc".into(),
            records: records
                .into_iter()
                .zip(frequencies)
                .map(|(r, frequency)| PeptideRecord { frequency, ..r })
                .collect(),
        }
    }

    #[quickcheck]
    fn unique_partitions_table(peptides: Vec<(u8, u8)>) -> bool {
        let digest = qc_digest(&peptides);
        let result = OverlapResult::new(&digest);
        let duplicated = digest.records.iter().filter(|r| r.frequency > 1).count();

        let no_repeats = result.unique_peptides.iter().all(|r| {
            digest.peptides().filter(|p| *p == r.peptide).count() == 1
        });
        no_repeats && result.unique_peptides.len() + duplicated == digest.len()
    }

    #[quickcheck]
    fn high_frequency_complete_and_sorted(peptides: Vec<(u8, u8)>) -> bool {
        let digest = qc_digest(&peptides);
        let result = OverlapResult::new(&digest);
        let expected = digest.records.iter().filter(|r| r.frequency > 2).count();

        result.high_frequency_peptides.len() == expected
            && result.high_frequency_peptides.iter().all(|r| r.frequency > 2)
            && result
                .high_frequency_peptides
                .windows(2)
                .all(|w| w[0].frequency <= w[1].frequency)
    }
}
