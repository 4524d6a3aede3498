use regex::Regex;

pub struct PeptideCleaner {
    flank: Regex,
    modification: Regex,
}

impl Default for PeptideCleaner {
    fn default() -> Self {
        PeptideCleaner {
            // '_' delimiters, optionally carrying a charge/fraction suffix: `_.2`
            flank: Regex::new(r"_(?:\.[0-9]+)?").expect("valid flank regex"),
            // Modification annotations: `[Oxidation (M)]`, `[Acetyl (Protein N-term)]`
            modification: Regex::new(r"\[[A-Za-z()\- ]*\]").expect("valid modification regex"),
        }
    }
}

impl PeptideCleaner {
    pub fn clean(&self, peptide: &str) -> String {
        let mut peptide = self.flank.replace_all(peptide, "").into_owned();
        // Stripping an inner annotation can expose an enclosing one
        while self.modification.is_match(&peptide) {
            peptide = self.modification.replace_all(&peptide, "").into_owned();
        }
        peptide
    }
}

/// Strip flanking delimiters and modification annotations from a peptide
/// reported by a quantification tool (e.g. `_PEP[Phospho (STY)]TIDE_.2`),
/// leaving the bare sequence that an in-silico digest would produce
pub fn clean(peptide: &str) -> String {
    PeptideCleaner::default().clean(peptide)
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn strip_annotations() {
        assert_eq!(clean("PEPTIDE_.1"), "PEPTIDE");
        assert_eq!(clean("PEP[Phospho (STY)]TIDE"), "PEPTIDE");
        assert_eq!(clean("_M[Oxidation (M)]PEPTIDEK_"), "MPEPTIDEK");
        assert_eq!(clean("_[Acetyl (Protein N-term)]SEQUENCE_.12"), "SEQUENCE");
        assert_eq!(clean("PEPTIDE"), "PEPTIDE");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn other_characters_untouched() {
        // digits inside brackets are not a modification annotation
        assert_eq!(clean("PEP[+80]TIDE"), "PEP[+80]TIDE");
        assert_eq!(clean("PEP.1TIDE"), "PEP.1TIDE");
    }

    #[test]
    fn nested_annotations() {
        assert_eq!(clean("PEP[[Phospho]]TIDE"), "PEPTIDE");
        assert_eq!(clean(&clean("A[[B]]C")), clean("A[[B]]C"));
    }

    #[quickcheck]
    fn idempotent(peptide: String) -> bool {
        let once = clean(&peptide);
        clean(&once) == once
    }

    #[quickcheck]
    fn idempotent_annotation_alphabet(chars: Vec<u8>) -> bool {
        // Bias towards the characters that matter
        let alphabet = b"_.1[]()- AK";
        let peptide = chars
            .iter()
            .map(|c| alphabet[*c as usize % alphabet.len()] as char)
            .collect::<String>();
        let once = clean(&peptide);
        clean(&once) == once
    }
}
