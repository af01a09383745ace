// Cheap string heuristics for spotting lookalike domains

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const ANALYSIS_TYPE: &str = "basic_string_similarity";

const HOMOGRAPH_PAIRS: [(&str, &str); 7] = [
    ("0", "o"),
    ("1", "l"),
    ("1", "i"),
    ("rn", "m"),
    ("vv", "w"),
    ("cl", "d"),
    ("nn", "m"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityFlags {
    pub same_length: bool,
    pub contains_original: bool,
    pub same_tld: bool,
    pub character_substitution: bool,
    pub homograph_attack: bool,
}

impl SimilarityFlags {
    pub fn any(&self) -> bool {
        self.same_length
            || self.contains_original
            || self.same_tld
            || self.character_substitution
            || self.homograph_attack
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityAnalysis {
    pub original_domain: String,
    pub candidate_domain: String,
    pub similarity_score: f64,
    pub analysis_type: String,
    #[serde(flatten)]
    pub flags: SimilarityFlags,
}

/// 1.0 for identical strings, otherwise the overlap of the two lowercase
/// character sets divided by their union.
pub fn basic_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let left: HashSet<char> = a.to_lowercase().chars().collect();
    let right: HashSet<char> = b.to_lowercase().chars().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

pub fn similarity_flags(original: &str, candidate: &str) -> SimilarityFlags {
    let original = original.to_lowercase();
    let candidate = candidate.to_lowercase();

    SimilarityFlags {
        same_length: original.chars().count() == candidate.chars().count(),
        contains_original: original.contains(&candidate) || candidate.contains(&original),
        same_tld: same_tld(&original, &candidate),
        character_substitution: has_character_substitution(&original, &candidate),
        homograph_attack: possible_homograph(&original, &candidate),
    }
}

fn same_tld(a: &str, b: &str) -> bool {
    if !a.contains('.') || !b.contains('.') {
        return false;
    }
    a.rsplit('.').next() == b.rsplit('.').next()
}

/// Equal length with one or two differing positions.
fn has_character_substitution(a: &str, b: &str) -> bool {
    if a.chars().count() != b.chars().count() {
        return false;
    }
    let differences = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
    (1..=2).contains(&differences)
}

fn possible_homograph(a: &str, b: &str) -> bool {
    HOMOGRAPH_PAIRS
        .iter()
        .any(|(x, y)| (a.contains(x) && b.contains(y)) || (a.contains(y) && b.contains(x)))
}

/// Score every candidate against `original`, best match first. Ties keep
/// their input order.
pub fn analyze_domain_similarity<S: AsRef<str>>(original: &str, candidates: &[S]) -> Vec<SimilarityAnalysis> {
    let mut results: Vec<SimilarityAnalysis> = candidates
        .iter()
        .map(|candidate| {
            let candidate = candidate.as_ref();
            SimilarityAnalysis {
                original_domain: original.to_string(),
                candidate_domain: candidate.to_string(),
                similarity_score: basic_similarity(original, candidate),
                analysis_type: ANALYSIS_TYPE.to_string(),
                flags: similarity_flags(original, candidate),
            }
        })
        .collect();

    results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    results
}
