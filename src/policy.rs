//! Which copy of a duplicate pair to keep.
//!
//! A [`RetentionPolicy`] is an ordered list of rules. Each rule looks at the
//! current candidate and a newly confirmed duplicate and either picks one or
//! abstains; the first rule with an opinion decides. When every rule
//! abstains the candidate is kept.

use std::path::Path;

use serde::Serialize;

pub const UNFILTERED_MARKER: &str = "unfiltered";
pub const PREFER_DELETE_MARKER: &str = "preferDelete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    KeepCandidate,
    KeepChallenger,
    NoOpinion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "marker", rename_all = "snake_case")]
pub enum RetentionRule {
    /// Paths containing the marker are deleted in favour of paths that don't.
    DeleteMarker(String),
    /// Keep the path that sorts first, e.g. `report_2017` over `report_2019`.
    /// File names are compared first, whole paths only when names are equal,
    /// so `b/a.txt` is kept over `a/z.txt` even though a plain path compare
    /// would keep `a/z.txt`.
    LexicographicOrder,
}

impl RetentionRule {
    pub fn name(&self) -> String {
        match self {
            Self::DeleteMarker(marker) => format!("delete-marker({marker})"),
            Self::LexicographicOrder => "lexicographic-order".to_string(),
        }
    }

    pub fn evaluate(&self, candidate: &Path, challenger: &Path) -> Preference {
        match self {
            Self::DeleteMarker(marker) => {
                let in_candidate = contains(candidate, marker);
                let in_challenger = contains(challenger, marker);
                match (in_candidate, in_challenger) {
                    (true, false) => Preference::KeepChallenger,
                    (false, true) => Preference::KeepCandidate,
                    _ => Preference::NoOpinion,
                }
            }
            Self::LexicographicOrder => {
                let candidate_key = (candidate.file_name(), candidate.as_os_str());
                let challenger_key = (challenger.file_name(), challenger.as_os_str());
                if candidate_key > challenger_key {
                    Preference::KeepChallenger
                } else {
                    Preference::KeepCandidate
                }
            }
        }
    }
}

fn contains(path: &Path, marker: &str) -> bool {
    path.to_string_lossy().contains(marker)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    rules: Vec<RetentionRule>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::with_delete_markers([UNFILTERED_MARKER, PREFER_DELETE_MARKER])
    }
}

impl RetentionPolicy {
    /// Delete markers in priority order, followed by lexicographic order.
    pub fn with_delete_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rules: Vec<RetentionRule> = markers
            .into_iter()
            .map(|m| RetentionRule::DeleteMarker(m.into()))
            .collect();
        rules.push(RetentionRule::LexicographicOrder);
        Self { rules }
    }

    pub fn rules(&self) -> &[RetentionRule] {
        &self.rules
    }

    /// Returns `true` if `challenger` should replace `candidate` as the kept copy.
    pub fn prefers_challenger(&self, candidate: &Path, challenger: &Path) -> bool {
        for rule in &self.rules {
            match rule.evaluate(candidate, challenger) {
                Preference::NoOpinion => continue,
                Preference::KeepChallenger => return true,
                Preference::KeepCandidate => return false,
            }
        }
        false
    }
}
