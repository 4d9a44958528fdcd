use std::collections::HashSet;
use std::sync::Arc;

use super::weights::WeightTable;

/// Delimiter between skill tokens in a raw skills string
pub const SKILL_DELIMITER: char = '|';

/// Match score between a user and a job
pub type Score = u32;

/// Set of lowercase skill tokens parsed from a pipe-delimited string
///
/// An empty input yields a set holding a single empty token, so two empty
/// skill strings overlap on `""` and score the default weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSet(HashSet<String>);

impl SkillSet {
    /// Lowercases the whole string, then splits on `|`
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.to_lowercase()
                .split(SKILL_DELIMITER)
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.len()
    }

    /// Skills present in both sets
    pub fn common<'a>(&'a self, other: &'a SkillSet) -> impl Iterator<Item = &'a str> + 'a {
        self.0.intersection(&other.0).map(String::as_str)
    }
}

/// Computes weighted skill-overlap scores
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: Arc<WeightTable>,
}

impl Scorer {
    pub fn new(weights: Arc<WeightTable>) -> Self {
        Self { weights }
    }

    /// Scores raw user skills against raw job skills
    pub fn score(&self, user_skills: &str, job_skills: &str) -> Score {
        self.score_sets(&SkillSet::parse(user_skills), &SkillSet::parse(job_skills))
    }

    /// Sums the weight of every skill shared by both sets, 0 when disjoint
    pub fn score_sets(&self, user_skills: &SkillSet, job_skills: &SkillSet) -> Score {
        user_skills
            .common(job_skills)
            .map(|skill| self.weights.weight(skill))
            .sum()
    }
}
