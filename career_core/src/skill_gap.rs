//! Skill Gap Analysis
//!
//! Ranks skills demanded across job postings that the learner does not
//! have yet. Ties keep first-seen scan order; there is no secondary
//! alphabetical key.

use crate::types::{CareerTrack, JobListing, Profile};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillGap {
    pub skill: String,
    /// Number of postings mentioning the skill
    pub frequency: usize,
}

/// Counts skill demand across postings, drops owned skills and returns the
/// `top_n` most frequent.
///
/// A skill listed as both required and nice-to-have in one posting counts
/// once for that posting.
pub fn analyze(profile: &Profile, postings: &[JobListing], top_n: usize) -> Vec<SkillGap> {
    let mut counts: Vec<SkillGap> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for posting in postings {
        let mut in_posting: HashSet<&str> = HashSet::new();
        for skill in posting
            .required_skills
            .iter()
            .chain(&posting.nice_to_have_skills)
        {
            if !in_posting.insert(skill.as_str()) {
                continue;
            }
            match index.get(skill.as_str()) {
                Some(&i) => counts[i].frequency += 1,
                None => {
                    index.insert(skill.as_str(), counts.len());
                    counts.push(SkillGap {
                        skill: skill.clone(),
                        frequency: 1,
                    });
                }
            }
        }
    }

    counts.retain(|gap| !profile.has_skill(&gap.skill));
    // sort_by is stable: equal frequencies stay in scan order
    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(top_n);

    log::debug!(
        "Skill gap analysis over {} postings: {} gaps reported",
        postings.len(),
        counts.len()
    );
    counts
}

/// Track skills the learner lacks, required first, in catalog order.
///
/// Used when no postings are available to measure demand.
pub fn analyze_against_track(profile: &Profile, track: &CareerTrack) -> Vec<String> {
    let mut seen = HashSet::new();
    track
        .required_skills
        .iter()
        .chain(&track.nice_to_have_skills)
        .filter(|s| !profile.has_skill(s) && seen.insert(s.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(skill: &str, frequency: usize) -> SkillGap {
        SkillGap {
            skill: skill.to_string(),
            frequency,
        }
    }

    #[test]
    fn test_reference_example() {
        let postings = vec![
            JobListing::new("1", "a").with_required(&["A", "B"]),
            JobListing::new("2", "b").with_required(&["A"]),
        ];
        let profile = Profile::new("p", "u");
        assert_eq!(
            analyze(&profile, &postings, DEFAULT_TOP_N),
            vec![gap("A", 2), gap("B", 1)]
        );
    }

    #[test]
    fn test_owned_skills_removed_and_truncated() {
        let postings = vec![
            JobListing::new("1", "a")
                .with_required(&["Rust", "SQL", "Docker"])
                .with_nice_to_have(&["Kafka", "Go", "Redis"]),
            JobListing::new("2", "b")
                .with_required(&["Rust", "Docker"])
                .with_nice_to_have(&["AWS"]),
        ];
        let profile = Profile::new("p", "u").with_skills(["Rust"]);
        let gaps = analyze(&profile, &postings, 3);

        assert_eq!(gaps, vec![gap("Docker", 2), gap("SQL", 1), gap("Kafka", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let postings = vec![
            JobListing::new("1", "a").with_required(&["Zig", "Ada"]),
            JobListing::new("2", "b").with_nice_to_have(&["Ada", "Zig", "Elm"]),
        ];
        let gaps = analyze(&Profile::new("p", "u"), &postings, 10);
        assert_eq!(gaps, vec![gap("Zig", 2), gap("Ada", 2), gap("Elm", 1)]);
    }

    #[test]
    fn test_duplicate_within_posting_counts_once() {
        let postings = vec![JobListing::new("1", "a")
            .with_required(&["SQL"])
            .with_nice_to_have(&["SQL"])];
        assert_eq!(
            analyze(&Profile::new("p", "u"), &postings, 5),
            vec![gap("SQL", 1)]
        );
    }

    #[test]
    fn test_empty_and_full_coverage() {
        let profile = Profile::new("p", "u").with_skills(["A", "B"]);
        assert!(analyze(&profile, &[], 5).is_empty());

        let postings = vec![JobListing::new("1", "a").with_required(&["A", "B"])];
        assert!(analyze(&profile, &postings, 5).is_empty());
    }

    #[test]
    fn test_analyze_against_track() {
        let mut track = CareerTrack::new("t", "T", &["HTML", "CSS", "React"]);
        track.nice_to_have_skills = vec!["CSS".to_string(), "Figma".to_string()];
        let profile = Profile::new("p", "u").with_skills(["CSS"]);
        assert_eq!(analyze_against_track(&profile, &track), vec!["HTML", "React", "Figma"]);
    }
}
