//! Job Match Scoring
//!
//! DETERMINISTIC match percentage between a learner profile and a posting.
//!
//! Formula: score = round(required_ratio × 100 × w_req + nice_ratio × 100 × w_nice)
//! Where:
//! - required_ratio: share of the job's required skills the learner owns
//! - nice_ratio: share of the job's nice-to-have skills the learner owns
//! - w_req / w_nice: 0.7 / 0.3 unless configured otherwise
//!
//! Skill names match exactly (case-sensitive). An empty list contributes 0.

use crate::config::MatchWeights;
use crate::types::{JobListing, Profile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Match result for a single posting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobMatch {
    pub job_id: String,
    pub title: String,
    pub company: String,
    /// Match percentage (0..=100)
    pub score: u8,
    /// Required and nice-to-have skills the learner already owns
    pub matched_skills: Vec<String>,
    /// Required skills the learner lacks
    pub missing_required: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobMatchScorer {
    weights: MatchWeights,
}

impl JobMatchScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, profile: &Profile, job: &JobListing) -> u8 {
        let required_ratio = hit_ratio(&job.required_skills, profile);
        let nice_ratio = hit_ratio(&job.nice_to_have_skills, profile);
        let raw = required_ratio * 100.0 * self.weights.required
            + nice_ratio * 100.0 * self.weights.nice_to_have;
        raw.round().clamp(0.0, 100.0) as u8
    }

    /// Scores every posting, best match first. Equal scores keep posting order.
    pub fn match_jobs(&self, profile: &Profile, postings: &[JobListing]) -> Vec<JobMatch> {
        let mut matches: Vec<JobMatch> = postings
            .iter()
            .map(|job| {
                let mut seen = HashSet::new();
                let matched_skills = job
                    .required_skills
                    .iter()
                    .chain(&job.nice_to_have_skills)
                    .filter(|s| profile.has_skill(s) && seen.insert(s.as_str()))
                    .cloned()
                    .collect();
                let missing_required = job
                    .required_skills
                    .iter()
                    .filter(|s| !profile.has_skill(s))
                    .cloned()
                    .collect();

                JobMatch {
                    job_id: job.id.clone(),
                    title: job.title.clone(),
                    company: job.company.clone(),
                    score: self.score(profile, job),
                    matched_skills,
                    missing_required,
                }
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        log::debug!("Scored {} postings for profile {}", matches.len(), profile.id);
        matches
    }
}

/// Match percentage with the default 0.7 / 0.3 weighting
pub fn score(profile: &Profile, job: &JobListing) -> u8 {
    JobMatchScorer::default().score(profile, job)
}

/// Fraction of distinct skills in `skills` owned by the profile; 0 for an empty list
fn hit_ratio(skills: &[String], profile: &Profile) -> f64 {
    let distinct: HashSet<&str> = skills.iter().map(String::as_str).collect();
    if distinct.is_empty() {
        return 0.0;
    }
    let hits = distinct.iter().filter(|s| profile.has_skill(s)).count();
    hits as f64 / distinct.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(skills: &[&str]) -> Profile {
        Profile::new("p1", "u1").with_skills(skills.iter().copied())
    }

    #[test]
    fn test_reference_example() {
        let job = JobListing::new("j1", "Full-Stack")
            .with_required(&["React", "Node.js"])
            .with_nice_to_have(&["Docker"]);
        assert_eq!(score(&profile(&["React"]), &job), 35);
    }

    #[test]
    fn test_full_coverage_scores_100() {
        let job = JobListing::new("j1", "Backend")
            .with_required(&["Rust", "SQL"])
            .with_nice_to_have(&["Docker"]);
        assert_eq!(score(&profile(&["Rust", "SQL", "Docker", "Go"]), &job), 100);
    }

    #[test]
    fn test_empty_required_contributes_zero() {
        let job = JobListing::new("j1", "Intern").with_nice_to_have(&["Git"]);
        assert_eq!(score(&profile(&["Git"]), &job), 30);
        assert_eq!(score(&profile(&[]), &JobListing::new("j2", "Empty")), 0);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let job = JobListing::new("j1", "Frontend").with_required(&["React"]);
        assert_eq!(score(&profile(&["react"]), &job), 0);
        assert_eq!(score(&profile(&["React"]), &job), 70);
    }

    #[test]
    fn test_rounding() {
        // 1/3 * 70 = 23.33 → 23; 2/3 * 70 = 46.67 → 47
        let job = JobListing::new("j1", "Dev").with_required(&["A", "B", "C"]);
        assert_eq!(score(&profile(&["A"]), &job), 23);
        assert_eq!(score(&profile(&["A", "B"]), &job), 47);
    }

    #[test]
    fn test_long_nice_to_have_list_rounds_up_to_100() {
        // One missing nice-to-have skill costs 30/n points, lost to rounding once n >= 60
        let nice: Vec<String> = (0..67).map(|i| format!("N{}", i)).collect();
        let mut job = JobListing::new("j1", "Dev").with_required(&["A"]);
        job.nice_to_have_skills = nice.clone();
        let owned = profile(&["A"]).with_skills(
            std::iter::once("A".to_string()).chain(nice.iter().take(66).cloned()),
        );
        assert_eq!(score(&owned, &job), 100);

        job.nice_to_have_skills.truncate(59);
        let owned = profile(&["A"]).with_skills(
            std::iter::once("A".to_string()).chain(nice.iter().take(58).cloned()),
        );
        assert_eq!(score(&owned, &job), 99);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = JobMatchScorer::new(MatchWeights {
            required: 0.5,
            nice_to_have: 0.5,
        });
        let job = JobListing::new("j1", "Dev")
            .with_required(&["A"])
            .with_nice_to_have(&["B"]);
        assert_eq!(scorer.score(&profile(&["B"]), &job), 50);
    }

    #[test]
    fn test_match_jobs_sorted_and_explained() {
        let postings = vec![
            JobListing::new("low", "Low").with_required(&["X", "Y"]),
            JobListing::new("high", "High")
                .with_required(&["React"])
                .with_nice_to_have(&["React", "CSS"]),
            JobListing::new("tie", "Tie").with_required(&["Y", "X"]),
        ];
        let matches = JobMatchScorer::default().match_jobs(&profile(&["React", "X"]), &postings);

        assert_eq!(matches[0].job_id, "high");
        assert_eq!(matches[0].score, 85);
        assert_eq!(matches[0].matched_skills, vec!["React"]);
        assert!(matches[0].missing_required.is_empty());

        // equal scores keep posting order
        assert_eq!(matches[1].job_id, "low");
        assert_eq!(matches[2].job_id, "tie");
        assert_eq!(matches[1].missing_required, vec!["Y"]);
    }

    #[test]
    fn test_match_jobs_empty_postings() {
        assert!(JobMatchScorer::default()
            .match_jobs(&profile(&["Rust"]), &[])
            .is_empty());
    }
}
