//! Career Engine Types
//!
//! Core data structures shared by the scorer, gap analyzer, roadmap
//! generator and assessment engine.

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weekly study hours accepted on a profile
pub const MIN_WEEKLY_HOURS: u32 = 1;
pub const MAX_WEEKLY_HOURS: u32 = 40;

/// Builds a v4 UUID string from the caller's random source.
///
/// Drawing ids from an injected rng keeps seeded generation reproducible.
pub fn fresh_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen())
        .into_uuid()
        .to_string()
}

// ============================================================
// LEARNER PROFILE
// ============================================================

/// Highest completed education
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    HighSchool,
    Associate,
    #[default]
    Bachelors,
    Masters,
    Doctorate,
    Bootcamp,
    SelfTaught,
}

/// Preferred way of consuming learning material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Reading,
    HandsOn,
    #[default]
    Mixed,
}

/// A learner's self-reported skills, interests and constraints.
///
/// Saved wholesale: every form submission replaces the previous profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub current_skills: BTreeSet<String>,
    #[serde(default)]
    pub desired_skills: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub education: Education,
    #[serde(default)]
    pub learning_style: LearningStyle,
    /// Hours per week the learner can study (1..=40)
    pub weekly_hours_available: u32,
    /// Goals in the learner's priority order
    #[serde(default)]
    pub career_goals: Vec<String>,
}

impl Profile {
    pub fn new(id: &str, user_id: &str) -> Self {
        Self {
            id: id.to_string(),
            user_id: user_id.to_string(),
            current_skills: BTreeSet::new(),
            desired_skills: BTreeSet::new(),
            interests: BTreeSet::new(),
            experience_years: 0,
            education: Education::default(),
            learning_style: LearningStyle::default(),
            weekly_hours_available: 10,
            career_goals: Vec::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.current_skills.contains(skill)
    }

    /// Rejects values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(EngineError::invalid("profile has no owning user"));
        }
        if !(MIN_WEEKLY_HOURS..=MAX_WEEKLY_HOURS).contains(&self.weekly_hours_available) {
            return Err(EngineError::invalid(format!(
                "weekly_hours_available must be between {} and {}, got {}",
                MIN_WEEKLY_HOURS, MAX_WEEKLY_HOURS, self.weekly_hours_available
            )));
        }
        let blank = self
            .current_skills
            .iter()
            .chain(&self.desired_skills)
            .any(|s| s.trim().is_empty());
        if blank {
            return Err(EngineError::invalid("skill names must not be blank"));
        }
        Ok(())
    }
}

// ============================================================
// CAREER TRACK
// ============================================================

/// A named occupational path. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerTrack {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Core skills in teaching order
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub average_salary: String,
}

impl CareerTrack {
    pub fn new(id: &str, title: &str, required_skills: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
            nice_to_have_skills: Vec::new(),
            job_titles: Vec::new(),
            average_salary: String::new(),
        }
    }
}

// ============================================================
// JOB LISTING
// ============================================================

/// A job posting. Regenerated per session, never persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub posted_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl JobListing {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            company: String::new(),
            location: String::new(),
            required_skills: Vec::new(),
            nice_to_have_skills: Vec::new(),
            salary_range: String::new(),
            posted_date: DateTime::<Utc>::default(),
            description: String::new(),
        }
    }

    pub fn with_required(mut self, skills: &[&str]) -> Self {
        self.required_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_nice_to_have(mut self, skills: &[&str]) -> Self {
        self.nice_to_have_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }
}

// ============================================================
// SKILL ASSESSMENT
// ============================================================

/// Scored record of one quiz attempt. Append-only, never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillAssessment {
    pub id: String,
    pub profile_id: String,
    pub skill_id: String,
    pub skill_name: String,
    /// Percentage of correct answers (0..=100)
    pub score: u8,
    pub completed_at: DateTime<Utc>,
    pub recommended_resources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_profile_validation() {
        let profile = Profile::new("p1", "u1").with_skills(["Rust", "SQL"]);
        assert!(profile.validate().is_ok());
        assert!(profile.has_skill("Rust"));
        assert!(!profile.has_skill("rust"));

        let mut too_many = profile.clone();
        too_many.weekly_hours_available = 41;
        assert!(matches!(
            too_many.validate(),
            Err(EngineError::InvalidInput(_))
        ));

        let mut none = profile.clone();
        none.weekly_hours_available = 0;
        assert!(none.validate().is_err());

        let blank = Profile::new("p2", "u1").with_skills(["  "]);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_job_listing_missing_lists_default_to_empty() {
        let job: JobListing =
            serde_json::from_str(r#"{"id": "j1", "title": "Backend Engineer"}"#).unwrap();
        assert!(job.required_skills.is_empty());
        assert!(job.nice_to_have_skills.is_empty());
    }

    #[test]
    fn test_fresh_id_is_seed_stable() {
        let a = fresh_id(&mut StdRng::seed_from_u64(7));
        let b = fresh_id(&mut StdRng::seed_from_u64(7));
        let c = fresh_id(&mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(uuid::Uuid::parse_str(&a).unwrap().get_version_num(), 4);
    }
}
