//! Career Alignment Engine
//!
//! Pure, synchronous building blocks for a career development assistant:
//! - Job matching: weighted match percentage between a profile and a posting
//! - Skill gaps: in-demand skills the learner is missing, ranked by frequency
//! - Roadmaps: week/day learning plans with per-task completion tracking
//! - Assessments: multiple-choice skill quizzes and their scored records
//!
//! Time and randomness are always injected (`Clock`, `rand::Rng`) so every
//! generated artifact is reproducible under test.

pub mod assessment;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod job_match;
pub mod postings;
pub mod roadmap;
pub mod skill_gap;
pub mod types;

pub use assessment::{AssessmentEngine, Difficulty, Question, Quiz, QuizResult};
pub use catalog::CareerCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, MatchWeights, RoadmapTemplate};
pub use error::{EngineError, LoadError, Result};
pub use job_match::{JobMatch, JobMatchScorer};
pub use postings::{GeneratedPostings, JobSource, StaticPostings};
pub use roadmap::{
    DailyPlan, Resource, ResourceType, Roadmap, RoadmapGenerator, RoadmapProgress, RoadmapWeek,
    Task, TaskType,
};
pub use skill_gap::SkillGap;
pub use types::*;

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
