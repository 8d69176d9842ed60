//! Career Service
//!
//! Orchestrates the engine and its collaborators: the document store, the
//! activity timeline, the catalog and the injected clock and rng. Every
//! operation names the user it acts for; nothing is cached between calls.

use crate::identity::IdentityError;
use crate::memory::{CareerMemory, MemoryEvent, MemoryEventType, MemoryStore};
use crate::store::{self, DocumentStore, StoreError};
use career_core::skill_gap::{self, SkillGap};
use career_core::{
    AssessmentEngine, CareerCatalog, Clock, Difficulty, EngineConfig, EngineError, FixedClock,
    GeneratedPostings, JobListing, JobMatch, JobMatchScorer, JobSource, Profile, Quiz, QuizResult,
    Roadmap, RoadmapGenerator, SkillAssessment, SystemClock,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

const PROFILES: &str = "profiles";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl ServiceError {
    fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn roadmaps(user: &str) -> String {
    format!("roadmaps/{}", user)
}

fn assessments(user: &str) -> String {
    format!("assessments/{}", user)
}

fn quizzes(user: &str) -> String {
    format!("quizzes/{}", user)
}

/// Result of exploring one career track against a set of postings
#[derive(Debug, Clone, Serialize)]
pub struct TrackExploration {
    pub track_id: String,
    pub postings: Vec<JobListing>,
    /// Best match first
    pub matches: Vec<JobMatch>,
    /// Empty when there were no postings to analyze
    pub gaps: Vec<SkillGap>,
    /// Track skills the learner lacks, in track order
    pub track_gaps: Vec<String>,
}

pub struct CareerService {
    store: Box<dyn DocumentStore>,
    memory: MemoryStore,
    catalog: CareerCatalog,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl CareerService {
    pub fn new(
        store: Box<dyn DocumentStore>,
        memory: MemoryStore,
        catalog: CareerCatalog,
        config: EngineConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            memory,
            catalog,
            config,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn catalog(&self) -> &CareerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Posting generator pinned to the service clock and seeded from its rng
    pub fn generated_postings(&mut self, count: usize) -> GeneratedPostings<FixedClock, StdRng> {
        let seed = self.rng.gen();
        GeneratedPostings::new(
            count,
            FixedClock::new(self.clock.now()),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Appends a timeline event after the change it describes is saved.
    ///
    /// A failed write is logged, never returned: the caller's change is
    /// already stored and must not be retried.
    fn record(
        &self,
        user: &str,
        event_type: MemoryEventType,
        description: &str,
        metadata: serde_json::Value,
    ) {
        let event =
            MemoryEvent::new(user, event_type, description, self.clock.now()).with_metadata(metadata);
        if let Err(e) = self.memory.record_event(&event) {
            log::warn!(
                "Failed to record {} event for {}: {}",
                event_type.as_str(),
                user,
                e
            );
        }
    }

    // ============================================================
    // PROFILES
    // ============================================================

    /// Validates and replaces the stored profile of `profile.user_id`
    pub fn save_profile(&self, profile: &Profile) -> ServiceResult<()> {
        profile.validate()?;
        store::save(self.store.as_ref(), PROFILES, &profile.user_id, profile)?;
        log::info!(
            "Saved profile {} for {} ({} skills)",
            profile.id,
            profile.user_id,
            profile.current_skills.len()
        );
        self.record(
            &profile.user_id,
            MemoryEventType::ProfileSaved,
            &format!("Profile saved with {} skills", profile.current_skills.len()),
            json!({ "profile_id": profile.id, "skills": profile.current_skills }),
        );
        Ok(())
    }

    pub fn load_profile(&self, user: &str) -> ServiceResult<Profile> {
        store::load(self.store.as_ref(), PROFILES, user)?
            .ok_or_else(|| ServiceError::not_found("Profile", user))
    }

    // ============================================================
    // EXPLORATION
    // ============================================================

    pub fn explore_track(
        &self,
        user: &str,
        track_id: &str,
        source: &mut dyn JobSource,
    ) -> ServiceResult<TrackExploration> {
        let profile = self.load_profile(user)?;
        let track = self.catalog.track(track_id)?;
        let postings = source.list_postings(track)?;

        let matches = JobMatchScorer::new(self.config.match_weights).match_jobs(&profile, &postings);
        let gaps = if postings.is_empty() {
            log::info!("No postings for track {}; falling back to track skills", track_id);
            Vec::new()
        } else {
            skill_gap::analyze(&profile, &postings, self.config.gap_top_n)
        };
        let track_gaps = skill_gap::analyze_against_track(&profile, track);

        self.record(
            user,
            MemoryEventType::TrackExplored,
            &format!("Explored {} against {} postings", track.title, postings.len()),
            json!({
                "track_id": track_id,
                "postings": postings.len(),
                "best_score": matches.first().map(|m| m.score),
                "top_gaps": gaps.iter().map(|g| &g.skill).collect::<Vec<_>>(),
            }),
        );

        Ok(TrackExploration {
            track_id: track_id.to_string(),
            postings,
            matches,
            gaps,
            track_gaps,
        })
    }

    // ============================================================
    // ROADMAPS
    // ============================================================

    /// Generates a roadmap for the track, wholly replacing any earlier one
    pub fn generate_roadmap(
        &mut self,
        user: &str,
        track_id: &str,
        weeks: Option<u32>,
        days_per_week: Option<u32>,
    ) -> ServiceResult<Roadmap> {
        let profile = self.load_profile(user)?;
        let track = self.catalog.track(track_id)?;
        let generator = RoadmapGenerator::new(self.config.roadmap);
        let template = generator.template();

        let roadmap = generator.generate_with(
            &profile,
            track,
            weeks.unwrap_or(template.duration_weeks),
            days_per_week.unwrap_or(template.days_per_week),
            &self.clock,
            &mut self.rng,
        )?;

        let collection = roadmaps(user);
        let refreshed = self.store.get(&collection, track_id)?.is_some();
        store::save(self.store.as_ref(), &collection, track_id, &roadmap)?;

        let (event_type, verb) = if refreshed {
            (MemoryEventType::RoadmapRefreshed, "Refreshed")
        } else {
            (MemoryEventType::RoadmapGenerated, "Generated")
        };
        log::info!(
            "{} {}-week roadmap {} for {} on {}",
            verb,
            roadmap.weeks.len(),
            roadmap.id,
            user,
            track_id
        );
        self.record(
            user,
            event_type,
            &format!("{} {}-week {} roadmap", verb, roadmap.weeks.len(), track.title),
            json!({ "roadmap_id": roadmap.id, "track_id": track_id }),
        );

        Ok(roadmap)
    }

    pub fn load_roadmap(&self, user: &str, track_id: &str) -> ServiceResult<Roadmap> {
        store::load(self.store.as_ref(), &roadmaps(user), track_id)?
            .ok_or_else(|| ServiceError::not_found("Roadmap", track_id))
    }

    pub fn roadmaps(&self, user: &str) -> ServiceResult<Vec<Roadmap>> {
        Ok(store::load_all(self.store.as_ref(), &roadmaps(user))?)
    }

    /// Flips one task and persists the roadmap; returns the task's new state
    pub fn toggle_task(
        &self,
        user: &str,
        track_id: &str,
        week_index: usize,
        day_id: &str,
        task_id: &str,
    ) -> ServiceResult<bool> {
        let mut roadmap = self.load_roadmap(user, track_id)?;
        let completed = roadmap.toggle_task(week_index, day_id, task_id)?;
        roadmap.last_updated = self.clock.now();
        store::save(self.store.as_ref(), &roadmaps(user), track_id, &roadmap)?;

        let progress = roadmap.progress();
        self.record(
            user,
            MemoryEventType::TaskToggled,
            &format!(
                "Marked task {} in week {} {}",
                task_id,
                week_index + 1,
                if completed { "done" } else { "not done" }
            ),
            json!({
                "roadmap_id": roadmap.id,
                "day_id": day_id,
                "task_id": task_id,
                "completed": completed,
                "percent": progress.percent,
            }),
        );
        Ok(completed)
    }

    // ============================================================
    // ASSESSMENTS
    // ============================================================

    pub fn start_quiz(
        &mut self,
        user: &str,
        skill: &str,
        difficulty: Difficulty,
        question_count: Option<usize>,
    ) -> ServiceResult<Quiz> {
        let count = question_count.unwrap_or(self.config.default_question_count);
        let quiz = AssessmentEngine::new(self.config.default_question_count).build_quiz_with(
            skill,
            difficulty,
            count,
            &mut self.rng,
        )?;
        store::save(self.store.as_ref(), &quizzes(user), &quiz.id, &quiz)?;

        self.record(
            user,
            MemoryEventType::QuizStarted,
            &format!("Started {}", quiz.title),
            json!({ "quiz_id": quiz.id, "skill_id": quiz.skill_id, "questions": quiz.questions.len() }),
        );
        Ok(quiz)
    }

    pub fn load_quiz(&self, user: &str, quiz_id: &str) -> ServiceResult<Quiz> {
        store::load(self.store.as_ref(), &quizzes(user), quiz_id)?
            .ok_or_else(|| ServiceError::not_found("Quiz", quiz_id))
    }

    /// Scores a submission and appends the assessment to the user's history.
    ///
    /// Incomplete submissions are rejected and nothing is stored.
    pub fn submit_quiz(
        &mut self,
        user: &str,
        quiz_id: &str,
        answers: &[Option<usize>],
    ) -> ServiceResult<QuizResult> {
        let quiz = self.load_quiz(user, quiz_id)?;
        let profile = self.load_profile(user)?;

        let engine = AssessmentEngine::new(self.config.default_question_count);
        let result = engine.score(&quiz, answers, &profile.id, &self.clock, &mut self.rng)?;
        let assessment = &result.assessment;
        store::save(self.store.as_ref(), &assessments(user), &assessment.id, assessment)?;

        log::info!(
            "{} scored {}% on {} ({} missed)",
            user,
            result.score,
            quiz.title,
            result.missed_questions.len()
        );
        self.record(
            user,
            MemoryEventType::AssessmentCompleted,
            &format!("Scored {}% on {}", result.score, quiz.title),
            json!({
                "quiz_id": quiz.id,
                "assessment_id": assessment.id,
                "score": result.score,
                "missed_questions": result.missed_questions,
            }),
        );
        Ok(result)
    }

    /// Assessments oldest first
    pub fn assessment_history(&self, user: &str) -> ServiceResult<Vec<SkillAssessment>> {
        Ok(store::load_all(self.store.as_ref(), &assessments(user))?)
    }

    pub fn timeline(&self, user: &str) -> ServiceResult<CareerMemory> {
        Ok(self.memory.get_user_memory(user)?)
    }
}
