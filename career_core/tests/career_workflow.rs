// Integration test walking one learner through matching, gap analysis,
// roadmap progress and a skill quiz.
use career_core::skill_gap::{analyze, analyze_against_track};
use career_core::*;
use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn learner() -> Profile {
    let mut profile = Profile::new("profile-1", "user-1").with_skills(["JavaScript", "Git", "SQL"]);
    profile.learning_style = LearningStyle::HandsOn;
    profile.weekly_hours_available = 12;
    profile.career_goals = vec!["Land a full-stack role".to_string()];
    profile
}

#[test]
fn test_explore_track_with_generated_postings() {
    init_logging();
    let config = EngineConfig::default();
    let catalog = CareerCatalog::builtin();
    let track = catalog.track("fullstack").unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap());

    let mut source = GeneratedPostings::new(10, clock, StdRng::seed_from_u64(2024));
    let postings = source.list_postings(track).unwrap();
    assert_eq!(postings.len(), 10);

    let profile = learner();
    let matches = JobMatchScorer::new(config.match_weights).match_jobs(&profile, &postings);
    assert_eq!(matches.len(), postings.len());
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    for m in &matches {
        let job = postings.iter().find(|j| j.id == m.job_id).unwrap();
        assert_eq!(m.score, job_match::score(&profile, job));
        assert!(m.missing_required.iter().all(|s| !profile.has_skill(s)));
    }

    let gaps = analyze(&profile, &postings, config.gap_top_n);
    assert!(!gaps.is_empty());
    assert!(gaps.len() <= 5);
    assert!(gaps.iter().all(|g| !profile.has_skill(&g.skill)));
    assert!(gaps
        .iter()
        .all(|g| track.required_skills.contains(&g.skill) || track.nice_to_have_skills.contains(&g.skill)));
}

#[test]
fn test_empty_feed_falls_back_to_track_gaps() {
    let catalog = CareerCatalog::builtin();
    let track = catalog.track("fullstack").unwrap();
    let profile = learner();

    let postings = StaticPostings::default().list_postings(track).unwrap();
    assert!(JobMatchScorer::default().match_jobs(&profile, &postings).is_empty());
    assert!(analyze(&profile, &postings, 5).is_empty());

    let missing = analyze_against_track(&profile, track);
    assert_eq!(missing[..3], ["React", "Node.js", "REST APIs"]);
}

#[test]
fn test_roadmap_progress_through_a_week() {
    init_logging();
    let catalog = CareerCatalog::builtin();
    let track = catalog.track("frontend").unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let generator = RoadmapGenerator::new(EngineConfig::default().roadmap);

    let mut roadmap = generator
        .generate(&learner(), track, &FixedClock::new(start), &mut StdRng::seed_from_u64(99))
        .unwrap();
    assert_eq!(roadmap.weeks.len(), 12);
    assert_eq!(roadmap.weeks.iter().map(|w| w.daily_plans.len()).sum::<usize>(), 60);
    assert_eq!(roadmap.progress().total_tasks, 120);

    let week = roadmap.weeks[0].clone();
    for day in &week.daily_plans {
        for task in &day.tasks {
            assert!(roadmap.toggle_task(0, &day.id, &task.id).unwrap());
        }
    }
    assert!(roadmap.weeks[0].daily_plans.iter().all(|d| d.completed()));
    assert!(roadmap.weeks[1].daily_plans.iter().all(|d| !d.completed()));

    let progress = roadmap.progress();
    assert_eq!(progress.completed_days, 5);
    assert_eq!(progress.completed_tasks, 10);
    assert_eq!(progress.percent, 8);
    assert_eq!(roadmap.current_week(start + Duration::days(9)), 2);

    // Refresh with a later clock replaces dates and ids
    let refreshed = generator
        .generate(
            &learner(),
            track,
            &FixedClock::new(start + Duration::days(30)),
            &mut StdRng::seed_from_u64(100),
        )
        .unwrap();
    assert_ne!(refreshed.id, roadmap.id);
    assert_eq!(refreshed.start_date, start + Duration::days(30));
    assert_eq!(refreshed.progress().completed_tasks, 0);
}

#[test]
fn test_quiz_attempts() {
    init_logging();
    let engine = AssessmentEngine::default();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap());
    let mut rng = StdRng::seed_from_u64(5);

    let quiz = engine.build_quiz("Node.js", Difficulty::Beginner, &mut rng).unwrap();
    assert_eq!(quiz.questions.len(), 5);
    assert_eq!(quiz.skill_id, "node-js");

    let mut answers: Vec<Option<usize>> = vec![None; 5];
    assert!(matches!(
        engine.score(&quiz, &answers, "profile-1", &clock, &mut rng),
        Err(EngineError::IncompleteSubmission { .. })
    ));

    for (answer, question) in answers.iter_mut().zip(&quiz.questions).take(4) {
        *answer = Some(question.correct_answer_index);
    }
    answers[4] = Some((quiz.questions[4].correct_answer_index + 1) % 4);
    let result = engine.score(&quiz, &answers, "profile-1", &clock, &mut rng).unwrap();
    assert_eq!(result.score, 80);
    assert_eq!(result.missed_questions, vec![4]);
    assert_eq!(result.assessment.completed_at, clock.0);
    assert_eq!(result.assessment.skill_name, "Node.js");
    assert!(!result.assessment.recommended_resources.is_empty());
}
