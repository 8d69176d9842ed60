//! Skill Assessment Engine
//!
//! Builds multiple-choice quizzes for a skill and scores submissions.
//!
//! Scoring: score = round(correct / question_count × 100)
//!
//! A submission with any unanswered question is blocked, never scored low.

use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::types::{fresh_id, SkillAssessment};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn time_limit_minutes(&self) -> u32 {
        match self {
            Difficulty::Beginner => 10,
            Difficulty::Intermediate => 15,
            Difficulty::Advanced => 20,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(EngineError::invalid(format!("unknown difficulty '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

/// A generated quiz. Immutable for the session it was built for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub skill_id: String,
    pub skill_name: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    pub time_limit_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizResult {
    pub score: u8,
    pub assessment: SkillAssessment,
    /// Indices of questions answered incorrectly
    pub missed_questions: Vec<usize>,
}

// ============================================================
// QUESTION TEMPLATES
// ============================================================

/// `{skill}` is replaced with the assessed skill's name
struct QuestionTemplate {
    prompt: &'static str,
    correct: &'static str,
    distractors: [&'static str; 3],
    explanation: &'static str,
}

const BEGINNER: &[QuestionTemplate] = &[
    QuestionTemplate {
        prompt: "What is the best first step when starting to learn {skill}?",
        correct: "Work through the official getting-started guide",
        distractors: [
            "Memorize the full API reference",
            "Start with the most advanced features",
            "Skip the basics and read the source code",
        ],
        explanation: "Official introductory material covers the core concepts in a sensible order.",
    },
    QuestionTemplate {
        prompt: "Where should you look first for authoritative information about {skill}?",
        correct: "The official {skill} documentation",
        distractors: [
            "A random forum thread",
            "An outdated blog post",
            "Social media comments",
        ],
        explanation: "Official documentation is maintained alongside the technology itself.",
    },
    QuestionTemplate {
        prompt: "Which habit helps most when practicing {skill}?",
        correct: "Building small projects regularly",
        distractors: [
            "Reading without writing any code",
            "Practicing once a month for many hours",
            "Copying solutions without running them",
        ],
        explanation: "Frequent hands-on practice builds lasting understanding.",
    },
    QuestionTemplate {
        prompt: "You get an error you do not understand while using {skill}. What do you do first?",
        correct: "Read the error message carefully and reproduce the problem",
        distractors: [
            "Reinstall everything",
            "Ignore it and continue",
            "Rewrite the whole project",
        ],
        explanation: "Error messages usually point directly at the cause.",
    },
    QuestionTemplate {
        prompt: "Why is version control useful when learning {skill}?",
        correct: "It lets you track changes and return to working states",
        distractors: [
            "It makes programs run faster",
            "It replaces the need for testing",
            "It is only useful for large teams",
        ],
        explanation: "Version history makes experimentation safe.",
    },
];

const INTERMEDIATE: &[QuestionTemplate] = &[
    QuestionTemplate {
        prompt: "How should you structure a growing {skill} codebase?",
        correct: "Split it into cohesive modules with clear responsibilities",
        distractors: [
            "Keep everything in a single file",
            "Group files alphabetically",
            "Duplicate code so modules never depend on each other",
        ],
        explanation: "Cohesive modules keep change local and code easy to navigate.",
    },
    QuestionTemplate {
        prompt: "What is the main benefit of automated tests in a {skill} project?",
        correct: "They catch regressions before changes are released",
        distractors: [
            "They remove the need for code review",
            "They make the code shorter",
            "They guarantee the absence of bugs",
        ],
        explanation: "Tests give fast feedback when existing behavior breaks.",
    },
    QuestionTemplate {
        prompt: "A {skill} feature is slow. What is the right first step?",
        correct: "Measure and profile to find the actual bottleneck",
        distractors: [
            "Rewrite it in another language",
            "Add caching everywhere",
            "Buy faster hardware",
        ],
        explanation: "Optimization without measurement usually targets the wrong code.",
    },
    QuestionTemplate {
        prompt: "When is it appropriate to add a third-party library to a {skill} project?",
        correct: "When it is well maintained and solves a real need better than custom code",
        distractors: [
            "Whenever a library exists for the task",
            "Never, everything should be written from scratch",
            "Only when it is the newest release available",
        ],
        explanation: "Dependencies carry maintenance cost and should earn their place.",
    },
    QuestionTemplate {
        prompt: "What makes a code review of {skill} code most effective?",
        correct: "Small, focused changes with a clear description",
        distractors: [
            "Large changes reviewed all at once",
            "Reviews done only after release",
            "Approving without reading to save time",
        ],
        explanation: "Small changes are easier to understand and verify.",
    },
];

const ADVANCED: &[QuestionTemplate] = &[
    QuestionTemplate {
        prompt: "How do you evaluate a design trade-off in a {skill} system?",
        correct: "Compare options against explicit requirements and constraints",
        distractors: [
            "Choose whatever is most popular",
            "Pick the option with the most features",
            "Defer every decision indefinitely",
        ],
        explanation: "Trade-offs only make sense relative to concrete requirements.",
    },
    QuestionTemplate {
        prompt: "A production incident involves your {skill} service. What comes first?",
        correct: "Mitigate user impact, then investigate the root cause",
        distractors: [
            "Find someone to blame",
            "Ship a large refactor immediately",
            "Wait for the issue to resolve itself",
        ],
        explanation: "Restoring service takes priority; analysis follows.",
    },
    QuestionTemplate {
        prompt: "How should breaking changes to a shared {skill} interface be introduced?",
        correct: "Version the interface and give consumers a migration path",
        distractors: [
            "Change it silently",
            "Remove the old behavior without notice",
            "Fork the project for every consumer",
        ],
        explanation: "Versioning lets consumers upgrade on their own schedule.",
    },
    QuestionTemplate {
        prompt: "What best indicates a {skill} system is ready to scale?",
        correct: "Load tests and monitoring show headroom under expected traffic",
        distractors: [
            "It works on a developer laptop",
            "It uses the latest framework version",
            "The codebase is large",
        ],
        explanation: "Measured capacity is the only reliable readiness signal.",
    },
    QuestionTemplate {
        prompt: "How do you mentor a teammate new to {skill}?",
        correct: "Pair on real tasks and explain the reasoning behind decisions",
        distractors: [
            "Hand over the documentation and leave",
            "Do all their work for them",
            "Only point out mistakes after release",
        ],
        explanation: "Shared work with explained reasoning transfers judgment, not just facts.",
    },
];

fn templates_for(difficulty: Difficulty) -> &'static [QuestionTemplate] {
    match difficulty {
        Difficulty::Beginner => BEGINNER,
        Difficulty::Intermediate => INTERMEDIATE,
        Difficulty::Advanced => ADVANCED,
    }
}

/// Lowercase, dash-separated identifier for a skill name
pub fn skill_slug(skill: &str) -> String {
    let mut slug = String::with_capacity(skill.len());
    for c in skill.trim().chars() {
        match c {
            '+' => slug.push_str("plus"),
            '#' => slug.push_str("sharp"),
            c if c.is_alphanumeric() => slug.extend(c.to_lowercase()),
            _ if !slug.ends_with('-') && !slug.is_empty() => slug.push('-'),
            _ => {}
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Study resources for a skill. Depends on the skill name only.
pub fn recommended_resources(skill: &str) -> Vec<String> {
    vec![
        format!("{} official documentation", skill),
        format!("{} fundamentals video course", skill),
        format!("Interactive {} exercises", skill),
        format!("Build a small portfolio project with {}", skill),
    ]
}

// ============================================================
// ENGINE
// ============================================================

#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    question_count: usize,
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl AssessmentEngine {
    pub fn new(question_count: usize) -> Self {
        Self { question_count }
    }

    pub fn build_quiz<R: Rng + ?Sized>(
        &self,
        skill: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Quiz> {
        self.build_quiz_with(skill, difficulty, self.question_count, rng)
    }

    /// Option order is shuffled with `rng`; a fixed seed gives the same quiz
    pub fn build_quiz_with<R: Rng + ?Sized>(
        &self,
        skill: &str,
        difficulty: Difficulty,
        question_count: usize,
        rng: &mut R,
    ) -> Result<Quiz> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(EngineError::invalid("quiz skill must not be blank"));
        }
        if question_count == 0 {
            return Err(EngineError::invalid("a quiz needs at least one question"));
        }

        let templates = templates_for(difficulty);
        let questions = (0..question_count)
            .map(|i| {
                let template = &templates[i % templates.len()];
                let fill = |text: &str| text.replace("{skill}", skill);

                let mut order: Vec<usize> = (0..OPTIONS_PER_QUESTION).collect();
                order.shuffle(rng);
                let options = order
                    .iter()
                    .map(|&o| match o {
                        0 => fill(template.correct),
                        n => fill(template.distractors[n - 1]),
                    })
                    .collect();
                let correct_answer_index = order.iter().position(|&o| o == 0).unwrap_or(0);

                Question {
                    question: fill(template.prompt),
                    options,
                    correct_answer_index,
                    explanation: fill(template.explanation),
                }
            })
            .collect();

        Ok(Quiz {
            id: fresh_id(rng),
            title: format!("{} {} Assessment", skill, difficulty),
            skill_id: skill_slug(skill),
            skill_name: skill.to_string(),
            difficulty,
            questions,
            time_limit_minutes: difficulty.time_limit_minutes(),
        })
    }

    /// Scores a complete submission and produces the assessment record.
    ///
    /// `None` marks an unanswered question.
    pub fn score<C, R>(
        &self,
        quiz: &Quiz,
        answers: &[Option<usize>],
        profile_id: &str,
        clock: &C,
        rng: &mut R,
    ) -> Result<QuizResult>
    where
        C: Clock + ?Sized,
        R: Rng + ?Sized,
    {
        let question_count = quiz.questions.len();
        if question_count == 0 {
            return Err(EngineError::invalid(format!("quiz {} has no questions", quiz.id)));
        }
        if answers.len() != question_count {
            return Err(EngineError::invalid(format!(
                "expected {} answers, got {}",
                question_count,
                answers.len()
            )));
        }

        let unanswered: Vec<usize> = answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(i, _)| i)
            .collect();
        if !unanswered.is_empty() {
            log::warn!(
                "Blocked submission for quiz {}: {} unanswered",
                quiz.id,
                unanswered.len()
            );
            return Err(EngineError::IncompleteSubmission { unanswered });
        }

        let mut missed_questions = Vec::new();
        for (i, (question, answer)) in quiz.questions.iter().zip(answers).enumerate() {
            let Some(answer) = *answer else {
                return Err(EngineError::IncompleteSubmission { unanswered: vec![i] });
            };
            if answer >= question.options.len() {
                return Err(EngineError::invalid(format!(
                    "answer {} to question {} is out of range 0..{}",
                    answer,
                    i + 1,
                    question.options.len()
                )));
            }
            if answer != question.correct_answer_index {
                missed_questions.push(i);
            }
        }

        let correct = question_count - missed_questions.len();
        let score = (correct as f64 / question_count as f64 * 100.0).round() as u8;

        let assessment = SkillAssessment {
            id: fresh_id(rng),
            profile_id: profile_id.to_string(),
            skill_id: quiz.skill_id.clone(),
            skill_name: quiz.skill_name.clone(),
            score,
            completed_at: clock.now(),
            recommended_resources: recommended_resources(&quiz.skill_name),
        };
        log::info!(
            "Quiz {} scored {} for profile {} ({}/{} correct)",
            quiz.id,
            score,
            profile_id,
            correct,
            question_count
        );

        Ok(QuizResult {
            score,
            assessment,
            missed_questions,
        })
    }
}
