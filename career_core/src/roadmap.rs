//! Learning Roadmap Generator
//!
//! Expands a career track into a dated week → day → task curriculum.
//!
//! Generation is a fixed template expansion, not a search:
//! - week `w` is themed on `required_skills[w mod n]` and lists objectives
//!   for the skills at offsets `w`, `w+1`, `w+2`
//! - day `d` of every week focuses on `required_skills[d mod n]` and carries
//!   exactly one video, one article, one exercise and one project task
//! - every `project_every_weeks`-th week (starting with the first) gets a project
//!
//! Only `Task::completed` is mutable state. A day's completion is always
//! computed from its tasks.

use crate::clock::Clock;
use crate::config::RoadmapTemplate;
use crate::error::{EngineError, Result};
use crate::types::{fresh_id, CareerTrack, LearningStyle, Profile};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

const DAY_FOCUS: [&str; 7] = [
    "Fundamentals",
    "Core Concepts",
    "Hands-on Practice",
    "Patterns and Best Practices",
    "Review and Build",
    "Deep Dive",
    "Project Time",
];

// ============================================================
// ROADMAP STRUCTURES
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    Article,
    Course,
    Documentation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Exercise,
    Project,
    Reading,
    Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub task_type: TaskType,
    pub completed: bool,
}

/// One study day. Serializes a computed `completed` field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DailyPlan {
    pub id: String,
    /// 1-based position within the week
    pub day_number: u32,
    pub title: String,
    pub description: String,
    pub estimated_hours: u32,
    pub resources: Vec<Resource>,
    pub tasks: Vec<Task>,
}

impl DailyPlan {
    /// True iff every task is done; a day without tasks has nothing left to do
    pub fn completed(&self) -> bool {
        self.tasks.iter().all(|t| t.completed)
    }
}

impl Serialize for DailyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DailyPlan", 8)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("day_number", &self.day_number)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("estimated_hours", &self.estimated_hours)?;
        state.serialize_field("resources", &self.resources)?;
        state.serialize_field("tasks", &self.tasks)?;
        state.serialize_field("completed", &self.completed())?;
        state.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapWeek {
    /// 1-based
    pub week_number: u32,
    pub theme_skill: String,
    pub learning_objectives: Vec<String>,
    pub daily_plans: Vec<DailyPlan>,
    pub project_id: Option<String>,
}

/// Aggregate completion figures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapProgress {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_days: usize,
    pub completed_days: usize,
    /// round(completed_tasks / total_tasks × 100), 0 when there are no tasks
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roadmap {
    pub id: String,
    pub profile_id: String,
    pub track_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub weeks: Vec<RoadmapWeek>,
    pub last_updated: DateTime<Utc>,
}

impl Roadmap {
    /// Flips one task and returns its new state.
    ///
    /// Unknown week index, day id or task id leave the roadmap untouched
    /// and report `NotFound`.
    pub fn toggle_task(&mut self, week_index: usize, day_id: &str, task_id: &str) -> Result<bool> {
        let week = self
            .weeks
            .get_mut(week_index)
            .ok_or_else(|| EngineError::not_found("Roadmap week", week_index.to_string()))?;
        let day = week
            .daily_plans
            .iter_mut()
            .find(|d| d.id == day_id)
            .ok_or_else(|| EngineError::not_found("Daily plan", day_id))?;
        let task = day
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| EngineError::not_found("Task", task_id))?;

        task.completed = !task.completed;
        let now_completed = task.completed;
        log::debug!(
            "Task {} in week {} marked {}; day complete: {}",
            task_id,
            week_index + 1,
            if now_completed { "done" } else { "not done" },
            day.completed()
        );
        Ok(now_completed)
    }

    pub fn progress(&self) -> RoadmapProgress {
        let days = self.weeks.iter().flat_map(|w| &w.daily_plans);
        let mut progress = RoadmapProgress {
            total_tasks: 0,
            completed_tasks: 0,
            total_days: 0,
            completed_days: 0,
            percent: 0,
        };
        for day in days {
            progress.total_days += 1;
            if day.completed() {
                progress.completed_days += 1;
            }
            progress.total_tasks += day.tasks.len();
            progress.completed_tasks += day.tasks.iter().filter(|t| t.completed).count();
        }
        if progress.total_tasks > 0 {
            let ratio = progress.completed_tasks as f64 / progress.total_tasks as f64;
            progress.percent = (ratio * 100.0).round() as u8;
        }
        progress
    }

    /// 1-based week containing `now`, clamped to the roadmap's range
    pub fn current_week(&self, now: DateTime<Utc>) -> u32 {
        let last = self.weeks.len().max(1) as i64;
        let elapsed_weeks = (now - self.start_date).num_days().div_euclid(7);
        (elapsed_weeks + 1).clamp(1, last) as u32
    }
}

// ============================================================
// GENERATOR
// ============================================================

#[derive(Debug, Clone, Default)]
pub struct RoadmapGenerator {
    template: RoadmapTemplate,
}

impl RoadmapGenerator {
    pub fn new(template: RoadmapTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &RoadmapTemplate {
        &self.template
    }

    /// Generate a roadmap with the template's default duration
    pub fn generate<C, R>(
        &self,
        profile: &Profile,
        track: &CareerTrack,
        clock: &C,
        rng: &mut R,
    ) -> Result<Roadmap>
    where
        C: Clock + ?Sized,
        R: Rng + ?Sized,
    {
        self.generate_with(
            profile,
            track,
            self.template.duration_weeks,
            self.template.days_per_week,
            clock,
            rng,
        )
    }

    /// Same clock value and rng state produce an identical roadmap
    pub fn generate_with<C, R>(
        &self,
        profile: &Profile,
        track: &CareerTrack,
        duration_weeks: u32,
        days_per_week: u32,
        clock: &C,
        rng: &mut R,
    ) -> Result<Roadmap>
    where
        C: Clock + ?Sized,
        R: Rng + ?Sized,
    {
        let template = RoadmapTemplate {
            duration_weeks,
            days_per_week,
            ..self.template
        };
        template.validate()?;
        if track.required_skills.is_empty() {
            return Err(EngineError::invalid(format!(
                "career track '{}' has no required skills",
                track.id
            )));
        }

        let now = clock.now();
        let skills = &track.required_skills;
        let skill_at = move |i: usize| skills[i % skills.len()].as_str();

        let mut weeks = Vec::with_capacity(duration_weeks as usize);
        for w in 0..duration_weeks as usize {
            let theme = skill_at(w);
            let learning_objectives = vec![
                format!("Understand the fundamentals of {}", skill_at(w)),
                format!("Apply {} in hands-on exercises", skill_at(w + 1)),
                format!(
                    "Connect {} with the rest of the {} toolkit",
                    skill_at(w + 2),
                    track.title
                ),
            ];

            let mut daily_plans = Vec::with_capacity(days_per_week as usize);
            for d in 0..days_per_week as usize {
                daily_plans.push(self.daily_plan(profile, track, w, d, skill_at(d), theme, rng));
            }

            let project_id = (w % template.project_every_weeks as usize == 0).then(|| {
                format!(
                    "{}-project-{}",
                    track.id,
                    w / template.project_every_weeks as usize + 1
                )
            });

            weeks.push(RoadmapWeek {
                week_number: w as u32 + 1,
                theme_skill: theme.to_string(),
                learning_objectives,
                daily_plans,
                project_id,
            });
        }

        let roadmap = Roadmap {
            id: fresh_id(rng),
            profile_id: profile.id.clone(),
            track_id: track.id.clone(),
            start_date: now,
            end_date: now + Duration::weeks(duration_weeks as i64),
            weeks,
            last_updated: now,
        };
        log::info!(
            "Generated {}-week roadmap for profile {} on track {}",
            duration_weeks,
            profile.id,
            track.id
        );
        Ok(roadmap)
    }

    #[allow(clippy::too_many_arguments)]
    fn daily_plan<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        track: &CareerTrack,
        week: usize,
        day: usize,
        skill: &str,
        theme: &str,
        rng: &mut R,
    ) -> DailyPlan {
        let focus = DAY_FOCUS[day % DAY_FOCUS.len()];
        let description = format!(
            "Study {} ({}) as part of your {} path. Week {} theme: {}. {}",
            skill,
            focus.to_lowercase(),
            track.title,
            week + 1,
            theme,
            style_hint(profile.learning_style)
        );

        let resources = vec![
            Resource {
                title: format!("{} {}: video walkthrough", skill, focus),
                resource_type: ResourceType::Video,
                url: format!(
                    "https://www.youtube.com/results?search_query={}",
                    search_query(&format!("{} {} tutorial", skill, focus))
                ),
            },
            Resource {
                title: format!("{} {}: written guide", skill, focus),
                resource_type: ResourceType::Article,
                url: format!(
                    "https://dev.to/search?q={}",
                    search_query(&format!("{} {}", skill, focus))
                ),
            },
        ];

        let tasks = vec![
            Task {
                id: fresh_id(rng),
                title: format!("Complete three {} practice exercises", skill),
                task_type: TaskType::Exercise,
                completed: false,
            },
            Task {
                id: fresh_id(rng),
                title: format!("Use {} in your {} project", skill, track.title),
                task_type: TaskType::Project,
                completed: false,
            },
        ];

        DailyPlan {
            id: fresh_id(rng),
            day_number: day as u32 + 1,
            title: format!("{}: {}", skill, focus),
            description,
            estimated_hours: self.template.estimated_hours_per_day,
            resources,
            tasks,
        }
    }
}

fn style_hint(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Visual => "Start with the video and sketch a diagram of what you learn.",
        LearningStyle::Auditory => "Watch the video first and explain the topic out loud.",
        LearningStyle::Reading => "Start with the written guide and take notes.",
        LearningStyle::HandsOn => "Skim the material, then go straight to the exercises.",
        LearningStyle::Mixed => "Mix the video, the guide and the exercises as you prefer.",
    }
}

fn search_query(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| match c {
                    '+' => "%2B".to_string(),
                    '#' => "%23".to_string(),
                    '/' => "%2F".to_string(),
                    '&' => "%26".to_string(),
                    c => c.to_string(),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("+")
}
