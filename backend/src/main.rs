//! Career Agent - Command-line Entry Point
//!
//! Profiles, track exploration, roadmaps and skill quizzes against a local
//! SQLite database. Output is JSON on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use career_agent::{
    AppConfig, CareerService, EnvIdentity, IdentityProvider, MemoryStore, SqliteStore,
    StaticIdentity,
};
use career_core::{Difficulty, Profile, Roadmap};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "career-agent")]
#[command(about = "Career alignment: job matching, skill gaps, roadmaps and quizzes")]
#[command(version)]
struct Cli {
    /// SQLite database path (overrides CAREER_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Act as this user (overrides CAREER_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Seed for reproducible ids and quizzes (overrides CAREER_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the career tracks in the catalog
    Tracks,

    /// Show or replace the learner profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Score postings for a track and rank the missing skills
    Explore {
        #[arg(short, long)]
        track: String,

        /// JSON file with a list of postings; generated when omitted
        #[arg(long)]
        postings: Option<PathBuf>,

        /// Number of generated postings
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Generate, inspect and update learning roadmaps
    Roadmap {
        #[command(subcommand)]
        action: RoadmapAction,
    },

    /// Take skill quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizAction,
    },

    /// Past assessment results
    History,

    /// Activity timeline
    Timeline {
        /// Only events from the last N days
        #[arg(long)]
        days: Option<i64>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Replace the profile with the JSON document in FILE
    Set {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RoadmapAction {
    /// Create a roadmap, replacing any existing one for the track
    Generate {
        #[arg(short, long)]
        track: String,
        #[arg(long)]
        weeks: Option<u32>,
        #[arg(long)]
        days: Option<u32>,
    },
    Show {
        #[arg(short, long)]
        track: String,
    },
    /// Flip a task between done and not done
    Toggle {
        #[arg(short, long)]
        track: String,
        /// 1-based week number
        #[arg(long)]
        week: usize,
        #[arg(long)]
        day: String,
        #[arg(long)]
        task: String,
    },
}

#[derive(Subcommand)]
enum QuizAction {
    Start {
        #[arg(short, long)]
        skill: String,
        #[arg(short, long, default_value = "beginner")]
        difficulty: Difficulty,
        #[arg(long)]
        questions: Option<usize>,
    },
    /// Submit answers such as "0,2,1,3"; "-" leaves a question unanswered
    Submit {
        #[arg(long)]
        quiz: String,
        #[arg(long)]
        answers: String,
    },
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let user = match cli.user {
        Some(user) => StaticIdentity::new(user).current_user()?,
        None => EnvIdentity.current_user()?,
    };

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let memory = MemoryStore::open(&config.db_path)
        .with_context(|| format!("opening timeline in {}", config.db_path.display()))?;
    let mut service = CareerService::new(
        Box::new(store),
        memory,
        config.load_catalog().context("loading career catalog")?,
        config.load_engine_config().context("loading engine config")?,
    )?;
    if let Some(seed) = config.seed {
        service = service.with_seed(seed);
    }

    match cli.command {
        Commands::Tracks => print_json(&service.catalog().tracks),
        Commands::Profile { action } => match action {
            ProfileAction::Show => print_json(&service.load_profile(&user)?),
            ProfileAction::Set { file } => {
                let raw = fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                let mut profile: Profile = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing profile in {}", file.display()))?;
                profile.user_id = user.clone();
                service.save_profile(&profile)?;
                print_json(&profile)
            }
        },
        Commands::Explore {
            track,
            postings,
            count,
        } => {
            let exploration = match postings {
                Some(file) => {
                    let raw = fs::read_to_string(&file)
                        .with_context(|| format!("reading {}", file.display()))?;
                    let listings = serde_json::from_str(&raw)
                        .with_context(|| format!("parsing postings in {}", file.display()))?;
                    let mut source = career_core::StaticPostings(listings);
                    service.explore_track(&user, &track, &mut source)?
                }
                None => {
                    let mut source = service.generated_postings(count);
                    service.explore_track(&user, &track, &mut source)?
                }
            };
            print_json(&exploration)
        }
        Commands::Roadmap { action } => match action {
            RoadmapAction::Generate { track, weeks, days } => {
                print_json(&service.generate_roadmap(&user, &track, weeks, days)?)
            }
            RoadmapAction::Show { track } => {
                print_json(&roadmap_view(&service.load_roadmap(&user, &track)?))
            }
            RoadmapAction::Toggle {
                track,
                week,
                day,
                task,
            } => {
                if week == 0 {
                    bail!("weeks are numbered from 1");
                }
                let completed = service.toggle_task(&user, &track, week - 1, &day, &task)?;
                print_json(&json!({ "task_id": task, "completed": completed }))
            }
        },
        Commands::Quiz { action } => match action {
            QuizAction::Start {
                skill,
                difficulty,
                questions,
            } => print_json(&service.start_quiz(&user, &skill, difficulty, questions)?),
            QuizAction::Submit { quiz, answers } => {
                let answers = parse_answers(&answers)?;
                print_json(&service.submit_quiz(&user, &quiz, &answers)?)
            }
        },
        Commands::History => print_json(&service.assessment_history(&user)?),
        Commands::Timeline { days } => {
            let memory = service.timeline(&user)?;
            match days {
                Some(days) => print_json(&memory.events_since(days, chrono::Utc::now())),
                None => print_json(&memory.timeline),
            }
        }
    }
}

/// A stored roadmap together with its completion figures
fn roadmap_view(roadmap: &Roadmap) -> serde_json::Value {
    json!({ "progress": roadmap.progress(), "roadmap": roadmap })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_answers(raw: &str) -> Result<Vec<Option<usize>>> {
    raw.split(',')
        .map(str::trim)
        .map(|answer| match answer {
            "-" | "" => Ok(None),
            index => index
                .parse()
                .map(Some)
                .with_context(|| format!("invalid answer '{}'", index)),
        })
        .collect()
}
