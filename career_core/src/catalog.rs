//! Career Catalog
//!
//! Reference data: career tracks with their required and nice-to-have
//! skills. Loaded once and shared read-only by every profile.

use crate::error::{EngineError, LoadError, Result};
use crate::types::CareerTrack;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CareerCatalog {
    pub tracks: Vec<CareerTrack>,
}

impl CareerCatalog {
    pub fn new(tracks: Vec<CareerTrack>) -> Result<Self> {
        let catalog = Self { tracks };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML document with a top-level `tracks` list
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(LoadError::from)?;
        let catalog: CareerCatalog =
            serde_yaml::from_reader(BufReader::new(file)).map_err(LoadError::from)?;
        catalog.validate()?;
        log::info!(
            "Loaded {} career tracks from {}",
            catalog.tracks.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn track(&self, id: &str) -> Result<&CareerTrack> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::not_found("Career track", id))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for track in &self.tracks {
            if !seen.insert(track.id.as_str()) {
                return Err(EngineError::invalid(format!(
                    "duplicate career track id '{}'",
                    track.id
                )));
            }
            if track.required_skills.is_empty() {
                log::warn!(
                    "Career track '{}' has no required skills; roadmaps cannot be generated for it",
                    track.id
                );
            }
        }
        Ok(())
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self {
            tracks: vec![
                track(
                    "frontend",
                    "Frontend Developer",
                    "Build accessible, responsive user interfaces for the web",
                    &["HTML", "CSS", "JavaScript", "React", "TypeScript", "Testing"],
                    &["Next.js", "Tailwind CSS", "GraphQL", "Figma"],
                    &["Frontend Developer", "UI Engineer", "React Developer"],
                    "$85,000 - $130,000",
                ),
                track(
                    "backend",
                    "Backend Developer",
                    "Design APIs, data models and services that power applications",
                    &["Node.js", "SQL", "REST APIs", "Git", "Docker", "System Design"],
                    &["Redis", "Kubernetes", "GraphQL", "AWS"],
                    &["Backend Developer", "API Engineer", "Software Engineer"],
                    "$95,000 - $145,000",
                ),
                track(
                    "fullstack",
                    "Full-Stack Developer",
                    "Ship features end to end, from database to browser",
                    &["JavaScript", "React", "Node.js", "SQL", "Git", "REST APIs"],
                    &["TypeScript", "Docker", "AWS", "MongoDB"],
                    &["Full-Stack Developer", "Software Engineer", "Web Developer"],
                    "$90,000 - $140,000",
                ),
                track(
                    "data-science",
                    "Data Scientist",
                    "Turn data into models, forecasts and decisions",
                    &["Python", "Statistics", "SQL", "Pandas", "Machine Learning", "Data Visualization"],
                    &["Deep Learning", "Spark", "TensorFlow", "Tableau"],
                    &["Data Scientist", "Data Analyst", "ML Engineer"],
                    "$100,000 - $160,000",
                ),
                track(
                    "devops",
                    "DevOps Engineer",
                    "Automate delivery and keep infrastructure reliable",
                    &["Linux", "Git", "Docker", "Kubernetes", "CI/CD", "Terraform"],
                    &["AWS", "Prometheus", "Python", "Ansible"],
                    &["DevOps Engineer", "Site Reliability Engineer", "Platform Engineer"],
                    "$100,000 - $155,000",
                ),
                track(
                    "mobile",
                    "Mobile Developer",
                    "Build native and cross-platform mobile applications",
                    &["JavaScript", "React Native", "Swift", "Kotlin", "REST APIs", "Git"],
                    &["Flutter", "Firebase", "TypeScript", "GraphQL"],
                    &["Mobile Developer", "iOS Developer", "Android Developer"],
                    "$90,000 - $140,000",
                ),
            ],
        }
    }
}

fn track(
    id: &str,
    title: &str,
    description: &str,
    required: &[&str],
    nice_to_have: &[&str],
    job_titles: &[&str],
    average_salary: &str,
) -> CareerTrack {
    let to_vec = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    CareerTrack {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        required_skills: to_vec(required),
        nice_to_have_skills: to_vec(nice_to_have),
        job_titles: to_vec(job_titles),
        average_salary: average_salary.to_string(),
    }
}
