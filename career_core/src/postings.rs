//! Job-data sources.
//!
//! The engine treats postings as an opaque list; an empty list is valid.

use crate::clock::Clock;
use crate::error::Result;
use crate::types::{fresh_id, CareerTrack, JobListing};
use chrono::Duration;
use rand::seq::{index, SliceRandom};
use rand::Rng;

const COMPANIES: [&str; 10] = [
    "Northwind Labs",
    "Bluepeak Software",
    "Cobalt Systems",
    "Lumen Analytics",
    "Harbor Cloud",
    "Fernway Health",
    "Quartz Finance",
    "Orbital Games",
    "Tidewater Logistics",
    "Summit Education",
];

const LOCATIONS: [&str; 8] = [
    "Remote",
    "New York, NY",
    "San Francisco, CA",
    "Austin, TX",
    "Seattle, WA",
    "Chicago, IL",
    "Boston, MA",
    "Denver, CO",
];

const SENIORITY: [&str; 3] = ["Junior ", "", "Senior "];

/// Minimum required skills per generated posting (fewer if the track has fewer)
const MIN_REQUIRED: usize = 3;
const MAX_NICE_TO_HAVE: usize = 2;
const MAX_POSTING_AGE_DAYS: i64 = 30;

pub trait JobSource {
    fn list_postings(&mut self, track: &CareerTrack) -> Result<Vec<JobListing>>;
}

/// A fixed list of postings, e.g. from a feed fetched by the caller
#[derive(Debug, Clone, Default)]
pub struct StaticPostings(pub Vec<JobListing>);

impl JobSource for StaticPostings {
    fn list_postings(&mut self, _track: &CareerTrack) -> Result<Vec<JobListing>> {
        Ok(self.0.clone())
    }
}

/// Synthesizes plausible postings for a track from the injected clock and rng
pub struct GeneratedPostings<C, R> {
    count: usize,
    clock: C,
    rng: R,
}

impl<C: Clock, R: Rng> GeneratedPostings<C, R> {
    pub fn new(count: usize, clock: C, rng: R) -> Self {
        Self { count, clock, rng }
    }
}

impl<C: Clock, R: Rng> JobSource for GeneratedPostings<C, R> {
    fn list_postings(&mut self, track: &CareerTrack) -> Result<Vec<JobListing>> {
        let now = self.clock.now();
        let rng = &mut self.rng;
        let mut postings = Vec::with_capacity(self.count);

        for _ in 0..self.count {
            let required_skills = sample_in_order(
                rng,
                &track.required_skills,
                MIN_REQUIRED.min(track.required_skills.len()),
                track.required_skills.len(),
            );
            let nice_to_have_skills = sample_in_order(
                rng,
                &track.nice_to_have_skills,
                0,
                MAX_NICE_TO_HAVE.min(track.nice_to_have_skills.len()),
            );

            let base_title = track
                .job_titles
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(track.title.as_str());
            let seniority = SENIORITY.choose(rng).copied().unwrap_or_default();
            let title = format!("{}{}", seniority, base_title);
            let company = COMPANIES.choose(rng).copied().unwrap_or_default();
            let location = LOCATIONS.choose(rng).copied().unwrap_or_default();
            let age = rng.gen_range(0..MAX_POSTING_AGE_DAYS);

            postings.push(JobListing {
                id: fresh_id(rng),
                description: format!(
                    "{} is hiring a {} to work with {}.",
                    company,
                    title,
                    required_skills.join(", ")
                ),
                title,
                company: company.to_string(),
                location: location.to_string(),
                required_skills,
                nice_to_have_skills,
                salary_range: if track.average_salary.is_empty() {
                    "Competitive".to_string()
                } else {
                    track.average_salary.clone()
                },
                posted_date: now - Duration::days(age),
            });
        }

        log::debug!(
            "Generated {} postings for track {}",
            postings.len(),
            track.id
        );
        Ok(postings)
    }
}

/// Picks between `min` and `max` items, keeping their original order
fn sample_in_order<R: Rng + ?Sized>(
    rng: &mut R,
    items: &[String],
    min: usize,
    max: usize,
) -> Vec<String> {
    if max == 0 {
        return Vec::new();
    }
    let amount = rng.gen_range(min..=max);
    let mut picked = index::sample(rng, items.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CareerCatalog;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(seed: u64, count: usize) -> GeneratedPostings<FixedClock, StdRng> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        GeneratedPostings::new(count, clock, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_generated_postings_follow_track() {
        let catalog = CareerCatalog::builtin();
        let track = catalog.track("backend").unwrap();
        let postings = source(3, 8).list_postings(track).unwrap();

        assert_eq!(postings.len(), 8);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for job in &postings {
            assert!(job.required_skills.len() >= 3);
            assert!(job
                .required_skills
                .iter()
                .all(|s| track.required_skills.contains(s)));
            assert!(job.nice_to_have_skills.len() <= 2);
            assert!(job
                .nice_to_have_skills
                .iter()
                .all(|s| track.nice_to_have_skills.contains(s)));
            assert!(job.posted_date <= now);
            assert!(job.posted_date > now - Duration::days(30));
            assert_eq!(job.salary_range, track.average_salary);
        }
    }

    #[test]
    fn test_generated_postings_keep_track_order() {
        let track = CareerTrack::new("t", "T", &["A", "B", "C", "D", "E"]);
        for job in source(11, 20).list_postings(&track).unwrap() {
            let positions: Vec<usize> = job
                .required_skills
                .iter()
                .map(|s| track.required_skills.iter().position(|t| t == s).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_seeded_postings_are_reproducible() {
        let track = CareerCatalog::builtin().track("devops").unwrap().clone();
        assert_eq!(
            source(5, 4).list_postings(&track).unwrap(),
            source(5, 4).list_postings(&track).unwrap()
        );
    }

    #[test]
    fn test_small_tracks_and_zero_count() {
        let tiny = CareerTrack::new("tiny", "Tiny", &["Only"]);
        let postings = source(1, 3).list_postings(&tiny).unwrap();
        assert!(postings.iter().all(|j| j.required_skills == vec!["Only"]));
        assert!(postings.iter().all(|j| j.title.ends_with("Tiny")));
        assert_eq!(postings[0].salary_range, "Competitive");

        assert!(source(1, 0).list_postings(&tiny).unwrap().is_empty());
    }

    #[test]
    fn test_static_postings() {
        let job = JobListing::new("j1", "Dev").with_required(&["Rust"]);
        let mut source = StaticPostings(vec![job.clone()]);
        let track = CareerTrack::new("t", "T", &["Rust"]);
        assert_eq!(source.list_postings(&track).unwrap(), vec![job]);
    }
}
