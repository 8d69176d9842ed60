//! Engine policy constants.
//!
//! Defaults reproduce the reference behavior exactly; a YAML file may
//! override any subset of them.

use crate::error::{EngineError, LoadError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Relative weight of required vs nice-to-have skill coverage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchWeights {
    pub required: f64,
    pub nice_to_have: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            required: 0.7,
            nice_to_have: 0.3,
        }
    }
}

impl MatchWeights {
    pub fn validate(&self) -> Result<()> {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if !in_range(self.required) || !in_range(self.nice_to_have) {
            return Err(EngineError::invalid("match weights must lie in [0, 1]"));
        }
        if (self.required + self.nice_to_have - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EngineError::invalid(format!(
                "match weights must sum to 1.0, got {}",
                self.required + self.nice_to_have
            )));
        }
        Ok(())
    }
}

/// Shape of a generated roadmap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadmapTemplate {
    pub duration_weeks: u32,
    pub days_per_week: u32,
    pub estimated_hours_per_day: u32,
    /// Weeks with `index % project_every_weeks == 0` get a project
    pub project_every_weeks: u32,
}

impl Default for RoadmapTemplate {
    fn default() -> Self {
        Self {
            duration_weeks: 12,
            days_per_week: 5,
            estimated_hours_per_day: 2,
            project_every_weeks: 3,
        }
    }
}

impl RoadmapTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.duration_weeks == 0 {
            return Err(EngineError::invalid("duration_weeks must be at least 1"));
        }
        if !(1..=7).contains(&self.days_per_week) {
            return Err(EngineError::invalid(format!(
                "days_per_week must be between 1 and 7, got {}",
                self.days_per_week
            )));
        }
        if self.project_every_weeks == 0 {
            return Err(EngineError::invalid("project_every_weeks must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub match_weights: MatchWeights,
    pub roadmap: RoadmapTemplate,
    /// Length of the ranked skill-gap list
    pub gap_top_n: usize,
    pub default_question_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_weights: MatchWeights::default(),
            roadmap: RoadmapTemplate::default(),
            gap_top_n: 5,
            default_question_count: 5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.match_weights.validate()?;
        self.roadmap.validate()?;
        if self.default_question_count == 0 {
            return Err(EngineError::invalid("default_question_count must be at least 1"));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml).map_err(LoadError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(LoadError::from)?;
        let config: EngineConfig =
            serde_yaml::from_reader(BufReader::new(file)).map_err(LoadError::from)?;
        config.validate()?;
        log::debug!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }
}
