//! Teams, pipelines and jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::build::Build;

/// A Concourse team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// A pipeline belonging to a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    pub id: i64,
    pub name: String,
    pub paused: bool,
    pub public: bool,
    pub archived: bool,
    pub team_name: String,
    /// Unix seconds of the last configuration change
    pub last_updated: i64,
}

impl Pipeline {
    /// `last_updated` as a UTC timestamp; `None` if out of range.
    #[must_use]
    pub fn last_updated_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_updated, 0)
    }
}

/// A job within a pipeline, with its latest finished and transition builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub team_name: String,
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub finished_build: Option<Build>,
    pub transition_build: Option<Build>,
    pub groups: Vec<String>,
    pub has_new_inputs: bool,
}
