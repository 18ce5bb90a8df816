//! Builds and their inputs

use serde::{Deserialize, Serialize};

use crate::impl_status_conversions;

/// A single run of a job (or a one-off / check build).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub start_time: i64,
    pub end_time: i64,
    pub team_name: String,
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub job_name: String,
    pub inputs: Vec<BuildInput>,
    #[serde(rename = "api_url")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Build {
    /// Parsed `status`; `None` for values this client does not know.
    #[must_use]
    pub fn parsed_status(&self) -> Option<BuildStatus> {
        self.status.parse().ok()
    }

    /// Whether the build has reached a final state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.parsed_status().is_some_and(BuildStatus::is_terminal)
    }
}

/// A resource consumed by a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInput {
    pub name: String,
    pub resource: String,
    pub trigger: bool,
}

/// Lifecycle state reported in `Build::status` and in `status` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Pending,
    Started,
    Succeeded,
    Failed,
    Errored,
    Aborted,
}

impl_status_conversions!(BuildStatus {
    Pending => "pending",
    Started => "started",
    Succeeded => "succeeded",
    Failed => "failed",
    Errored => "errored",
    Aborted => "aborted",
});

impl BuildStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_decodes_api_url_and_inputs() {
        let build: Build = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "12",
                "status": "succeeded",
                "job_name": "unit",
                "api_url": "/api/v1/builds/42",
                "inputs": [{"name": "repo", "resource": "repo", "trigger": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(build.url, "/api/v1/builds/42");
        assert_eq!(build.inputs.len(), 1);
        assert!(build.inputs[0].trigger);
        assert_eq!(build.parsed_status(), Some(BuildStatus::Succeeded));
        assert!(build.is_finished());
        assert!(build.created_by.is_none());
    }

    #[test]
    fn test_unknown_status_is_not_finished() {
        let build = Build { status: "paused-ish".to_string(), ..Default::default() };
        assert_eq!(build.parsed_status(), None);
        assert!(!build.is_finished());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!BuildStatus::Pending.is_terminal());
        assert!(!BuildStatus::Started.is_terminal());
        assert!(BuildStatus::Failed.is_terminal());
        assert!(BuildStatus::Aborted.is_terminal());
    }
}
