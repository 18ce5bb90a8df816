//! Resources and their versions

use serde::{Deserialize, Serialize};

/// A resource declared in a pipeline, with the build of its last check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub team_name: String,
    pub last_checked: i64,
    pub build: Option<CheckBuild>,
}

/// The check build attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckBuild {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub start_time: i64,
    pub end_time: i64,
    pub team_name: String,
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub plan: CheckPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckPlan {
    pub id: String,
    pub check: CheckStep,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckStep {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One discovered version of a resource.
///
/// `version` is resource-type specific, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceVersion {
    pub id: i64,
    pub version: serde_json::Value,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_decodes_nested_check_build() {
        let resource: Resource = serde_json::from_str(
            r#"{
                "name": "repo",
                "type": "git",
                "pipeline_name": "main",
                "build": {
                    "id": 99,
                    "status": "succeeded",
                    "plan": {"id": "abc", "check": {"name": "repo", "type": "git"}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(resource.kind, "git");
        let build = resource.build.unwrap();
        assert_eq!(build.id, 99);
        assert_eq!(build.plan.id, "abc");
        assert_eq!(build.plan.check.kind, "git");
    }

    #[test]
    fn test_resource_version_keeps_raw_version() {
        let version: ResourceVersion =
            serde_json::from_str(r#"{"id": 3, "version": {"ref": "d34db33f"}, "enabled": true}"#)
                .unwrap();
        assert_eq!(version.version["ref"], "d34db33f");
        assert!(version.enabled);
    }
}
