//! Resource list endpoints
//!
//! Every list endpoint returns a plain JSON array with no pagination, or
//! `null` for an empty list. A non-200 status is returned as [`HttpError`] with the body preserved.

use glide_domain::{
    Build, GlideError, HttpError, Job, Pipeline, Resource, ResourceVersion, Result, Team,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::client::ConcourseClient;
use crate::errors::InfraError;

impl ConcourseClient {
    /// GET an API resource and decode its JSON array body.
    ///
    /// Dropping the returned future aborts the request.
    ///
    /// # Errors
    ///
    /// - `Http` for any status other than 200, carrying the raw body
    /// - `Decode` when the body is neither `null` nor a JSON array of `T`
    /// - `Auth`, `Network` or `Config` from the dispatch itself
    #[instrument(skip(self, segments), fields(path = %segments.join("/")))]
    pub async fn list<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        let response = self.get(segments).await?;

        let status = response.status();
        let body = response.bytes().await.map_err(InfraError::from)?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "list request failed");
            return Err(HttpError::new(status.as_u16(), body.to_vec()).into());
        }

        // A `null` body is an empty list
        let items: Vec<T> = serde_json::from_slice::<Option<Vec<T>>>(&body)
            .map_err(|e| GlideError::Decode(format!("list response: {e}")))?
            .unwrap_or_default();

        debug!(count = items.len(), "list request successful");
        Ok(items)
    }

    /// All teams visible to the user.
    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.list(&["teams"]).await
    }

    pub async fn pipelines(&self, team: &str) -> Result<Vec<Pipeline>> {
        self.list(&["teams", team, "pipelines"]).await
    }

    pub async fn resources(&self, team: &str, pipeline: &str) -> Result<Vec<Resource>> {
        self.list(&["teams", team, "pipelines", pipeline, "resources"]).await
    }

    pub async fn resource_versions(
        &self,
        team: &str,
        pipeline: &str,
        resource: &str,
    ) -> Result<Vec<ResourceVersion>> {
        self.list(&["teams", team, "pipelines", pipeline, "resources", resource, "versions"])
            .await
    }

    pub async fn jobs(&self, team: &str, pipeline: &str) -> Result<Vec<Job>> {
        self.list(&["teams", team, "pipelines", pipeline, "jobs"]).await
    }

    /// Builds of one job, newest first as returned by the server.
    pub async fn job_builds(&self, team: &str, pipeline: &str, job: &str) -> Result<Vec<Build>> {
        self.list(&["teams", team, "pipelines", pipeline, "jobs", job, "builds"]).await
    }

    /// Builds that used the given resource version as an input.
    pub async fn job_builds_with_resource_version(
        &self,
        team: &str,
        pipeline: &str,
        resource: &str,
        version_id: i64,
    ) -> Result<Vec<Build>> {
        let version_id = version_id.to_string();
        self.list(&[
            "teams",
            team,
            "pipelines",
            pipeline,
            "resources",
            resource,
            "versions",
            &version_id,
            "input_to",
        ])
        .await
    }
}
