//! Records decoded from the Concourse API
//!
//! Every record is an immutable value decoded from one JSON object. Missing
//! fields fall back to their defaults so that older and newer Concourse
//! versions decode alike.

pub mod build;
pub mod event;
pub mod pipeline;
pub mod resource;

pub use build::{Build, BuildInput, BuildStatus};
pub use event::{BuildEvent, BuildEventData, BuildEventKind};
pub use pipeline::{Job, Pipeline, Team};
pub use resource::{CheckBuild, CheckPlan, CheckStep, Resource, ResourceVersion};
