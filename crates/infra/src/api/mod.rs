//! Concourse API client
//!
//! This module provides the authenticated client for the Concourse HTTP API.
//!
//! # Architecture
//!
//! - [`client`]: connection settings, run-once setup, request dispatch
//! - [`fetch`]: list endpoints (teams, pipelines, jobs, builds, resources)
//! - [`events`]: build event streaming over server-sent events
//!
//! Requests go through [`AuthenticatedTransport`](crate::http::AuthenticatedTransport),
//! which asks the token cache for a valid token before each send. Nothing
//! is retried.

pub mod client;
pub mod events;
pub mod fetch;

pub use client::{ConcourseClient, ConcourseClientBuilder};
pub use events::{
    event_channel, forward_events, BuildEventStream, EventReader, EventSender, RawEvent, SseReader,
};
