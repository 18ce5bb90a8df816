//! Example: Walking teams, pipelines and jobs
//!
//! Lists every team the user can see, its pipelines, and the latest
//! finished build of each job.
//!
//! # Setup
//!
//! ```bash
//! export CONCOURSE_URL=https://ci.example.com
//! export CONCOURSE_USERNAME=admin
//! export CONCOURSE_PASSWORD=secret
//! RUST_LOG=glide_infra=debug cargo run -p glide-infra --example list_pipelines
//! ```

use anyhow::Context;
use glide_infra::ConcourseClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let client = ConcourseClient::from_env()?;
    let teams = client.teams().await.context("listing teams")?;

    for team in teams {
        println!("{}", team.name);

        let pipelines = client
            .pipelines(&team.name)
            .await
            .with_context(|| format!("listing pipelines of {}", team.name))?;

        for pipeline in pipelines {
            let state = if pipeline.paused { " (paused)" } else { "" };
            println!("  {}{state}", pipeline.name);

            for job in client.jobs(&team.name, &pipeline.name).await? {
                let status = job
                    .finished_build
                    .as_ref()
                    .map_or("never run", |build| build.status.as_str());
                println!("    {:<30} {status}", job.name);
            }
        }
    }

    Ok(())
}
