//! Example: Streaming a build's log
//!
//! Prints log output of a build as it arrives. Ctrl-C stops the stream.
//!
//! # Setup
//!
//! ```bash
//! export CONCOURSE_URL=https://ci.example.com
//! export CONCOURSE_USERNAME=admin
//! export CONCOURSE_PASSWORD=secret
//! cargo run -p glide-infra --example watch_build -- 1234
//! ```

use std::io::Write;

use anyhow::Context;
use glide_domain::BuildEventKind;
use glide_infra::ConcourseClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let build_id: i64 = std::env::args()
        .nth(1)
        .context("usage: watch_build <build-id>")?
        .parse()
        .context("build id must be a number")?;

    let client = ConcourseClient::from_env()?;
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut events = client.build_events(build_id, cancel).await?;
    let mut stdout = std::io::stdout();

    while let Some(event) = events.recv().await {
        match event.kind() {
            BuildEventKind::Log => {
                stdout.write_all(event.data.payload.as_bytes())?;
                stdout.flush()?;
            }
            BuildEventKind::Status => {
                println!("\n== build {}", event.data.status.as_deref().unwrap_or("unknown"));
            }
            BuildEventKind::Error => eprintln!("\n!! {}", event.data.message),
            BuildEventKind::Other(_) => {}
        }
    }

    Ok(())
}
