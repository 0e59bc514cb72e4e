//! Trigger a job, wait for the build it starts, and download its artifacts.
//!
//! ```text
//! RUST_LOG=info cargo run --example wait_for_build -- <job> [output-dir]
//! ```
//!
//! Server address and credentials come from `jenkins-nodes.toml` (see
//! `Config::load`).

use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use jenkins_nodes::{Config, Jenkins};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(job_name) = args.next() else {
        bail!("usage: wait_for_build <job> [output-dir]");
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let config = Config::load(None).context("Failed to load configuration")?;
    let mut jenkins = Jenkins::from_config(&config.jenkins)?;
    let job = jenkins
        .get_job(&job_name)
        .with_context(|| format!("Job {job_name} not found"))?;

    let Some(mut item) = job.invoke()? else {
        bail!("Jenkins did not report a queue item for {job_name}");
    };

    while item.is_queued()? {
        info!(
            "Waiting in queue: {}",
            item.why()?.unwrap_or_else(|| "unknown reason".to_string())
        );
        sleep(POLL_INTERVAL);
    }

    let mut build = item.get_build()?;
    info!("Build #{} started", build.get_number());

    while build.is_running()? {
        sleep(POLL_INTERVAL);
    }

    let status = build.get_status()?;
    info!("Build #{} finished: {status:?}", build.get_number());

    std::fs::create_dir_all(&output_dir)?;
    for artifact in build.get_artifacts()? {
        let path = artifact.save_to_dir(&output_dir)?;
        println!("{}", path.display());
    }

    Ok(())
}
