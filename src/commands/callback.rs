use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

pub struct CallbackOptions {
    pub base_url: String,
    pub project: String,
    pub commit: String,
    pub status: String,
}

/// Report a build status back to the CI service. All of the information
/// travels in the URL; the body is empty. Retries and token exchange are
/// the caller's problem.
pub fn run(opts: &CallbackOptions) -> Result<()> {
    let url = format!(
        "{}/{}/builds/{}/{}",
        opts.base_url.trim_end_matches('/'),
        opts.project,
        opts.commit,
        opts.status
    );
    debug!(%url, "sending build status callback");

    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed building HTTP client")?;

    let response = client
        .put(&url)
        .send()
        .with_context(|| format!("Build status callback to {url} failed"))?;

    if !response.status().is_success() {
        bail!("Build status callback returned {}", response.status());
    }

    println!(
        "Reported build status [{}] for commit [{}]",
        opts.status, opts.commit
    );
    Ok(())
}
