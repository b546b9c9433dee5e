//! `sbx health` — check the remote API.

use crate::output::{CliError, OutputMode, fail_with, render};
use soapbox_core::api::{FeatureApi, FeatureService};
use soapbox_core::config::ClientConfig;
use std::io::Write;

pub fn run_health(config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let api = FeatureApi::new(config);
    let status = match api.health() {
        Ok(status) => status,
        Err(err) => return Err(fail_with(output, CliError::new(err.to_string()))),
    };

    render(output, &status, |status, w| {
        let summary = status
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("ok");
        writeln!(w, "✓ API reachable at {} ({summary})", config.base_url)
    })
}
