//! `sbx votes` — show which features this user has voted for.

use crate::cmd::open_session;
use crate::output::{CliError, OutputMode, fail_with, render};
use clap::Args;
use soapbox_core::api::{FeatureApi, FeatureService};
use soapbox_core::config::ClientConfig;
use std::io::Write;

#[derive(Args, Debug)]
pub struct VotesArgs {
    /// Ask the server which votes it attributes to this user, instead of
    /// reading the local snapshot.
    #[arg(long)]
    pub remote: bool,
}

pub fn run_votes(
    args: &VotesArgs,
    config: &ClientConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let session = open_session();

    let ids: Vec<u64> = if args.remote {
        match FeatureApi::new(config).user_votes(session.user_id()) {
            Ok(ids) => ids,
            Err(err) => return Err(fail_with(output, CliError::new(err.to_string()))),
        }
    } else {
        session.votes().to_vec()
    };

    render(output, &ids, |ids, w| {
        if ids.is_empty() {
            return writeln!(w, "No votes recorded.");
        }
        for id in ids {
            writeln!(w, "#{id}")?;
        }
        Ok(())
    })
}
