//! `sbx show` — fetch one feature by id.

use crate::cmd::open_session;
use crate::output::{CliError, OutputMode, fail_with, render};
use clap::Args;
use soapbox_core::api::{FeatureApi, FeatureService};
use soapbox_core::config::ClientConfig;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Feature id to show.
    pub id: u64,
}

pub fn run_show(args: &ShowArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let api = FeatureApi::new(config);
    let feature = match api.get(args.id) {
        Ok(feature) => feature,
        Err(err) => return Err(fail_with(output, CliError::new(err.to_string()))),
    };
    let voted = open_session().has_voted(feature.id);

    render(output, &feature, |feature, w| {
        writeln!(w, "#{} {}", feature.id, feature.title)?;
        writeln!(w, "  author:  {}", feature.author)?;
        writeln!(w, "  votes:   {}{}", feature.upvotes, if voted { " (yours counted)" } else { "" })?;
        writeln!(w, "  created: {}", feature.created_at.to_rfc3339())?;
        if let Some(ref description) = feature.description {
            writeln!(w, "  {description}")?;
        }
        Ok(())
    })
}
