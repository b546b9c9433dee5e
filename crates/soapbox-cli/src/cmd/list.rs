//! `sbx list` — fetch and display the feature list.

use crate::cmd::open_board;
use crate::output::{CliError, OutputMode, fail_with, render};
use clap::Args;
use serde::Serialize;
use soapbox_core::config::ClientConfig;
use soapbox_core::model::Feature;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show features you have voted for.
    #[arg(long)]
    pub mine: bool,
}

#[derive(Serialize)]
struct FeatureRow<'a> {
    #[serde(flatten)]
    feature: &'a Feature,
    voted: bool,
}

pub fn run_list(args: &ListArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut board = open_board(config);
    if let Err(err) = board.fetch_all() {
        return Err(fail_with(output, CliError::new(err.to_string())));
    }

    let rows: Vec<FeatureRow<'_>> = board
        .features()
        .iter()
        .map(|feature| FeatureRow {
            feature,
            voted: board.session().has_voted(feature.id),
        })
        .filter(|row| !args.mine || row.voted)
        .collect();

    render(output, &rows, |rows, w| {
        if rows.is_empty() {
            return writeln!(w, "No features yet. Add one with `sbx create`.");
        }
        for row in rows {
            let marker = if row.voted { " (voted)" } else { "" };
            writeln!(
                w,
                "#{:<5} ▲{:<4} {} — {}{marker}",
                row.feature.id, row.feature.upvotes, row.feature.title, row.feature.author
            )?;
        }
        Ok(())
    })
}
