//! `sbx vote` — toggle this user's vote on a feature.
//!
//! The toggle is the caller-side double-vote guard: the board itself
//! accepts a second upvote, so this command consults `has_voted` and
//! issues either an upvote or a vote removal.

use crate::cmd::open_board;
use crate::output::{CliError, OutputMode, fail_with, render};
use clap::Args;
use soapbox_core::config::ClientConfig;
use std::io::Write;

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Feature id to vote on.
    pub id: u64,
}

pub fn run_vote(args: &VoteArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut board = open_board(config);
    let removing = board.session().has_voted(args.id);

    let result = if removing {
        board.remove_vote(args.id)
    } else {
        board.upvote(args.id)
    };

    let updated = match result {
        Ok(updated) => updated,
        Err(err) => return Err(fail_with(output, CliError::new(err.to_string()))),
    };

    render(output, &updated, |updated, w| {
        if removing {
            writeln!(
                w,
                "✓ Removed vote from #{} ({} votes)",
                updated.id, updated.upvotes
            )
        } else {
            writeln!(w, "✓ Upvoted #{} ({} votes)", updated.id, updated.upvotes)
        }
    })
}
