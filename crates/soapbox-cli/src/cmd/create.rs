//! `sbx create` — validate and submit a new feature.

use crate::cmd::open_board;
use crate::output::{CliError, OutputMode, fail_with, render, render_error};
use clap::Args;
use soapbox_core::config::ClientConfig;
use soapbox_core::model::NewFeature;
use soapbox_core::validate::validate_feature;
use std::io::Write;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the suggestion (3-200 characters).
    #[arg(short, long)]
    pub title: String,

    /// Your display name (2-100 characters).
    #[arg(short, long)]
    pub author: String,

    /// Longer description (up to 1000 characters).
    #[arg(short, long)]
    pub description: Option<String>,
}

pub fn run_create(
    args: &CreateArgs,
    config: &ClientConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut data = NewFeature::new(args.title.clone(), args.author.clone());
    data.description = args.description.clone();

    // Validation runs before any network call; an invalid submission
    // never reaches the API.
    let report = validate_feature(&data);
    if !report.is_valid() {
        for message in report.messages() {
            render_error(output, &CliError::new(message))?;
        }
        anyhow::bail!("invalid feature submission");
    }

    let mut board = open_board(config);
    let created = match board.create(&data) {
        Ok(created) => created.clone(),
        Err(err) => return Err(fail_with(output, CliError::new(err.to_string()))),
    };

    render(output, &created, |created, w| {
        writeln!(w, "✓ Created feature #{}: {}", created.id, created.title)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "--title",
            "Dark mode",
            "--author",
            "alice",
            "--description",
            "Please",
        ]);
        assert_eq!(w.args.title, "Dark mode");
        assert_eq!(w.args.author, "alice");
        assert_eq!(w.args.description.as_deref(), Some("Please"));
    }
}
