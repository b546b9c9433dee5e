//! `sbx delete` — delete a feature by id.

use crate::cmd::open_board;
use crate::output::{CliError, OutputMode, fail_with, render_success};
use clap::Args;
use soapbox_core::config::ClientConfig;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Feature id to delete.
    pub id: u64,
}

pub fn run_delete(
    args: &DeleteArgs,
    config: &ClientConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut board = open_board(config);
    if let Err(err) = board.delete(args.id) {
        return Err(fail_with(output, CliError::new(err.to_string())));
    }
    render_success(output, &format!("Deleted feature #{}", args.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_args_parse_id() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: DeleteArgs,
        }
        let w = Wrapper::parse_from(["test", "3"]);
        assert_eq!(w.args.id, 3);
    }
}
