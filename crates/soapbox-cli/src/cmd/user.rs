//! `sbx whoami` and `sbx reset` — anonymous identity management.

use crate::cmd::open_session;
use crate::output::{OutputMode, render, render_success};
use std::io::Write;

pub fn run_whoami(output: OutputMode) -> anyhow::Result<()> {
    let session = open_session();
    let identity = serde_json::json!({
        "user_id": session.user_id(),
        "votes": session.votes(),
    });

    render(output, &identity, |identity, w| {
        writeln!(
            w,
            "{}",
            identity
                .get("user_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
        )
    })
}

/// Wipe the local identity and vote set. The next command generates a
/// fresh identifier.
pub fn run_reset(output: OutputMode) -> anyhow::Result<()> {
    let mut session = open_session();
    session.clear_user_data();
    render_success(output, "Cleared local user data")
}
