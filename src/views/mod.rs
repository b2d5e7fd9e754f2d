//! Interactive views. Each runs until the user quits or the route has to be resolved again.

use std::io::{self, BufRead, Write};

use lasambus_cli::prompt::Prompt;
use lasambus_cli::render::error_notice;
use lasambus_core::{auth, SessionStore};

pub mod admin;
pub mod login;
pub mod personnel;

/// Why a view returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewExit {
    /// The session changed (login, logout, expiry); resolve the route again.
    Reroute,
    Quit,
}

/// Logs out from a dashboard. The in-memory session is gone even when durable storage could
/// not be cleared, so the view always leaves.
fn logout<R: BufRead, W: Write>(
    session: &SessionStore,
    prompt: &mut Prompt<R, W>,
) -> io::Result<ViewExit> {
    if let Err(e) = auth::logout(session) {
        tracing::warn!("logout left stored credentials behind: {}", e);
        prompt.say(&error_notice(&e))?;
    }
    Ok(ViewExit::Reroute)
}
