//! Terminal front-end support shared by the `lasambus` CLI and the interactive `lasambus-run`.
//!
//! - [`context`]: startup (logging, `.env`, configuration) and the wired-up client
//! - [`prompt`]: line-based questions on stdin
//! - [`render`]: plain-text rendering of incidents, hospitals and errors
//! - [`report`]: the transfer question and hospital pick after a report is saved

pub mod context;
pub mod prompt;
pub mod render;
pub mod report;
