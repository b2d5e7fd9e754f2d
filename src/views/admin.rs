use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use lasambus_cli::context::AppContext;
use lasambus_cli::prompt::Prompt;
use lasambus_cli::render::{error_notice, listing_page};
use lasambus_core::constants::{EXPORT_SUCCESS_NOTICE, INCIDENTS_FETCH_FAILED_NOTICE};
use lasambus_core::csv_export::{export_csv, write_export};
use lasambus_core::incident_listing::{IncidentFilter, IncidentListing, fetch_all_incidents};

use super::ViewExit;

const HELP: &str = "[n]ext, [p]revious, [g]o <page>, [f]ilter <all|transferred|not_transferred>, \
[e]xport [dir], [r]efresh, [l]ogout, [q]uit";

/// Admin incident list: filter, page through and export.
pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    prompt: &mut Prompt<R, W>,
) -> anyhow::Result<ViewExit> {
    prompt.say("")?;
    prompt.say("Admin dashboard")?;

    let mut listing = load(ctx, prompt).await?;

    loop {
        if !ctx.session.is_logged_in() {
            return Ok(ViewExit::Reroute);
        }
        if let Some(listing) = &listing {
            prompt.say(&listing_page(listing, &Local))?;
        }

        let Some(line) = prompt.ask(&format!("{HELP}\n>"))? else {
            return Ok(ViewExit::Quit);
        };
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        match command.as_str() {
            "q" | "quit" => return Ok(ViewExit::Quit),
            "l" | "logout" => return Ok(super::logout(&ctx.session, prompt)?),
            "r" | "refresh" => {
                listing = load(ctx, prompt).await?;
                continue;
            }
            _ => {}
        }

        let Some(current) = listing.as_mut() else {
            prompt.say("No incidents loaded; [r]efresh first.")?;
            continue;
        };

        match command.as_str() {
            "n" | "next" => {
                current.next_page();
            }
            "p" | "previous" => {
                current.previous_page();
            }
            "g" | "go" => match argument.and_then(|a| a.parse().ok()) {
                Some(page) => {
                    current.go_to_page(page);
                }
                None => prompt.say("Usage: g <page>")?,
            },
            "f" | "filter" => match argument.unwrap_or("all").parse::<IncidentFilter>() {
                Ok(filter) => current.set_filter(filter),
                Err(e) => prompt.say(&e.to_string())?,
            },
            "e" | "export" => {
                let dir = PathBuf::from(argument.unwrap_or("."));
                let csv = export_csv(current.filtered(), &Local);
                match write_export(&dir, Local::now().date_naive(), &csv) {
                    Ok(path) => {
                        prompt.say(&format!("{EXPORT_SUCCESS_NOTICE} {}", path.display()))?
                    }
                    Err(e) => prompt.say(&error_notice(&e))?,
                }
            }
            _ => prompt.say("Unknown command.")?,
        }
    }
}

/// Fetches the whole incident set. Nothing is shown until it is complete.
async fn load<R: BufRead, W: Write>(
    ctx: &AppContext,
    prompt: &mut Prompt<R, W>,
) -> anyhow::Result<Option<IncidentListing>> {
    prompt.say("Loading incidents...")?;
    match fetch_all_incidents(&ctx.api).await {
        Ok(incidents) => Ok(Some(IncidentListing::new(incidents))),
        Err(e) => {
            prompt.say(INCIDENTS_FETCH_FAILED_NOTICE)?;
            prompt.say(&error_notice(&e))?;
            Ok(None)
        }
    }
}
