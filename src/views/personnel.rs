use std::io::{BufRead, Write};

use lasambus_cli::context::AppContext;
use lasambus_cli::prompt::Prompt;
use lasambus_cli::render::error_notice;
use lasambus_cli::report::{TransferAnswer, complete_report};
use lasambus_core::constants::INCIDENT_SAVED_NOTICE;
use lasambus_core::report_flow::ReportFlow;

use super::ViewExit;

/// Incident reporting for ambulance personnel.
///
/// A rejected report keeps its answers: the next "new report" starts from them.
pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    prompt: &mut Prompt<R, W>,
) -> anyhow::Result<ViewExit> {
    if let Some(user) = ctx.session.user() {
        prompt.say("")?;
        prompt.say(&format!("Personnel dashboard - {}", user.full_name))?;
    }

    let mut flow = ReportFlow::new();

    loop {
        if !ctx.session.is_logged_in() {
            return Ok(ViewExit::Reroute);
        }

        let Some(choice) = prompt.ask("[n]ew report, [l]ogout or [q]uit:")? else {
            return Ok(ViewExit::Quit);
        };

        match choice.to_ascii_lowercase().as_str() {
            "n" | "new" => {
                let Some(form) = prompt.edit_form(flow.form().clone())? else {
                    return Ok(ViewExit::Quit);
                };
                *flow.form_mut() = form;

                flow = match flow.submit(&ctx.api).await {
                    Ok(awaiting) => {
                        prompt.say(INCIDENT_SAVED_NOTICE)?;
                        complete_report(&ctx.api, awaiting, TransferAnswer::Ask, prompt).await?
                    }
                    Err(rejected) => {
                        prompt.say(&error_notice(&rejected.error))?;
                        rejected.flow
                    }
                };
            }
            "l" | "logout" => return Ok(super::logout(&ctx.session, prompt)?),
            "q" | "quit" => return Ok(ViewExit::Quit),
            _ => prompt.say("Unknown choice.")?,
        }
    }
}
