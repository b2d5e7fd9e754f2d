//! Finishing a submitted report from the terminal.

use std::io::{self, BufRead, Write};

use lasambus_core::constants::{INCIDENT_UPDATE_FAILED_NOTICE, REPORT_COMPLETED_NOTICE};
use lasambus_core::hospital_selection::{reservation_notice, HospitalSelection};
use lasambus_core::report_flow::{
    AwaitingTransferDecision, Editing, ReportFlow, TransferDecision, TransferOutcome,
};
use lasambus_core::{BackendError, HospitalsBackend, IncidentsBackend, ReportError};

use crate::prompt::Prompt;
use crate::render::{error_notice, hospital_line};

/// How the transfer question is answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferAnswer {
    /// Ask on the prompt.
    Ask,
    /// Treated on site.
    No,
    /// Transfer to the hospital with this id.
    To(String),
}

/// Runs the transfer decision and, if needed, hospital selection for a submitted report.
///
/// A failed pick keeps the selection open and asks again; a blank answer or end of input skips
/// it, as does an expired session. The returned flow always holds a blank form.
///
/// # Errors
///
/// Returns an error only if the prompt cannot be read or written.
pub async fn complete_report<B, R, W>(
    backend: &B,
    awaiting: ReportFlow<AwaitingTransferDecision>,
    answer: TransferAnswer,
    prompt: &mut Prompt<R, W>,
) -> io::Result<ReportFlow<Editing>>
where
    B: IncidentsBackend + HospitalsBackend + ?Sized,
    R: BufRead,
    W: Write,
{
    let decision = match &answer {
        TransferAnswer::No => TransferDecision::TreatedOnSite,
        TransferAnswer::To(_) => TransferDecision::Transfer,
        TransferAnswer::Ask => {
            if prompt.confirm("Transfer patient to hospital?")? {
                TransferDecision::Transfer
            } else {
                TransferDecision::TreatedOnSite
            }
        }
    };

    let choosing = match awaiting.decide(decision) {
        TransferOutcome::Completed(flow) => {
            prompt.say(REPORT_COMPLETED_NOTICE)?;
            return Ok(flow);
        }
        TransferOutcome::ChooseHospital(choosing) => choosing,
    };

    let selection = choosing.open_selection(backend).await;
    if let Some(notice) = selection.notice() {
        prompt.say(notice)?;
    } else {
        let preset = match answer {
            TransferAnswer::To(id) => Some(id),
            _ => None,
        };
        choose_hospital(backend, &selection, preset, prompt).await?;
    }

    prompt.say(REPORT_COMPLETED_NOTICE)?;
    Ok(choosing.finish())
}

async fn choose_hospital<B, R, W>(
    backend: &B,
    selection: &HospitalSelection,
    mut preset: Option<String>,
    prompt: &mut Prompt<R, W>,
) -> io::Result<()>
where
    B: IncidentsBackend + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        let hospital_id = match preset.take() {
            Some(id) => id,
            None => {
                prompt.say("Hospitals with available beds:")?;
                for hospital in selection.hospitals() {
                    prompt.say(&format!("  {}", hospital_line(hospital)))?;
                }
                match prompt.ask("Hospital id (blank to skip):")? {
                    Some(id) if !id.is_empty() => id,
                    _ => return Ok(()),
                }
            }
        };

        let mut confirmation = None;
        let picked = selection
            .select(backend, &hospital_id, |hospital| {
                confirmation = Some(reservation_notice(hospital));
            })
            .await;

        match picked {
            Ok(_) => {
                if let Some(text) = confirmation {
                    prompt.say(&text)?;
                }
                return Ok(());
            }
            Err(e @ ReportError::Backend(BackendError::Unauthorized { .. })) => {
                prompt.say(&error_notice(&e))?;
                return Ok(());
            }
            Err(e @ ReportError::Backend(_)) => {
                prompt.say(INCIDENT_UPDATE_FAILED_NOTICE)?;
                prompt.say(&error_notice(&e))?;
            }
            // Rejected before any request was made.
            Err(e) => prompt.say(&error_notice(&e))?,
        }
    }
}
