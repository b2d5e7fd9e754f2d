//! Plain-text rendering for the terminal front ends.

use std::fmt::Write as _;

use api_shared::{Hospital, Incident, User};
use chrono::TimeZone;
use lasambus_core::incident_listing::IncidentListing;
use lasambus_core::ReportError;

/// Text to show for a failed action: one line per field issue when there are any, otherwise
/// the error message.
pub fn error_notice(error: &ReportError) -> String {
    let issues = error.field_issues();
    if issues.is_empty() {
        return error.to_string();
    }
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn user_line(user: &User) -> String {
    format!("{} <{}> ({})", user.full_name, user.email, user.role)
}

pub fn hospital_line(hospital: &Hospital) -> String {
    let mut line = format!(
        "{}  {} - {} [{}] beds: {}  tel: {}",
        hospital.id, hospital.name, hospital.address, hospital.lga, hospital.available_beds, hospital.phone
    );
    if !hospital.expertise.is_empty() {
        let _ = write!(line, "  ({})", hospital.expertise.join(", "));
    }
    if let Some(distance) = hospital.distance {
        let _ = write!(line, "  {distance:.1} km");
    }
    line
}

pub fn incident_line<Tz>(incident: &Incident, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let age = incident
        .patient_age
        .map_or_else(|| "N/A".to_string(), |a| a.to_string());
    format!(
        "{}  {}  {}  {} ({}, {})  {}, {}  {}",
        incident.id,
        incident.created_at.with_timezone(tz).format("%Y-%m-%d %H:%M"),
        incident.personnel_name,
        incident.patient_name,
        age,
        incident.patient_sex,
        incident.location,
        incident.lga,
        if incident.transfer_to_hospital {
            "Transferred"
        } else {
            "Field treated"
        }
    )
}

/// The current page of `listing` with its statistics and pagination bar.
pub fn listing_page<Tz>(listing: &IncidentListing, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stats = listing.stats();
    let mut out = format!(
        "Total: {}  Transferred: {}  Field treated: {}\nFilter: {}\n",
        stats.total,
        stats.transferred,
        stats.field_treated,
        listing.filter()
    );

    let items = listing.page_items();
    if items.is_empty() {
        out.push_str("No incidents found.\n");
    }
    for incident in items {
        out.push_str(&incident_line(incident, tz));
        out.push('\n');
    }

    let current = listing.current_page();
    let pages: Vec<_> = listing
        .page_window()
        .map(|p| {
            if p == current {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    let _ = write!(
        out,
        "{}\nPage {} of {}: {}",
        listing.showing_range(),
        current,
        listing.total_pages(),
        pages.join(" ")
    );
    out
}
