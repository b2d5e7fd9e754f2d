//! CSV export of the filtered admin list.
//!
//! Export works only on incidents already in memory; it never calls the backend.

use crate::error::{ReportError, ReportResult};
use api_shared::Incident;
use chrono::{NaiveDate, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

/// Column headers, in output order.
pub const CSV_HEADER: [&str; 11] = [
    "ID",
    "Date",
    "Personnel",
    "Patient Name",
    "Age",
    "Sex",
    "Location",
    "LGA",
    "Description",
    "Action Taken",
    "Transferred",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders `incidents` as CSV, one row per incident after the header row.
///
/// Every cell is quoted and embedded quotes are doubled. Dates are shown in `tz`.
pub fn export_csv<'a, Tz, I>(incidents: I, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    I: IntoIterator<Item = &'a Incident>,
{
    let mut lines = vec![row(CSV_HEADER.iter().map(|h| h.to_string()))];

    for incident in incidents {
        let age = incident
            .patient_age
            .map_or_else(|| "N/A".to_string(), |a| a.to_string());
        let transferred = if incident.transfer_to_hospital {
            "Yes"
        } else {
            "No"
        };
        lines.push(row([
            incident.id.clone(),
            incident
                .created_at
                .with_timezone(tz)
                .format(DATE_FORMAT)
                .to_string(),
            incident.personnel_name.clone(),
            incident.patient_name.clone(),
            age,
            incident.patient_sex.clone(),
            incident.location.clone(),
            incident.lga.clone(),
            incident.description.clone(),
            incident.action_taken.clone(),
            transferred.to_string(),
        ]));
    }

    lines.join("\n")
}

fn row(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|c| format!("\"{}\"", c.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// `lasambus-incidents-<yyyy-MM-dd>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("lasambus-incidents-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes `csv` into `dir` under the name for `date`, creating `dir` if needed.
///
/// # Errors
///
/// Returns `ReportError::ExportWrite` if the directory or file cannot be written.
pub fn write_export(dir: &Path, date: NaiveDate, csv: &str) -> ReportResult<PathBuf> {
    fs::create_dir_all(dir).map_err(ReportError::ExportWrite)?;
    let path = dir.join(export_file_name(date));
    fs::write(&path, csv).map_err(ReportError::ExportWrite)?;
    tracing::info!(path = %path.display(), bytes = csv.len(), "incidents exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{incident, incidents};
    use chrono::{FixedOffset, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_header_is_always_present() {
        let csv = export_csv(Vec::<&Incident>::new(), &Utc);

        assert_eq!(
            csv,
            "\"ID\",\"Date\",\"Personnel\",\"Patient Name\",\"Age\",\"Sex\",\"Location\",\"LGA\",\"Description\",\"Action Taken\",\"Transferred\""
        );
    }

    #[test]
    fn test_one_row_per_incident() {
        let list = incidents(12);

        let csv = export_csv(&list, &Utc);

        assert_eq!(csv.lines().count(), 13);
    }

    #[test]
    fn test_row_formatting() {
        let mut record = incident("inc-7", true, None);
        record.description = "Said \"help\" twice".into();

        let csv = export_csv([&record], &Utc);
        let row = csv.lines().nth(1).expect("data row");

        assert_eq!(
            row,
            "\"inc-7\",\"2024-03-01 09:30\",\"Ada Obi\",\"Patient inc-7\",\"N/A\",\"Female\",\"Ikeja GRA\",\"Ikeja\",\"Said \"\"help\"\" twice\",\"Oxygen administered\",\"Yes\""
        );
    }

    #[test]
    fn test_dates_follow_requested_zone() {
        let lagos = FixedOffset::east_opt(3600).unwrap();

        let csv = export_csv([&incident("a", false, Some(5))], &lagos);

        assert!(csv.contains("\"2024-03-01 10:30\""));
        assert!(csv.ends_with("\"No\""));
    }

    #[test]
    fn test_write_export_uses_dated_name() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let path = write_export(&dir.path().join("out"), date, "x").unwrap();

        assert_eq!(
            path.file_name().unwrap(),
            "lasambus-incidents-2024-03-09.csv"
        );
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }
}
