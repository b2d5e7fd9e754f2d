//! Admin incident list.
//!
//! The admin view works on the complete incident set: [`fetch_all_incidents`] pages through the
//! backend and only then hands the aggregate to an [`IncidentListing`], which filters and
//! paginates in memory. Nothing is shown until the aggregate is complete.

use crate::constants::{FETCH_PAGE_SIZE, INCIDENTS_PER_PAGE, LARGE_INCIDENT_SET, PAGE_WINDOW};
use crate::error::{ReportError, ReportResult};
use crate::ports::IncidentsBackend;
use api_shared::Incident;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Retrieves every incident visible to the caller.
///
/// Requests pages of [`FETCH_PAGE_SIZE`] starting at `skip = 0`, advancing `skip` by the page
/// size until a page comes back short. A page that is exactly full is always followed by one
/// more request, which may be empty.
///
/// There is no upper bound on the number of records fetched; past [`LARGE_INCIDENT_SET`] a
/// warning is logged once.
///
/// # Errors
///
/// Any failed page aborts the whole retrieval with that page's error. No partial list is
/// returned.
pub async fn fetch_all_incidents<B>(backend: &B) -> ReportResult<Vec<Incident>>
where
    B: IncidentsBackend + ?Sized,
{
    let mut all = Vec::new();
    let mut skip = 0;
    let mut warned = false;

    loop {
        let page = backend
            .list_incidents(skip, FETCH_PAGE_SIZE)
            .await
            .inspect_err(|e| tracing::warn!(skip, "incident retrieval aborted: {}", e))?;
        let len = page.len();
        all.extend(page);
        tracing::debug!(skip, received = len, total = all.len(), "incident page fetched");

        if !warned && all.len() > LARGE_INCIDENT_SET {
            tracing::warn!(
                total = all.len(),
                "incident list is large; the whole set is held in memory"
            );
            warned = true;
        }

        if len < FETCH_PAGE_SIZE {
            break;
        }
        skip += FETCH_PAGE_SIZE;
    }

    tracing::info!(total = all.len(), "incidents loaded");
    Ok(all)
}

// ============================================================================
// FILTER
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IncidentFilter {
    #[default]
    All,
    Transferred,
    NotTransferred,
}

impl IncidentFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentFilter::All => "all",
            IncidentFilter::Transferred => "transferred",
            IncidentFilter::NotTransferred => "not_transferred",
        }
    }

    pub fn matches(self, incident: &Incident) -> bool {
        match self {
            IncidentFilter::All => true,
            IncidentFilter::Transferred => incident.transfer_to_hospital,
            IncidentFilter::NotTransferred => !incident.transfer_to_hospital,
        }
    }
}

impl fmt::Display for IncidentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentFilter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(IncidentFilter::All),
            "transferred" => Ok(IncidentFilter::Transferred),
            "not_transferred" | "not-transferred" => Ok(IncidentFilter::NotTransferred),
            other => Err(ReportError::InvalidInput(format!(
                "unknown filter '{other}' (expected all, transferred or not_transferred)"
            ))),
        }
    }
}

// ============================================================================
// LISTING
// ============================================================================

/// Summary counts over the full, unfiltered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncidentStats {
    pub total: usize,
    pub transferred: usize,
    pub field_treated: usize,
}

/// The "Showing X to Y of Z" line. `from` and `to` are 1-based; an empty list is `0 to 0 of 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowingRange {
    pub from: usize,
    pub to: usize,
    pub of: usize,
}

impl fmt::Display for ShowingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} to {} of {}", self.from, self.to, self.of)
    }
}

/// Filter and page state over an aggregated incident list.
#[derive(Clone, Debug, Default)]
pub struct IncidentListing {
    incidents: Vec<Incident>,
    filter: IncidentFilter,
    page: usize,
}

impl IncidentListing {
    pub fn new(incidents: Vec<Incident>) -> Self {
        Self {
            incidents,
            filter: IncidentFilter::All,
            page: 1,
        }
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn filter(&self) -> IncidentFilter {
        self.filter
    }

    /// Changes the filter and returns to page 1.
    pub fn set_filter(&mut self, filter: IncidentFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Incidents passing the current filter, in backend order.
    pub fn filtered(&self) -> Vec<&Incident> {
        self.incidents
            .iter()
            .filter(|i| self.filter.matches(i))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.incidents
            .iter()
            .filter(|i| self.filter.matches(i))
            .count()
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Never less than 1, even for an empty list.
    pub fn total_pages(&self) -> usize {
        self.filtered_len().div_ceil(INCIDENTS_PER_PAGE).max(1)
    }

    /// Moves to `page`. Pages outside `1..=total_pages` are ignored and `false` is returned.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    /// Incidents on the current page.
    pub fn page_items(&self) -> Vec<&Incident> {
        self.incidents
            .iter()
            .filter(|i| self.filter.matches(i))
            .skip((self.page - 1) * INCIDENTS_PER_PAGE)
            .take(INCIDENTS_PER_PAGE)
            .collect()
    }

    /// Page numbers to offer in the pagination bar.
    pub fn page_window(&self) -> RangeInclusive<usize> {
        page_window(self.page, self.total_pages())
    }

    pub fn stats(&self) -> IncidentStats {
        let transferred = self
            .incidents
            .iter()
            .filter(|i| i.transfer_to_hospital)
            .count();
        IncidentStats {
            total: self.incidents.len(),
            transferred,
            field_treated: self.incidents.len() - transferred,
        }
    }

    pub fn showing_range(&self) -> ShowingRange {
        let of = self.filtered_len();
        if of == 0 {
            return ShowingRange { from: 0, to: 0, of };
        }
        let from = (self.page - 1) * INCIDENTS_PER_PAGE + 1;
        ShowingRange {
            from,
            to: (self.page * INCIDENTS_PER_PAGE).min(of),
            of,
        }
    }
}

/// At most [`PAGE_WINDOW`] page numbers around `current`, pinned to the first or last pages
/// near either end.
pub fn page_window(current: usize, total: usize) -> RangeInclusive<usize> {
    let total = total.max(1);
    let half = PAGE_WINDOW / 2;

    if total <= PAGE_WINDOW {
        1..=total
    } else if current <= half + 1 {
        1..=PAGE_WINDOW
    } else if current + half >= total {
        total + 1 - PAGE_WINDOW..=total
    } else {
        current - half..=current + half
    }
}
