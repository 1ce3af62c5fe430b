use chrono::NaiveDate;
use thiserror::Error;

use crate::auth::Role;
use crate::policy;
use crate::records::{Priority, Record, Status};
use crate::session::Session;

/// Fixed page size of the records view.
pub const RECORDS_PER_PAGE: usize = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The records view is gated on login; callers route the viewer to the
    /// login entry point and render nothing.
    #[error("authentication required")]
    AuthenticationRequired,
}

/// One facet set. `None` is the "all" sentinel: that facet passes every
/// record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub state: Option<String>,
    pub district: Option<String>,
    pub kind: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub min_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Treats "all" (any case) and blank input as unset.
    pub fn facet(value: Option<&str>) -> Option<String> {
        let v = value?.trim();
        if v.is_empty() || v.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(v.to_string())
        }
    }
}

/// Per-record visibility mark from one filter pass. Recomputed in full on
/// every pass; the rendering layer only reads it.
#[derive(Clone, Debug)]
pub struct RecordMark<'a> {
    pub record: &'a Record,
    pub visible: bool,
}

/// Role gate first, facets second. State scoping is the highest-priority
/// filter: a state-government viewer can never facet their way into another
/// state's records.
pub fn apply_filters<'a>(
    session: Option<&Session>,
    records: &'a [Record],
    criteria: &FilterCriteria,
) -> Result<Vec<RecordMark<'a>>, FilterError> {
    if !policy::is_authenticated(session) {
        return Err(FilterError::AuthenticationRequired);
    }
    Ok(records
        .iter()
        .map(|record| RecordMark {
            record,
            visible: record_passes(session, record, criteria),
        })
        .collect())
}

fn record_passes(session: Option<&Session>, record: &Record, criteria: &FilterCriteria) -> bool {
    let role = session.map(|s| s.role);
    if role == Some(Role::StateGovernment) && !policy::can_see_state(session, &record.state) {
        return false;
    }
    if let Some(state) = criteria.state.as_deref() {
        if record.state != state {
            return false;
        }
    }
    if let Some(district) = criteria.district.as_deref() {
        if record.district != district {
            return false;
        }
    }
    if let Some(kind) = criteria.kind.as_deref() {
        if record.kind != kind {
            return false;
        }
    }
    if let Some(status) = criteria.status {
        if record.status != status {
            return false;
        }
    }
    if let Some(priority) = criteria.priority {
        if record.priority != priority {
            return false;
        }
    }
    if let Some(min_date) = criteria.min_date {
        // A record without a parseable date passes the range test.
        if let Some(date) = record.date {
            if date < min_date {
                return false;
            }
        }
    }
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    pub page_size: usize,
    pub current_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        PageState {
            page_size: RECORDS_PER_PAGE,
            current_page: 1,
        }
    }
}

impl PageState {
    pub fn total_pages(&self, visible_count: usize) -> usize {
        std::cmp::max(1, (visible_count + self.page_size - 1) / self.page_size)
    }

    /// Clamp the current page into `[1, total_pages]` and return the total.
    pub fn clamp(&mut self, visible_count: usize) -> usize {
        let total = self.total_pages(visible_count);
        if self.current_page > total {
            self.current_page = total;
        }
        if self.current_page < 1 {
            self.current_page = 1;
        }
        total
    }
}

/// The rendered result of one filter + pagination pass.
#[derive(Clone, Debug)]
pub struct PageView<'a> {
    pub visible_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub items: Vec<&'a Record>,
}

/// Owns the applied criteria plus page state and enforces the observable
/// contract: changing any criterion lands the viewer back on page 1.
#[derive(Clone, Debug, Default)]
pub struct RecordView {
    criteria: FilterCriteria,
    page: PageState,
}

impl RecordView {
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.page.current_page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.current_page = page.max(1);
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    /// Single deterministic pass: visibility marks in repository order,
    /// then the clamped page slice of the visible subsequence.
    pub fn render<'a>(
        &mut self,
        session: Option<&Session>,
        records: &'a [Record],
    ) -> Result<PageView<'a>, FilterError> {
        let marks = apply_filters(session, records, &self.criteria)?;
        let visible: Vec<&Record> = marks
            .iter()
            .filter(|mark| mark.visible)
            .map(|mark| mark.record)
            .collect();
        let total_pages = self.page.clamp(visible.len());
        let start = (self.page.current_page - 1) * self.page.page_size;
        let items = visible
            .iter()
            .skip(start)
            .take(self.page.page_size)
            .copied()
            .collect();
        Ok(PageView {
            visible_count: visible.len(),
            total_pages,
            current_page: self.page.current_page,
            items,
        })
    }
}
