use serde::Serialize;

use crate::filter::PageView;
use crate::records::Record;
use crate::states;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct RecordRow {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    pub district: String,
    pub location: String,
    pub date: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub visible_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub records: Vec<RecordRow>,
}

pub fn build_report(view: &PageView) -> Report {
    Report {
        visible_count: view.visible_count,
        total_pages: view.total_pages,
        current_page: view.current_page,
        records: view.items.iter().map(|r| build_row(r)).collect(),
    }
}

fn build_row(record: &Record) -> RecordRow {
    RecordRow {
        id: record.id,
        title: record.title.clone(),
        status: record.status.as_str().to_string(),
        priority: record.priority.as_str().to_string(),
        kind: states::display_case(&record.kind),
        state: states::display_case(&record.state),
        district: states::display_case(&record.district),
        location: record.location.clone(),
        date: record
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

pub fn render_text(report: &Report) -> Vec<u8> {
    let mut out = String::new();
    for r in &report.records {
        out.push_str(&format!(
            "#{:<5} {:<12} {:<7} {:<18} {:<24} {:<11} {}\n",
            r.id,
            r.status,
            r.priority,
            r.kind,
            format_place(&r.district, &r.state),
            r.date,
            r.title,
        ));
    }
    out.into_bytes()
}

pub fn render_json(report: &Report) -> Vec<u8> {
    serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
}

fn format_place(district: &str, state: &str) -> String {
    match (district.is_empty(), state.is_empty()) {
        (false, false) => format!("{district}, {state}"),
        (false, true) => district.to_string(),
        (true, false) => state.to_string(),
        (true, true) => String::new(),
    }
}

/// Mirrors the web pager: at most nine numbered slots windowed around the
/// active page, with prev/next markers dimmed at the edges.
pub fn render_pagination_line(total_pages: usize, active_page: usize) -> String {
    const MAX_BUTTONS: usize = 9;
    let mut start = 1;
    let mut end = total_pages;
    if total_pages > MAX_BUTTONS {
        let side = MAX_BUTTONS / 2;
        start = active_page.saturating_sub(side).max(1);
        end = std::cmp::min(total_pages, start + MAX_BUTTONS - 1);
        if end - start < MAX_BUTTONS - 1 {
            start = end.saturating_sub(MAX_BUTTONS - 1).max(1);
        }
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(if active_page > 1 {
        "«".to_string()
    } else {
        "·".to_string()
    });
    for page in start..=end {
        if page == active_page {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    parts.push(if active_page < total_pages {
        "»".to_string()
    } else {
        "·".to_string()
    });
    parts.join(" ")
}
