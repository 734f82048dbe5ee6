use chrono::{FixedOffset, Local, Offset, Utc};

use crate::models::PingRecord;
use crate::state::ViewState;
use crate::utils::{format_latency, format_timestamp, BLUE, BOLD, ENDC, RED, YELLOW};

pub const TITLE: &str = "Ping statistics";
pub const LOADING_TEXT: &str = "Loading...";
pub const NO_DATA_TEXT: &str = "No data";

const HEADERS: [&str; 3] = ["Address", "Latency", "Last success"];

/// Zone used for the "last success" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn utc() -> DisplayZone {
        DisplayZone::Fixed(Utc.fix())
    }

    pub fn format(&self, raw: &str) -> Option<String> {
        match self {
            DisplayZone::Local => format_timestamp(raw, &Local),
            DisplayZone::Fixed(offset) => format_timestamp(raw, offset),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub zone: DisplayZone,
    pub color: bool,
}

impl Renderer {
    pub fn new(zone: DisplayZone, color: bool) -> Renderer {
        Renderer { zone, color }
    }

    /// Renders exactly one of the loading line, the error banner or the table.
    pub fn render(&self, state: &ViewState) -> String {
        let mut out = self.paint(BOLD, TITLE);
        out.push('\n');

        if state.is_loading {
            out.push_str(&self.paint(YELLOW, LOADING_TEXT));
            out.push('\n');
        } else if let Some(message) = &state.error_message {
            out.push_str(&self.paint(RED, message));
            out.push('\n');
        } else {
            out.push_str(&self.table(&state.records));
        }

        out
    }

    pub fn row(&self, record: &PingRecord) -> [String; 3] {
        let last_success = record
            .last_success_at
            .as_deref()
            .and_then(|raw| self.zone.format(raw))
            .unwrap_or_else(|| NO_DATA_TEXT.to_string());

        [
            record.address.clone(),
            format_latency(record.latency_ms),
            last_success,
        ]
    }

    fn table(&self, records: &[PingRecord]) -> String {
        let rows: Vec<[String; 3]> = records.iter().map(|r| self.row(r)).collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = HEADERS.map(|h| h.to_string());
        let mut out = self.paint(BLUE, &join_cells(&header, &widths));
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');

        for row in &rows {
            out.push_str(&join_cells(row, &widths));
            out.push('\n');
        }

        out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{ENDC}")
        } else {
            text.to_string()
        }
    }
}

fn join_cells(cells: &[String; 3], widths: &[usize; 3]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    padded.join(" | ").trim_end().to_string()
}
