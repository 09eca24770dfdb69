//! Output side of the history: rows handed to a sink with an insertion
//! directive. The sink never owns the ordering, the reconciler does.

use crate::models::Measurement;
use std::collections::VecDeque;
use std::io::Write;

pub const TEMPERATURE_PLACEHOLDER: &str = "--";
pub const CATEGORY_PLACEHOLDER: &str = "Sin datos";

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedRow {
    pub id: uuid::Uuid,
    pub city_label: String,
    pub temperature: String,
    pub category: String,
    pub timestamp: String,
}

impl RenderedRow {
    pub fn project(measurement: &Measurement, timestamp_format: &str) -> Self {
        Self {
            id: measurement.id,
            city_label: measurement.city_label.clone(),
            temperature: measurement
                .temperature
                .map(|t| t.to_string())
                .unwrap_or_else(|| TEMPERATURE_PLACEHOLDER.to_owned()),
            category: measurement
                .category
                .map(|c| c.label().to_owned())
                .unwrap_or_else(|| CATEGORY_PLACEHOLDER.to_owned()),
            timestamp: measurement.timestamp.format(timestamp_format).to_string(),
        }
    }
}

pub trait RenderSink {
    fn append(&mut self, row: &RenderedRow);
    fn prepend(&mut self, row: &RenderedRow);
    fn clear(&mut self);
}

/// Keeps rendered rows in memory, in display order.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: VecDeque<RenderedRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RenderedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RenderSink for MemorySink {
    fn append(&mut self, row: &RenderedRow) {
        self.rows.push_back(row.clone());
    }

    fn prepend(&mut self, row: &RenderedRow) {
        self.rows.push_front(row.clone());
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Prints the history table to a writer. Appends stream a single line;
/// a prepend redraws the whole table so the new row shows on top.
pub struct TerminalSink<W: Write> {
    out: W,
    table: MemorySink,
    header_written: bool,
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            table: MemorySink::new(),
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(row: &RenderedRow) -> String {
        format!(
            "{:<20} {:>8} {:<14} {}",
            row.city_label, row.temperature, row.category, row.timestamp
        )
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::error!("Failed to write history row: {}", e);
        }
    }

    pub fn redraw(&mut self) {
        let lines: Vec<String> = self.table.rows().map(Self::line).collect();
        self.write_header();
        for line in lines {
            self.write_line(&line);
        }
    }

    fn write_header(&mut self) {
        self.write_line(&Self::header());
        self.header_written = true;
    }

    fn header() -> String {
        format!("{:<20} {:>8} {:<14} {}", "Ciudad", "Temp.", "Categoría", "Fecha")
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn append(&mut self, row: &RenderedRow) {
        self.table.append(row);
        if !self.header_written {
            self.write_header();
        }
        self.write_line(&Self::line(row));
    }

    fn prepend(&mut self, row: &RenderedRow) {
        self.table.prepend(row);
        self.redraw();
    }

    fn clear(&mut self) {
        self.table.clear();
    }
}
