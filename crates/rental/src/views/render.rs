//! Turning page data into text.
//!
//! Every page produces a serializable view. JSON output is the view itself;
//! plain and table output are written by the view.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::DisplayConfig;
use crate::error::Result;

/// Output format for pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

/// Something a page can print.
pub trait View: Serialize {
    /// Human-readable rendering.
    fn plain(&self, style: &Style) -> String;

    /// Tabular rendering; pages without a natural table print plain text.
    fn table(&self, style: &Style) -> String {
        self.plain(style)
    }
}

/// Render `view` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<V: View + ?Sized>(view: &V, format: OutputFormat, style: &Style) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(view.plain(style)),
        OutputFormat::Table => Ok(view.table(style)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

/// Formatting preferences shared by every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    date_format: String,
}

impl Style {
    #[must_use]
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            date_format: display.date_format.clone(),
        }
    }

    #[must_use]
    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    #[must_use]
    pub fn datetime(&self, instant: DateTime<Utc>) -> String {
        self.date(instant.date_naive())
    }

    /// A date range as `start - end`.
    #[must_use]
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!("{} - {}", self.datetime(start), self.datetime(end))
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}

#[must_use]
pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// A rating out of five as filled and empty stars.
#[must_use]
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Column-aligned text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        let mut out = String::new();
        write_row(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(&mut out, &rule, &widths);
        for row in &self.rows {
            write_row(&mut out, row, &widths);
        }
        out
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// A heading underlined to its own width.
#[must_use]
pub fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}

/// A one-line outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl View for Notice {
    fn plain(&self, _style: &Style) -> String {
        if self.success {
            format!("{}\n", self.message)
        } else {
            format!("Error: {}\n", self.message)
        }
    }
}
