//! Terminal rendering for agenda records.
//!
//! Extension traits that add colored output to agenda-core types using
//! owo_colors: a detail view for single records and an aligned table for
//! listings.

use agenda_core::calendar::Calendar;
use agenda_core::event::Event;
use agenda_core::user::User;
use owo_colors::OwoColorize;

/// Detail view of a single record.
pub trait Render {
    fn render(&self) -> String;
}

/// A record that can be listed as one table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["_id", "name", "email"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.email.clone()]
    }
}

impl TableRow for Calendar {
    const HEADERS: &'static [&'static str] = &["_id", "name", "ownerId"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.owner_id.clone()]
    }
}

impl TableRow for Event {
    const HEADERS: &'static [&'static str] =
        &["_id", "title", "date", "time", "location", "calendarId"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.date.clone(),
            self.time.clone(),
            self.location.clone(),
            self.calendar_id.clone(),
        ]
    }
}

/// Every record renders as `field: value` lines, headers dimmed.
impl<T: TableRow> Render for T {
    fn render(&self) -> String {
        let width = T::HEADERS.iter().map(|h| h.len()).max().unwrap_or(0);

        T::HEADERS
            .iter()
            .zip(self.cells())
            .map(|(header, value)| format!("  {}  {}", format!("{header:<width$}").dimmed(), value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render rows as an aligned table, or a dimmed placeholder when empty.
pub fn table<T: TableRow>(rows: &[T], empty: &str) -> String {
    if rows.is_empty() {
        return format!("  {}", empty.dimmed());
    }

    let cells: Vec<Vec<String>> = rows.iter().map(|row| row.cells()).collect();
    let widths: Vec<usize> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header = T::HEADERS
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(format!("  {}", header.bold()));

    for row in &cells {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad(cell, *w);
                // Identifiers are noise next to names; keep them quiet.
                if T::HEADERS[i].ends_with("id") || T::HEADERS[i].ends_with("Id") {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!("  {}", line.trim_end()));
    }

    lines.join("\n")
}

/// Left-align by character count so accented names line up.
fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
