//! Plain-text views of the session for the interactive loop.

use std::fmt::Write;

use chrono::{Datelike, Months, NaiveDate};

use csvt_core::{Cursor, SessionState};
use csvt_model::{ColumnKind, Record, Schema, Value};

/// Width of one day cell in the calendar.
const DAY_CELL: usize = 4;

/// One character per record: `#` tagged, `_` untagged, cursor in brackets.
pub fn status_strip(session: &SessionState) -> String {
    let cursor = session.cursor().index();
    let mut strip = String::with_capacity(session.len() + 2);
    for (index, record) in session.store().iter().enumerate() {
        let mark = if record.is_annotated() { '#' } else { '_' };
        if Some(index) == cursor {
            strip.push('[');
            strip.push(mark);
            strip.push(']');
        } else {
            strip.push(mark);
        }
    }
    strip
}

pub fn progress_line(session: &SessionState) -> String {
    let progress = session.progress();
    format!(
        "N: {} / {}. {} items skipped.",
        progress.annotated, progress.total, progress.skipped
    )
}

/// The record under the cursor, one column per line.
pub fn record_view(session: &SessionState) -> String {
    let Cursor::At(index) = session.cursor() else {
        return if session.is_empty() {
            "No records.".to_string()
        } else {
            format!(
                "All {} records are tagged. Use < or g N to review, q to finish.",
                session.len()
            )
        };
    };
    let Some((_, record)) = session.current() else {
        return String::new();
    };
    let schema = session.schema();
    let tag_label = schema.tag_column_name();
    let width = schema
        .columns()
        .iter()
        .map(|c| c.name.chars().count())
        .chain([tag_label.chars().count()])
        .max()
        .unwrap_or(0);

    let mut out = format!("Record {} of {}", index + 1, session.len());
    if record.is_flagged() {
        out.push_str("  (!) some fields could not be read");
    }
    let dates: Vec<NaiveDate> = record.values().iter().filter_map(Value::as_date).collect();
    if let Some(calendar) = date_calendar(&dates) {
        for line in calendar.lines() {
            out.push('\n');
            if !line.is_empty() {
                let _ = write!(out, "  {line}");
            }
        }
    }
    for (column_index, column) in schema.columns().iter().enumerate() {
        if Some(column_index) == schema.tag_index() {
            continue;
        }
        let shown = match record.value(column_index) {
            Some(Value::Unparsed(raw)) => format!("{raw}  (not a valid {})", column.kind),
            Some(value) => value.to_string(),
            None => String::new(),
        };
        let _ = write!(out, "\n  {:<width$}  {shown}", column.name);
    }
    if let Some(balance) = balance_line(schema, record) {
        let _ = write!(out, "\n  {:<width$}  {balance}", "balance");
    }
    let _ = write!(
        out,
        "\n  {:<width$}  {}",
        tag_label,
        record.tag().unwrap_or("UNTAGGED")
    );
    out
}

/// Credits, debits and net over the record's number columns:
/// `+credit / -debit  = net`. `None` when the schema has no number column.
pub fn balance_line(schema: &Schema, record: &Record) -> Option<String> {
    let mut columns = schema
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == ColumnKind::Number)
        .peekable();
    columns.peek()?;
    let (credit, debit) = columns
        .filter_map(|(index, _)| record.value(index).and_then(Value::as_number))
        .fold((0.0, 0.0), |(credit, debit), amount: f64| {
            if amount >= 0.0 {
                (credit + amount, debit)
            } else {
                (credit, debit - amount)
            }
        });
    Some(format!("+{credit:.2} / -{debit:.2}  = {:.2}", credit - debit))
}

/// Month grids, Monday first, covering the first and last of `dates`, with
/// those days in brackets. `None` when there are no dates.
pub fn date_calendar(dates: &[NaiveDate]) -> Option<String> {
    let first = dates.iter().min()?;
    let last = dates.iter().max()?;
    let mut grids = vec![month_grid(*first, dates)?];
    if (first.year(), first.month()) != (last.year(), last.month()) {
        grids.push(month_grid(*last, dates)?);
    }
    Some(grids.join("\n\n"))
}

fn month_grid(day_in_month: NaiveDate, highlight: &[NaiveDate]) -> Option<String> {
    let first = day_in_month.with_day(1)?;
    let days = first.checked_add_months(Months::new(1))?.pred_opt()?.day();
    let width = DAY_CELL * 7;
    let title = format!("{:^width$}", first.format("%B %Y").to_string());
    let mut lines = vec![
        title.trim_end().to_string(),
        " Mo  Tu  We  Th  Fr  Sa  Su".to_string(),
    ];

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut week = " ".repeat(DAY_CELL * offset);
    for day in 1..=days {
        let date = first.with_day(day)?;
        if highlight.contains(&date) {
            let _ = write!(week, "[{day:>2}]");
        } else {
            let _ = write!(week, " {day:>2} ");
        }
        if date.weekday().num_days_from_monday() == 6 {
            lines.push(week.trim_end().to_string());
            week.clear();
        }
    }
    if !week.is_empty() {
        lines.push(week.trim_end().to_string());
    }
    Some(lines.join("\n"))
}

/// Progress, strip, current record and valid tags, as printed before each
/// prompt.
pub fn screen(session: &SessionState) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        progress_line(session),
        status_strip(session),
        record_view(session),
        tag_choices(session)
    )
}

pub fn tag_choices(session: &SessionState) -> String {
    format!("tags: {}", session.registry().all().join(", "))
}

pub const HELP: &str = "\
Available actions:
  <          previous record
  >          next record
  [          previous untagged record
  ]          next untagged record
  s / Enter  skip this record
  g N        go to record N
  +TAG       register a new tag
  ?          show this help
  q          save and stop tagging
  anything else is a tag for the current record";
