//! Row coercion and the filtering pass that drops incomplete rows.

use calamine::Data;
use chrono::{Days, NaiveDate};

use nce_core::domain::{NewErrorRecord, REQUIRED_FIELDS, parse_date_any};

use crate::sheet::SheetRow;

/// Rows that survived coercion plus an account of the ones that did not.
#[derive(Debug, Default)]
pub struct PreparedBatch {
    pub records: Vec<NewErrorRecord>,
    pub discarded: Vec<DiscardedRow>,
}

/// A dropped row and the first required field it lacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedRow {
    pub line: usize,
    pub field: &'static str,
}

/// Coerce every row, keeping complete ones and recording the rest.
pub fn prepare(rows: Vec<SheetRow>) -> PreparedBatch {
    let mut batch = PreparedBatch::default();

    for row in rows {
        match coerce(&row) {
            Ok(record) => batch.records.push(record),
            Err(field) => batch.discarded.push(DiscardedRow {
                line: row.line,
                field,
            }),
        }
    }

    batch
}

fn coerce(row: &SheetRow) -> Result<NewErrorRecord, &'static str> {
    let [description, category, overview, date, count] = &row.cells;

    Ok(NewErrorRecord {
        error_description: text_cell(description).ok_or(REQUIRED_FIELDS[0])?,
        category: text_cell(category).ok_or(REQUIRED_FIELDS[1])?,
        customer_overview_type: text_cell(overview).ok_or(REQUIRED_FIELDS[2])?,
        error_date: date_cell(date).ok_or(REQUIRED_FIELDS[3])?,
        error_count: count_cell(count).ok_or(REQUIRED_FIELDS[4])?,
    })
}

fn text_cell(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) => s.trim().to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => excel_serial_to_date(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_any(s).ok(),
        _ => None,
    }
}

/// Convert an Excel serial day number (1900 date system) to a date.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Whole number from a numeric cell or numeric text; fractions are truncated.
fn count_cell(cell: &Data) -> Option<i32> {
    match cell {
        Data::Int(i) => i32::try_from(*i).ok(),
        Data::Float(f) => float_to_count(*f),
        Data::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_count))
        }
        _ => None,
    }
}

fn float_to_count(value: f64) -> Option<i32> {
    let whole = value.trunc();
    (whole.is_finite() && whole >= f64::from(i32::MIN) && whole <= f64::from(i32::MAX))
        .then_some(whole as i32)
}
