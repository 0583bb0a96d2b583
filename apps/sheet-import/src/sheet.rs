//! Spreadsheet reading - locates the record columns by header name.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Range, Reader, open_workbook_auto};

use nce_core::domain::REQUIRED_FIELDS;

/// One data row projected onto the required columns, in `REQUIRED_FIELDS` order.
#[derive(Debug, Clone)]
pub struct SheetRow {
    /// 1-based spreadsheet line, header included.
    pub line: usize,
    pub cells: [Data; 5],
}

/// Read every data row of `sheet` in the workbook at `path`.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<SheetRow>> {
    tracing::info!("Reading {} -> {} ...", path.display(), sheet);

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open spreadsheet {}", path.display()))?;
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("failed to read sheet '{sheet}'"))?;

    rows_from_range(&range)
}

/// Split a sheet range into a header and projected data rows.
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<SheetRow>> {
    let mut rows = range.rows();
    let header = rows.next().context("sheet has no header row")?;
    let positions = column_positions(header)?;

    Ok(rows
        .enumerate()
        .map(|(index, row)| SheetRow {
            line: index + 2,
            cells: positions.map(|col| row.get(col).cloned().unwrap_or(Data::Empty)),
        })
        .collect())
}

fn column_positions(header: &[Data]) -> Result<[usize; 5]> {
    let names: Vec<String> = header
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut positions = [0usize; 5];
    let mut missing = Vec::new();
    for (slot, field) in REQUIRED_FIELDS.iter().enumerate() {
        match names.iter().position(|name| name == field) {
            Some(col) => positions[slot] = col,
            None => missing.push(*field),
        }
    }

    if !missing.is_empty() {
        bail!("missing expected columns: {}", missing.join(", "));
    }
    Ok(positions)
}
