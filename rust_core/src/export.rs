//! Spreadsheet and CSV export of analysis rows.

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::{sort_by_highest, AnalysisRow};
use crate::error::ExportError;

pub const SHEET_NAME: &str = "Predictions";

pub const COLUMNS: [&str; 12] = [
    "Date",
    "League",
    "Home Position",
    "Home",
    "Away",
    "Away Position",
    "Home Win",
    "Draw",
    "Away Win",
    "Alternative Bet",
    "Highest %",
    "Prediction",
];

const HEADER_BG: u32 = 0x0e1117;
const STRIPE_BG: u32 = 0xf0f0f0;

/// `football_predictions_YYYY-MM-DD.xlsx`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("football_predictions_{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn default_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(default_file_name(date))
}

enum Cell {
    Text(String),
    Percent(u32),
}

impl Cell {
    /// Text as shown in the sheet, used for column widths and CSV.
    fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Percent(p) => format!("{}%", p),
        }
    }
}

fn cells(row: &AnalysisRow) -> [Cell; 12] {
    [
        Cell::Text(row.date.clone()),
        Cell::Text(row.league.clone()),
        Cell::Text(row.home_position.clone()),
        Cell::Text(row.home_team.clone()),
        Cell::Text(row.away_team.clone()),
        Cell::Text(row.away_position.clone()),
        Cell::Percent(row.home_win),
        Cell::Percent(row.draw),
        Cell::Percent(row.away_win),
        Cell::Text(row.alternative_bet.clone()),
        Cell::Percent(row.highest),
        Cell::Text(row.prediction.label().to_string()),
    ]
}

fn sorted(rows: &[AnalysisRow]) -> Result<Vec<AnalysisRow>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut rows = rows.to_vec();
    sort_by_highest(&mut rows);
    Ok(rows)
}

// ============================================================================
// XLSX
// ============================================================================

/// Builds the formatted workbook in memory.
pub fn build_workbook(rows: &[AnalysisRow]) -> Result<Workbook, ExportError> {
    let rows = sorted(rows)?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_BG))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let center = Format::new().set_align(FormatAlign::Center);
    let percent = center.clone().set_num_format("0%");
    let center_striped = center.clone().set_background_color(Color::RGB(STRIPE_BG));
    let percent_striped = percent.clone().set_background_color(Color::RGB(STRIPE_BG));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let sheet_row = i as u32 + 1;
        // every other data row, counting the header as row 0
        let striped = sheet_row % 2 == 0;
        let (text_fmt, pct_fmt) = if striped {
            (&center_striped, &percent_striped)
        } else {
            (&center, &percent)
        };

        for (col, cell) in cells(row).iter().enumerate() {
            widths[col] = widths[col].max(cell.display().chars().count());
            match cell {
                Cell::Text(s) => {
                    sheet.write_string_with_format(sheet_row, col as u16, s, text_fmt)?;
                }
                Cell::Percent(p) => {
                    sheet.write_number_with_format(
                        sheet_row,
                        col as u16,
                        f64::from(*p) / 100.0,
                        pct_fmt,
                    )?;
                }
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, (*width + 2) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    Ok(workbook)
}

pub fn write_xlsx(rows: &[AnalysisRow], path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(rows)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    info!("Exported {} predictions to {}", rows.len(), path.display());
    Ok(())
}

/// Workbook bytes, for callers that stream the file elsewhere.
pub fn xlsx_bytes(rows: &[AnalysisRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(rows)?;
    Ok(workbook.save_to_buffer()?)
}

// ============================================================================
// CSV
// ============================================================================

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes one comma-separated row.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header plus rows sorted by highest probability; percentages as "40%".
pub fn write_csv<W: Write>(mut w: W, rows: &[AnalysisRow]) -> Result<(), ExportError> {
    let rows = sorted(rows)?;
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    write_row(&mut w, &header)?;
    for row in &rows {
        let line: Vec<String> = cells(row).iter().map(Cell::display).collect();
        write_row(&mut w, &line)?;
    }
    Ok(())
}

pub fn write_csv_file(rows: &[AnalysisRow], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_csv(&mut writer, rows)?;
    writer.flush()?;
    info!("Exported {} predictions to {}", rows.len(), path.display());
    Ok(())
}
