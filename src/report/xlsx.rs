// XLSX rendering of a report document

use super::document::{CellValue, DETAIL_FIRST_ROW, ReportDocument};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

/// Name of the only sheet in the workbook
pub const SHEET_NAME: &str = "Results";

struct Styles {
    label: Format,
    value: Format,
    seconds: Format,
    status: Format,
}

impl Styles {
    fn new() -> Self {
        Self {
            label: Format::new().set_bold().set_align(FormatAlign::Left),
            value: Format::new().set_align(FormatAlign::Left),
            seconds: Format::new()
                .set_align(FormatAlign::Center)
                .set_num_format("0.000"),
            status: Format::new().set_align(FormatAlign::Left),
        }
    }
}

fn write_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Text(text) => sheet.write_string_with_format(row, col, text.as_str(), format)?,
        CellValue::Count(n) => sheet.write_number_with_format(row, col, *n as f64, format)?,
        CellValue::Seconds(secs) => sheet.write_number_with_format(row, col, *secs, format)?,
    };
    Ok(())
}

/// Render the document into XLSX bytes.
pub fn render(document: &ReportDocument) -> Result<Vec<u8>, XlsxError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (row, entry) in document.summary.iter().enumerate() {
        let Some(entry) = entry else { continue };
        let row = row as u32;
        sheet.write_string_with_format(row, 0, entry.label, &styles.label)?;
        write_value(sheet, row, 1, &entry.value, &styles.value)?;
    }

    for (offset, detail) in document.details.iter().enumerate() {
        let row = DETAIL_FIRST_ROW + offset as u32;
        let [timestamp, test, elapsed, status, message] = detail.cells();
        write_value(sheet, row, 0, &timestamp, &styles.value)?;
        if let CellValue::Text(test) = test {
            sheet.write_string(row, 1, test)?;
        }
        write_value(sheet, row, 2, &elapsed, &styles.seconds)?;
        write_value(sheet, row, 3, &status, &styles.status)?;
        if let CellValue::Text(message) = message {
            sheet.write_string(row, 4, message)?;
        }
    }

    for (col, width) in document.column_widths().into_iter().enumerate() {
        if let Some(width) = width {
            sheet.set_column_width(col as u16, width)?;
        }
    }

    workbook.save_to_buffer()
}
