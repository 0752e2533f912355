//! Presentation of the analysis: console preview with prettytable and the report file.
//!
//! The report is one xlsx workbook with a named worksheet per table. As a secondary
//! format every table can be written as a CSV file into an output directory.
//! Both writers stage their output in temporary files and move it into place only
//! when everything was written; a failed run leaves no partial report behind.
use crate::error::{BlendError, BlendResult};
use log::info;
use prettytable::{Cell, Row, Table};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
/// Rows with a text label and numeric values, as shown in one report sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub title: String,
    /// header of the label column
    pub corner: String,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
}

impl LabeledTable {
    pub fn new(title: &str, corner: &str, columns: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            corner: corner.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: &str, values: Vec<f64>) {
        self.rows.push((label.to_string(), values));
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, values)| values.as_slice())
    }

    pub fn value(&self, label: &str, column: &str) -> Option<f64> {
        let j = self.columns.iter().position(|c| c == column)?;
        self.row(label).and_then(|values| values.get(j).copied())
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![self.corner.clone()];
        header.extend(self.columns.iter().cloned());
        header
    }

    pub fn to_prettytable(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(
            self.header().iter().map(|h| Cell::new(h)).collect(),
        ));
        for (label, values) in &self.rows {
            let mut cells = vec![Cell::new(label)];
            cells.extend(values.iter().map(|v| Cell::new(&v.to_string())));
            table.add_row(Row::new(cells));
        }
        table
    }

    pub fn print_preview(&self) {
        println!("\n_________{}_________", self.title.to_uppercase());
        self.to_prettytable().printstd();
    }

    /// header row followed by one record per labeled row; NaN is written as `NaN`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.header())?;
        for (label, values) in &self.rows {
            let mut record = vec![label.clone()];
            record.extend(values.iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Output format of the report, taken from the extension of the output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// single workbook, one worksheet per table
    Xlsx,
    /// directory with one CSV file per table
    CsvDirectory,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ReportFormat::Xlsx,
            _ => ReportFormat::CsvDirectory,
        }
    }
}

/// "Recipe by Package" -> "recipe_by_package.csv"
pub fn sheet_file_name(title: &str) -> String {
    let stem: Vec<String> = title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    format!("{}.csv", stem.join("_"))
}

fn write_failure(path: &Path, reason: impl ToString) -> BlendError {
    BlendError::OutputWriteFailure {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Builds the workbook in memory: header row in bold, then one row per labeled row.
/// NaN cannot be stored as an xlsx number and is written as the text `NaN`.
pub fn build_workbook(sheets: &[LabeledTable]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.title)?;
        for (col, name) in sheet.header().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &bold)?;
        }
        for (i, (label, values)) in sheet.rows.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_string(row, 0, label)?;
            for (j, value) in values.iter().enumerate() {
                let col = (j + 1) as u16;
                if value.is_nan() {
                    worksheet.write_string(row, col, "NaN")?;
                } else {
                    worksheet.write_number(row, col, *value)?;
                }
            }
        }
        worksheet.set_column_width(0, 16)?;
    }
    Ok(workbook)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes all sheets into one xlsx workbook at `path`. The directory of `path` must exist.
pub fn write_workbook(path: &Path, sheets: &[LabeledTable]) -> BlendResult<PathBuf> {
    let buffer = build_workbook(sheets)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .map_err(|e| write_failure(path, e))?;
    let mut temp = NamedTempFile::new_in(parent_dir(path)).map_err(|e| write_failure(path, e))?;
    temp.write_all(&buffer)
        .and_then(|_| temp.flush())
        .map_err(|e| write_failure(path, e))?;
    temp.persist(path).map_err(|e| write_failure(path, e.error))?;
    info!(
        "report with {} sheets written to '{}'",
        sheets.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

/// Writes every sheet as a CSV file into `output_dir` and returns the created file paths.
/// On failure the files already moved into place are removed again, and so is
/// `output_dir` if this call created it.
pub fn write_csv_report(output_dir: &Path, sheets: &[LabeledTable]) -> BlendResult<Vec<PathBuf>> {
    let created_dir = !output_dir.exists();
    fs::create_dir_all(output_dir).map_err(|e| write_failure(output_dir, e))?;

    let mut written = Vec::with_capacity(sheets.len());
    let result = stage_and_persist_csv(output_dir, sheets, &mut written);
    if let Err(e) = result {
        for target in &written {
            let _ = fs::remove_file(target);
        }
        if created_dir {
            let _ = fs::remove_dir_all(output_dir);
        }
        return Err(e);
    }
    info!(
        "report with {} sheets written to '{}'",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

fn stage_and_persist_csv(
    output_dir: &Path,
    sheets: &[LabeledTable],
    written: &mut Vec<PathBuf>,
) -> BlendResult<()> {
    let mut staged = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let target = output_dir.join(sheet_file_name(&sheet.title));
        let mut temp = NamedTempFile::new_in(output_dir).map_err(|e| write_failure(&target, e))?;
        sheet
            .write_csv(temp.as_file_mut())
            .map_err(|e| write_failure(&target, e))?;
        staged.push((temp, target));
    }
    for (temp, target) in staged {
        temp.persist(&target)
            .map_err(|e| write_failure(&target, e.error))?;
        written.push(target);
    }
    Ok(())
}

/// Writes the report in the format chosen by the output path
pub fn write_report(output: &Path, sheets: &[LabeledTable]) -> BlendResult<Vec<PathBuf>> {
    match ReportFormat::from_path(output) {
        ReportFormat::Xlsx => Ok(vec![write_workbook(output, sheets)?]),
        ReportFormat::CsvDirectory => write_csv_report(output, sheets),
    }
}
