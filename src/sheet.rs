//! Spreadsheet template handling on top of `umya-spreadsheet`.
//!
//! A [`Workbook`] is loaded from a fixed template, optionally grown with
//! [`Workbook::expand`], filled from a list of [`CellWrite`]s and saved.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

use crate::error::{FormsError, TemplateError};
use crate::layout::{column_letters, CellRef, CellValue, CellWrite, TableRegion};

/// Every template carries its form on this sheet.
pub const SHEET_NAME: &str = "Sheet1";

static CELL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$?)\b([A-Z]{1,3})(\$?)(\d+)\b").expect("invalid cell reference pattern")
});

pub struct Workbook {
    book: Spreadsheet,
    source: PathBuf,
}

impl Workbook {
    /// Loads a template and checks that it carries the form sheet.
    pub fn open(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Err(TemplateError::Missing {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(TemplateError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let book = reader::xlsx::read(path).map_err(|e| TemplateError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if book.get_sheet_by_name(SHEET_NAME).is_none() {
            return Err(TemplateError::MissingSheet {
                sheet: SHEET_NAME.to_string(),
            });
        }

        log::debug!("Loaded spreadsheet template {}", path.display());
        Ok(Self {
            book,
            source: path.to_path_buf(),
        })
    }

    fn sheet(&self) -> Result<&Worksheet, TemplateError> {
        self.book
            .get_sheet_by_name(SHEET_NAME)
            .ok_or_else(|| TemplateError::MissingSheet {
                sheet: SHEET_NAME.to_string(),
            })
    }

    fn sheet_mut(&mut self) -> Result<&mut Worksheet, TemplateError> {
        self.book
            .get_sheet_by_name_mut(SHEET_NAME)
            .ok_or_else(|| TemplateError::MissingSheet {
                sheet: SHEET_NAME.to_string(),
            })
    }

    /// Grows `region` until it holds `rows` data rows and returns the capacity.
    ///
    /// The last pre-built row is duplicated directly above the summary row,
    /// with its styles, height, formulas and single-row merges. Templates that
    /// already fit are left untouched.
    pub fn expand(&mut self, region: TableRegion, rows: u32) -> Result<u32, TemplateError> {
        let capacity = region.capacity_for(rows);
        let extra = capacity - region.prebuilt_rows;
        if extra == 0 {
            return Ok(capacity);
        }

        let template_row = region.template_row();
        let source = self.source.display().to_string();
        let sheet = self.sheet_mut()?;

        let highest_column = sheet.get_highest_column();
        if highest_column == 0 {
            return Err(TemplateError::Expansion(format!(
                "row {template_row} of {source} is empty"
            )));
        }

        let cells: Vec<_> = (1..=highest_column)
            .filter_map(|column| {
                sheet.get_cell((column, template_row)).map(|cell| {
                    (
                        column,
                        cell.get_style().clone(),
                        cell.get_formula().to_string(),
                    )
                })
            })
            .collect();
        let height = sheet
            .get_row_dimension(&template_row)
            .map(|row| *row.get_height())
            .filter(|height| *height > 0.0);
        let merges: Vec<(u32, u32)> = sheet
            .get_merge_cells()
            .iter()
            .filter_map(|range| single_row_span(&range.get_range(), template_row))
            .collect();

        sheet.insert_new_row(&(template_row + 1), &extra);

        for offset in 1..=extra {
            let row = template_row + offset;
            for (column, style, formula) in &cells {
                let cell = sheet.get_cell_mut((*column, row));
                cell.set_style(style.clone());
                if !formula.is_empty() {
                    cell.set_formula(shift_formula_rows(formula, offset));
                }
            }
            if let Some(height) = height {
                sheet.get_row_dimension_mut(&row).set_height(height);
            }
            for (first, last) in &merges {
                sheet.add_merge_cells(format!(
                    "{}{row}:{}{row}",
                    column_letters(*first),
                    column_letters(*last)
                ));
            }
        }

        log::debug!(
            "Expanded table at row {} of {source} by {extra} rows (capacity {capacity})",
            region.first_row
        );
        Ok(capacity)
    }

    pub fn apply(&mut self, writes: &[CellWrite]) -> Result<(), TemplateError> {
        let sheet = self.sheet_mut()?;
        for write in writes {
            let cell = sheet.get_cell_mut((write.cell.column, write.cell.row));
            match &write.value {
                CellValue::Text(text) => {
                    cell.set_value_string(text.clone());
                }
                CellValue::Number(number) => {
                    cell.set_value_number(*number);
                }
            }
        }
        Ok(())
    }

    /// Current value of a cell as text, empty when the cell does not exist.
    pub fn value(&self, cell: CellRef) -> Result<String, TemplateError> {
        Ok(self.sheet()?.get_value((cell.column, cell.row)))
    }

    /// Sets the created and modified properties to `at`.
    ///
    /// Saving stamps the current time otherwise, so the same input would not
    /// give the same document properties twice.
    pub fn pin_timestamps(&mut self, at: NaiveDateTime) {
        let stamp = at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let properties = self.book.get_properties_mut();
        properties.set_created(stamp.clone());
        properties.set_modified(stamp);
    }

    pub fn save(&self, path: &Path) -> Result<(), FormsError> {
        writer::xlsx::write(&self.book, path).map_err(|e| {
            FormsError::output(path, std::io::Error::other(e.to_string()))
        })
    }
}

/// Moves every relative row reference of a formula down by `rows`.
pub fn shift_formula_rows(formula: &str, rows: u32) -> String {
    CELL_REFERENCE
        .replace_all(formula, |caps: &Captures| {
            let whole = &caps[0];
            let followed_by_call = caps
                .get(0)
                .and_then(|m| formula[m.end()..].chars().next())
                .is_some_and(|next| next == '(');
            if followed_by_call || &caps[3] == "$" {
                return whole.to_string();
            }
            match caps[4].parse::<u32>() {
                Ok(row) => format!("{}{}{}", &caps[1], &caps[2], row + rows),
                Err(_) => whole.to_string(),
            }
        })
        .into_owned()
}

// Column span of a merge that covers exactly `row`, e.g. `O32:AN32`.
fn single_row_span(range: &str, row: u32) -> Option<(u32, u32)> {
    let (start, end) = range.split_once(':')?;
    let start = CellRef::parse(&start.replace('$', ""))?;
    let end = CellRef::parse(&end.replace('$', ""))?;
    (start.row == row && end.row == row).then_some((start.column, end.column))
}
