//! Cell addressing for the spreadsheet templates.
//!
//! Every template owns a static map from logical field to base cell. Fields
//! inside a repeating region are addressed as `column + (base_row + offset)`
//! so one function serves every table.

pub mod business_trip;
pub mod travel_invoice;

use std::fmt;

pub use business_trip::BusinessTripField;
pub use travel_invoice::TravelInvoiceField;

/// One-based column and row of a spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    /// Builds a reference from column letters, e.g. `CellRef::at("AB", 12)`.
    pub const fn at(letters: &str, row: u32) -> Self {
        Self {
            column: column_index(letters),
            row,
        }
    }

    pub const fn down(self, rows: u32) -> Self {
        Self {
            column: self.column,
            row: self.row + rows,
        }
    }

    pub const fn right(self, columns: u32) -> Self {
        Self {
            column: self.column + columns,
            row: self.row,
        }
    }

    /// Parses an `A1` style reference. Absolute markers are not accepted.
    pub fn parse(text: &str) -> Option<Self> {
        let split = text.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = text.split_at(split);
        if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_uppercase())
        {
            return None;
        }
        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self {
            column: column_index(letters),
            row,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

/// `A` -> 1, `Z` -> 26, `AA` -> 27.
pub const fn column_index(letters: &str) -> u32 {
    let bytes = letters.as_bytes();
    let mut index = 0;
    let mut i = 0;
    while i < bytes.len() {
        index = index * 26 + (bytes[i] - b'A' + 1) as u32;
        i += 1;
    }
    index
}

/// Inverse of [`column_index`].
pub fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A logical field of one template.
pub trait Field: Copy + fmt::Debug {
    fn base(self) -> CellRef;
}

/// Address of `field` in the data row `row_offset` rows below its base row.
///
/// Fixed fields are addressed with an offset of zero.
pub fn address<F: Field>(field: F, row_offset: u32) -> CellRef {
    field.base().down(row_offset)
}

/// Fixed-capacity table whose last pre-built row is duplicated to grow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRegion {
    pub first_row: u32,
    pub prebuilt_rows: u32,
}

impl TableRegion {
    /// Last pre-built row, the one copied on expansion.
    pub const fn template_row(&self) -> u32 {
        self.first_row + self.prebuilt_rows - 1
    }

    /// Row of the summary line for a table grown to `capacity` rows.
    pub const fn summary_row(&self, capacity: u32) -> u32 {
        self.first_row + capacity
    }

    /// Capacity needed to hold `rows` data rows.
    pub fn capacity_for(&self, rows: u32) -> u32 {
        rows.max(self.prebuilt_rows)
    }
}

/// Value written into one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub cell: CellRef,
    pub value: CellValue,
}

/// Collects the writes for one workbook in field order.
#[derive(Debug, Default)]
pub struct WritePlan {
    writes: Vec<CellWrite>,
}

impl WritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<F: Field>(&mut self, field: F, value: impl Into<CellValue>) {
        self.set_at(field, 0, value);
    }

    pub fn set_at<F: Field>(&mut self, field: F, row_offset: u32, value: impl Into<CellValue>) {
        self.writes.push(CellWrite {
            cell: address(field, row_offset),
            value: value.into(),
        });
    }

    /// Writes one character per cell, left to right from the field's base.
    pub fn strip<F: Field>(&mut self, field: F, chars: &[char]) {
        let base = address(field, 0);
        for (i, c) in chars.iter().enumerate() {
            self.writes.push(CellWrite {
                cell: base.right(i as u32),
                value: CellValue::Text(c.to_string()),
            });
        }
    }

    pub fn writes(&self) -> &[CellWrite] {
        &self.writes
    }
}
