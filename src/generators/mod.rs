//! Generators module - composition of the individual forms.
//!
//! Print forms are composed as a Typst data dictionary plus the template that
//! lays it out, and rendered by a [`Renderer`]. Workbooks are composed as a
//! [`WritePlan`](crate::layout::WritePlan) against the template's field map.
//!
//! - `absence` - absence notices per class and per teacher
//! - `compensation` - compensation for educational support
//! - `travel_invoice` - travel invoice print form and workbook
//! - `business_trip` - business trip application print form and workbook

pub mod absence;
pub mod business_trip;
pub mod common;
pub mod compensation;
pub mod engine;
pub mod traits;
pub mod travel_invoice;
pub mod typst;

pub use engine::TypstRenderEngine;
pub use traits::Renderer;

use typst::Value;

/// Helpers shared by every form template.
pub const SHARED_TEMPLATE: &str = "common.typ";
/// Generated entry point that calls the form template.
pub const ENTRY_FILE: &str = "main.typ";
/// QR code image next to the entry point.
pub const QR_FILE: &str = "qr.svg";

/// One print form ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintForm {
    /// File name of the template below the forms directory.
    pub template: &'static str,
    pub data: Value,
    pub qr_payload: String,
}

impl PrintForm {
    pub fn new(template: &'static str, data: Value, qr_payload: impl Into<String>) -> Self {
        Self {
            template,
            data,
            qr_payload: qr_payload.into(),
        }
    }

    /// Entry source handed to the Typst compiler.
    ///
    /// The document date is cleared so the same data always compiles to the
    /// same PDF.
    pub fn main_source(&self) -> String {
        format!(
            "#import \"{template}\": form\n\
             #set document(date: none)\n\
             #form(\n  {data},\n  qr: \"{qr}\",\n)\n",
            template = self.template,
            data = indent_tail(&self.data.to_source()),
            qr = QR_FILE,
        )
    }
}

// Nested lines of the data literal sit one level deeper inside `#form(`.
fn indent_tail(source: &str) -> String {
    source.replace('\n', "\n  ")
}
