//! Document synthesis for school travel-expense applications.
//!
//! Turns validated application records into the institution's fixed forms:
//! Typst-rendered PDFs, filled xlsx workbooks, and merged bundles of forms
//! and receipt scans.
//!
//! - `assembler` - entry point, one call per application and document kind
//! - `generators` - per-form content and the Typst render engine
//! - `sheet` / `layout` - workbook templates and their cell maps
//! - `coverage` / `untis` - substitution tables from the timetable
//! - `merge` / `storage` - PDF concatenation and the output directories

pub mod assembler;
pub mod config;
pub mod coverage;
pub mod error;
pub mod format;
pub mod generators;
pub mod layout;
pub mod merge;
pub mod model;
pub mod sheet;
pub mod storage;
pub mod timetable;
pub mod untis;

pub use assembler::{Assembler, DocumentKind, SynthesisOptions};
pub use config::{ConfigError, FormsConfig};
pub use error::{CollaboratorError, FormatError, FormsError, SynthesisError, TemplateError};
pub use timetable::{Lesson, Subject, TimeWindow, Timetable};
