//! Seams between form composition and PDF rendering.

use super::PrintForm;
use crate::error::TemplateError;

/// Renders a composed print form to PDF bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, form: &PrintForm) -> Result<Vec<u8>, TemplateError>;
}
