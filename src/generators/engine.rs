//! Typst rendering engine.
//!
//! Writes the form template, the generated entry file and the QR code into a
//! temporary directory, runs the Typst CLI and returns the PDF bytes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use qrcode::render::svg;
use qrcode::QrCode;
use tempfile::{tempdir, TempDir};

use super::traits::Renderer;
use super::{PrintForm, ENTRY_FILE, QR_FILE, SHARED_TEMPLATE};
use crate::error::TemplateError;

/// Templates live in `<template_dir>/forms/`.
pub const FORMS_DIR: &str = "forms";

const OUTPUT_FILE: &str = "form.pdf";

pub struct TypstRenderEngine {
    typst_bin: PathBuf,
    template_dir: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(typst_bin: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
            template_dir: template_dir.into(),
        }
    }

    fn load_template(&self, file_name: &str) -> Result<String, TemplateError> {
        let path = self.template_dir.join(FORMS_DIR).join(file_name);
        if !path.is_file() {
            return Err(TemplateError::Missing { path });
        }
        fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source })
    }
}

impl Renderer for TypstRenderEngine {
    fn render(&self, form: &PrintForm) -> Result<Vec<u8>, TemplateError> {
        let shared = self.load_template(SHARED_TEMPLATE)?;
        let template = self.load_template(form.template)?;

        let temp_dir = tempdir().map_err(TemplateError::TempDir)?;
        let write = |name: &str, contents: &[u8]| {
            fs::write(temp_dir.path().join(name), contents).map_err(TemplateError::WriteTypst)
        };
        write(SHARED_TEMPLATE, shared.as_bytes())?;
        write(form.template, template.as_bytes())?;
        write(QR_FILE, qr_svg(&form.qr_payload)?.as_bytes())?;
        write(ENTRY_FILE, form.main_source().as_bytes())?;

        log::debug!("Compiling {} with {}", form.template, self.typst_bin.display());
        compile_typst_to_pdf(&self.typst_bin, &temp_dir, ENTRY_FILE, OUTPUT_FILE)
    }
}

/// QR code as a standalone SVG image.
pub fn qr_svg(payload: &str) -> Result<String, TemplateError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| TemplateError::QrCode(e.to_string()))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .quiet_zone(false)
        .build())
}

/// Compile a Typst source file to PDF.
fn compile_typst_to_pdf(
    typst_bin: &Path,
    temp_dir: &TempDir,
    typ_filename: &str,
    output_filename: &str,
) -> Result<Vec<u8>, TemplateError> {
    let typ_path = temp_dir.path().join(typ_filename);
    let output_path = temp_dir.path().join(output_filename);

    let output = Command::new(typst_bin)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .output()
        .map_err(TemplateError::TypstIo)?;

    if !output.status.success() {
        return Err(TemplateError::TypstExit {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    fs::read(&output_path).map_err(TemplateError::ReadPdf)
}
