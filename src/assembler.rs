//! Document assembler: one entry point that turns an application into the
//! artifacts of one document kind.
//!
//! Print forms go through the configured [`Renderer`], workbooks through
//! [`Workbook`]. Every artifact lands in the application's output directory
//! via a temporary file and an atomic rename.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::FormsConfig;
use crate::coverage::build_coverage_table;
use crate::error::{FormsError, Result, SynthesisError};
use crate::generators::common::file_component;
use crate::generators::{
    absence, business_trip, compensation, travel_invoice, PrintForm, Renderer, TypstRenderEngine,
};
use crate::layout::travel_invoice::CALCULATION;
use crate::model::{Application, SchoolEventDetails, TravelInvoice};
use crate::sheet::Workbook;
use crate::storage::OutputEnvironment;
use crate::timetable::{Subject, TimeWindow, Timetable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// One absence notice per class of a school event.
    ClassAbsence,
    TeacherAbsence,
    EducationalSupportCompensation,
    TravelInvoicePdf,
    TravelInvoiceSheet,
    BusinessTripPdf,
    BusinessTripSheet,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::ClassAbsence,
        DocumentKind::TeacherAbsence,
        DocumentKind::EducationalSupportCompensation,
        DocumentKind::TravelInvoicePdf,
        DocumentKind::TravelInvoiceSheet,
        DocumentKind::BusinessTripPdf,
        DocumentKind::BusinessTripSheet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::ClassAbsence => "class-absence",
            DocumentKind::TeacherAbsence => "teacher-absence",
            DocumentKind::EducationalSupportCompensation => "educational-support-compensation",
            DocumentKind::TravelInvoicePdf => "travel-invoice-pdf",
            DocumentKind::TravelInvoiceSheet => "travel-invoice-sheet",
            DocumentKind::BusinessTripPdf => "business-trip-pdf",
            DocumentKind::BusinessTripSheet => "business-trip-sheet",
        }
    }

    /// Kinds produced for a single teacher of the application.
    pub fn needs_teacher(self) -> bool {
        !matches!(
            self,
            DocumentKind::ClassAbsence | DocumentKind::EducationalSupportCompensation
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| FormsError::unsupported(s, "unknown document kind"))
    }
}

/// Per-call inputs besides the application itself.
#[derive(Clone, Copy, Default)]
pub struct SynthesisOptions<'a> {
    /// Short id of the teacher for the per-teacher kinds.
    pub teacher: Option<&'a str>,
    /// Authenticated timetable for the absence notices.
    pub timetable: Option<&'a dyn Timetable>,
}

pub struct Assembler {
    config: FormsConfig,
    renderer: Box<dyn Renderer>,
}

impl Assembler {
    pub fn new(config: FormsConfig, renderer: Box<dyn Renderer>) -> Self {
        Self { config, renderer }
    }

    /// Assembler rendering through the Typst CLI named in the config.
    pub fn with_typst(config: FormsConfig) -> Self {
        let engine = TypstRenderEngine::new(&config.typst_bin, &config.template_dir);
        Self::new(config, Box::new(engine))
    }

    pub fn config(&self) -> &FormsConfig {
        &self.config
    }

    /// Output directory of `app`, created on first use.
    pub fn environment(&self, app: &Application) -> Result<OutputEnvironment> {
        OutputEnvironment::prepare(&self.config.output_dir, &app.id)
    }

    /// Builds every artifact of `kind` for `app` and returns their paths.
    pub async fn synthesize(
        &self,
        app: &Application,
        kind: DocumentKind,
        options: SynthesisOptions<'_>,
    ) -> std::result::Result<Vec<PathBuf>, SynthesisError> {
        log::info!("Synthesizing {} for application {}", kind, app.id);
        self.build(app, kind, options).await.map_err(|source| {
            log::error!("Synthesis of {} for {} failed: {}", kind, app.id, source);
            SynthesisError {
                entity: app.id.clone(),
                kind,
                source,
            }
        })
    }

    async fn build(
        &self,
        app: &Application,
        kind: DocumentKind,
        options: SynthesisOptions<'_>,
    ) -> Result<Vec<PathBuf>> {
        let env = self.environment(app)?;
        let qr = self.config.viewer_link(&app.id);
        let teacher = if kind.needs_teacher() {
            Some(options.teacher.ok_or_else(|| {
                FormsError::InvalidInput(format!("{kind} needs a teacher short id"))
            })?)
        } else {
            None
        };
        let short = teacher.unwrap_or_default();

        match kind {
            DocumentKind::ClassAbsence => {
                let event = school_event(app, kind)?;
                let timetable = require_timetable(kind, options)?;
                let window = TimeWindow::new(app.start_time, app.end_time);

                let mut paths = Vec::with_capacity(event.classes.len());
                for class in &event.classes {
                    let subject = Subject::Class(class.clone());
                    let coverage = build_coverage_table(timetable, &window, &subject).await?;
                    let form = absence::class_absence(app, event, class, &coverage, &qr);
                    let file_name =
                        format!("class_absence_form_{}.pdf", file_component(class, "class"));
                    paths.push(self.render(&env, &form, &file_name)?);
                }
                Ok(paths)
            }
            DocumentKind::TeacherAbsence => {
                let timetable = require_timetable(kind, options)?;
                let window = TimeWindow::new(app.start_time, app.end_time);
                let subject = Subject::Teacher(short.to_string());
                let coverage = build_coverage_table(timetable, &window, &subject).await?;

                let name = teacher_name(app, short);
                let form = absence::teacher_absence(app, &name, short, &coverage, &qr);
                let file_name = format!(
                    "teacher_absence_form_{}.pdf",
                    file_component(short, "teacher")
                );
                Ok(vec![self.render(&env, &form, &file_name)?])
            }
            DocumentKind::EducationalSupportCompensation => {
                let event = school_event(app, kind)?;
                let form = compensation::compensation(app, event, &qr);
                Ok(vec![self.render(
                    &env,
                    &form,
                    "compensation_for_educational_support.pdf",
                )?])
            }
            DocumentKind::TravelInvoicePdf => {
                let invoice = app.travel_invoice_for(short).ok_or_else(|| {
                    FormsError::unsupported(kind, format!("no travel invoice for teacher {short}"))
                })?;
                warn_inconsistent(app, invoice);
                let receipts = env.receipts_for(short)?.len();
                let form = travel_invoice::print_form(invoice, receipts, &qr);
                let file_name = format!("travel_invoice_{}.pdf", file_component(short, "teacher"));
                Ok(vec![self.render(&env, &form, &file_name)?])
            }
            DocumentKind::TravelInvoiceSheet => {
                let invoice = app.travel_invoice_for(short).ok_or_else(|| {
                    FormsError::unsupported(kind, format!("no travel invoice for teacher {short}"))
                })?;
                warn_inconsistent(app, invoice);
                let receipts = env.receipts_for(short)?.len();
                let rows = u32::try_from(invoice.calculation.rows.len()).map_err(|_| {
                    FormsError::InvalidInput("calculation has too many rows".to_string())
                })?;

                let mut workbook = Workbook::open(&self.workbook_path(travel_invoice::WORKBOOK))?;
                let capacity = workbook.expand(CALCULATION, rows)?;
                let plan =
                    travel_invoice::sheet_plan(invoice, &self.config.workplace, receipts, capacity)?;
                workbook.apply(plan.writes())?;
                workbook.pin_timestamps(app.last_changed);

                let file_name = format!("travel_invoice_{}.xlsx", file_component(short, "teacher"));
                Ok(vec![env.persist_with(&file_name, |path| workbook.save(path))?])
            }
            DocumentKind::BusinessTripPdf => {
                let trip = app.business_trip_for(short).ok_or_else(|| {
                    FormsError::unsupported(kind, format!("no business trip for teacher {short}"))
                })?;
                let form = business_trip::print_form(trip, &qr);
                let file_name = format!(
                    "business_trip_application_{}.pdf",
                    file_component(short, "teacher")
                );
                Ok(vec![self.render(&env, &form, &file_name)?])
            }
            DocumentKind::BusinessTripSheet => {
                let trip = app.business_trip_for(short).ok_or_else(|| {
                    FormsError::unsupported(kind, format!("no business trip for teacher {short}"))
                })?;

                let mut workbook = Workbook::open(&self.workbook_path(business_trip::WORKBOOK))?;
                let plan = business_trip::sheet_plan(trip, &self.config.workplace)?;
                workbook.apply(plan.writes())?;
                workbook.pin_timestamps(app.last_changed);

                let file_name = format!(
                    "business_trip_application_{}.xlsx",
                    file_component(short, "teacher")
                );
                Ok(vec![env.persist_with(&file_name, |path| workbook.save(path))?])
            }
        }
    }

    fn workbook_path(&self, file_name: &str) -> PathBuf {
        self.config.template_dir.join(file_name)
    }

    fn render(&self, env: &OutputEnvironment, form: &PrintForm, file_name: &str) -> Result<PathBuf> {
        let bytes = self.renderer.render(form)?;
        env.persist_bytes(file_name, &bytes)
    }
}

fn school_event(app: &Application, kind: DocumentKind) -> Result<&SchoolEventDetails> {
    app.school_event().ok_or_else(|| {
        FormsError::unsupported(
            kind,
            format!("application {} is not a school event", app.id),
        )
    })
}

fn require_timetable<'a>(
    kind: DocumentKind,
    options: SynthesisOptions<'a>,
) -> Result<&'a dyn Timetable> {
    options
        .timetable
        .ok_or_else(|| FormsError::InvalidInput(format!("{kind} needs a timetable session")))
}

/// Sums are printed as delivered; a mismatch is only reported.
fn warn_inconsistent(app: &Application, invoice: &TravelInvoice) {
    if !invoice.calculation.is_consistent() {
        log::warn!(
            "Travel invoice {} of application {} has sums that do not match its rows",
            invoice.id,
            app.id
        );
    }
}

/// Display name of a teacher, preferring the identity on the trip records.
fn teacher_name(app: &Application, short: &str) -> String {
    app.travel_invoice_for(short)
        .map(|invoice| invoice.teacher.full_name())
        .or_else(|| app.business_trip_for(short).map(|trip| trip.teacher.full_name()))
        .or_else(|| {
            app.school_event()
                .and_then(|event| event.teachers.iter().find(|t| t.short == short))
                .map(|teacher| teacher.name.clone())
        })
        .unwrap_or_else(|| short.to_string())
}
