//! Absence notices, one per class of a school event and one per teacher.
//!
//! Both notices carry the substitution table built from the timetable and an
//! acknowledgement table for the offices that have to sign off.

use super::typst::{Dict, Value};
use super::PrintForm;
use crate::coverage::{CoverageRow, CoverageTable};
use crate::format::{self, Label};
use crate::model::{Application, ApplicationDetails, OtherReasonKind, SchoolEventDetails, TrainingKind};

pub const CLASS_TEMPLATE: &str = "class_absence.typ";
pub const TEACHER_TEMPLATE: &str = "teacher_absence.typ";

pub const COVERAGE_HEADER: [&str; 8] = [
    "H/R/E", "Jahrgang", "Datum", "Stunde", "Saal", "LK Supp.", "LK Entf.", "Paraphe",
];
pub const ACKNOWLEDGEMENT_HEADER: [&str; 3] = ["Stelle", "Datum", "Paraphe"];

const CLASS_SIGNERS: [&str; 6] = [
    "AV",
    "AV",
    "WL",
    "Begleitperson",
    "Ersteller/in",
    "UNTIS Eintragung",
];
const TEACHER_SIGNERS: [&str; 4] = ["AV", "WL", "Ersteller/in", "UNTIS Eintragung"];

fn acknowledgements(signers: &[&str]) -> Value {
    Value::table(signers.iter().map(|signer| [*signer, "", ""]))
}

fn coverage_cells(
    row: &CoverageRow,
    classes: String,
    supervising: &str,
    absent: String,
) -> [String; 8] {
    [
        String::new(),
        classes,
        format::date(row.date),
        row.period.to_string(),
        format::list(&row.rooms),
        supervising.to_string(),
        absent,
        String::new(),
    ]
}

/// Absence notice for one class of a school event.
///
/// The event's teachers supervise every listed lesson; the lesson's own
/// teachers are the ones freed from it.
pub fn class_absence(
    app: &Application,
    event: &SchoolEventDetails,
    class: &str,
    coverage: &CoverageTable,
    qr_payload: &str,
) -> PrintForm {
    let leader = event.leader().map(|teacher| teacher.name.as_str()).unwrap_or_default();
    let companions = format::list(event.companions().map(|teacher| teacher.name.as_str()));
    let supervising = format::list(
        std::iter::once(leader)
            .chain(event.companions().map(|teacher| teacher.name.as_str()))
            .filter(|name| !name.is_empty()),
    );

    let rows = coverage.rows.iter().map(|row| {
        coverage_cells(row, class.to_string(), &supervising, format::list(&row.teachers))
    });

    let data = Dict::new()
        .with("class", class)
        .with("leader", leader)
        .with(
            "students",
            format!("{} / {}", event.male_students, event.female_students),
        )
        .with("companions", companions)
        .with("from", format::weekday_date_time(app.start_time))
        .with("till", format::weekday_date_time(app.end_time))
        .with("notes", app.notes.as_str())
        .with("event", app.name.as_str())
        .with("meeting_point", app.start_address.as_str())
        .with("meeting_time", format::time(&app.start_time))
        .with("duration", format::duration_category(event.duration_in_days))
        .with("coverage_header", Value::strings(COVERAGE_HEADER))
        .with("coverage", Value::table(rows))
        .with("acknowledgement_header", Value::strings(ACKNOWLEDGEMENT_HEADER))
        .with("acknowledgements", acknowledgements(&CLASS_SIGNERS));

    PrintForm::new(CLASS_TEMPLATE, data.into(), qr_payload)
}

/// Heading and label/value lines of the absence reason.
fn reason(app: &Application) -> (&'static str, Vec<[String; 2]>) {
    let line = |label: &str, value: String| [label.to_string(), value];

    match &app.details {
        ApplicationDetails::SchoolEvent(_) => (
            "Schulveranstaltung",
            vec![line("Veranstaltung:", app.name.clone())],
        ),
        ApplicationDetails::Training(training) => {
            let kind = match training.kind {
                TrainingKind::Miscellaneous => format!(
                    "{}: {}",
                    training.kind.label(),
                    training.miscellaneous_reason
                ),
                other => other.label().to_string(),
            };
            (
                "Fortbildung",
                vec![
                    line("Titel der Fortbildung:", app.name.clone()),
                    line("PH-Zahl:", training.ph_number.to_string()),
                    line("Art der Veranstaltung:", kind),
                    line("Veranstalter:", training.organizer.clone()),
                ],
            )
        }
        ApplicationDetails::OtherReason(other) => {
            let mut lines = vec![line("Art:", other.kind.label().to_string())];
            match other.kind {
                OtherReasonKind::ServiceMandate => {
                    lines.push(line("GZ:", other.service_mandate_gz.to_string()));
                    lines.push(line("Titel:", other.service_mandate_title.clone()));
                }
                OtherReasonKind::Miscellaneous => {
                    lines.push(line("Grund:", other.miscellaneous_reason.clone()));
                }
                _ => {}
            }
            ("Anderer Grund", lines)
        }
    }
}

/// Absence notice for one teacher, listing the lessons they miss.
pub fn teacher_absence(
    app: &Application,
    name: &str,
    short: &str,
    coverage: &CoverageTable,
    qr_payload: &str,
) -> PrintForm {
    let rows = coverage.rows.iter().map(|row| {
        coverage_cells(row, format::list(&row.classes), "", short.to_string())
    });
    let (reason_title, reason_lines) = reason(app);

    let data = Dict::new()
        .with("name", name)
        .with("from", format::weekday_date_time(app.start_time))
        .with("till", format::weekday_date_time(app.end_time))
        .with("notes", app.notes.as_str())
        .with("reason_title", reason_title)
        .with("reason", Value::table(reason_lines))
        .with("coverage_header", Value::strings(COVERAGE_HEADER))
        .with("coverage", Value::table(rows))
        .with("acknowledgement_header", Value::strings(ACKNOWLEDGEMENT_HEADER))
        .with("acknowledgements", acknowledgements(&TEACHER_SIGNERS));

    PrintForm::new(TEACHER_TEMPLATE, data.into(), qr_payload)
}
