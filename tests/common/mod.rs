//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use lopdf::{dictionary, Document, Object, Stream};

use expense_forms::error::{CollaboratorError, TemplateError};
use expense_forms::generators::{PrintForm, Renderer};
use expense_forms::model::Application;
use expense_forms::{FormsConfig, Lesson, Subject, TimeWindow, Timetable};

pub fn at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
}

pub fn lesson(start: &str, end: &str, class: &str, teacher: &str, room: &str) -> Lesson {
    Lesson {
        start: at(start),
        end: at(end),
        class_ids: vec![1],
        classes: vec![class.to_string()],
        teacher_ids: vec![2],
        teachers: vec![teacher.to_string()],
        room_ids: vec![3],
        rooms: vec![room.to_string()],
    }
}

/// Timetable answering from a fixed map and recording every request.
#[derive(Default)]
pub struct FakeTimetable {
    pub lessons: HashMap<String, Vec<Lesson>>,
    pub requests: Mutex<Vec<Subject>>,
    pub fail: bool,
}

impl FakeTimetable {
    pub fn with(mut self, subject: &str, lessons: Vec<Lesson>) -> Self {
        self.lessons.insert(subject.to_string(), lessons);
        self
    }
}

#[async_trait]
impl Timetable for FakeTimetable {
    async fn lessons_for(
        &self,
        subject: &Subject,
        _window: &TimeWindow,
    ) -> Result<Vec<Lesson>, CollaboratorError> {
        self.requests.lock().unwrap().push(subject.clone());
        if self.fail {
            return Err(CollaboratorError::Timetable {
                method: "getTimetable".to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self.lessons.get(subject.name()).cloned().unwrap_or_default())
    }
}

/// Renderer returning the generated entry source instead of a PDF.
pub struct SourceRenderer;

impl Renderer for SourceRenderer {
    fn render(&self, form: &PrintForm) -> Result<Vec<u8>, TemplateError> {
        Ok(form.main_source().into_bytes())
    }
}

pub fn config(output: &Path, templates: &Path) -> FormsConfig {
    FormsConfig {
        output_dir: output.to_path_buf(),
        template_dir: templates.to_path_buf(),
        ..FormsConfig::default()
    }
}

pub fn school_event() -> Application {
    serde_json::from_str(
        r#"{
            "id": "6f1c2b8e-5d1a-4a8e-9c4e-0b7d3f1e2a90",
            "name": "Sportwoche Schladming",
            "progress": "confirmed",
            "start_time": "2024-03-04T07:30:00",
            "end_time": "2024-03-08T17:00:00",
            "notes": "Abfahrt Westbahnhof",
            "start_address": "Wexstraße 19-23, 1200 Wien",
            "last_changed": "2024-02-01T10:00:00",
            "kind": "school_event",
            "details": {
                "classes": ["3AHIT", "3BHIT"],
                "male_students": 31,
                "female_students": 9,
                "duration_in_days": 5,
                "teachers": [
                    {"name": "Max Huber", "short": "HUB", "role": "leader", "group": 1,
                     "attendance_from": "2024-03-04T07:30:00", "attendance_till": "2024-03-08T17:00:00"},
                    {"name": "Eva Maier", "short": "MAI", "role": "companion", "group": 2,
                     "attendance_from": "2024-03-04T07:30:00", "attendance_till": "2024-03-08T17:00:00"}
                ]
            }
        }"#,
    )
    .unwrap()
}

pub fn training_with_trip_records(calculation_rows: usize) -> Application {
    let rows: Vec<String> = (1..=calculation_rows)
        .map(|nr| {
            format!(
                r#"{{"nr": {nr}, "date": "2024-03-0{day}", "begin": "08:00:00", "end": "17:00:00",
                    "kinds": ["daily_charges"], "daily_charges": "8.80", "sum": "8.80"}}"#,
                day = nr.min(9)
            )
        })
        .collect();
    let total = 8.8 * calculation_rows as f64;

    serde_json::from_str(&format!(
        r#"{{
            "id": "b3d9a7c0-1f2e-4c5d-8a6b-7e8f9a0b1c2d",
            "name": "Informatiktage",
            "progress": "costs_pending",
            "start_time": "2024-03-04T08:00:00",
            "end_time": "2024-03-06T16:00:00",
            "last_changed": "2024-02-01T10:00:00",
            "kind": "training",
            "details": {{"kind": "conference", "ph_number": 4711, "organizer": "PH Steiermark", "filer": "HUB"}},
            "travel_invoices": [{{
                "id": 1,
                "teacher": {{"short": "HUB", "surname": "Huber", "name": "Max", "title": "Prof.", "staff_number": 12345678}},
                "trip_begin": "2024-03-04T06:30:00", "trip_end": "2024-03-06T19:00:00",
                "starting_point": "Wien", "end_point": "Graz", "travel_mode": "train_class2",
                "filing_date": "2024-03-10", "approval_date": "2024-03-12",
                "daily_charges_mode": "type1", "nightly_charges_mode": "no_proof_needed",
                "calculation": {{
                    "rows": [{rows}],
                    "sum_travel_costs": "0", "sum_daily_charges": "{total:.2}",
                    "sum_nightly_charges": "0", "sum_additional_costs": "0",
                    "sum_of_sums": "{total:.2}"
                }}
            }}],
            "business_trip_applications": [{{
                "id": 2,
                "teacher": {{"short": "HUB", "surname": "Huber", "name": "Max", "title": "Prof.", "staff_number": 12345678}},
                "trip_begin": "2024-03-04T06:30:00", "trip_end": "2024-03-06T19:00:00",
                "service_begin": "2024-03-04T09:00:00", "service_end": "2024-03-06T16:00:00",
                "trip_goal": "Graz", "travel_purpose": "Informatiktage",
                "travel_mode": "train_class2", "starting_point": "office", "end_point": "office",
                "other_costs": "0", "estimated_costs": "215.5",
                "date_application_filed": "2024-02-01", "date_application_approved": "2024-02-05"
            }}]
        }}"#,
        rows = rows.join(",")
    ))
    .unwrap()
}

/// Writes a PDF with one blank page per entry of `widths`.
///
/// Page widths tell the pages apart after a merge.
pub fn write_pdf(path: &Path, widths: &[i64]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for width in widths {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 842.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// PDF whose pages take their `MediaBox` from the page tree node.
pub fn write_pdf_with_shared_box(path: &Path, width: i64, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Page widths of a PDF in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// Travel invoice template: five calculation rows from 28 and a summary at 33.
pub fn write_travel_invoice_template(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    sheet.get_cell_mut("A1").set_value("Dienststelle");
    for row in 28..=32 {
        sheet
            .get_cell_mut(format!("CY{row}").as_str())
            .set_formula(format!("AY{row}+BI{row}+BS{row}+CH{row}"));
        sheet.add_merge_cells(format!("O{row}:AN{row}"));
        sheet
            .get_cell_mut(format!("A{row}").as_str())
            .get_style_mut()
            .get_font_mut()
            .set_bold(true);
    }
    sheet.get_row_dimension_mut(&32).set_height(18.0);
    sheet.get_cell_mut("O33").set_value("Summe");
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

pub fn write_business_trip_template(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    sheet.get_cell_mut("A1").set_value("Dienststelle");
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// Template directory holding both workbooks.
pub fn template_dir(root: &Path) -> PathBuf {
    let dir = root.join("templates");
    std::fs::create_dir_all(&dir).unwrap();
    write_travel_invoice_template(&dir.join("travel_invoice.xlsx"));
    write_business_trip_template(&dir.join("business_trip_application.xlsx"));
    dir
}

pub fn typst_available() -> bool {
    std::process::Command::new("typst")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}
