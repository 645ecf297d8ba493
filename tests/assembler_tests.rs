mod common;

use std::fs;

use common::*;
use expense_forms::layout::CellRef;
use expense_forms::sheet::Workbook;
use expense_forms::{Assembler, DocumentKind, FormsError, Subject, SynthesisOptions};

fn assembler(root: &std::path::Path) -> Assembler {
    let templates = template_dir(root);
    Assembler::new(config(&root.join("out"), &templates), Box::new(SourceRenderer))
}

// Absence notices

#[tokio::test]
async fn test_school_event_yields_one_notice_per_class() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let timetable = FakeTimetable::default()
        .with(
            "3AHIT",
            vec![
                lesson("2024-03-04 08:00", "2024-03-04 08:50", "3AHIT", "KOL", "A101"),
                lesson("2024-03-04 08:00", "2024-03-04 09:50", "3AHIT", "NEU", "B204"),
            ],
        )
        .with(
            "3BHIT",
            vec![lesson("2024-03-05 10:45", "2024-03-05 11:35", "3BHIT", "KOL", "A102")],
        );
    let app = school_event();

    let options = SynthesisOptions {
        teacher: None,
        timetable: Some(&timetable),
    };
    let paths = assembler
        .synthesize(&app, DocumentKind::ClassAbsence, options)
        .await
        .unwrap();

    let names: Vec<_> = paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["class_absence_form_3AHIT.pdf", "class_absence_form_3BHIT.pdf"]
    );
    assert_eq!(
        *timetable.requests.lock().unwrap(),
        vec![
            Subject::Class("3AHIT".to_string()),
            Subject::Class("3BHIT".to_string())
        ]
    );

    let first = fs::read_to_string(&paths[0]).unwrap();
    assert!(first.contains("\"1.\""));
    assert!(first.contains("\"1. - 3.\""));
    assert!(first.contains("\"Max Huber, Eva Maier\""));
    assert!(paths[0].parent().unwrap().join("upload").is_dir());
}

#[tokio::test]
async fn test_class_absence_requires_school_event() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let timetable = FakeTimetable::default();
    let app = training_with_trip_records(1);

    let err = assembler
        .synthesize(
            &app,
            DocumentKind::ClassAbsence,
            SynthesisOptions {
                teacher: None,
                timetable: Some(&timetable),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.entity, app.id);
    assert_eq!(err.kind, DocumentKind::ClassAbsence);
    assert!(matches!(err.cause(), FormsError::UnsupportedKind { .. }));
}

#[tokio::test]
async fn test_timetable_failure_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let timetable = FakeTimetable {
        fail: true,
        ..FakeTimetable::default()
    };
    let app = school_event();

    let err = assembler
        .synthesize(
            &app,
            DocumentKind::TeacherAbsence,
            SynthesisOptions {
                teacher: Some("HUB"),
                timetable: Some(&timetable),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err.cause(), FormsError::Collaborator(_)));
    let entries: Vec<_> = fs::read_dir(dir.path().join("out").join(&app.id))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["upload"]);
}

#[tokio::test]
async fn test_teacher_kinds_need_a_teacher() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let app = training_with_trip_records(1);

    let err = assembler
        .synthesize(&app, DocumentKind::TravelInvoicePdf, SynthesisOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), FormsError::InvalidInput(_)));

    let err = assembler
        .synthesize(
            &app,
            DocumentKind::BusinessTripPdf,
            SynthesisOptions {
                teacher: Some("MAI"),
                timetable: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), FormsError::UnsupportedKind { .. }));
}

// Compensation

#[tokio::test]
async fn test_compensation_is_rendered_for_school_events_only() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());

    let paths = assembler
        .synthesize(
            &school_event(),
            DocumentKind::EducationalSupportCompensation,
            SynthesisOptions::default(),
        )
        .await
        .unwrap();
    assert!(paths[0].ends_with("compensation_for_educational_support.pdf"));
    let source = fs::read_to_string(&paths[0]).unwrap();
    assert!(source.contains("leader_group: \"L1\""));

    let err = assembler
        .synthesize(
            &training_with_trip_records(1),
            DocumentKind::EducationalSupportCompensation,
            SynthesisOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), FormsError::UnsupportedKind { .. }));
}

// Travel invoice

#[tokio::test]
async fn test_travel_invoice_counts_receipts() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let app = training_with_trip_records(2);

    let env = assembler.environment(&app).unwrap();
    env.store_receipt("HUB", b"%PDF-1.5").unwrap();
    env.store_receipt("HUB", b"%PDF-1.5").unwrap();
    env.store_receipt("HUBER", b"%PDF-1.5").unwrap();

    let paths = assembler
        .synthesize(
            &app,
            DocumentKind::TravelInvoicePdf,
            SynthesisOptions {
                teacher: Some("HUB"),
                timetable: None,
            },
        )
        .await
        .unwrap();

    assert!(paths[0].ends_with("travel_invoice_HUB.pdf"));
    let source = fs::read_to_string(&paths[0]).unwrap();
    assert!(source.contains("attachments: \"2\""));
}

#[tokio::test]
async fn test_travel_invoice_sheet_grows_calculation_table() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let app = training_with_trip_records(7);

    let paths = assembler
        .synthesize(
            &app,
            DocumentKind::TravelInvoiceSheet,
            SynthesisOptions {
                teacher: Some("HUB"),
                timetable: None,
            },
        )
        .await
        .unwrap();
    assert!(paths[0].ends_with("travel_invoice_HUB.xlsx"));

    let workbook = Workbook::open(&paths[0]).unwrap();
    let value = |cell: &str| workbook.value(CellRef::parse(cell).unwrap()).unwrap();

    assert_eq!(value("A34"), "7");
    assert_eq!(value("BI34"), "8.8");
    assert_eq!(value("O35"), "Summe");
    assert_eq!(value("CY35"), "61.6");
    assert_eq!(value("L12"), "1");
    assert_eq!(value("S12"), "8");
}

/// Every cell of the form sheet as (coordinate, value, formula), sorted.
fn cell_contents(path: &std::path::Path) -> Vec<(String, String, String)> {
    let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
    let sheet = book.get_sheet_by_name("Sheet1").unwrap();
    let mut cells: Vec<_> = sheet
        .get_cell_collection()
        .iter()
        .map(|cell| {
            (
                cell.get_coordinate().get_coordinate(),
                cell.get_value().to_string(),
                cell.get_formula().to_string(),
            )
        })
        .collect();
    cells.sort();
    cells
}

#[tokio::test]
async fn test_workbook_resynthesis_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let app = training_with_trip_records(7);
    let options = SynthesisOptions {
        teacher: Some("HUB"),
        timetable: None,
    };

    let first = assembler
        .synthesize(&app, DocumentKind::TravelInvoiceSheet, options)
        .await
        .unwrap();
    let before = cell_contents(&first[0]);
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = assembler
        .synthesize(&app, DocumentKind::TravelInvoiceSheet, options)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(before, cell_contents(&second[0]));

    let book = umya_spreadsheet::reader::xlsx::read(&second[0]).unwrap();
    assert_eq!(book.get_properties().get_created(), "2024-02-01T10:00:00Z");
    assert_eq!(book.get_properties().get_modified(), "2024-02-01T10:00:00Z");
}

#[tokio::test]
async fn test_missing_workbook_template() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = Assembler::new(
        config(&dir.path().join("out"), &dir.path().join("nowhere")),
        Box::new(SourceRenderer),
    );
    let app = training_with_trip_records(1);

    let err = assembler
        .synthesize(
            &app,
            DocumentKind::BusinessTripSheet,
            SynthesisOptions {
                teacher: Some("HUB"),
                timetable: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), FormsError::Template(_)));
    assert!(!dir
        .path()
        .join("out")
        .join(&app.id)
        .join("business_trip_application_HUB.xlsx")
        .exists());
}

// Business trip

#[tokio::test]
async fn test_business_trip_artifacts_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = assembler(dir.path());
    let app = training_with_trip_records(1);
    let options = SynthesisOptions {
        teacher: Some("HUB"),
        timetable: None,
    };

    let first = assembler
        .synthesize(&app, DocumentKind::BusinessTripPdf, options)
        .await
        .unwrap();
    let before = fs::read(&first[0]).unwrap();
    let second = assembler
        .synthesize(&app, DocumentKind::BusinessTripPdf, options)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(before, fs::read(&second[0]).unwrap());

    let sheet = assembler
        .synthesize(&app, DocumentKind::BusinessTripSheet, options)
        .await
        .unwrap();
    let workbook = Workbook::open(&sheet[0]).unwrap();
    let value = |cell: &str| workbook.value(CellRef::parse(cell).unwrap()).unwrap();
    assert_eq!(value("A1"), "tgm - Schule der Technik");
    assert_eq!(value("H15"), "Graz");
    assert_eq!(value("AD22"), "☑");
    assert_eq!(value("AN47"), "215.5");
}
