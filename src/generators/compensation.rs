//! Compensation for educational support during a school event.

use super::typst::{Dict, Value};
use super::PrintForm;
use crate::format;
use crate::model::{Application, SchoolEventDetails};

pub const TEMPLATE: &str = "compensation.typ";

pub const ROSTER_HEADER: [&str; 4] = ["Name", "Verwendungsgruppe", "Beginn", "Ende"];

fn salary_group(group: u32) -> String {
    format!("L{group}")
}

/// Leader block plus one roster line per participating teacher.
pub fn compensation(app: &Application, event: &SchoolEventDetails, qr_payload: &str) -> PrintForm {
    let leader = event.leader();
    let from = format::weekday_date_time(app.start_time);
    let till = format::weekday_date_time(app.end_time);

    let roster = event.teachers.iter().map(|teacher| {
        [
            teacher.name.clone(),
            salary_group(teacher.group),
            from.clone(),
            till.clone(),
        ]
    });

    let data = Dict::new()
        .with("event", app.name.as_str())
        .with(
            "window",
            format!("{} - {}", format::date(app.start_time.date()), format::date(app.end_time.date())),
        )
        .with("leader", leader.map(|l| l.name.clone()).unwrap_or_default())
        .with("leader_group", leader.map(|l| salary_group(l.group)).unwrap_or_default())
        .with(
            "leader_from",
            leader.map(|l| format::weekday_date_time(l.attendance_from)).unwrap_or_default(),
        )
        .with(
            "leader_till",
            leader.map(|l| format::weekday_date_time(l.attendance_till)).unwrap_or_default(),
        )
        .with("roster_header", Value::strings(ROSTER_HEADER))
        .with("roster", Value::table(roster));

    PrintForm::new(TEMPLATE, data.into(), qr_payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_lists_every_teacher() {
        let app: Application = serde_json::from_str(
            r#"{
                "id": "a1", "name": "Skikurs", "progress": "confirmed",
                "start_time": "2024-03-04T08:00:00", "end_time": "2024-03-08T12:00:00",
                "last_changed": "2024-02-01T10:00:00",
                "kind": "school_event",
                "details": {
                    "classes": ["3AHIT"], "duration_in_days": 5,
                    "teachers": [
                        {"name": "Max Huber", "short": "HUB", "role": "leader", "group": 1,
                         "attendance_from": "2024-03-04T07:30:00", "attendance_till": "2024-03-08T12:00:00"},
                        {"name": "Eva Maier", "short": "MAI", "role": "companion", "group": 2,
                         "attendance_from": "2024-03-04T08:00:00", "attendance_till": "2024-03-08T12:00:00"}
                    ]
                }
            }"#,
        )
        .unwrap();
        let event = app.school_event().unwrap();
        let form = compensation(&app, event, "q");

        let Value::Dict(entries) = &form.data else {
            panic!("expected a dictionary");
        };
        let get = |key: &str| entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());

        assert_eq!(get("window"), Some(Value::from("04.03.2024 - 08.03.2024")));
        assert_eq!(get("leader_group"), Some(Value::from("L1")));
        assert_eq!(get("leader_from"), Some(Value::from("Montag, 04.03.2024 07:30")));
        assert_eq!(
            get("roster"),
            Some(Value::table([
                ["Max Huber", "L1", "Montag, 04.03.2024 08:00", "Freitag, 08.03.2024 12:00"],
                ["Eva Maier", "L2", "Montag, 04.03.2024 08:00", "Freitag, 08.03.2024 12:00"],
            ]))
        );
    }
}
