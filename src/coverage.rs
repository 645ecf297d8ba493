//! Substitution tables for the absence notices.
//!
//! Lessons are fetched from the [`Timetable`] and each one gets a period label
//! resolved from its start and end clock time. Start and end use separate
//! tables because the school's period boundaries are not symmetric.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::error::CollaboratorError;
use crate::timetable::{Lesson, Subject, TimeWindow, Timetable};

#[derive(Debug, Clone, Copy)]
enum Minute {
    Any,
    At(u32),
}

#[derive(Debug, Clone, Copy)]
struct Boundary {
    hour: u32,
    minute: Minute,
    period: u8,
}

const fn any(hour: u32, period: u8) -> Boundary {
    Boundary {
        hour,
        minute: Minute::Any,
        period,
    }
}

const fn at(hour: u32, minute: u32, period: u8) -> Boundary {
    Boundary {
        hour,
        minute: Minute::At(minute),
        period,
    }
}

// First match wins.
const START_PERIODS: &[Boundary] = &[
    at(8, 0, 1),
    at(8, 50, 2),
    any(9, 3),
    any(10, 4),
    any(11, 5),
    any(12, 6),
    any(13, 7),
    any(14, 8),
    any(15, 9),
    any(16, 10),
    at(17, 0, 11),
    at(17, 45, 12),
    any(18, 13),
    any(19, 14),
    any(20, 15),
];

const END_PERIODS: &[Boundary] = &[
    any(8, 1),
    at(9, 50, 3),
    any(9, 2),
    any(10, 3),
    any(11, 4),
    any(12, 5),
    any(13, 6),
    any(14, 7),
    any(15, 8),
    at(16, 0, 9),
    at(16, 50, 10),
    any(17, 11),
    any(18, 12),
    any(19, 13),
    any(20, 14),
    any(21, 15),
];

fn resolve<T: Timelike>(table: &[Boundary], time: &T) -> Option<u8> {
    table
        .iter()
        .find(|boundary| {
            boundary.hour == time.hour()
                && match boundary.minute {
                    Minute::Any => true,
                    Minute::At(minute) => minute == time.minute(),
                }
        })
        .map(|boundary| boundary.period)
}

/// Lesson period starting at `time`, if it is a known boundary.
pub fn period_by_start<T: Timelike>(time: &T) -> Option<u8> {
    resolve(START_PERIODS, time)
}

/// Lesson period ending at `time`, if it is a known boundary.
pub fn period_by_end<T: Timelike>(time: &T) -> Option<u8> {
    resolve(END_PERIODS, time)
}

/// Period column of a coverage row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    Single(u8),
    Range(u8, u8),
    /// Start or end time is not a period boundary, or the two are reversed.
    Unresolved,
}

impl PeriodLabel {
    pub fn for_lesson(start: &NaiveDateTime, end: &NaiveDateTime) -> Self {
        match (period_by_start(start), period_by_end(end)) {
            (Some(first), Some(last)) if first == last => PeriodLabel::Single(first),
            (Some(first), Some(last)) if first < last => PeriodLabel::Range(first, last),
            _ => PeriodLabel::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, PeriodLabel::Unresolved)
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Single(period) => write!(f, "{period}."),
            PeriodLabel::Range(first, last) => write!(f, "{first}. - {last}."),
            PeriodLabel::Unresolved => f.write_str("?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub date: NaiveDate,
    pub period: PeriodLabel,
    pub classes: Vec<String>,
    pub rooms: Vec<String>,
    pub teachers: Vec<String>,
}

impl From<&Lesson> for CoverageRow {
    fn from(lesson: &Lesson) -> Self {
        Self {
            date: lesson.start.date(),
            period: PeriodLabel::for_lesson(&lesson.start, &lesson.end),
            classes: lesson.classes.clone(),
            rooms: lesson.rooms.clone(),
            teachers: lesson.teachers.clone(),
        }
    }
}

/// A row whose period could not be resolved. The row is still rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageWarning {
    pub row: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl fmt::Display for CoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: no lesson period for {} - {}",
            self.row + 1,
            self.start.format("%d.%m.%Y %H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTable {
    pub subject: Subject,
    pub rows: Vec<CoverageRow>,
    pub warnings: Vec<CoverageWarning>,
}

/// Builds the coverage table of `subject` for `window`.
///
/// Rows keep the order the timetable returned. A lesson with an unknown
/// period degrades only its own label and is reported in `warnings`.
pub async fn build_coverage_table(
    timetable: &dyn Timetable,
    window: &TimeWindow,
    subject: &Subject,
) -> Result<CoverageTable, CollaboratorError> {
    let lessons = timetable.lessons_for(subject, window).await?;

    let mut rows = Vec::with_capacity(lessons.len());
    let mut warnings = Vec::new();
    for (index, lesson) in lessons.iter().enumerate() {
        let row = CoverageRow::from(lesson);
        if !row.period.is_resolved() {
            let warning = CoverageWarning {
                row: index,
                start: lesson.start,
                end: lesson.end,
            };
            log::warn!("Coverage table for {}: {}", subject.name(), warning);
            warnings.push(warning);
        }
        rows.push(row);
    }

    log::debug!(
        "Coverage table for {} has {} rows ({} unresolved)",
        subject.name(),
        rows.len(),
        warnings.len()
    );
    Ok(CoverageTable {
        subject: subject.clone(),
        rows,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveTime;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn at_day(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_time(t(hour, minute))
    }

    #[test]
    fn test_start_table() {
        assert_eq!(period_by_start(&t(8, 0)), Some(1));
        assert_eq!(period_by_start(&t(8, 50)), Some(2));
        assert_eq!(period_by_start(&t(9, 45)), Some(3));
        assert_eq!(period_by_start(&t(17, 45)), Some(12));
        assert_eq!(period_by_start(&t(8, 20)), None);
        assert_eq!(period_by_start(&t(7, 0)), None);
    }

    #[test]
    fn test_end_table() {
        assert_eq!(period_by_end(&t(8, 50)), Some(1));
        assert_eq!(period_by_end(&t(9, 40)), Some(2));
        assert_eq!(period_by_end(&t(9, 50)), Some(3));
        assert_eq!(period_by_end(&t(16, 50)), Some(10));
        assert_eq!(period_by_end(&t(16, 30)), None);
        assert_eq!(period_by_end(&t(22, 0)), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            PeriodLabel::for_lesson(&at_day(8, 0), &at_day(8, 50)).to_string(),
            "1."
        );
        assert_eq!(
            PeriodLabel::for_lesson(&at_day(8, 0), &at_day(9, 50)).to_string(),
            "1. - 3."
        );
        assert_eq!(
            PeriodLabel::for_lesson(&at_day(7, 10), &at_day(8, 50)),
            PeriodLabel::Unresolved
        );
        assert_eq!(PeriodLabel::Unresolved.to_string(), "?");
    }

    struct Fixed(Vec<Lesson>);

    #[async_trait]
    impl Timetable for Fixed {
        async fn lessons_for(
            &self,
            _subject: &Subject,
            _window: &TimeWindow,
        ) -> Result<Vec<Lesson>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    fn lesson(start: NaiveDateTime, end: NaiveDateTime, room: &str) -> Lesson {
        Lesson {
            start,
            end,
            class_ids: vec![1],
            classes: vec!["5AHIT".into()],
            teacher_ids: vec![7],
            teachers: vec!["HUB".into()],
            room_ids: vec![3],
            rooms: vec![room.into()],
        }
    }

    #[tokio::test]
    async fn test_unresolved_rows_are_kept_and_reported() {
        let timetable = Fixed(vec![
            lesson(at_day(10, 45), at_day(11, 35), "B201"),
            lesson(at_day(8, 0), at_day(8, 50), "A101"),
            lesson(at_day(7, 15), at_day(8, 50), "C303"),
        ]);
        let window = TimeWindow::new(at_day(7, 0), at_day(18, 0));
        let subject = Subject::Class("5AHIT".into());

        let table = build_coverage_table(&timetable, &window, &subject)
            .await
            .unwrap();

        let rooms: Vec<&str> = table.rows.iter().map(|row| row.rooms[0].as_str()).collect();
        assert_eq!(rooms, ["B201", "A101", "C303"]);
        assert_eq!(table.rows[0].period, PeriodLabel::Single(4));
        assert_eq!(table.rows[2].period, PeriodLabel::Unresolved);
        assert_eq!(table.warnings.len(), 1);
        assert_eq!(table.warnings[0].row, 2);
    }
}
