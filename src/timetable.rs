//! Contract of the external timetable service.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Whose lessons are requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum Subject {
    /// A class by its name, e.g. `5AHIT`.
    Class(String),
    /// A teacher by short name.
    Teacher(String),
}

impl Subject {
    pub fn name(&self) -> &str {
        match self {
            Subject::Class(name) | Subject::Teacher(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

/// One lesson as delivered by the timetable, names already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub class_ids: Vec<i64>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub teacher_ids: Vec<i64>,
    #[serde(default)]
    pub teachers: Vec<String>,
    #[serde(default)]
    pub room_ids: Vec<i64>,
    #[serde(default)]
    pub rooms: Vec<String>,
}

/// Source of lessons for the coverage tables.
///
/// Implementations must be authenticated before they are handed to the
/// engine. Any failure is fatal for the artifact being built.
#[async_trait]
pub trait Timetable: Send + Sync {
    async fn lessons_for(
        &self,
        subject: &Subject,
        window: &TimeWindow,
    ) -> Result<Vec<Lesson>, CollaboratorError>;
}
