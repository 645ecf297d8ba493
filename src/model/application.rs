use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::codes::{ApplicationKind, OtherReasonKind, Progress, TeacherRole, TrainingKind};
use super::{BusinessTripApplication, TravelInvoice};

/// A filed application together with the per-teacher trip records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub progress: Progress,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub destination_address: String,
    pub last_changed: NaiveDateTime,
    #[serde(flatten)]
    pub details: ApplicationDetails,
    #[serde(default)]
    pub business_trip_applications: Vec<BusinessTripApplication>,
    #[serde(default)]
    pub travel_invoices: Vec<TravelInvoice>,
}

impl Application {
    pub fn kind(&self) -> ApplicationKind {
        match self.details {
            ApplicationDetails::SchoolEvent(_) => ApplicationKind::SchoolEvent,
            ApplicationDetails::Training(_) => ApplicationKind::Training,
            ApplicationDetails::OtherReason(_) => ApplicationKind::OtherReason,
        }
    }

    pub fn school_event(&self) -> Option<&SchoolEventDetails> {
        match &self.details {
            ApplicationDetails::SchoolEvent(details) => Some(details),
            _ => None,
        }
    }

    pub fn travel_invoice_for(&self, short: &str) -> Option<&TravelInvoice> {
        self.travel_invoices
            .iter()
            .find(|invoice| invoice.teacher.short == short)
    }

    pub fn business_trip_for(&self, short: &str) -> Option<&BusinessTripApplication> {
        self.business_trip_applications
            .iter()
            .find(|trip| trip.teacher.short == short)
    }
}

/// Kind specific part of an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details", rename_all = "snake_case")]
pub enum ApplicationDetails {
    SchoolEvent(SchoolEventDetails),
    Training(TrainingDetails),
    OtherReason(OtherReasonDetails),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolEventDetails {
    pub classes: Vec<String>,
    #[serde(default)]
    pub male_students: u32,
    #[serde(default)]
    pub female_students: u32,
    pub duration_in_days: u32,
    pub teachers: Vec<TeacherDetail>,
}

impl SchoolEventDetails {
    pub fn leader(&self) -> Option<&TeacherDetail> {
        self.teachers
            .iter()
            .find(|teacher| teacher.role == TeacherRole::Leader)
    }

    pub fn companions(&self) -> impl Iterator<Item = &TeacherDetail> {
        self.teachers
            .iter()
            .filter(|teacher| teacher.role == TeacherRole::Companion)
    }
}

/// A teacher taking part in a school event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherDetail {
    pub name: String,
    pub short: String,
    pub attendance_from: NaiveDateTime,
    pub attendance_till: NaiveDateTime,
    /// Salary group, printed as `L<group>`.
    #[serde(default)]
    pub group: u32,
    pub role: TeacherRole,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub meeting_point: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDetails {
    pub kind: TrainingKind,
    #[serde(default)]
    pub miscellaneous_reason: String,
    /// Registration number issued by the teacher-training college.
    pub ph_number: u32,
    pub organizer: String,
    pub filer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherReasonDetails {
    pub kind: OtherReasonKind,
    #[serde(default)]
    pub service_mandate_title: String,
    #[serde(default)]
    pub service_mandate_gz: u32,
    #[serde(default)]
    pub miscellaneous_reason: String,
    pub filer: String,
}
