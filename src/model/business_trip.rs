use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::{TravelMode, TripPoint};

/// Identity block printed on the per-teacher forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherIdentity {
    /// Short name, also the prefix of the teacher's receipt files.
    pub short: String,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub title: String,
    pub staff_number: u32,
}

impl TeacherIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.surname, self.name).trim().to_string()
    }
}

/// Request for a domestic business trip, one per teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessTripApplication {
    pub id: u32,
    pub teacher: TeacherIdentity,
    pub trip_begin: NaiveDateTime,
    pub trip_end: NaiveDateTime,
    pub service_begin: NaiveDateTime,
    pub service_end: NaiveDateTime,
    pub trip_goal: String,
    pub travel_purpose: String,
    pub travel_mode: TravelMode,
    pub starting_point: TripPoint,
    pub end_point: TripPoint,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub other_participants: Vec<String>,
    #[serde(default)]
    pub bonus_mile_confirmation_1: bool,
    #[serde(default)]
    pub bonus_mile_confirmation_2: bool,
    #[serde(default)]
    pub travel_costs_payed_by_someone: bool,
    #[serde(default)]
    pub staying_costs_payed_by_someone: bool,
    #[serde(default)]
    pub payed_by_whom: String,
    pub other_costs: Decimal,
    pub estimated_costs: Decimal,
    pub date_application_filed: NaiveDate,
    pub date_application_approved: NaiveDate,
    #[serde(default)]
    pub referee: String,
    #[serde(default)]
    pub business_card_emitted_outward: bool,
    #[serde(default)]
    pub business_card_emitted_return: bool,
}
