//! Enumerated domain codes.
//!
//! Codes arrive as snake_case strings. Retired codes from older records land
//! in the `Unknown` variant so they can still be rendered (as an empty label).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    SchoolEvent,
    Training,
    OtherReason,
}

/// Workflow progress of an application. Rendering never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Rejected,
    InSubmission,
    InProcess,
    Confirmed,
    Running,
    CostsPending,
    CostsInProcess,
    Done,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherRole {
    Leader,
    Companion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingKind {
    Seminar,
    Conference,
    Course,
    Miscellaneous,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherReasonKind {
    CareLeave,
    ServiceMandate,
    MedicalAppointment,
    Miscellaneous,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    OfficialBusinessCardClass2,
    Passenger,
    OfficialBusinessCardClass1,
    TravelGrant,
    Flight,
    CheapFlight,
    TrainClass2,
    OwnCar,
    SleepTrain,
    Bus,
    #[serde(other)]
    Unknown,
}

impl TravelMode {
    pub const ALL: [TravelMode; 10] = [
        TravelMode::OfficialBusinessCardClass2,
        TravelMode::Passenger,
        TravelMode::OfficialBusinessCardClass1,
        TravelMode::TravelGrant,
        TravelMode::Flight,
        TravelMode::CheapFlight,
        TravelMode::TrainClass2,
        TravelMode::OwnCar,
        TravelMode::SleepTrain,
        TravelMode::Bus,
    ];
}

/// Where a business trip starts or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripPoint {
    OwnApartment,
    Office,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    TravelCosts,
    DailyCharges,
    NightlyCharges,
    AdditionalCosts,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyChargeMode {
    Type1,
    Type2,
    ToBeShortened,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightlyChargeMode {
    ProofNeeded,
    NoProofNeeded,
    NoClaim,
    #[serde(other)]
    Unknown,
}
