//! Field map of the business trip application workbook.

use super::{CellRef, Field};
use crate::model::TravelMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessTripField {
    Workplace,
    Surname,
    Name,
    Degree,
    Title,
    /// First cell of the eight cell staff number strip.
    StaffNumber,
    TripBeginDate,
    TripBeginTime,
    TripEndDate,
    TripEndTime,
    ServiceBeginDate,
    ServiceBeginTime,
    ServiceEndDate,
    ServiceEndTime,
    Destination,
    TravelPurpose,
    Mode(TravelMode),
    StartOffice,
    StartOwnApartment,
    EndOffice,
    EndOwnApartment,
    Reasoning,
    OtherParticipants,
    BonusMiles1,
    BonusMiles2,
    TravelCostsPayedNo,
    TravelCostsPayedYes,
    StayingCostsPayedNo,
    StayingCostsPayedYes,
    PayedByWhom,
    OtherCosts,
    EstimatedCosts,
    ApprovalDate,
    FilingDate,
    Referee,
    CardEmittedOutward,
    CardEmittedReturn,
}

impl Field for BusinessTripField {
    fn base(self) -> CellRef {
        use BusinessTripField::*;

        match self {
            Workplace => CellRef::at("A", 1),
            Surname => CellRef::at("A", 4),
            Name => CellRef::at("O", 4),
            Degree => CellRef::at("Y", 4),
            Title => CellRef::at("AF", 4),
            StaffNumber => CellRef::at("M", 7),
            TripBeginDate => CellRef::at("T", 10),
            TripBeginTime => CellRef::at("AC", 10),
            TripEndDate => CellRef::at("AN", 10),
            TripEndTime => CellRef::at("AW", 10),
            ServiceBeginDate => CellRef::at("T", 12),
            ServiceBeginTime => CellRef::at("AC", 12),
            ServiceEndDate => CellRef::at("AN", 12),
            ServiceEndTime => CellRef::at("AW", 12),
            Destination => CellRef::at("H", 15),
            TravelPurpose => CellRef::at("A", 18),
            Mode(mode) => mode_checkbox(mode),
            StartOffice => CellRef::at("K", 27),
            StartOwnApartment => CellRef::at("K", 29),
            EndOffice => CellRef::at("Z", 27),
            EndOwnApartment => CellRef::at("Z", 29),
            Reasoning => CellRef::at("A", 33),
            OtherParticipants => CellRef::at("A", 35),
            BonusMiles1 => CellRef::at("L", 37),
            BonusMiles2 => CellRef::at("L", 40),
            TravelCostsPayedNo => CellRef::at("F", 45),
            TravelCostsPayedYes => CellRef::at("K", 45),
            StayingCostsPayedNo => CellRef::at("R", 45),
            StayingCostsPayedYes => CellRef::at("W", 45),
            PayedByWhom => CellRef::at("AE", 45),
            OtherCosts => CellRef::at("J", 47),
            EstimatedCosts => CellRef::at("AN", 47),
            ApprovalDate => CellRef::at("Y", 56),
            FilingDate => CellRef::at("AQ", 62),
            Referee => CellRef::at("AP", 65),
            CardEmittedOutward => CellRef::at("AO", 69),
            CardEmittedReturn => CellRef::at("BA", 69),
        }
    }
}

// Retired modes have no box on the form; the assembler never writes them.
fn mode_checkbox(mode: TravelMode) -> CellRef {
    match mode {
        TravelMode::OfficialBusinessCardClass2 => CellRef::at("B", 20),
        TravelMode::Passenger => CellRef::at("B", 22),
        TravelMode::OfficialBusinessCardClass1 => CellRef::at("B", 24),
        TravelMode::TravelGrant => CellRef::at("P", 20),
        TravelMode::Flight => CellRef::at("P", 22),
        TravelMode::CheapFlight => CellRef::at("AD", 20),
        TravelMode::TrainClass2 => CellRef::at("AD", 22),
        TravelMode::OwnCar => CellRef::at("AD", 24),
        TravelMode::SleepTrain => CellRef::at("AR", 20),
        TravelMode::Bus => CellRef::at("AR", 22),
        TravelMode::Unknown => CellRef::at("A", 1),
    }
}
