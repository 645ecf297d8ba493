//! Field map of the travel invoice workbook.

use super::{CellRef, Field, TableRegion};

/// Calculation table: five pre-built rows from row 28, summary line below.
pub const CALCULATION: TableRegion = TableRegion {
    first_row: 28,
    prebuilt_rows: 5,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelInvoiceField {
    Workplace,
    /// `YYYYMMDDHHMM` strip, twelve cells.
    TripBegin,
    TripEnd,
    TravelCostsPreGrant,
    ReceiptCount,
    Zi,
    FilingDate,
    Surname,
    Name,
    Degree,
    Title,
    StaffNumber,
    StartingPoint,
    EndPoint,
    Clerk,
    Reviewer,
    OfficialBusinessCardGot,
    TravelGrant,
    ReplacementForAdvantageCard,
    ReplacementForTrainCardClass2,
    KilometreAllowance,
    KilometreAmount,
    ParticipantsIndicated,
    TravelCostsCited,
    NoTravelCosts,
    DailyChargesType1,
    DailyChargesType2,
    ToBeShortened,
    ShortenedAmount,
    Breakfasts,
    Lunches,
    Dinners,
    NightlyProofNeeded,
    NightlyNoProofNeeded,
    NightlyNoClaim,
    // Calculation columns, addressed with the row offset.
    CalcNr,
    CalcDay,
    CalcBegin,
    CalcEnd,
    CalcKinds,
    CalcKilometres,
    CalcTravelCosts,
    CalcDailyCharges,
    CalcNightlyCharges,
    CalcAdditionalCosts,
    CalcSum,
}

impl Field for TravelInvoiceField {
    fn base(self) -> CellRef {
        use TravelInvoiceField::*;

        let table = CALCULATION.first_row;
        match self {
            Workplace => CellRef::at("A", 1),
            TripBegin => CellRef::at("S", 5),
            TripEnd => CellRef::at("S", 7),
            TravelCostsPreGrant => CellRef::at("AU", 4),
            ReceiptCount => CellRef::at("AU", 6),
            Zi => CellRef::at("CG", 3),
            FilingDate => CellRef::at("CO", 5),
            Surname => CellRef::at("A", 9),
            Name => CellRef::at("N", 9),
            Degree => CellRef::at("X", 9),
            Title => CellRef::at("AE", 9),
            StaffNumber => CellRef::at("L", 12),
            StartingPoint => CellRef::at("AD", 12),
            EndPoint => CellRef::at("AD", 13),
            Clerk => CellRef::at("CA", 15),
            Reviewer => CellRef::at("DG", 15),
            OfficialBusinessCardGot => CellRef::at("B", 17),
            TravelGrant => CellRef::at("L", 17),
            ReplacementForAdvantageCard => CellRef::at("V", 17),
            ReplacementForTrainCardClass2 => CellRef::at("AE", 17),
            KilometreAllowance => CellRef::at("AQ", 17),
            KilometreAmount => CellRef::at("BD", 19),
            ParticipantsIndicated => CellRef::at("BR", 17),
            TravelCostsCited => CellRef::at("CL", 17),
            NoTravelCosts => CellRef::at("DE", 17),
            DailyChargesType1 => CellRef::at("B", 20),
            DailyChargesType2 => CellRef::at("L", 20),
            ToBeShortened => CellRef::at("V", 20),
            ShortenedAmount => CellRef::at("W", 21),
            Breakfasts => CellRef::at("AE", 21),
            Lunches => CellRef::at("AL", 21),
            Dinners => CellRef::at("AX", 21),
            NightlyProofNeeded => CellRef::at("BL", 20),
            NightlyNoProofNeeded => CellRef::at("CH", 20),
            NightlyNoClaim => CellRef::at("DD", 20),
            CalcNr => CellRef::at("A", table),
            CalcDay => CellRef::at("D", table),
            CalcBegin => CellRef::at("G", table),
            CalcEnd => CellRef::at("K", table),
            CalcKinds => CellRef::at("O", table),
            CalcKilometres => CellRef::at("AO", table),
            CalcTravelCosts => CellRef::at("AY", table),
            CalcDailyCharges => CellRef::at("BI", table),
            CalcNightlyCharges => CellRef::at("BS", table),
            CalcAdditionalCosts => CellRef::at("CH", table),
            CalcSum => CellRef::at("CY", table),
        }
    }
}
