use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::business_trip::TeacherIdentity;
use super::codes::{CostKind, DailyChargeMode, NightlyChargeMode, TravelMode};

/// Domestic travel invoice, one per teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelInvoice {
    pub id: u32,
    pub teacher: TeacherIdentity,
    pub trip_begin: NaiveDateTime,
    pub trip_end: NaiveDateTime,
    pub starting_point: String,
    pub end_point: String,
    #[serde(default)]
    pub clerk: String,
    #[serde(default)]
    pub reviewer: String,
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub zi: u32,
    pub filing_date: NaiveDate,
    pub approval_date: NaiveDate,
    pub daily_charges_mode: DailyChargeMode,
    #[serde(default)]
    pub shortened_amount: Decimal,
    pub nightly_charges_mode: NightlyChargeMode,
    #[serde(default)]
    pub breakfasts: u32,
    #[serde(default)]
    pub lunches: u32,
    #[serde(default)]
    pub dinners: u32,
    #[serde(default)]
    pub official_business_card_got: bool,
    #[serde(default)]
    pub travel_grant: bool,
    #[serde(default)]
    pub replacement_for_advantage_card: bool,
    #[serde(default)]
    pub replacement_for_train_card_class_2: bool,
    #[serde(default)]
    pub kilometre_allowance: bool,
    #[serde(default)]
    pub kilometre_amount: Decimal,
    #[serde(default)]
    pub participants_indicated: bool,
    #[serde(default)]
    pub travel_costs_cited: bool,
    #[serde(default)]
    pub no_travel_costs: bool,
    #[serde(default)]
    pub travel_costs_pre_grant: Decimal,
    pub calculation: Calculation,
}

/// Accounting breakdown of a travel invoice.
///
/// The sums are computed upstream and are rendered as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calculation {
    #[serde(default)]
    pub rows: Vec<Row>,
    pub sum_travel_costs: Decimal,
    pub sum_daily_charges: Decimal,
    pub sum_nightly_charges: Decimal,
    pub sum_additional_costs: Decimal,
    pub sum_of_sums: Decimal,
}

impl Calculation {
    /// Whether the stated sums match the rows.
    pub fn is_consistent(&self) -> bool {
        let column = |pick: fn(&Row) -> Decimal| self.rows.iter().map(pick).sum::<Decimal>();

        self.sum_travel_costs == column(|row| row.travel_costs)
            && self.sum_daily_charges == column(|row| row.daily_charges)
            && self.sum_nightly_charges == column(|row| row.nightly_charges)
            && self.sum_additional_costs == column(|row| row.additional_costs)
            && self.sum_of_sums
                == self.sum_travel_costs
                    + self.sum_daily_charges
                    + self.sum_nightly_charges
                    + self.sum_additional_costs
    }
}

/// One line of the calculation sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub nr: u32,
    pub date: NaiveDate,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    /// Cost kinds this row carries; a row may carry several.
    pub kinds: BTreeSet<CostKind>,
    #[serde(default)]
    pub kilometres: Decimal,
    #[serde(default)]
    pub travel_costs: Decimal,
    #[serde(default)]
    pub daily_charges: Decimal,
    #[serde(default)]
    pub nightly_charges: Decimal,
    #[serde(default)]
    pub additional_costs: Decimal,
    pub sum: Decimal,
}
