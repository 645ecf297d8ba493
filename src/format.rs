//! Value formatting for form fields.
//!
//! Everything here is pure: the same input always yields the same text, no
//! matter the process locale or time zone.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::FormatError;
use crate::model::{
    CostKind, DailyChargeMode, NightlyChargeMode, OtherReasonKind, TrainingKind, TravelMode,
    TripPoint,
};

pub const CHECKED: &str = "☑";
pub const UNCHECKED: &str = "☐";

/// Width of the staff number strip on both spreadsheet forms.
pub const STAFF_NUMBER_WIDTH: usize = 8;

/// `DD.MM.YYYY`
pub fn date(value: NaiveDate) -> String {
    value.format("%d.%m.%Y").to_string()
}

/// `DD.MM.YYYY HH:MM`
pub fn date_time(value: NaiveDateTime) -> String {
    value.format("%d.%m.%Y %H:%M").to_string()
}

/// `HH:MM`
pub fn time<T: Timelike>(value: &T) -> String {
    format!("{:02}:{:02}", value.hour(), value.minute())
}

/// `DD.MM`, used by the calculation table.
pub fn day_month(value: NaiveDate) -> String {
    value.format("%d.%m").to_string()
}

/// German weekday name, independent of any locale setting.
pub fn weekday<D: Datelike>(value: &D) -> &'static str {
    match value.weekday() {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

/// `Montag, 04.03.2024 08:00`
pub fn weekday_date_time(value: NaiveDateTime) -> String {
    format!("{}, {}", weekday(&value), date_time(value))
}

/// Spaced print-form date, `DD. MM. YYYY`.
pub fn long_date(value: NaiveDate) -> String {
    value.format("%d. %m. %Y").to_string()
}

/// Spaced print-form timestamp, `DD. MM. YYYY HH:MM`, optionally with ` Uhr`.
pub fn long_date_time(value: NaiveDateTime, with_suffix: bool) -> String {
    let text = value.format("%d. %m. %Y %H:%M").to_string();
    if with_suffix {
        format!("{text} Uhr")
    } else {
        text
    }
}

/// Amount with exactly two decimals and no unit.
pub fn money_plain(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// Amount for human-facing print fields, e.g. `12.40 €`.
pub fn money_text(amount: Decimal) -> String {
    format!("{} €", money_plain(amount))
}

/// Amount for a numeric spreadsheet cell.
pub fn money_number(field: &'static str, amount: Decimal) -> Result<f64, FormatError> {
    amount
        .round_dp(2)
        .to_f64()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormatError::NotRepresentable {
            field,
            value: amount.to_string(),
        })
}

pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        CHECKED
    } else {
        UNCHECKED
    }
}

/// Joins names with `", "`; empty input gives an empty string.
pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for item in items {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Splits a value into single characters for a strip of one-character cells.
///
/// The printed value has to fill the strip exactly. Nothing is padded or cut.
pub fn fixed_width_digits(
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<Vec<char>, FormatError> {
    let digits: Vec<char> = value.chars().collect();
    if digits.len() != width {
        return Err(FormatError::WidthMismatch {
            field,
            expected: width,
            actual: digits.len(),
            value: value.to_string(),
        });
    }
    if let Some(bad) = digits.iter().find(|c| !c.is_ascii_digit()) {
        return Err(FormatError::Invalid {
            field,
            message: format!("'{bad}' is not a digit"),
        });
    }
    Ok(digits)
}

pub fn staff_number(value: u32) -> Result<Vec<char>, FormatError> {
    fixed_width_digits("staff_number", &value.to_string(), STAFF_NUMBER_WIDTH)
}

/// `YYYYMMDDHHMM` split into twelve cells, as on the travel invoice header.
pub fn timestamp_digits(field: &'static str, value: NaiveDateTime) -> Result<Vec<char>, FormatError> {
    fixed_width_digits(field, &value.format("%Y%m%d%H%M").to_string(), 12)
}

/// Duration category printed on the class absence notice.
pub fn duration_category(days: u32) -> &'static str {
    match days {
        0 | 1 => "1-tägig (002)",
        2 | 3 => "2-3-tägig (003)",
        _ => "mehr als 3-tägig (004)",
    }
}

/// Fixed label of an enumerated code. Retired codes have an empty label.
pub trait Label {
    fn label(&self) -> &'static str;
}

impl Label for TravelMode {
    fn label(&self) -> &'static str {
        match self {
            TravelMode::OfficialBusinessCardClass2 => "Amtl BUSINESSKARTE 2. Kl",
            TravelMode::Passenger => "MITFAHRER/INNEN",
            TravelMode::OfficialBusinessCardClass1 => {
                "Amtl. BUSINESSKARTE / BAHNVERRECHNUNG 1. Kl - (Begründung erford.)"
            }
            TravelMode::TravelGrant => "BEFÖRDERUNGSZUSCHUSS",
            TravelMode::Flight => "FLUG",
            TravelMode::CheapFlight => "BILLIGFLUG",
            TravelMode::TrainClass2 => "BAHN 2. Kl. - (Beleg erford.)",
            TravelMode::OwnCar => "EIGENER PKW - (Begründung erford.)",
            TravelMode::SleepTrain => "SCHLAFWAGEN",
            TravelMode::Bus => "BUS - (Beleg erford.)",
            TravelMode::Unknown => "",
        }
    }
}

impl Label for TripPoint {
    fn label(&self) -> &'static str {
        match self {
            TripPoint::Office => "Dienststelle",
            TripPoint::OwnApartment => "Wohnung",
            TripPoint::Unknown => "",
        }
    }
}

impl Label for CostKind {
    fn label(&self) -> &'static str {
        match self {
            CostKind::TravelCosts => "Reisekosten",
            CostKind::DailyCharges => "Tagesgebühr",
            CostKind::NightlyCharges => "Nächtigungsgebühr",
            CostKind::AdditionalCosts => "Sonstige Nebenkosten",
            CostKind::Unknown => "",
        }
    }
}

impl Label for DailyChargeMode {
    fn label(&self) -> &'static str {
        match self {
            DailyChargeMode::Type1 => "Tarif I",
            DailyChargeMode::Type2 => "Tarif II",
            DailyChargeMode::ToBeShortened => "zu kürzen um",
            DailyChargeMode::Unknown => "",
        }
    }
}

impl Label for NightlyChargeMode {
    fn label(&self) -> &'static str {
        match self {
            NightlyChargeMode::ProofNeeded => "mit Nachweis",
            NightlyChargeMode::NoProofNeeded => "ohne Nachweis",
            NightlyChargeMode::NoClaim => "kein Anspruch",
            NightlyChargeMode::Unknown => "",
        }
    }
}

impl Label for TrainingKind {
    fn label(&self) -> &'static str {
        match self {
            TrainingKind::Seminar => "Seminar",
            TrainingKind::Conference => "Tagung",
            TrainingKind::Course => "Lehrgang",
            TrainingKind::Miscellaneous => "Sonstiger Grund",
            TrainingKind::Unknown => "",
        }
    }
}

impl Label for OtherReasonKind {
    fn label(&self) -> &'static str {
        match self {
            OtherReasonKind::CareLeave => "Pflegefreistellung",
            OtherReasonKind::ServiceMandate => "Dienstauftrag",
            OtherReasonKind::MedicalAppointment => "Arzttermin",
            OtherReasonKind::Miscellaneous => "Sonstige Gründe",
            OtherReasonKind::Unknown => "",
        }
    }
}

/// Daily charge line of the travel invoice print form.
pub fn daily_charge(mode: DailyChargeMode, shortened_amount: Decimal) -> String {
    match mode {
        DailyChargeMode::ToBeShortened => {
            format!("{} {}", mode.label(), money_text(shortened_amount))
        }
        other => other.label().to_string(),
    }
}

/// Labels of a row's cost kinds in their fixed order.
pub fn cost_kinds<'a, I>(kinds: I) -> String
where
    I: IntoIterator<Item = &'a CostKind>,
{
    list(
        kinds
            .into_iter()
            .map(|kind| kind.label())
            .filter(|label| !label.is_empty()),
    )
}
