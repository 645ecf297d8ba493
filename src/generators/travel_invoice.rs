//! Travel invoice: landscape print form and the accounting workbook.

use super::typst::{Dict, Value};
use super::PrintForm;
use crate::error::{FormsError, Result};
use crate::format::{self, Label, CHECKED};
use crate::layout::{TravelInvoiceField as F, WritePlan};
use crate::model::{CostKind, DailyChargeMode, NightlyChargeMode, Row, TravelInvoice};

pub const TEMPLATE: &str = "travel_invoice.typ";
/// Workbook template below the template directory.
pub const WORKBOOK: &str = "travel_invoice.xlsx";

pub const CALCULATION_HEADER: [&str; 11] = [
    "Nr.",
    "Tag",
    "Beginn",
    "Ende",
    "Art Gebühren",
    "Kilometer",
    "Reisek.",
    "Tagk.",
    "Nachtk.",
    "Nebenk.",
    "Summe",
];

/// Entries of the "Zusätzliche Daten" line, in form order.
fn extra_data(invoice: &TravelInvoice) -> Vec<String> {
    let kilometres = format!(
        "Amtl. Kilometergeld für eigenen PKW ({} km)",
        format::money_plain(invoice.kilometre_amount)
    );
    [
        (invoice.official_business_card_got, "Amtl. Businesskarte erhalten"),
        (invoice.travel_grant, "Beförderungszuschuss"),
        (
            invoice.replacement_for_advantage_card,
            "Ersatz für Vorteilscard (Beleg erford.)",
        ),
        (
            invoice.replacement_for_train_card_class_2,
            "Ersatz für Bahnfahrt 2. Kl (Beleg erford.)",
        ),
        (invoice.kilometre_allowance, kilometres.as_str()),
        (
            invoice.participants_indicated,
            "Anzahl und namentliche Angabe der Mitfahrer",
        ),
        (
            invoice.travel_costs_cited,
            "Angeführte andere Reisekosten (nur gegen Beleg)",
        ),
        (invoice.no_travel_costs, "Keine Reisekosten"),
    ]
    .into_iter()
    .filter(|(flag, _)| *flag)
    .map(|(_, text)| text.to_string())
    .collect()
}

/// Print cells of one calculation row. Amount columns stay empty unless the
/// row carries the matching cost kind.
fn print_row(row: &Row) -> [String; 11] {
    let amount = |kind: CostKind, value| {
        if row.kinds.contains(&kind) {
            format::money_plain(value)
        } else {
            String::new()
        }
    };
    [
        row.nr.to_string(),
        format::day_month(row.date),
        format::time(&row.begin),
        format::time(&row.end),
        format::cost_kinds(&row.kinds),
        amount(CostKind::TravelCosts, row.kilometres),
        amount(CostKind::TravelCosts, row.travel_costs),
        amount(CostKind::DailyCharges, row.daily_charges),
        amount(CostKind::NightlyCharges, row.nightly_charges),
        amount(CostKind::AdditionalCosts, row.additional_costs),
        format::money_plain(row.sum),
    ]
}

pub fn print_form(invoice: &TravelInvoice, receipt_count: usize, qr_payload: &str) -> PrintForm {
    let teacher = &invoice.teacher;
    let calculation = &invoice.calculation;

    let mut rows: Vec<[String; 11]> = calculation.rows.iter().map(print_row).collect();
    rows.push([
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "Summe:".to_string(),
        String::new(),
        format::money_plain(calculation.sum_travel_costs),
        format::money_plain(calculation.sum_daily_charges),
        format::money_plain(calculation.sum_nightly_charges),
        format::money_plain(calculation.sum_additional_costs),
        format::money_plain(calculation.sum_of_sums),
    ]);

    let data = Dict::new()
        .with("surname", teacher.surname.as_str())
        .with("name", teacher.name.as_str())
        .with("degree", teacher.degree.as_str())
        .with("title", teacher.title.as_str())
        .with("begin", format::long_date_time(invoice.trip_begin, false))
        .with("end", format::long_date_time(invoice.trip_end, false))
        .with("pre_grant", format::money_text(invoice.travel_costs_pre_grant))
        .with("attachments", receipt_count.to_string())
        .with("staff_number", teacher.staff_number.to_string())
        .with("clerk", invoice.clerk.as_str())
        .with("reviewer", invoice.reviewer.as_str())
        .with("filed", format::long_date(invoice.filing_date))
        .with("starting_point", invoice.starting_point.as_str())
        .with("end_point", invoice.end_point.as_str())
        .with("extras", extra_data(invoice).join(";   "))
        .with(
            "daily",
            format::daily_charge(invoice.daily_charges_mode, invoice.shortened_amount),
        )
        .with(
            "meals",
            format!(
                "{} Frühstück; {} Mittagessen; {} Abendessen",
                invoice.breakfasts, invoice.lunches, invoice.dinners
            ),
        )
        .with("nightly", invoice.nightly_charges_mode.label())
        .with("calculation_header", Value::strings(CALCULATION_HEADER))
        .with("calculation", Value::table(rows));

    PrintForm::new(TEMPLATE, data.into(), qr_payload)
}

/// Cell writes for the workbook once its table holds `capacity` rows.
///
/// The summary line sits directly below the last table row.
pub fn sheet_plan(
    invoice: &TravelInvoice,
    workplace: &str,
    receipt_count: usize,
    capacity: u32,
) -> Result<WritePlan> {
    let teacher = &invoice.teacher;
    let calculation = &invoice.calculation;
    if (capacity as usize) < calculation.rows.len() {
        return Err(FormsError::InvalidInput(format!(
            "calculation has {} rows but the table holds {capacity}",
            calculation.rows.len()
        )));
    }
    let mut plan = WritePlan::new();

    plan.set(F::Workplace, workplace);
    plan.strip(F::TripBegin, &format::timestamp_digits("trip_begin", invoice.trip_begin)?);
    plan.strip(F::TripEnd, &format::timestamp_digits("trip_end", invoice.trip_end)?);
    plan.set(
        F::TravelCostsPreGrant,
        format::money_number("travel_costs_pre_grant", invoice.travel_costs_pre_grant)?,
    );
    plan.set(F::ReceiptCount, receipt_count as f64);
    plan.set(F::Zi, invoice.zi);
    plan.set(F::FilingDate, format::date(invoice.filing_date));
    plan.set(F::Surname, teacher.surname.as_str());
    plan.set(F::Name, teacher.name.as_str());
    plan.set(F::Degree, teacher.degree.as_str());
    plan.set(F::Title, teacher.title.as_str());
    plan.strip(F::StaffNumber, &format::staff_number(teacher.staff_number)?);
    plan.set(F::StartingPoint, invoice.starting_point.as_str());
    plan.set(F::EndPoint, invoice.end_point.as_str());
    plan.set(F::Clerk, invoice.clerk.as_str());
    plan.set(F::Reviewer, invoice.reviewer.as_str());

    match invoice.daily_charges_mode {
        DailyChargeMode::Type1 => plan.set(F::DailyChargesType1, CHECKED),
        DailyChargeMode::Type2 => plan.set(F::DailyChargesType2, CHECKED),
        DailyChargeMode::ToBeShortened => {
            plan.set(F::ToBeShortened, CHECKED);
            plan.set(
                F::ShortenedAmount,
                format::money_number("shortened_amount", invoice.shortened_amount)?,
            );
        }
        DailyChargeMode::Unknown => {}
    }
    match invoice.nightly_charges_mode {
        NightlyChargeMode::ProofNeeded => plan.set(F::NightlyProofNeeded, CHECKED),
        NightlyChargeMode::NoProofNeeded => plan.set(F::NightlyNoProofNeeded, CHECKED),
        NightlyChargeMode::NoClaim => plan.set(F::NightlyNoClaim, CHECKED),
        NightlyChargeMode::Unknown => {}
    }
    plan.set(F::Breakfasts, invoice.breakfasts);
    plan.set(F::Lunches, invoice.lunches);
    plan.set(F::Dinners, invoice.dinners);

    // Only set flags are ticked; the template's boxes are empty otherwise.
    let flags = [
        (invoice.official_business_card_got, F::OfficialBusinessCardGot),
        (invoice.travel_grant, F::TravelGrant),
        (invoice.replacement_for_advantage_card, F::ReplacementForAdvantageCard),
        (invoice.replacement_for_train_card_class_2, F::ReplacementForTrainCardClass2),
        (invoice.kilometre_allowance, F::KilometreAllowance),
        (invoice.participants_indicated, F::ParticipantsIndicated),
        (invoice.travel_costs_cited, F::TravelCostsCited),
        (invoice.no_travel_costs, F::NoTravelCosts),
    ];
    for (flag, field) in flags {
        if flag {
            plan.set(field, CHECKED);
        }
    }
    if invoice.kilometre_allowance {
        plan.set(
            F::KilometreAmount,
            format::money_number("kilometre_amount", invoice.kilometre_amount)?,
        );
    }

    for (offset, row) in calculation.rows.iter().enumerate() {
        let offset = offset as u32;
        plan.set_at(F::CalcNr, offset, row.nr);
        plan.set_at(F::CalcDay, offset, format::day_month(row.date));
        plan.set_at(F::CalcBegin, offset, format::time(&row.begin));
        plan.set_at(F::CalcEnd, offset, format::time(&row.end));
        for kind in &row.kinds {
            match kind {
                CostKind::TravelCosts => {
                    plan.set_at(
                        F::CalcKilometres,
                        offset,
                        format::money_number("kilometres", row.kilometres)?,
                    );
                    plan.set_at(
                        F::CalcTravelCosts,
                        offset,
                        format::money_number("travel_costs", row.travel_costs)?,
                    );
                }
                CostKind::DailyCharges => plan.set_at(
                    F::CalcDailyCharges,
                    offset,
                    format::money_number("daily_charges", row.daily_charges)?,
                ),
                CostKind::NightlyCharges => plan.set_at(
                    F::CalcNightlyCharges,
                    offset,
                    format::money_number("nightly_charges", row.nightly_charges)?,
                ),
                CostKind::AdditionalCosts => plan.set_at(
                    F::CalcAdditionalCosts,
                    offset,
                    format::money_number("additional_costs", row.additional_costs)?,
                ),
                CostKind::Unknown => {}
            }
        }
        plan.set_at(F::CalcKinds, offset, format::cost_kinds(&row.kinds));
        plan.set_at(F::CalcSum, offset, format::money_number("sum", row.sum)?);
    }

    let summary = [
        (F::CalcTravelCosts, "sum_travel_costs", calculation.sum_travel_costs),
        (F::CalcDailyCharges, "sum_daily_charges", calculation.sum_daily_charges),
        (F::CalcNightlyCharges, "sum_nightly_charges", calculation.sum_nightly_charges),
        (F::CalcAdditionalCosts, "sum_additional_costs", calculation.sum_additional_costs),
        (F::CalcSum, "sum_of_sums", calculation.sum_of_sums),
    ];
    for (field, name, amount) in summary {
        plan.set_at(field, capacity, format::money_number(name, amount)?);
    }

    Ok(plan)
}
