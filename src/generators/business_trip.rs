//! Business trip application: print form and workbook.

use super::typst::Dict;
use super::PrintForm;
use crate::error::FormatError;
use crate::format::{self, Label, CHECKED};
use crate::layout::{BusinessTripField as F, WritePlan};
use crate::model::{BusinessTripApplication, TravelMode, TripPoint};

pub const TEMPLATE: &str = "business_trip.typ";
/// Workbook template below the template directory.
pub const WORKBOOK: &str = "business_trip_application.xlsx";

const BONUS_MILES_1: &str = "Ich bestätige, dass ich anlässlich von Dienstreisen im Rahmen \
     personenbezogener Bonusprogramme erworbene Prämien nicht privat in Anspruch nehme.";
const BONUS_MILES_2: &str = "Für die Dienstreise verwende ich auf meine Meilenkonto \
     gutgeschriebene, dienstlich erworbene Meilen.";

fn cost_carrier(trip: &BusinessTripApplication) -> String {
    let whom = &trip.payed_by_whom;
    match (trip.staying_costs_payed_by_someone, trip.travel_costs_payed_by_someone) {
        (true, true) => format!("Es werden Aufenthaltskosten und Reisekosten von {whom} getragen"),
        (false, true) => format!("Es werden Reisekosten von {whom} getragen"),
        (true, false) => format!("Es werden Aufenthaltskosten von {whom} getragen"),
        (false, false) => "Es werden keine Kosten von anderer Stelle getragen".to_string(),
    }
}

fn business_card(trip: &BusinessTripApplication) -> String {
    let legs = match (
        trip.business_card_emitted_outward,
        trip.business_card_emitted_return,
    ) {
        (true, true) => "Hin- und Rückfahrt",
        (true, false) => "Hinfahrt",
        (false, true) => "Rückfahrt",
        (false, false) => return String::new(),
    };
    format!("Businesskarte bei {legs} ausgefolgt.")
}

pub fn print_form(trip: &BusinessTripApplication, qr_payload: &str) -> PrintForm {
    let teacher = &trip.teacher;
    let bonus = |confirmed: bool, statement: &str, fallback: &str| {
        let text = if confirmed { statement } else { fallback };
        text.to_string()
    };

    let data = Dict::new()
        .with("name", teacher.full_name())
        .with("degree", teacher.degree.as_str())
        .with("title", teacher.title.as_str())
        .with("staff_number", teacher.staff_number.to_string())
        .with("destination", trip.trip_goal.as_str())
        .with("trip_begin", format::long_date_time(trip.trip_begin, true))
        .with("trip_end", format::long_date_time(trip.trip_end, true))
        .with("service_begin", format::long_date_time(trip.service_begin, true))
        .with("service_end", format::long_date_time(trip.service_end, true))
        .with("purpose", trip.travel_purpose.as_str())
        .with("mode", trip.travel_mode.label())
        .with("starting_point", trip.starting_point.label())
        .with("end_point", trip.end_point.label())
        .with("reasoning", trip.reasoning.as_str())
        .with("participants", format::list(&trip.other_participants))
        .with(
            "bonus_miles_1",
            bonus(trip.bonus_mile_confirmation_1, BONUS_MILES_1, "1. nicht bestätigt"),
        )
        .with(
            "bonus_miles_2",
            bonus(trip.bonus_mile_confirmation_2, BONUS_MILES_2, "2. nicht bestätigt"),
        )
        .with("cost_carrier", cost_carrier(trip))
        .with("other_costs", format::money_text(trip.other_costs))
        .with("estimated_costs", format::money_text(trip.estimated_costs))
        .with(
            "approval",
            format!(
                "Die vorstehend beantragte Dienstreise wird mit {} genehmigt.",
                format::long_date(trip.date_application_approved)
            ),
        )
        .with("filed", format::long_date(trip.date_application_filed))
        .with("referee", trip.referee.as_str())
        .with("business_card", business_card(trip));

    PrintForm::new(TEMPLATE, data.into(), qr_payload)
}

pub fn sheet_plan(trip: &BusinessTripApplication, workplace: &str) -> Result<WritePlan, FormatError> {
    let teacher = &trip.teacher;
    let mut plan = WritePlan::new();

    plan.set(F::Workplace, workplace);
    plan.set(F::Surname, teacher.surname.as_str());
    plan.set(F::Name, teacher.name.as_str());
    plan.set(F::Degree, teacher.degree.as_str());
    plan.set(F::Title, teacher.title.as_str());
    plan.strip(F::StaffNumber, &format::staff_number(teacher.staff_number)?);

    let windows = [
        (F::TripBeginDate, F::TripBeginTime, trip.trip_begin),
        (F::TripEndDate, F::TripEndTime, trip.trip_end),
        (F::ServiceBeginDate, F::ServiceBeginTime, trip.service_begin),
        (F::ServiceEndDate, F::ServiceEndTime, trip.service_end),
    ];
    for (date_field, time_field, value) in windows {
        plan.set(date_field, format::date(value.date()));
        plan.set(time_field, format::time(&value));
    }

    plan.set(F::Destination, trip.trip_goal.as_str());
    plan.set(F::TravelPurpose, trip.travel_purpose.as_str());
    if trip.travel_mode != TravelMode::Unknown {
        plan.set(F::Mode(trip.travel_mode), CHECKED);
    }
    match trip.starting_point {
        TripPoint::Office => plan.set(F::StartOffice, CHECKED),
        TripPoint::OwnApartment => plan.set(F::StartOwnApartment, CHECKED),
        TripPoint::Unknown => {}
    }
    match trip.end_point {
        TripPoint::Office => plan.set(F::EndOffice, CHECKED),
        TripPoint::OwnApartment => plan.set(F::EndOwnApartment, CHECKED),
        TripPoint::Unknown => {}
    }
    plan.set(F::Reasoning, trip.reasoning.as_str());
    plan.set(F::OtherParticipants, format::list(&trip.other_participants));

    if trip.bonus_mile_confirmation_1 {
        plan.set(F::BonusMiles1, CHECKED);
    }
    if trip.bonus_mile_confirmation_2 {
        plan.set(F::BonusMiles2, CHECKED);
    }

    // Yes/no pairs: both boxes are written so the template state never leaks.
    let travel = trip.travel_costs_payed_by_someone;
    plan.set(F::TravelCostsPayedYes, format::checkbox(travel));
    plan.set(F::TravelCostsPayedNo, format::checkbox(!travel));
    let staying = trip.staying_costs_payed_by_someone;
    plan.set(F::StayingCostsPayedYes, format::checkbox(staying));
    plan.set(F::StayingCostsPayedNo, format::checkbox(!staying));

    plan.set(F::PayedByWhom, trip.payed_by_whom.as_str());
    plan.set(F::OtherCosts, format::money_number("other_costs", trip.other_costs)?);
    plan.set(
        F::EstimatedCosts,
        format::money_number("estimated_costs", trip.estimated_costs)?,
    );
    plan.set(F::FilingDate, format::date(trip.date_application_filed));
    plan.set(F::ApprovalDate, format::date(trip.date_application_approved));
    if trip.business_card_emitted_outward {
        plan.set(F::CardEmittedOutward, CHECKED);
    }
    if trip.business_card_emitted_return {
        plan.set(F::CardEmittedReturn, CHECKED);
    }
    plan.set(F::Referee, trip.referee.as_str());

    Ok(plan)
}
