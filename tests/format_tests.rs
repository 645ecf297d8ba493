mod common;

use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::Decimal;

use common::{lesson, FakeTimetable};
use expense_forms::coverage::{build_coverage_table, PeriodLabel};
use expense_forms::format::{money_number, money_plain, money_text, staff_number};
use expense_forms::{FormatError, Subject, TimeWindow};

/// Amounts in cents, up to ten million euros either way.
fn amount_cents() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000
}

proptest! {
    /// Property: printed amounts parse back to the same two-decimal value.
    #[test]
    fn prop_money_round_trips(cents in amount_cents()) {
        let amount = Decimal::new(cents, 2);
        let printed = money_plain(amount);

        prop_assert_eq!(printed.split('.').nth(1).map(str::len), Some(2));
        prop_assert_eq!(Decimal::from_str(&printed).unwrap(), amount);
        prop_assert_eq!(money_text(amount), format!("{printed} €"));
    }

    /// Property: numeric cells carry the amount rounded to cents.
    #[test]
    fn prop_money_cells_match_print(cents in amount_cents(), extra in 0i64..10) {
        let amount = Decimal::new(cents * 10 + extra, 3);
        let cell = money_number("amount", amount).unwrap();
        let printed: f64 = money_plain(amount).parse().unwrap();
        prop_assert!((cell - printed).abs() <= printed.abs() * 1e-12 + 1e-9);
    }

    /// Property: eight-digit staff numbers fill the strip, others are refused.
    #[test]
    fn prop_staff_number_width(value in 0u32..1_000_000_000) {
        let result = staff_number(value);
        if (10_000_000..100_000_000).contains(&value) {
            prop_assert_eq!(result.unwrap().len(), 8);
        } else {
            let is_width_mismatch = matches!(result, Err(FormatError::WidthMismatch { .. }));
            prop_assert!(is_width_mismatch);
        }
    }
}

#[test]
fn test_staff_number_is_never_padded() {
    assert_eq!(
        staff_number(1234567),
        Err(FormatError::WidthMismatch {
            field: "staff_number",
            expected: 8,
            actual: 7,
            value: "1234567".to_string(),
        })
    );
}

#[tokio::test]
async fn test_period_labels() {
    let timetable = FakeTimetable::default().with(
        "KOL",
        vec![
            lesson("2024-03-04 08:00", "2024-03-04 08:50", "3AHIT", "KOL", "A101"),
            lesson("2024-03-04 08:00", "2024-03-04 09:50", "3AHIT", "KOL", "A101"),
            lesson("2024-03-04 13:50", "2024-03-04 15:30", "4BHIT", "KOL", "B204"),
            lesson("2024-03-04 06:30", "2024-03-04 07:15", "4BHIT", "KOL", "B204"),
        ],
    );
    let window = TimeWindow::new(
        common::at("2024-03-04 00:00"),
        common::at("2024-03-04 23:59"),
    );

    let table = build_coverage_table(&timetable, &window, &Subject::Teacher("KOL".into()))
        .await
        .unwrap();

    let labels: Vec<String> = table.rows.iter().map(|row| row.period.to_string()).collect();
    assert_eq!(labels, vec!["1.", "1. - 3.", "7. - 8.", "?"]);
    assert_eq!(table.rows[3].period, PeriodLabel::Unresolved);
    assert_eq!(table.warnings.len(), 1);
    assert_eq!(table.warnings[0].row, 3);
}
