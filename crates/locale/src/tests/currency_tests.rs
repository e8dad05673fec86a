use super::*;

#[test]
fn formats_zero_in_dollars() {
    assert_eq!(format_currency(0.0, Locale::En), "$0.00");
}

#[test]
fn clamps_to_maximum_instead_of_overflowing() {
    assert_eq!(
        format_currency(999_000_000_000_000.0 + 1.0, Locale::En),
        "$999,000,000,000,000.00"
    );
    assert_eq!(
        format_currency(f64::MAX, Locale::En),
        format_currency(MAX_CURRENCY_VALUE, Locale::En)
    );
}

#[test]
fn formats_each_locale() {
    assert_eq!(format_currency(1234.5, Locale::En), "$1,234.50");
    assert_eq!(format_currency(1234.5, Locale::Ja), "¥1,235");
    assert_eq!(format_currency(1234.5, Locale::Es), "1234,50\u{a0}€");
    assert_eq!(format_currency(12345.5, Locale::Es), "12.345,50\u{a0}€");
    assert_eq!(format_currency(1234.5, Locale::Fr), "1\u{202f}234,50\u{a0}€");
    assert_eq!(format_currency(1234.5, Locale::De), "1.234,50\u{a0}€");
    assert_eq!(format_currency(1234.5, Locale::Pt), "R$\u{a0}1.234,50");
}

#[test]
fn negative_amounts_lead_with_sign() {
    assert_eq!(format_currency(-5.0, Locale::En), "-$5.00");
    assert_eq!(format_currency(-5.0, Locale::De), "-5,00\u{a0}€");
    assert_eq!(format_currency(-0.001, Locale::En), "$0.00");
}

#[test]
fn non_finite_amounts_format_as_zero() {
    assert_eq!(format_currency(f64::NAN, Locale::En), "0");
    assert_eq!(format_currency_number(f64::INFINITY, Locale::De), "0.00");
}

#[test]
fn number_only_format_uses_locale_separators() {
    assert_eq!(format_currency_number(1234567.891, Locale::En), "1,234,567.89");
    assert_eq!(format_currency_number(1234567.891, Locale::De), "1.234.567,89");
    assert_eq!(format_currency_number(10.0, Locale::Ja), "10.00");
}

#[test]
fn parses_formatted_amounts() {
    assert_eq!(parse_currency("$1,234.56"), 1234.56);
    assert_eq!(parse_currency("1.234,56 €"), 1234.56);
    assert_eq!(parse_currency("R$ 12,5"), 12.5);
    assert_eq!(parse_currency("1,234"), 1234.0);
    assert_eq!(parse_currency("1,234,567"), 1234567.0);
    assert_eq!(parse_currency("-$3.50"), -3.5);
}

#[test]
fn unparseable_text_is_zero() {
    assert_eq!(parse_currency("not a number"), 0.0);
    assert_eq!(parse_currency(""), 0.0);
    assert_eq!(parse_currency("."), 0.0);
}

#[test]
fn parsed_amounts_are_clamped() {
    assert_eq!(parse_currency("5000000000000000"), MAX_CURRENCY_VALUE);
}

#[test]
fn abbreviates_large_amounts() {
    assert_eq!(format_currency_abbreviated(1_500_000.0, Locale::En), "$1.5M");
    assert_eq!(format_currency_abbreviated(25_000.0, Locale::En), "$25K");
    assert_eq!(format_currency_abbreviated(2_000_000_000_000.0, Locale::De), "€2,0T");
    assert_eq!(format_currency_abbreviated(999.0, Locale::En), "$999.00");
    assert_eq!(format_currency_abbreviated(f64::NAN, Locale::En), "$0.00");
}

#[test]
fn validation_rejects_bad_amounts() {
    let options = ValidationOptions::default();
    assert_eq!(validate_currency(-1.0, &options), Err(CurrencyError::NegativeAmount));
    assert_eq!(validate_currency(0.0, &options), Err(CurrencyError::Zero));
    assert_eq!(validate_currency(f64::NAN, &options), Err(CurrencyError::InvalidFormat));
    assert_eq!(validate_currency(10.0, &options), Ok(10.0));

    let minimum = ValidationOptions {
        min_amount: 100.0,
        ..options
    };
    let err = validate_currency(50.0, &minimum).expect_err("below minimum");
    assert_eq!(err.key(), "belowMinimum");
    assert_eq!(err.to_string(), "Amount must be at least $100.00");

    let err = validate_currency(MAX_CURRENCY_VALUE * 2.0, &options).expect_err("too large");
    assert_eq!(err.message_key(), "currency.errors.exceedsMaximum");
}

#[test]
fn zero_allowed_when_requested() {
    let options = ValidationOptions {
        allow_zero: true,
        ..ValidationOptions::default()
    };
    assert_eq!(validate_currency(0.0, &options), Ok(0.0));
    assert_eq!(validate_currency_input("0.00", &options), Ok(0.0));
}

#[test]
fn input_validation_reports_required_and_parse_errors() {
    let options = ValidationOptions::default();
    assert_eq!(validate_currency_input("   ", &options), Err(CurrencyError::Required));
    assert_eq!(validate_currency_input("abc", &options), Err(CurrencyError::ParseError));
    assert_eq!(validate_currency_input("$20", &options), Ok(20.0));
    assert_eq!(
        CurrencyError::Required.message_key(),
        "currency.validation.required"
    );
}

#[test]
fn change_direction_and_percentage() {
    let change = calculate_currency_change(100.0, 150.0);
    assert_eq!(change.direction, ChangeDirection::Up);
    assert_eq!(change.percentage, 50.0);
    assert_eq!(change.change, 50.0);

    let change = calculate_currency_change(200.0, 150.0);
    assert_eq!(change.direction, ChangeDirection::Down);
    assert_eq!(change.percentage, 25.0);

    let change = calculate_currency_change(0.0, 150.0);
    assert_eq!(change.direction, ChangeDirection::Neutral);
    assert_eq!(change.percentage, 0.0);
}

#[test]
fn symbols_per_locale() {
    assert_eq!(currency_symbol(Locale::Pt), "R$");
    assert_eq!(currency_symbol(Locale::Fr), "€");
    assert_eq!(Locale::Ja.currency_format().currency, "JPY");
}
