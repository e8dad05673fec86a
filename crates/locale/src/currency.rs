use thiserror::Error;

use crate::Locale;

pub const MAX_CURRENCY_VALUE: f64 = 999_000_000_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub currency: &'static str,
    pub symbol: &'static str,
    pub position: SymbolPosition,
    pub decimals: u32,
    pub group_separator: &'static str,
    pub decimal_separator: char,
    pub symbol_gap: &'static str,
    pub min_grouping_digits: usize,
}

impl Locale {
    pub fn currency_format(self) -> CurrencyFormat {
        match self {
            Locale::En => CurrencyFormat {
                currency: "USD",
                symbol: "$",
                position: SymbolPosition::Before,
                decimals: 2,
                group_separator: ",",
                decimal_separator: '.',
                symbol_gap: "",
                min_grouping_digits: 4,
            },
            Locale::Ja => CurrencyFormat {
                currency: "JPY",
                symbol: "¥",
                position: SymbolPosition::Before,
                decimals: 0,
                group_separator: ",",
                decimal_separator: '.',
                symbol_gap: "",
                min_grouping_digits: 4,
            },
            Locale::Es => CurrencyFormat {
                currency: "EUR",
                symbol: "€",
                position: SymbolPosition::After,
                decimals: 2,
                group_separator: ".",
                decimal_separator: ',',
                symbol_gap: "\u{a0}",
                min_grouping_digits: 5,
            },
            Locale::Fr => CurrencyFormat {
                currency: "EUR",
                symbol: "€",
                position: SymbolPosition::After,
                decimals: 2,
                group_separator: "\u{202f}",
                decimal_separator: ',',
                symbol_gap: "\u{a0}",
                min_grouping_digits: 4,
            },
            Locale::De => CurrencyFormat {
                currency: "EUR",
                symbol: "€",
                position: SymbolPosition::After,
                decimals: 2,
                group_separator: ".",
                decimal_separator: ',',
                symbol_gap: "\u{a0}",
                min_grouping_digits: 4,
            },
            Locale::Pt => CurrencyFormat {
                currency: "BRL",
                symbol: "R$",
                position: SymbolPosition::Before,
                decimals: 2,
                group_separator: ".",
                decimal_separator: ',',
                symbol_gap: "\u{a0}",
                min_grouping_digits: 4,
            },
        }
    }
}

pub fn currency_symbol(locale: Locale) -> &'static str {
    locale.currency_format().symbol
}

fn clamp_amount(amount: f64) -> f64 {
    amount.clamp(-MAX_CURRENCY_VALUE, MAX_CURRENCY_VALUE)
}

fn group_digits(digits: &str, separator: &str, min_grouping_digits: usize) -> String {
    if digits.len() < min_grouping_digits {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn format_magnitude(amount: f64, decimals: u32, format: &CurrencyFormat) -> (String, bool) {
    let scale = 10u64.pow(decimals);
    let scaled = (amount.abs() * scale as f64).round() as u64;
    let whole = scaled / scale;
    let fraction = scaled % scale;

    let mut text = group_digits(
        &whole.to_string(),
        format.group_separator,
        format.min_grouping_digits,
    );
    if decimals > 0 {
        text.push(format.decimal_separator);
        text.push_str(&format!("{fraction:0width$}", width = decimals as usize));
    }
    (text, amount < 0.0 && scaled != 0)
}

/// Formats `amount` as money in `locale`, clamping to
/// [`MAX_CURRENCY_VALUE`]. Non-finite input yields `"0"`.
pub fn format_currency(amount: f64, locale: Locale) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let format = locale.currency_format();
    let (number, negative) = format_magnitude(clamp_amount(amount), format.decimals, &format);
    let sign = if negative { "-" } else { "" };
    match format.position {
        SymbolPosition::Before => format!("{sign}{}{}{number}", format.symbol, format.symbol_gap),
        SymbolPosition::After => format!("{sign}{number}{}{}", format.symbol_gap, format.symbol),
    }
}

pub fn format_currency_number(amount: f64, locale: Locale) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }
    let format = locale.currency_format();
    let (number, negative) = format_magnitude(clamp_amount(amount), 2, &format);
    if negative {
        format!("-{number}")
    } else {
        number
    }
}

const ABBREVIATIONS: [(f64, &str); 4] = [
    (1_000_000_000_000.0, "T"),
    (1_000_000_000.0, "B"),
    (1_000_000.0, "M"),
    (1_000.0, "K"),
];

pub fn format_currency_abbreviated(amount: f64, locale: Locale) -> String {
    if !amount.is_finite() {
        return format_currency(0.0, locale);
    }
    let format = locale.currency_format();
    for (threshold, suffix) in ABBREVIATIONS {
        if amount >= threshold {
            let abbreviated = amount / threshold;
            let decimals = if abbreviated < 10.0 { 1 } else { 0 };
            let (number, _) = format_magnitude(abbreviated, decimals, &format);
            return format!("{}{number}{suffix}", format.symbol);
        }
    }
    format_currency(amount, locale)
}

/// Best-effort parse of user or host supplied money text. Currency symbols
/// and spaces are ignored. When both `.` and `,` occur the later one is the
/// decimal separator; a lone separator followed by exactly three digits, or
/// one that repeats, is a thousands separator. Unparseable input is `0`.
pub fn parse_currency(input: &str) -> f64 {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let negative = kept.starts_with('-');
    let body: String = kept.chars().filter(|c| *c != '-').collect();

    match normalize_separators(&body).parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let value = if negative { -value } else { value };
            value.min(MAX_CURRENCY_VALUE)
        }
        _ => 0.0,
    }
}

fn normalize_separators(body: &str) -> String {
    let decimal_at = match (body.rfind('.'), body.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(at), None) | (None, Some(at)) => {
            let separator = body.as_bytes()[at];
            let occurrences = body.bytes().filter(|b| *b == separator).count();
            let trailing_digits = body.len() - at - 1;
            if occurrences > 1 || trailing_digits == 3 {
                None
            } else {
                Some(at)
            }
        }
        (None, None) => None,
    };

    body.char_indices()
        .filter_map(|(at, ch)| match ch {
            '0'..='9' => Some(ch),
            _ if Some(at) == decimal_at => Some('.'),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurrencyError {
    #[error("Amount is required")]
    Required,
    #[error("Unable to parse currency amount")]
    ParseError,
    #[error("Invalid amount format")]
    InvalidFormat,
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Amount must be greater than zero")]
    Zero,
    #[error("Amount must be at least {minimum}")]
    BelowMinimum { minimum: String },
    #[error("Amount cannot exceed {maximum}")]
    ExceedsMaximum { maximum: String },
}

impl CurrencyError {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::ParseError => "parseError",
            Self::InvalidFormat => "invalidFormat",
            Self::NegativeAmount => "negativeAmount",
            Self::Zero | Self::BelowMinimum { .. } => "belowMinimum",
            Self::ExceedsMaximum { .. } => "exceedsMaximum",
        }
    }

    pub fn message_key(&self) -> String {
        match self {
            Self::Required => "currency.validation.required".to_string(),
            other => format!("currency.errors.{}", other.key()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    pub allow_zero: bool,
    pub min_amount: f64,
    pub locale: Locale,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            allow_zero: false,
            min_amount: 0.0,
            locale: Locale::En,
        }
    }
}

pub fn validate_currency(amount: f64, options: &ValidationOptions) -> Result<f64, CurrencyError> {
    if !amount.is_finite() {
        return Err(CurrencyError::InvalidFormat);
    }
    if amount < 0.0 {
        return Err(CurrencyError::NegativeAmount);
    }
    if !options.allow_zero && amount == 0.0 {
        return Err(CurrencyError::Zero);
    }
    if amount < options.min_amount {
        return Err(CurrencyError::BelowMinimum {
            minimum: format_currency(options.min_amount, options.locale),
        });
    }
    if amount > MAX_CURRENCY_VALUE {
        return Err(CurrencyError::ExceedsMaximum {
            maximum: format_currency(MAX_CURRENCY_VALUE, options.locale),
        });
    }
    Ok(amount)
}

pub fn validate_currency_input(
    input: &str,
    options: &ValidationOptions,
) -> Result<f64, CurrencyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CurrencyError::Required);
    }
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(CurrencyError::ParseError);
    }
    validate_currency(parse_currency(trimmed), options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyChange {
    pub percentage: f64,
    pub direction: ChangeDirection,
    pub change: f64,
}

pub fn calculate_currency_change(old_amount: f64, new_amount: f64) -> CurrencyChange {
    if !old_amount.is_finite() || !new_amount.is_finite() || old_amount == 0.0 {
        return CurrencyChange {
            percentage: 0.0,
            direction: ChangeDirection::Neutral,
            change: 0.0,
        };
    }
    let change = new_amount - old_amount;
    let direction = if change > 0.0 {
        ChangeDirection::Up
    } else if change < 0.0 {
        ChangeDirection::Down
    } else {
        ChangeDirection::Neutral
    };
    CurrencyChange {
        percentage: (change / old_amount * 100.0).abs(),
        direction,
        change,
    }
}

#[cfg(test)]
#[path = "tests/currency_tests.rs"]
mod tests;
