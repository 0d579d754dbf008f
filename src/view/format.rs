//! Display formatting for invoice rows
//!
//! One canonical locale: `en-US`.

use crate::types::Amount;
use chrono::{DateTime, Utc};

/// Format an amount as `en-US` currency (e.g., `$1,250.50`, `CLP 15,000`)
pub fn format_amount(amount: &Amount) -> String {
    let code = amount.currency.trim().to_ascii_uppercase();
    let digits = fraction_digits(&code);
    let number = group_thousands(&format!("{:.*}", digits, amount.value.abs()));
    let sign = if amount.value < 0.0 { "-" } else { "" };

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{code} {number}"),
    }
}

/// Format a timestamp the way `en-US` prints a local date and time
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "CAD" => "CA$",
        "AUD" => "A$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "CNY" => "CN¥",
        _ => return None,
    };
    Some(symbol)
}

fn fraction_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" | "CLP" | "VND" | "ISK" => 0,
        _ => 2,
    }
}

/// Insert `,` separators into the integer part of a plain decimal string
fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case("USD", 1250.5, "$1,250.50" ; "dollars")]
    #[test_case("usd", 0.0, "$0.00" ; "lowercase code")]
    #[test_case("EUR", 1_000_000.0, "€1,000,000.00" ; "millions")]
    #[test_case("CLP", 15000.0, "CLP 15,000" ; "no minor units")]
    #[test_case("JPY", 999.4, "¥999" ; "yen rounds")]
    #[test_case("USD", -42.1, "-$42.10" ; "negative")]
    #[test_case("XYZ", 123.456, "XYZ 123.46" ; "unknown code")]
    fn test_format_amount(code: &str, value: f64, expected: &str) {
        assert_eq!(format_amount(&Amount::new(code, value)), expected);
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2021, 3, 4, 15, 7, 9).unwrap();
        assert_eq!(format_date(&date), "3/4/2021, 3:07:09 PM");

        let midnight = Utc.with_ymd_and_hms(2020, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(format_date(&midnight), "12/25/2020, 12:00:00 AM");
    }
}
