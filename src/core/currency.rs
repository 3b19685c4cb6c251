// Static-rate currency normalization for threshold checks.
//
// Rates are fixed so classification stays pure and deterministic across
// timer-driven re-evaluations. They are calibration values, not live data.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// The common unit all monetary thresholds are evaluated against.
pub const REFERENCE_CURRENCY: &str = "USD";

lazy_static! {
    /// Fallback rate table, expressed as units per 1 USD.
    static ref UNITS_PER_USD: HashMap<&'static str, f64> = {
        let mut rates = HashMap::new();
        rates.insert("USD", 1.0);
        rates.insert("EUR", 0.92);
        rates.insert("GBP", 0.79);
        rates
    };

    static ref ISO_CODE: Regex = Regex::new(r"^[A-Z]{3}$").expect("Invalid currency code regex");
}

/// Rate lookup with a no-conversion fallback: codes that are malformed or
/// absent from the table convert at 1.0 instead of poisoning the result.
fn rate_for(code: &str) -> f64 {
    if !ISO_CODE.is_match(code) {
        log::warn!("malformed currency code {:?}, treating as {}", code, REFERENCE_CURRENCY);
        return 1.0;
    }
    match UNITS_PER_USD.get(code) {
        Some(rate) => *rate,
        None => {
            log::warn!("no rate for currency {:?}, treating as {}", code, REFERENCE_CURRENCY);
            1.0
        }
    }
}

/// Convert `amount` from one currency to another via the static table.
/// Same-currency conversion returns `amount` unchanged, exactly.
pub fn normalize(amount: f64, from: &str, to: &str) -> f64 {
    if from == to {
        return amount;
    }
    amount / rate_for(from) * rate_for(to)
}

/// Convert `amount` into the reference currency.
pub fn to_reference(amount: f64, from: &str) -> f64 {
    normalize(amount, from, REFERENCE_CURRENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_currency_is_identity() {
        assert_eq!(normalize(123.45, "USD", "USD"), 123.45);
        assert_eq!(normalize(0.1, "EUR", "EUR"), 0.1);
        // Identity holds even for codes the table has never heard of.
        assert_eq!(normalize(99.9, "XYZ", "XYZ"), 99.9);
    }

    #[test]
    fn test_converts_through_reference() {
        // 92 EUR at 0.92 per USD is exactly 100 USD.
        assert!((to_reference(92.0, "EUR") - 100.0).abs() < 1e-9);
        // 100 USD at 0.79 GBP per USD.
        assert!((normalize(100.0, "USD", "GBP") - 79.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_rate_conversion() {
        let got = normalize(100.0, "EUR", "GBP");
        assert!((got - 100.0 / 0.92 * 0.79).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_currency_falls_back_to_no_conversion() {
        // JPY is not in the table: amount passes through at rate 1.0.
        assert!((to_reference(5000.0, "JPY") - 5000.0).abs() < 1e-9);
        assert!(to_reference(5000.0, "JPY").is_finite());
    }

    #[test]
    fn test_malformed_code_falls_back_to_no_conversion() {
        assert!((to_reference(250.0, "usd") - 250.0).abs() < 1e-9);
        assert!((to_reference(250.0, "") - 250.0).abs() < 1e-9);
    }
}
