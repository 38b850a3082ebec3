//! Currency rounding and conversion.
//!
//! Every stored amount is in the configured base currency. Salaries entered
//! in another currency are converted with an exchange rate supplied in
//! configuration.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::CurrencyConfig;
use crate::error::{PayrollError, PayrollResult};

/// Rounds an amount to the currency's minor units, halves away from zero.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("83.335").unwrap();
/// assert_eq!(round_currency(amount, 2), Decimal::from_str("83.34").unwrap());
/// ```
pub fn round_currency(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an amount in `currency` into the base currency.
///
/// An amount already in the base currency (or with no currency given) is
/// returned unchanged. Any other currency needs an entry in
/// `exchange_rates`; the converted amount is rounded to minor units.
///
/// # Errors
///
/// Returns [`PayrollError::Validation`] if no rate is configured for the
/// currency, or if the converted amount leaves the decimal range.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::convert_to_base;
/// use hr_payroll::config::CurrencyConfig;
/// use rust_decimal::Decimal;
///
/// let mut currency = CurrencyConfig::default();
/// currency.exchange_rates.insert("USD".to_string(), Decimal::new(8300, 2));
///
/// let salary = convert_to_base(Decimal::new(1000, 0), Some("usd"), &currency).unwrap();
/// assert_eq!(salary, Decimal::new(83000, 0));
/// ```
pub fn convert_to_base(
    amount: Decimal,
    currency: Option<&str>,
    config: &CurrencyConfig,
) -> PayrollResult<Decimal> {
    let code = match currency.map(str::trim) {
        None | Some("") => return Ok(amount),
        Some(code) => code.to_ascii_uppercase(),
    };

    if code.eq_ignore_ascii_case(&config.code) {
        return Ok(amount);
    }

    let rate = config
        .exchange_rates
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(&code))
        .map(|(_, rate)| *rate)
        .ok_or_else(|| {
            PayrollError::validation(
                "salary_currency",
                format!("no exchange rate configured from {} to {}", code, config.code),
            )
        })?;

    let converted = amount.checked_mul(rate).ok_or_else(|| {
        PayrollError::validation("salary", format!("{} {} is too large to convert", amount, code))
    })?;
    Ok(round_currency(converted, config.decimal_places))
}
