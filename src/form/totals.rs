use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::model::LineItem;

/// Derived money figures for one form, already rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub taxable_base: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Round to two decimals, half away from zero.
///
/// Half-away-from-zero is the convention the totals are documented with:
/// a base of 150.005 becomes 150.01, never 150.00.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a user-entered amount. Anything unparseable contributes zero to the
/// totals; validation flags the field separately.
pub fn parse_amount(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Compute (taxable base, tax amount, total) from the line items and the tax
/// rate percentage.
///
/// Rounding is applied at each stage, not only at the end: the base is rounded
/// before the tax is computed from it, and the total is the sum of the two
/// rounded figures, rounded again. Reordering these steps changes cents.
pub fn compute_totals(items: &[LineItem], tax_rate: &str) -> Totals {
    let sum: Decimal = items.iter().map(|item| parse_amount(&item.amount)).sum();
    let taxable_base = round2(sum);

    let rate = parse_amount(tax_rate);
    let tax_amount = round2(taxable_base * rate / Decimal::ONE_HUNDRED);

    let total = round2(taxable_base + tax_amount);

    Totals {
        taxable_base,
        tax_amount,
        total,
    }
}

/// Format a rounded figure as a two-decimal string for the read-only fields.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}
