use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amounts always travel with two decimals.
pub const AMOUNT_SCALE: u32 = 2;
/// Exchange rates carry at most nine decimals.
pub const RATE_SCALE: u32 = 9;

#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let mut value = value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(AMOUNT_SCALE);
    value.to_string()
}

/// Rounds to [`RATE_SCALE`] but otherwise keeps the scale the rate was created or read with, so a
/// rate read as `1.293600000` is written back verbatim.
#[must_use]
pub fn format_rate(value: Decimal) -> String {
    value
        .round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}
