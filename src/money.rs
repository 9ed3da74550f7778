//! Flat decimal amount helpers shared by the registry and the ledger.

/// Rounds an amount to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage markup of the sale price over the cost price, rounded to two
/// decimals. Callers must reject non-positive cost prices before calling.
pub fn margin_percent(cost_price: f64, sale_price: f64) -> f64 {
    round2((sale_price - cost_price) / cost_price * 100.0)
}

/// Total for a record line.
pub fn line_total(quantity: u32, unit_price: f64) -> f64 {
    round2(quantity as f64 * unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_is_rounded_to_two_decimals() {
        assert_eq!(margin_percent(5.0, 8.0), 60.0);
        assert_eq!(margin_percent(3.0, 4.0), 33.33);
    }

    #[test]
    fn line_total_multiplies_and_rounds() {
        assert_eq!(line_total(4, 8.0), 32.0);
        assert_eq!(line_total(7, 1.1), 7.7);
    }

    #[test]
    fn round2_handles_negative_amounts() {
        assert_eq!(round2(-2.344), -2.34);
        assert_eq!(round2(-2.346), -2.35);
    }
}
