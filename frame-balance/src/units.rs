use ethabi::ethereum_types::U256;

/// Converts a raw integer token amount into a decimal string using the
/// token's precision. Pure string arithmetic, so powers-of-ten-aligned
/// values are exact. Trailing fractional zeros are trimmed.
pub fn format_units(raw: U256, decimals: u32) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let (integer, fraction) = if digits.len() > decimals {
        let (integer, fraction) = digits.split_at(digits.len() - decimals);
        (integer.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer
    } else {
        format!("{integer}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn eighteen_decimals() {
        let raw = U256::from_dec_str("1500000000000000000").unwrap();
        assert_eq!(format_units(raw, 18), "1.5");
    }

    #[test]
    fn whole_amount_has_no_fraction() {
        let raw = U256::from_dec_str("2000000000000000000").unwrap();
        assert_eq!(format_units(raw, 18), "2");
    }

    #[test]
    fn zero() {
        assert_eq!(format_units(U256::zero(), 18), "0");
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(format_units(U256::from(1234u64), 0), "1234");
    }

    #[test]
    fn amount_smaller_than_one() {
        assert_eq!(format_units(U256::from(42u64), 6), "0.000042");
    }

    #[test]
    fn more_decimals_than_digits_in_a_word() {
        assert_eq!(
            format_units(U256::from(1u64), 30),
            format!("0.{}1", "0".repeat(29))
        );
    }

    #[test]
    fn full_precision_survives() {
        let raw = U256::from_dec_str("1000000000000000001").unwrap();
        assert_eq!(format_units(raw, 18), "1.000000000000000001");
    }
}
