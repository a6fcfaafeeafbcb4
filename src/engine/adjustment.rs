use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::AppError;

pub const MIN_ADJUSTMENT_PCT: i32 = -30;
pub const MAX_ADJUSTMENT_PCT: i32 = 30;

/// Scales a suggested price by a bounded percentage and floors the
/// result at one currency unit. The adjusted value is what gets
/// persisted as the delivery's estimated price, so rounding is fixed
/// at two decimal places, midpoint away from zero.
pub fn apply_adjustment(suggested: Decimal, pct: i32) -> Result<Decimal, AppError> {
    if !(MIN_ADJUSTMENT_PCT..=MAX_ADJUSTMENT_PCT).contains(&pct) {
        return Err(AppError::Validation(format!(
            "price adjustment {pct}% is outside [{MIN_ADJUSTMENT_PCT}, {MAX_ADJUSTMENT_PCT}]"
        )));
    }

    let factor = Decimal::ONE + Decimal::new(pct as i64, 2);
    let adjusted = (suggested * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(adjusted.max(Decimal::new(100, 2)))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{MAX_ADJUSTMENT_PCT, MIN_ADJUSTMENT_PCT, apply_adjustment};

    #[test]
    fn zero_adjustment_is_identity() {
        assert_eq!(apply_adjustment(dec!(100.00), 0).unwrap(), dec!(100.00));
    }

    #[test]
    fn discount_and_raise() {
        assert_eq!(apply_adjustment(dec!(100.00), -10).unwrap(), dec!(90.00));
        assert_eq!(apply_adjustment(dec!(100.00), 30).unwrap(), dec!(130.00));
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert!(apply_adjustment(dec!(100.00), -31).is_err());
        assert!(apply_adjustment(dec!(100.00), 31).is_err());
        assert!(apply_adjustment(dec!(100.00), 100).is_err());
    }

    #[test]
    fn monotonic_in_the_percentage() {
        let suggested = dec!(57.31);
        let mut previous = apply_adjustment(suggested, MIN_ADJUSTMENT_PCT).unwrap();

        for pct in (MIN_ADJUSTMENT_PCT + 1)..=MAX_ADJUSTMENT_PCT {
            let current = apply_adjustment(suggested, pct).unwrap();
            assert!(current >= previous, "pct {pct} broke monotonicity");
            previous = current;
        }
    }

    #[test]
    fn never_drops_below_one_unit() {
        assert_eq!(apply_adjustment(dec!(1.20), -30).unwrap(), dec!(1.00));
        assert_eq!(apply_adjustment(dec!(0.50), -30).unwrap(), dec!(1.00));

        for pct in MIN_ADJUSTMENT_PCT..=MAX_ADJUSTMENT_PCT {
            assert!(apply_adjustment(dec!(0.01), pct).unwrap() >= dec!(1.00));
        }
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        // 33.50 * 0.99 = 33.165, midpoint rounds away from zero
        assert_eq!(apply_adjustment(dec!(33.50), -1).unwrap(), dec!(33.17));
        assert_eq!(apply_adjustment(dec!(99.99), 7).unwrap(), dec!(106.99));
    }
}
