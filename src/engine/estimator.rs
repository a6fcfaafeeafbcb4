use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::AppError;
use crate::models::package::{PackageCategory, SizeCategory};

/// Flat handling fee per size class.
fn base_fee(size: SizeCategory) -> Decimal {
    match size {
        SizeCategory::Letter => Decimal::new(300, 2),
        SizeCategory::ExtraSmall => Decimal::new(500, 2),
        SizeCategory::Small => Decimal::new(800, 2),
        SizeCategory::Medium => Decimal::new(1200, 2),
        SizeCategory::Large => Decimal::new(2000, 2),
        SizeCategory::ExtraLarge => Decimal::new(3200, 2),
        SizeCategory::Jumbo => Decimal::new(5000, 2),
    }
}

/// Handling-risk multiplier per content category.
fn category_factor(category: PackageCategory) -> Decimal {
    match category {
        PackageCategory::Clothing | PackageCategory::Documents | PackageCategory::Other => {
            Decimal::ONE
        }
        PackageCategory::Electronics => Decimal::new(120, 2),
        PackageCategory::Perishable => Decimal::new(130, 2),
        PackageCategory::Hazardous => Decimal::new(150, 2),
    }
}

fn per_kg_rate() -> Decimal {
    Decimal::new(50, 2)
}

fn fragile_factor() -> Decimal {
    Decimal::new(115, 2)
}

/// Suggested price for a package from its physical attributes.
///
/// The weight must be positive and inside the selected size category's
/// range; both are checked here rather than trusted from the client.
pub fn estimate_price(
    weight_kg: f64,
    size: SizeCategory,
    category: PackageCategory,
    fragile: bool,
) -> Result<Decimal, AppError> {
    if weight_kg <= 0.0 {
        return Err(AppError::Validation(format!(
            "weight must be positive, got {weight_kg}kg"
        )));
    }

    let (min, max) = size.weight_range();
    if weight_kg < min || weight_kg > max {
        return Err(AppError::Validation(format!(
            "weight {weight_kg}kg is outside the {size:?} range of {min}-{max}kg"
        )));
    }

    let weight = Decimal::from_f64_retain(weight_kg).ok_or_else(|| {
        AppError::Validation(format!("weight {weight_kg} is not a finite number"))
    })?;

    let mut price = (base_fee(size) + per_kg_rate() * weight) * category_factor(category);
    if fragile {
        price *= fragile_factor();
    }

    Ok(price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::estimate_price;
    use crate::models::package::PackageCategory::*;
    use crate::models::package::SizeCategory::{self, *};

    #[test]
    fn medium_fragile_electronics_scenario() {
        let price = estimate_price(20.0, Medium, Electronics, true).unwrap();
        // (12.00 + 0.50 * 20) * 1.20 * 1.15
        assert_eq!(price, dec!(30.36));
    }

    #[test]
    fn rejects_non_positive_weight() {
        assert!(estimate_price(0.0, Small, Clothing, false).is_err());
        assert!(estimate_price(-3.0, Small, Clothing, false).is_err());
    }

    #[test]
    fn rejects_weight_outside_size_range() {
        assert!(estimate_price(5.0, Medium, Clothing, false).is_err());
        assert!(estimate_price(51.0, Medium, Clothing, false).is_err());
    }

    #[test]
    fn accepts_range_bounds() {
        for size in [Letter, ExtraSmall, Small, Medium, Large, ExtraLarge, Jumbo] {
            let (min, max) = size.weight_range();
            let low = if min > 0.0 { min } else { 0.1 };
            assert!(estimate_price(low, size, Clothing, false).is_ok());
            assert!(estimate_price(max, size, Clothing, false).is_ok());
        }
    }

    #[test]
    fn estimates_are_positive() {
        let sizes: &[(SizeCategory, f64)] = &[
            (Letter, 0.2),
            (ExtraSmall, 2.0),
            (Small, 8.0),
            (Medium, 30.0),
            (Large, 75.0),
            (ExtraLarge, 150.0),
            (Jumbo, 400.0),
        ];

        for &(size, weight) in sizes {
            for category in [Clothing, Electronics, Documents, Perishable, Hazardous, Other] {
                let price = estimate_price(weight, size, category, true).unwrap();
                assert!(price > Decimal::ZERO);
            }
        }
    }

    #[test]
    fn fragile_surcharge_raises_the_price() {
        let plain = estimate_price(10.0, Small, Clothing, false).unwrap();
        let fragile = estimate_price(10.0, Small, Clothing, true).unwrap();
        assert!(fragile > plain);
    }

    #[test]
    fn riskier_categories_cost_more() {
        let clothing = estimate_price(10.0, Small, Clothing, false).unwrap();
        let electronics = estimate_price(10.0, Small, Electronics, false).unwrap();
        let hazardous = estimate_price(10.0, Small, Hazardous, false).unwrap();

        assert!(electronics > clothing);
        assert!(hazardous > electronics);
    }

    #[test]
    fn result_has_two_decimal_places() {
        let price = estimate_price(10.5, Small, Electronics, true).unwrap();
        assert!(price.scale() <= 2);
    }
}
