//! Discount calculator.

use super::{ExerciseError, Result};

/// `(price, discount percent)` pairs shown by the CLI when run without arguments.
pub const DISCOUNT_EXAMPLES: [(f64, f64); 4] =
    [(100.0, 0.0), (100.0, 15.0), (49.99, 20.0), (250.0, 50.0)];

/// Applies a percentage discount in `[0, 100]` to a non-negative price.
pub fn calculate_discount(price: f64, discount: f64) -> Result<f64> {
    if !price.is_finite() || !discount.is_finite() {
        return Err(ExerciseError::NotFinite);
    }
    if price < 0.0 {
        return Err(ExerciseError::NegativePrice(price));
    }
    if !(0.0..=100.0).contains(&discount) {
        return Err(ExerciseError::DiscountOutOfRange(discount));
    }
    Ok(price * (1.0 - discount / 100.0))
}
