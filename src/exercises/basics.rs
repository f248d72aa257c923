//! Variables and primitive data types.

use super::{ExerciseError, Result};
use serde::Serialize;

/// Sums in `i128`, which holds any pair of `i64` values.
pub fn add_integers(a: i64, b: i64) -> i128 {
    i128::from(a) + i128::from(b)
}

/// Divides `a` by `b`, refusing a zero divisor instead of producing `inf`.
pub fn divide_floats(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(ExerciseError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn concat_strings(a: &str, b: &str) -> String {
    format!("{a}{b}")
}

pub fn toggle_boolean(value: bool) -> bool {
    !value
}

/// One value of each primitive kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleValues {
    pub count: i64,
    pub ratio: f64,
    pub label: &'static str,
    pub enabled: bool,
}

pub fn sample_values() -> SampleValues {
    SampleValues {
        count: 3,
        ratio: 0.25,
        label: "hello",
        enabled: true,
    }
}
