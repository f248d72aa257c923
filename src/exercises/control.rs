//! Control structures: branching and loops over integers.

use super::{ExerciseError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
            Sign::Zero => "zero",
        })
    }
}

/// `-0.0` and `NaN` both classify as zero since neither compares above or below it.
pub fn classify_number(n: f64) -> Sign {
    if n > 0.0 {
        Sign::Positive
    } else if n < 0.0 {
        Sign::Negative
    } else {
        Sign::Zero
    }
}

pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    // a composite n has a factor d with d * d <= n, written as d <= n / d so it cannot overflow
    let mut d: i64 = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

pub fn first_n_primes(count: i64) -> Result<Vec<i64>> {
    if count < 0 {
        return Err(ExerciseError::NegativeInput {
            name: "count",
            value: count,
        });
    }
    let wanted = usize::try_from(count).unwrap_or(usize::MAX);
    let mut primes = Vec::with_capacity(wanted.min(1024));
    let mut candidate = 2;
    while primes.len() < wanted {
        if is_prime(candidate) {
            primes.push(candidate);
        }
        candidate += 1;
    }
    Ok(primes)
}

pub fn sum_1_to_n(n: i64) -> Result<i64> {
    if n < 0 {
        return Err(ExerciseError::NegativeInput { name: "n", value: n });
    }
    // closed-form bound first; the loop below is only entered when the total fits
    let closed_form = i128::from(n) * (i128::from(n) + 1) / 2;
    if closed_form > i128::from(i64::MAX) {
        return Err(ExerciseError::Overflow);
    }
    let mut total: i64 = 0;
    let mut i = 1;
    while i <= n {
        total = total.checked_add(i).ok_or(ExerciseError::Overflow)?;
        i += 1;
    }
    Ok(total)
}

pub fn first_10_primes() -> Vec<i64> {
    // ten is never negative
    first_n_primes(10).unwrap_or_default()
}

pub fn sum_1_to_100() -> i64 {
    sum_1_to_n(100).unwrap_or_default()
}
