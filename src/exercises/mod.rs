//! Standalone programming exercises.
//!
//! Each submodule is independent of the booking service: plain functions over
//! primitive values, a word counter over text files and a single GitHub REST
//! call. The `exercises` binary exposes all of them on the command line.

pub mod basics;
pub mod collections;
pub mod control;
pub mod discount;
pub mod github;
pub mod word_count;

use std::path::PathBuf;

/// Errors raised by the exercise functions.
#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{name} must be >= 0, got {value}")]
    NegativeInput { name: &'static str, value: i64 },

    #[error("result does not fit in a 64-bit integer")]
    Overflow,

    #[error("price and discount must be finite numbers")]
    NotFinite,

    #[error("price must be >= 0, got {0}")]
    NegativePrice(f64),

    #[error("discount must be between 0 and 100, got {0}")]
    DiscountOutOfRange(f64),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExerciseError>;
