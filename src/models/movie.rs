use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Running time in minutes.
    pub duration: i32,
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Writable movie fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct NewMovie {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Ensure this field has no more than 200 characters and is not blank."
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
    pub release_date: NaiveDate,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub duration: i32,
}

impl NewMovie {
    pub fn into_movie(self, id: i64) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            release_date: self.release_date,
            duration: self.duration,
        }
    }
}

impl From<Movie> for NewMovie {
    fn from(movie: Movie) -> Self {
        Self {
            title: movie.title,
            description: movie.description,
            release_date: movie.release_date,
            duration: movie.duration,
        }
    }
}
