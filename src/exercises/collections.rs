//! Fixed lookup tables: a reading list and a student directory.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub title: &'static str,
    pub author: &'static str,
}

pub fn favorite_books() -> Vec<Book> {
    vec![
        Book { title: "The Way of Shadows", author: "Brent Weeks" },
        Book { title: "Cat's Cradle", author: "Kurt Vonnegut, Jr." },
        Book { title: "Harry Potter", author: "J.K. Rowling" },
        Book { title: "The Scholomance Series", author: "Naomi Novik" },
    ]
}

pub fn first_three_books(books: &[Book]) -> &[Book] {
    &books[..books.len().min(3)]
}

pub fn student_db() -> HashMap<&'static str, u32> {
    HashMap::from([("Joe Schmoe", 1), ("John Doe", 2), ("Jane Doe", 3)])
}

pub fn get_student_id(db: &HashMap<&'static str, u32>, name: &str) -> Option<u32> {
    db.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn books_have_titles_and_authors() {
        let books = favorite_books();
        assert!(books.len() >= 3);
        assert!(books.iter().all(|b| !b.title.is_empty() && !b.author.is_empty()));
    }

    #[test]
    fn first_three_is_a_prefix() {
        let books = favorite_books();
        let first = first_three_books(&books);
        assert_eq!(first, &books[..3]);
        assert_eq!(first_three_books(&books[..1]).len(), 1);
        assert!(first_three_books(&[]).is_empty());
    }

    #[test]
    fn student_lookup() {
        let db = student_db();
        assert_eq!(db["Joe Schmoe"], 1);
        assert_eq!(get_student_id(&db, "John Doe"), Some(2));
        assert_eq!(get_student_id(&db, "Missing Person"), None);
    }
}
