//! First-run contents for the two documents.

use std::collections::BTreeMap;

use crate::models::{Book, BookDocument, UserDocument, UserRecord};

pub(crate) fn default_users() -> UserDocument {
    let users = BTreeMap::from([
        ("admin".to_string(), UserRecord::new("admin123")),
        ("user1".to_string(), UserRecord::new("password1")),
    ]);
    UserDocument { users }
}

pub(crate) fn default_books() -> BookDocument {
    BookDocument {
        books: vec![
            Book::new("1984", "George Orwell", "1984.png"),
            Book::new("To Kill a Mockingbird", "Harper Lee", "mockingbird.png"),
            Book::new("The Great Gatsby", "F. Scott Fitzgerald", "gatsby.png"),
        ],
    }
}
