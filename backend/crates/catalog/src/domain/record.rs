//! Catalog Records
//!
//! Read models as returned by the API. Field names are the column names.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AuthorId, BookId, GenreId, PublisherId, ReviewId, UserId};
use serde::Serialize;

/// Book with its author and publisher display names
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub subtitle: Option<String>,
    pub isbn13: Option<String>,
    pub author_id: Option<AuthorId>,
    pub publisher_id: Option<PublisherId>,
    pub publication_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub page_count: Option<i32>,
    pub description: Option<String>,
    /// `first_name last_name`, `None` without an author
    pub author_name: Option<String>,
    pub publisher_name: Option<String>,
}

/// Book detail view
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub genres: Vec<Genre>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Author {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub website: Option<String>,
    pub portrait_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Publisher {
    pub publisher_id: PublisherId,
    pub name: String,
    pub country: Option<String>,
    pub founded_year: Option<i32>,
    pub headquarters_city: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
    pub description: Option<String>,
}

/// Book to genre association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BookGenre {
    pub book_id: BookId,
    pub genre_id: GenreId,
}

/// Review with reviewer name and book title
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Review {
    pub review_id: ReviewId,
    pub book_id: BookId,
    pub user_id: Option<UserId>,
    pub rating: i16,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub username: Option<String>,
    pub book_title: Option<String>,
}

/// Admin user listing. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
