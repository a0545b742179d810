//! PostgreSQL Repository Implementation

use kernel::id::{AuthorId, BookId, PublisherId};
use sqlx::PgPool;

use crate::domain::draft::{AuthorDraft, BookDraft, PublisherDraft};
use crate::domain::record::{
    Author, Book, BookGenre, Genre, Publisher, Review, UserSummary,
};
use crate::domain::repository::{
    AuthorRepository, BookRepository, ListingRepository, PublisherRepository,
};
use crate::error::CatalogResult;

/// Book columns plus display names. `||` yields NULL when the join misses.
const BOOK_SELECT: &str = r#"
    SELECT
        b.book_id,
        b.title,
        b.subtitle,
        b.isbn13,
        b.author_id,
        b.publisher_id,
        b.publication_date,
        b.language,
        b.page_count,
        b.description,
        a.first_name || ' ' || a.last_name AS author_name,
        p.name AS publisher_name
    FROM books b
    LEFT JOIN authors a ON b.author_id = a.author_id
    LEFT JOIN publishers p ON b.publisher_id = p.publisher_id
"#;

const REVIEW_SELECT: &str = r#"
    SELECT
        r.review_id,
        r.book_id,
        r.user_id,
        r.rating,
        r.review_text,
        r.created_at,
        u.username,
        b.title AS book_title
    FROM reviews r
    LEFT JOIN users u ON r.user_id = u.user_id
    LEFT JOIN books b ON r.book_id = b.book_id
"#;

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Books
// ============================================================================

impl BookRepository for PgCatalogRepository {
    async fn list_books(&self) -> CatalogResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("{BOOK_SELECT} ORDER BY b.book_id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_book(&self, book_id: BookId) -> CatalogResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("{BOOK_SELECT} WHERE b.book_id = $1"))
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn genres_of_book(&self, book_id: BookId) -> CatalogResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.genre_id, g.name, g.description
            FROM genres g
            JOIN book_genres bg ON g.genre_id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn reviews_of_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "{REVIEW_SELECT} WHERE r.book_id = $1 ORDER BY r.created_at"
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookId> {
        let book_id = sqlx::query_scalar::<_, BookId>(
            r#"
            INSERT INTO books (
                title,
                subtitle,
                isbn13,
                author_id,
                publisher_id,
                publication_date,
                language,
                page_count,
                description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING book_id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.isbn13)
        .bind(draft.author_id)
        .bind(draft.publisher_id)
        .bind(draft.publication_date)
        .bind(&draft.language)
        .bind(draft.page_count)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(book_id)
    }

    async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE books SET
                title = $1,
                subtitle = $2,
                isbn13 = $3,
                author_id = $4,
                publisher_id = $5,
                publication_date = $6,
                language = $7,
                page_count = $8,
                description = $9
            WHERE book_id = $10
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.isbn13)
        .bind(draft.author_id)
        .bind(draft.publisher_id)
        .bind(draft.publication_date)
        .bind(&draft.language)
        .bind(draft.page_count)
        .bind(&draft.description)
        .bind(book_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_book(&self, book_id: BookId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Authors
// ============================================================================

impl AuthorRepository for PgCatalogRepository {
    async fn list_authors(&self) -> CatalogResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT
                author_id,
                first_name,
                last_name,
                bio,
                birth_date,
                death_date,
                nationality,
                website,
                portrait_url
            FROM authors
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn create_author(&self, draft: &AuthorDraft) -> CatalogResult<AuthorId> {
        let author_id = sqlx::query_scalar::<_, AuthorId>(
            r#"
            INSERT INTO authors (
                first_name,
                last_name,
                bio,
                birth_date,
                death_date,
                nationality,
                website,
                portrait_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING author_id
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.bio)
        .bind(draft.birth_date)
        .bind(draft.death_date)
        .bind(&draft.nationality)
        .bind(&draft.website)
        .bind(&draft.portrait_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(author_id)
    }

    async fn update_author(&self, author_id: AuthorId, draft: &AuthorDraft) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE authors SET
                first_name = $1,
                last_name = $2,
                bio = $3,
                birth_date = $4,
                death_date = $5,
                nationality = $6,
                website = $7,
                portrait_url = $8
            WHERE author_id = $9
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.bio)
        .bind(draft.birth_date)
        .bind(draft.death_date)
        .bind(&draft.nationality)
        .bind(&draft.website)
        .bind(&draft.portrait_url)
        .bind(author_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_author(&self, author_id: AuthorId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM authors WHERE author_id = $1")
            .bind(author_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Publishers
// ============================================================================

impl PublisherRepository for PgCatalogRepository {
    async fn list_publishers(&self) -> CatalogResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT
                publisher_id,
                name,
                country,
                founded_year,
                headquarters_city,
                website,
                contact_email,
                phone
            FROM publishers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(publishers)
    }

    async fn create_publisher(&self, draft: &PublisherDraft) -> CatalogResult<PublisherId> {
        let publisher_id = sqlx::query_scalar::<_, PublisherId>(
            r#"
            INSERT INTO publishers (
                name,
                country,
                founded_year,
                headquarters_city,
                website,
                contact_email,
                phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING publisher_id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(draft.founded_year)
        .bind(&draft.headquarters_city)
        .bind(&draft.website)
        .bind(&draft.contact_email)
        .bind(&draft.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(publisher_id)
    }

    async fn update_publisher(
        &self,
        publisher_id: PublisherId,
        draft: &PublisherDraft,
    ) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE publishers SET
                name = $1,
                country = $2,
                founded_year = $3,
                headquarters_city = $4,
                website = $5,
                contact_email = $6,
                phone = $7
            WHERE publisher_id = $8
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(draft.founded_year)
        .bind(&draft.headquarters_city)
        .bind(&draft.website)
        .bind(&draft.contact_email)
        .bind(&draft.phone)
        .bind(publisher_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_publisher(&self, publisher_id: PublisherId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM publishers WHERE publisher_id = $1")
            .bind(publisher_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Listings
// ============================================================================

impl ListingRepository for PgCatalogRepository {
    async fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            "SELECT genre_id, name, description FROM genres ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn list_book_genres(&self) -> CatalogResult<Vec<BookGenre>> {
        let pairs = sqlx::query_as::<_, BookGenre>(
            "SELECT book_id, genre_id FROM book_genres ORDER BY book_id, genre_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pairs)
    }

    async fn list_reviews(&self) -> CatalogResult<Vec<Review>> {
        let reviews =
            sqlx::query_as::<_, Review>(&format!("{REVIEW_SELECT} ORDER BY r.review_id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(reviews)
    }

    async fn list_users(&self) -> CatalogResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT user_id, username, email, role, created_at
            FROM users
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
