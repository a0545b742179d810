//! Repository Traits
//!
//! Update and delete report whether a row matched; the caller turns a miss
//! into 404.

use kernel::id::{AuthorId, BookId, PublisherId};

use crate::domain::draft::{AuthorDraft, BookDraft, PublisherDraft};
use crate::domain::record::{
    Author, Book, BookGenre, Genre, Publisher, Review, UserSummary,
};
use crate::error::CatalogResult;

#[trait_variant::make(BookRepository: Send)]
pub trait LocalBookRepository {
    /// All books with author and publisher names
    async fn list_books(&self) -> CatalogResult<Vec<Book>>;

    async fn find_book(&self, book_id: BookId) -> CatalogResult<Option<Book>>;

    /// Genres attached to one book
    async fn genres_of_book(&self, book_id: BookId) -> CatalogResult<Vec<Genre>>;

    /// Reviews of one book with reviewer names
    async fn reviews_of_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>>;

    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookId>;

    async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> CatalogResult<bool>;

    async fn delete_book(&self, book_id: BookId) -> CatalogResult<bool>;
}

#[trait_variant::make(AuthorRepository: Send)]
pub trait LocalAuthorRepository {
    /// Ordered by last name, then first name
    async fn list_authors(&self) -> CatalogResult<Vec<Author>>;

    async fn create_author(&self, draft: &AuthorDraft) -> CatalogResult<AuthorId>;

    async fn update_author(&self, author_id: AuthorId, draft: &AuthorDraft) -> CatalogResult<bool>;

    async fn delete_author(&self, author_id: AuthorId) -> CatalogResult<bool>;
}

#[trait_variant::make(PublisherRepository: Send)]
pub trait LocalPublisherRepository {
    /// Ordered by name
    async fn list_publishers(&self) -> CatalogResult<Vec<Publisher>>;

    async fn create_publisher(&self, draft: &PublisherDraft) -> CatalogResult<PublisherId>;

    async fn update_publisher(
        &self,
        publisher_id: PublisherId,
        draft: &PublisherDraft,
    ) -> CatalogResult<bool>;

    async fn delete_publisher(&self, publisher_id: PublisherId) -> CatalogResult<bool>;
}

/// Read-only listings
#[trait_variant::make(ListingRepository: Send)]
pub trait LocalListingRepository {
    /// Ordered by name
    async fn list_genres(&self) -> CatalogResult<Vec<Genre>>;

    async fn list_book_genres(&self) -> CatalogResult<Vec<BookGenre>>;

    /// All reviews with reviewer name and book title
    async fn list_reviews(&self) -> CatalogResult<Vec<Review>>;

    async fn list_users(&self) -> CatalogResult<Vec<UserSummary>>;
}

/// Everything the catalog router needs from one store
pub trait CatalogRepository:
    BookRepository + AuthorRepository + PublisherRepository + ListingRepository + Send + Sync + 'static
{
}

impl<T> CatalogRepository for T where
    T: BookRepository
        + AuthorRepository
        + PublisherRepository
        + ListingRepository
        + Send
        + Sync
        + 'static
{
}
