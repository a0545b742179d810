//! HTTP Handlers
//!
//! Reads are public. Mutations run behind `require_admin`, which attaches
//! the caller's [`CurrentSession`].

use std::sync::Arc;

use auth::presentation::middleware::CurrentSession;
use axum::Json;
use axum::extract::State;
use kernel::extract::{ApiJson, ApiPath};
use kernel::id::{AuthorId, BookId, PublisherId};

use crate::domain::draft::{
    AuthorDraft, AuthorInput, BookDraft, BookInput, PublisherDraft, PublisherInput,
};
use crate::domain::record::{
    Author, Book, BookDetail, BookGenre, Genre, Publisher, Review, UserSummary,
};
use crate::domain::repository::CatalogRepository;
use crate::error::{CatalogError, CatalogResult, CatalogResultExt};
use crate::presentation::dto::{AuthorCreated, BookCreated, MessageResponse, PublisherCreated};

/// Shared state for catalog handlers
pub struct CatalogAppState<R> {
    pub repo: Arc<R>,
}

impl<R> CatalogAppState<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> Clone for CatalogAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// Turn "no row matched" into 404
fn found(matched: bool, entity: &'static str) -> CatalogResult<()> {
    if matched {
        Ok(())
    } else {
        Err(CatalogError::NotFound(entity))
    }
}

// ============================================================================
// Books
// ============================================================================

/// GET /api/books
pub async fn list_books<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Book>>> {
    let books = state
        .repo
        .list_books()
        .await
        .failed_as("Error fetching books")?;

    Ok(Json(books))
}

/// GET /api/books/{id}
pub async fn get_book<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath(book_id): ApiPath<BookId>,
) -> CatalogResult<Json<BookDetail>> {
    let detail = async {
        let book = state
            .repo
            .find_book(book_id)
            .await?
            .ok_or(CatalogError::NotFound("Book"))?;
        let genres = state.repo.genres_of_book(book_id).await?;
        let reviews = state.repo.reviews_of_book(book_id).await?;

        Ok::<_, CatalogError>(BookDetail {
            book,
            genres,
            reviews,
        })
    }
    .await
    .failed_as("Error fetching book")?;

    Ok(Json(detail))
}

/// POST /api/books
pub async fn create_book<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiJson(input): ApiJson<BookInput>,
) -> CatalogResult<Json<BookCreated>> {
    let draft = BookDraft::normalize(input)?;
    let book_id = state
        .repo
        .create_book(&draft)
        .await
        .failed_as("Error adding book")?;

    tracing::info!(admin_id = %current.user_id, book_id = %book_id, "Book added");

    Ok(Json(BookCreated {
        message: "Book added successfully",
        book_id,
    }))
}

/// PUT /api/books/{id}
pub async fn update_book<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(book_id): ApiPath<BookId>,
    ApiJson(input): ApiJson<BookInput>,
) -> CatalogResult<Json<MessageResponse>> {
    let draft = BookDraft::normalize(input)?;
    let matched = state
        .repo
        .update_book(book_id, &draft)
        .await
        .failed_as("Error updating book")?;
    found(matched, "Book")?;

    tracing::info!(admin_id = %current.user_id, book_id = %book_id, "Book updated");

    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// DELETE /api/books/{id}
pub async fn delete_book<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(book_id): ApiPath<BookId>,
) -> CatalogResult<Json<MessageResponse>> {
    let matched = state
        .repo
        .delete_book(book_id)
        .await
        .failed_as("Error deleting book")?;
    found(matched, "Book")?;

    tracing::info!(admin_id = %current.user_id, book_id = %book_id, "Book deleted");

    Ok(Json(MessageResponse::new("Book deleted successfully")))
}

// ============================================================================
// Authors
// ============================================================================

/// GET /api/authors
pub async fn list_authors<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Author>>> {
    let authors = state
        .repo
        .list_authors()
        .await
        .failed_as("Error fetching authors")?;

    Ok(Json(authors))
}

/// POST /api/authors
pub async fn create_author<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiJson(input): ApiJson<AuthorInput>,
) -> CatalogResult<Json<AuthorCreated>> {
    let draft = AuthorDraft::normalize(input)?;
    let author_id = state
        .repo
        .create_author(&draft)
        .await
        .failed_as("Error adding author")?;

    tracing::info!(admin_id = %current.user_id, author_id = %author_id, "Author added");

    Ok(Json(AuthorCreated {
        message: "Author added successfully",
        author_id,
    }))
}

/// PUT /api/authors/{id}
pub async fn update_author<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(author_id): ApiPath<AuthorId>,
    ApiJson(input): ApiJson<AuthorInput>,
) -> CatalogResult<Json<MessageResponse>> {
    let draft = AuthorDraft::normalize(input)?;
    let matched = state
        .repo
        .update_author(author_id, &draft)
        .await
        .failed_as("Error updating author")?;
    found(matched, "Author")?;

    tracing::info!(admin_id = %current.user_id, author_id = %author_id, "Author updated");

    Ok(Json(MessageResponse::new("Author updated successfully")))
}

/// DELETE /api/authors/{id}
pub async fn delete_author<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(author_id): ApiPath<AuthorId>,
) -> CatalogResult<Json<MessageResponse>> {
    let matched = state
        .repo
        .delete_author(author_id)
        .await
        .failed_as("Error deleting author")?;
    found(matched, "Author")?;

    tracing::info!(admin_id = %current.user_id, author_id = %author_id, "Author deleted");

    Ok(Json(MessageResponse::new("Author deleted successfully")))
}

// ============================================================================
// Publishers
// ============================================================================

/// GET /api/publishers
pub async fn list_publishers<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Publisher>>> {
    let publishers = state
        .repo
        .list_publishers()
        .await
        .failed_as("Error fetching publishers")?;

    Ok(Json(publishers))
}

/// POST /api/publishers
pub async fn create_publisher<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiJson(input): ApiJson<PublisherInput>,
) -> CatalogResult<Json<PublisherCreated>> {
    let draft = PublisherDraft::normalize(input)?;
    let publisher_id = state
        .repo
        .create_publisher(&draft)
        .await
        .failed_as("Error adding publisher")?;

    tracing::info!(
        admin_id = %current.user_id,
        publisher_id = %publisher_id,
        "Publisher added"
    );

    Ok(Json(PublisherCreated {
        message: "Publisher added successfully",
        publisher_id,
    }))
}

/// PUT /api/publishers/{id}
pub async fn update_publisher<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(publisher_id): ApiPath<PublisherId>,
    ApiJson(input): ApiJson<PublisherInput>,
) -> CatalogResult<Json<MessageResponse>> {
    let draft = PublisherDraft::normalize(input)?;
    let matched = state
        .repo
        .update_publisher(publisher_id, &draft)
        .await
        .failed_as("Error updating publisher")?;
    found(matched, "Publisher")?;

    tracing::info!(
        admin_id = %current.user_id,
        publisher_id = %publisher_id,
        "Publisher updated"
    );

    Ok(Json(MessageResponse::new("Publisher updated successfully")))
}

/// DELETE /api/publishers/{id}
pub async fn delete_publisher<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
    ApiPath(publisher_id): ApiPath<PublisherId>,
) -> CatalogResult<Json<MessageResponse>> {
    let matched = state
        .repo
        .delete_publisher(publisher_id)
        .await
        .failed_as("Error deleting publisher")?;
    found(matched, "Publisher")?;

    tracing::info!(
        admin_id = %current.user_id,
        publisher_id = %publisher_id,
        "Publisher deleted"
    );

    Ok(Json(MessageResponse::new("Publisher deleted successfully")))
}

// ============================================================================
// Listings
// ============================================================================

/// GET /api/genres
pub async fn list_genres<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Genre>>> {
    let genres = state
        .repo
        .list_genres()
        .await
        .failed_as("Error fetching genres")?;

    Ok(Json(genres))
}

/// GET /api/book-genres
pub async fn list_book_genres<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<BookGenre>>> {
    let pairs = state
        .repo
        .list_book_genres()
        .await
        .failed_as("Error fetching book genres")?;

    Ok(Json(pairs))
}

/// GET /api/reviews
pub async fn list_reviews<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Review>>> {
    let reviews = state
        .repo
        .list_reviews()
        .await
        .failed_as("Error fetching reviews")?;

    Ok(Json(reviews))
}

/// GET /api/users (admin)
pub async fn list_users<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    current: CurrentSession,
) -> CatalogResult<Json<Vec<UserSummary>>> {
    let users = state
        .repo
        .list_users()
        .await
        .failed_as("Error fetching users")?;

    tracing::debug!(admin_id = %current.user_id, count = users.len(), "Users listed");

    Ok(Json(users))
}
