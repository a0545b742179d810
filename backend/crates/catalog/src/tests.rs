//! Router-level tests for the catalog crate

use std::sync::{Arc, Mutex};
use std::time::Duration;

use auth::application::session_token;
use auth::domain::entity::auth_session::AuthSession;
use auth::domain::repository::SessionStore;
use auth::domain::value_object::user_role::UserRole;
use auth::presentation::middleware::AuthGuard;
use auth::{AuthConfig, MemorySessionStore};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use kernel::id::{AuthorId, BookId, GenreId, PublisherId, ReviewId, UserId};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::domain::draft::{AuthorDraft, BookDraft, PublisherDraft};
use crate::domain::record::{
    Author, Book, BookGenre, Genre, Publisher, Review, UserSummary,
};
use crate::domain::repository::{
    AuthorRepository, BookRepository, ListingRepository, PublisherRepository,
};
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::{CatalogAppState, catalog_router};

// ============================================================================
// Stub repository
// ============================================================================

#[derive(Default)]
struct StubCatalog {
    books: Mutex<Vec<Book>>,
    authors: Mutex<Vec<Author>>,
    written_books: Mutex<Vec<BookDraft>>,
    broken: bool,
}

impl StubCatalog {
    fn seeded() -> Self {
        let stub = Self::default();
        stub.books.lock().unwrap().push(Book {
            book_id: BookId::from_raw(1),
            title: "Dune".into(),
            subtitle: Some(String::new()),
            isbn13: Some("9780441172719".into()),
            author_id: Some(AuthorId::from_raw(1)),
            publisher_id: None,
            publication_date: None,
            language: Some("en".into()),
            page_count: Some(412),
            description: Some(String::new()),
            author_name: Some("Frank Herbert".into()),
            publisher_name: None,
        });
        stub.authors.lock().unwrap().push(Author {
            author_id: AuthorId::from_raw(1),
            first_name: "Frank".into(),
            last_name: "Herbert".into(),
            bio: None,
            birth_date: None,
            death_date: None,
            nationality: None,
            website: None,
            portrait_url: None,
        });
        stub
    }

    fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    fn check(&self) -> CatalogResult<()> {
        if self.broken {
            Err(CatalogError::Database(sqlx::Error::WorkerCrashed))
        } else {
            Ok(())
        }
    }
}

impl BookRepository for StubCatalog {
    async fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.check()?;
        Ok(self.books.lock().unwrap().clone())
    }

    async fn find_book(&self, book_id: BookId) -> CatalogResult<Option<Book>> {
        self.check()?;
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.book_id == book_id)
            .cloned())
    }

    async fn genres_of_book(&self, _book_id: BookId) -> CatalogResult<Vec<Genre>> {
        Ok(vec![Genre {
            genre_id: GenreId::from_raw(2),
            name: "Science Fiction".into(),
            description: None,
        }])
    }

    async fn reviews_of_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>> {
        Ok(vec![Review {
            review_id: ReviewId::from_raw(5),
            book_id,
            user_id: Some(UserId::from_raw(3)),
            rating: 5,
            review_text: Some("Classic".into()),
            created_at: Utc::now(),
            username: Some("alice".into()),
            book_title: Some("Dune".into()),
        }])
    }

    async fn create_book(&self, draft: &BookDraft) -> CatalogResult<BookId> {
        self.check()?;
        let mut written = self.written_books.lock().unwrap();
        written.push(draft.clone());
        Ok(BookId::from_raw(100 + written.len() as i64))
    }

    async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> CatalogResult<bool> {
        self.check()?;
        let exists = self.books.lock().unwrap().iter().any(|b| b.book_id == book_id);
        if exists {
            self.written_books.lock().unwrap().push(draft.clone());
        }
        Ok(exists)
    }

    async fn delete_book(&self, book_id: BookId) -> CatalogResult<bool> {
        self.check()?;
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| b.book_id != book_id);
        Ok(books.len() < before)
    }
}

impl AuthorRepository for StubCatalog {
    async fn list_authors(&self) -> CatalogResult<Vec<Author>> {
        self.check()?;
        Ok(self.authors.lock().unwrap().clone())
    }

    async fn create_author(&self, _draft: &AuthorDraft) -> CatalogResult<AuthorId> {
        self.check()?;
        Ok(AuthorId::from_raw(7))
    }

    async fn update_author(&self, author_id: AuthorId, _draft: &AuthorDraft) -> CatalogResult<bool> {
        self.check()?;
        Ok(self
            .authors
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.author_id == author_id))
    }

    async fn delete_author(&self, author_id: AuthorId) -> CatalogResult<bool> {
        self.check()?;
        let mut authors = self.authors.lock().unwrap();
        let before = authors.len();
        authors.retain(|a| a.author_id != author_id);
        Ok(authors.len() < before)
    }
}

impl PublisherRepository for StubCatalog {
    async fn list_publishers(&self) -> CatalogResult<Vec<Publisher>> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn create_publisher(&self, _draft: &PublisherDraft) -> CatalogResult<PublisherId> {
        self.check()?;
        Ok(PublisherId::from_raw(4))
    }

    async fn update_publisher(
        &self,
        _publisher_id: PublisherId,
        _draft: &PublisherDraft,
    ) -> CatalogResult<bool> {
        self.check()?;
        Ok(false)
    }

    async fn delete_publisher(&self, _publisher_id: PublisherId) -> CatalogResult<bool> {
        self.check()?;
        Ok(false)
    }
}

impl ListingRepository for StubCatalog {
    async fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn list_book_genres(&self) -> CatalogResult<Vec<BookGenre>> {
        self.check()?;
        Ok(vec![BookGenre {
            book_id: BookId::from_raw(1),
            genre_id: GenreId::from_raw(2),
        }])
    }

    async fn list_reviews(&self) -> CatalogResult<Vec<Review>> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn list_users(&self) -> CatalogResult<Vec<UserSummary>> {
        self.check()?;
        Ok(vec![UserSummary {
            user_id: UserId::from_raw(1),
            username: "root".into(),
            email: "root@example.com".into(),
            role: "ADMIN".into(),
            created_at: Utc::now(),
        }])
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    app: Router,
    repo: Arc<StubCatalog>,
    sessions: Arc<MemorySessionStore>,
    config: Arc<AuthConfig>,
}

fn harness(repo: StubCatalog) -> Harness {
    let repo = Arc::new(repo);
    let sessions = Arc::new(MemorySessionStore::new());
    let config = Arc::new(AuthConfig::development());
    let guard = AuthGuard::new(sessions.clone(), config.clone());

    Harness {
        app: catalog_router(CatalogAppState::new(repo.clone()), guard),
        repo,
        sessions,
        config,
    }
}

impl Harness {
    async fn cookie(&self, role: UserRole) -> String {
        let session = AuthSession::new(UserId::from_raw(1), role, Duration::from_secs(60));
        self.sessions.create(&session).await.unwrap();
        let token = session_token::sign(session.session_id, &self.config.session_secret);
        format!("library_session={token}")
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

// ============================================================================
// Public reads
// ============================================================================

#[tokio::test]
async fn test_list_books_is_public() {
    let h = harness(StubCatalog::seeded());

    let (status, body) = h.send("GET", "/books", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["book_id"], 1);
    assert_eq!(body[0]["author_name"], "Frank Herbert");
    assert_eq!(body[0]["publisher_name"], Value::Null);
}

#[tokio::test]
async fn test_book_detail_includes_genres_and_reviews() {
    let h = harness(StubCatalog::seeded());

    let (status, body) = h.send("GET", "/books/1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["genres"][0]["name"], "Science Fiction");
    assert_eq!(body["reviews"][0]["username"], "alice");
}

#[tokio::test]
async fn test_book_detail_not_found() {
    let h = harness(StubCatalog::seeded());

    let (status, body) = h.send("GET", "/books/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, body) = h.send("GET", "/books/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_other_listings_are_public() {
    let h = harness(StubCatalog::seeded());

    for uri in ["/authors", "/publishers", "/genres", "/book-genres", "/reviews"] {
        let (status, _) = h.send("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }

    let (_, body) = h.send("GET", "/book-genres", None, None).await;
    assert_eq!(body, json!([{ "book_id": 1, "genre_id": 2 }]));
}

#[tokio::test]
async fn test_store_failure_reports_operation() {
    let h = harness(StubCatalog::broken());

    let (status, body) = h.send("GET", "/books", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error fetching books");
}

// ============================================================================
// Admin mutations
// ============================================================================

#[tokio::test]
async fn test_mutations_require_admin() {
    let h = harness(StubCatalog::seeded());
    let book = json!({ "title": "Emma" });

    let (status, body) = h.send("POST", "/books", None, Some(book.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin privileges required");

    let user = h.cookie(UserRole::User).await;
    let (status, _) = h.send("POST", "/books", Some(&user), Some(book)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = h.send("DELETE", "/authors/1", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(h.repo.authors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_users_listing_is_admin_only() {
    let h = harness(StubCatalog::seeded());

    let (status, _) = h.send("GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = h.cookie(UserRole::Admin).await;
    let (status, body) = h.send("GET", "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["username"], "root");
    assert!(body[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_creates_book_with_defaults() {
    let h = harness(StubCatalog::seeded());
    let admin = h.cookie(UserRole::Admin).await;

    let (status, body) = h
        .send(
            "POST",
            "/books",
            Some(&admin),
            Some(json!({ "title": "Emma", "author_id": "", "page_count": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book added successfully");
    assert_eq!(body["book_id"], 101);

    let written = h.repo.written_books.lock().unwrap();
    assert_eq!(written[0].language, "en");
    assert_eq!(written[0].page_count, 0);
    assert_eq!(written[0].author_id, None);
}

#[tokio::test]
async fn test_admin_book_validation() {
    let h = harness(StubCatalog::seeded());
    let admin = h.cookie(UserRole::Admin).await;

    let (status, body) = h
        .send(
            "POST",
            "/books",
            Some(&admin),
            Some(json!({ "title": "Emma", "author_id": "abc" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid author_id");
    assert!(h.repo.written_books.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_update_missing_book() {
    let h = harness(StubCatalog::seeded());
    let admin = h.cookie(UserRole::Admin).await;

    let (status, body) = h
        .send("PUT", "/books/99", Some(&admin), Some(json!({ "title": "Emma" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, body) = h
        .send("PUT", "/books/1", Some(&admin), Some(json!({ "title": "Dune Messiah" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
}

#[tokio::test]
async fn test_admin_deletes() {
    let h = harness(StubCatalog::seeded());
    let admin = h.cookie(UserRole::Admin).await;

    let (status, body) = h.send("DELETE", "/authors/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Author deleted successfully");
    assert!(h.repo.authors.lock().unwrap().is_empty());

    let (status, body) = h.send("DELETE", "/publishers/3", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Publisher not found");
}

#[tokio::test]
async fn test_admin_creates_author_and_publisher() {
    let h = harness(StubCatalog::seeded());
    let admin = h.cookie(UserRole::Admin).await;

    let (status, body) = h
        .send(
            "POST",
            "/authors",
            Some(&admin),
            Some(json!({ "first_name": "Jane", "last_name": "Austen", "birth_date": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author_id"], 7);

    let (status, body) = h
        .send(
            "POST",
            "/publishers",
            Some(&admin),
            Some(json!({ "name": "Penguin", "founded_year": "1935" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["publisher_id"], 4);
}
