//! Domain Layer
//!
//! Catalog records, write drafts and repository traits.

pub mod draft;
pub mod record;
pub mod repository;

pub use draft::{
    AuthorDraft, AuthorInput, BookDraft, BookInput, FormValue, PublisherDraft, PublisherInput,
};
pub use record::{Author, Book, BookDetail, BookGenre, Genre, Publisher, Review, UserSummary};
pub use repository::CatalogRepository;
