//! API DTOs
//!
//! Request bodies are the domain inputs (`BookInput`, `AuthorInput`,
//! `PublisherInput`); this module holds the acknowledgments.

use kernel::id::{AuthorId, BookId, PublisherId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BookCreated {
    pub message: &'static str,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorCreated {
    pub message: &'static str,
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublisherCreated {
    pub message: &'static str,
    pub publisher_id: PublisherId,
}

/// Plain acknowledgment
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
