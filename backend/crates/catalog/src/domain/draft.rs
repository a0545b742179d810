//! Write Drafts
//!
//! Admin forms send ids and numbers either as JSON numbers or as strings,
//! and use `""` (sometimes `"null"`) for "no value". The helpers here fold
//! those shapes into typed drafts before anything reaches the store.
//!
//! Book defaults on write:
//! - `subtitle`, `description`: `""`
//! - `language`: `"en"`
//! - `page_count`: `0`
//! - blank `author_id`, `publisher_id`, `publication_date`: NULL

use chrono::NaiveDate;
use kernel::id::{AuthorId, Id, PublisherId};
use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Scalar as sent by a form: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Int(i64),
    Text(String),
}

impl FormValue {
    /// `""` and `"null"` mean no value
    fn is_blank(&self) -> bool {
        match self {
            FormValue::Int(_) => false,
            FormValue::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "null"
            }
        }
    }

    fn to_i64(&self, field: &'static str) -> CatalogResult<i64> {
        match self {
            FormValue::Int(n) => Ok(*n),
            FormValue::Text(s) => s.trim().parse().map_err(|_| invalid(field)),
        }
    }
}

fn invalid(field: &'static str) -> CatalogError {
    CatalogError::Validation(format!("Invalid {field}"))
}

/// Foreign key that may be left empty
pub fn optional_id<T>(value: Option<FormValue>, field: &'static str) -> CatalogResult<Option<Id<T>>> {
    match value {
        Some(v) if !v.is_blank() => {
            let raw = v.to_i64(field)?;
            if raw <= 0 {
                return Err(invalid(field));
            }
            Ok(Some(Id::from_raw(raw)))
        }
        _ => Ok(None),
    }
}

/// Non-negative integer that may be left empty
pub fn optional_count(value: Option<FormValue>, field: &'static str) -> CatalogResult<Option<i32>> {
    match value {
        Some(v) if !v.is_blank() => {
            let raw = v.to_i64(field)?;
            i32::try_from(raw)
                .ok()
                .filter(|n| *n >= 0)
                .map(Some)
                .ok_or_else(|| invalid(field))
        }
        _ => Ok(None),
    }
}

/// `YYYY-MM-DD` date that may be left empty
///
/// A trailing time part (`2001-02-03T00:00:00Z`) is ignored.
pub fn optional_date(value: Option<String>, field: &'static str) -> CatalogResult<Option<NaiveDate>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    let date_part = value.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid(field))
}

/// Trimmed text, `None` when blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &'static str) -> CatalogResult<String> {
    non_blank(value).ok_or_else(|| CatalogError::Validation(message.to_string()))
}

// ============================================================================
// Book
// ============================================================================

/// Book as submitted by the admin form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub isbn13: Option<String>,
    pub author_id: Option<FormValue>,
    pub publisher_id: Option<FormValue>,
    pub publication_date: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<FormValue>,
    pub description: Option<String>,
}

/// Normalized book ready to insert or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub subtitle: String,
    pub isbn13: Option<String>,
    pub author_id: Option<AuthorId>,
    pub publisher_id: Option<PublisherId>,
    pub publication_date: Option<NaiveDate>,
    pub language: String,
    pub page_count: i32,
    pub description: String,
}

impl BookDraft {
    pub fn normalize(input: BookInput) -> CatalogResult<Self> {
        Ok(Self {
            title: required(input.title, "Title is required")?,
            subtitle: input.subtitle.unwrap_or_default(),
            isbn13: non_blank(input.isbn13),
            author_id: optional_id(input.author_id, "author_id")?,
            publisher_id: optional_id(input.publisher_id, "publisher_id")?,
            publication_date: optional_date(input.publication_date, "publication_date")?,
            language: non_blank(input.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            page_count: optional_count(input.page_count, "page_count")?.unwrap_or(0),
            description: input.description.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Author
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub nationality: Option<String>,
    pub website: Option<String>,
    pub portrait_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub website: Option<String>,
    pub portrait_url: Option<String>,
}

impl AuthorDraft {
    pub fn normalize(input: AuthorInput) -> CatalogResult<Self> {
        const MESSAGE: &str = "First name and last name are required";

        Ok(Self {
            first_name: required(input.first_name, MESSAGE)?,
            last_name: required(input.last_name, MESSAGE)?,
            bio: input.bio,
            birth_date: optional_date(input.birth_date, "birth_date")?,
            death_date: optional_date(input.death_date, "death_date")?,
            nationality: input.nationality,
            website: input.website,
            portrait_url: input.portrait_url,
        })
    }
}

// ============================================================================
// Publisher
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublisherInput {
    pub name: Option<String>,
    pub country: Option<String>,
    pub founded_year: Option<FormValue>,
    pub headquarters_city: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherDraft {
    pub name: String,
    pub country: Option<String>,
    pub founded_year: Option<i32>,
    pub headquarters_city: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

impl PublisherDraft {
    pub fn normalize(input: PublisherInput) -> CatalogResult<Self> {
        Ok(Self {
            name: required(input.name, "Name is required")?,
            country: input.country,
            founded_year: optional_count(input.founded_year, "founded_year")?,
            headquarters_city: input.headquarters_city,
            website: input.website,
            contact_email: input.contact_email,
            phone: input.phone,
        })
    }
}
