//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.
//!
//! `find_by_id` returns `Ok(None)` for an unknown identity; translating
//! absence into a reportable not-found condition is the caller's job.
//! `update` pins the identity to its `id` argument — a draft never carries
//! an identity of its own.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::entities::{Author, Book, BookInstance, Genre, Status};
use super::DomainError;

/// Sanitized, not-yet-persisted author record built from form input.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreDraft {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDraft {
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceDraft {
    pub book_id: i32,
    pub imprint: String,
    pub status: Status,
    pub due_back: Option<NaiveDate>,
}

/// Repository trait for the Author collection
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors, sorted by family name
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    /// Find an author by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError>;

    /// Number of authors in the catalog
    async fn count(&self) -> Result<u64, DomainError>;

    /// Create a new author
    async fn create(&self, draft: AuthorDraft) -> Result<Author, DomainError>;

    /// Replace an author record; the identity stays `id`
    async fn update(&self, id: i32, draft: AuthorDraft) -> Result<Author, DomainError>;

    /// Delete an author by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for the Genre collection
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres, sorted by name
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    /// Find a genre by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError>;

    /// Lookup by natural key, for the opportunistic uniqueness check
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError>;

    /// Number of genres in the catalog
    async fn count(&self) -> Result<u64, DomainError>;

    /// Create a new genre
    async fn create(&self, draft: GenreDraft) -> Result<Genre, DomainError>;

    /// Replace a genre record; the identity stays `id`
    async fn update(&self, id: i32, draft: GenreDraft) -> Result<Genre, DomainError>;

    /// Delete a genre by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for the Book collection
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books sorted by title, each with its author populated
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// A single book with author and genres populated
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Books referencing the given author (unpopulated)
    async fn find_by_author(&self, author_id: i32) -> Result<Vec<Book>, DomainError>;

    /// Books referencing the given genre (unpopulated)
    async fn find_by_genre(&self, genre_id: i32) -> Result<Vec<Book>, DomainError>;

    /// Number of books in the catalog
    async fn count(&self) -> Result<u64, DomainError>;

    /// Create a new book along with its genre links
    async fn create(&self, draft: BookDraft) -> Result<Book, DomainError>;

    /// Replace a book record and its genre link set; the identity stays `id`
    async fn update(&self, id: i32, draft: BookDraft) -> Result<Book, DomainError>;

    /// Delete a book and its genre links
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for the BookInstance collection
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// All copies, each with its book populated
    async fn find_all(&self) -> Result<Vec<BookInstance>, DomainError>;

    /// A single copy with its book populated
    async fn find_by_id(&self, id: i32) -> Result<Option<BookInstance>, DomainError>;

    /// Copies of the given book (unpopulated)
    async fn find_by_book(&self, book_id: i32) -> Result<Vec<BookInstance>, DomainError>;

    /// Number of copies in the catalog
    async fn count(&self) -> Result<u64, DomainError>;

    /// Number of copies currently available
    async fn count_available(&self) -> Result<u64, DomainError>;

    /// Create a new copy
    async fn create(&self, draft: BookInstanceDraft) -> Result<BookInstance, DomainError>;

    /// Replace a copy record; the identity stays `id`
    async fn update(&self, id: i32, draft: BookInstanceDraft)
        -> Result<BookInstance, DomainError>;

    /// Delete a copy by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
