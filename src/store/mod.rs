//! Record store layer: per-collection CRUD over books, authors and publications

pub mod memory;
pub mod redb;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::{Author, Book, Publication};

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found (update/delete target missing)
    #[error("record not found: {0}")]
    NotFound(String),

    /// Unique key already taken
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (I/O, corruption, transaction error)
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract record store over the three catalog collections.
///
/// Implementations must be thread-safe (Send + Sync) and support async
/// operations. Find operations return `Ok(None)` when nothing matches, so
/// callers can tell an absent record from a backend failure; update
/// operations fail with [`StoreError::NotFound`] when the target record
/// does not exist. List operations return records in key order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    // Book operations

    /// Lists all books.
    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    /// Finds a book by ISBN.
    async fn find_book(&self, isbn: &str) -> StoreResult<Option<Book>>;

    /// Finds the first book matching a category.
    async fn find_book_by_category(&self, category: &str) -> StoreResult<Option<Book>>;

    /// Inserts a new book. Fails with [`StoreError::Duplicate`] when the
    /// ISBN is already taken.
    async fn create_book(&self, book: Book) -> StoreResult<Book>;

    /// Replaces the stored record for `book.isbn`.
    async fn update_book(&self, book: &Book) -> StoreResult<Book>;

    /// Removes a book, returning the removed record, or `None` if absent.
    async fn delete_book(&self, isbn: &str) -> StoreResult<Option<Book>>;

    // Author operations

    /// Lists all authors.
    async fn list_authors(&self) -> StoreResult<Vec<Author>>;

    /// Finds an author by ID.
    async fn find_author(&self, id: u64) -> StoreResult<Option<Author>>;

    /// Lists the authors whose book set contains the given ISBN.
    async fn find_authors_by_book(&self, isbn: &str) -> StoreResult<Vec<Author>>;

    /// Inserts a new author. Fails with [`StoreError::Duplicate`] when the
    /// ID is already taken.
    async fn create_author(&self, author: Author) -> StoreResult<Author>;

    /// Replaces the stored record for `author.id`.
    async fn update_author(&self, author: &Author) -> StoreResult<Author>;

    // Publication operations

    /// Lists all publications.
    async fn list_publications(&self) -> StoreResult<Vec<Publication>>;

    /// Finds a publication by ID.
    async fn find_publication(&self, id: u64) -> StoreResult<Option<Publication>>;

    /// Inserts a new publication. Fails with [`StoreError::Duplicate`] when
    /// the ID is already taken.
    async fn create_publication(&self, publication: Publication) -> StoreResult<Publication>;

    /// Replaces the stored record for `publication.id`.
    async fn update_publication(&self, publication: &Publication) -> StoreResult<Publication>;
}
