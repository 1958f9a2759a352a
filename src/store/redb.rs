//! Persistent record store backed by a redb database file.
//!
//! Records are serialized as JSON documents, one table per collection.
//! Every operation runs in its own transaction, so single-record writes
//! are atomic and crash-safe; cross-record consistency is the relationship
//! layer's concern, not the store's. Operations are synchronous and short
//! (single B-tree accesses), so they run inline on the async executor.

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use crate::models::{Author, Book, Publication};
use crate::store::{RecordStore, StoreError, StoreResult};

// Table definitions
const BOOKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("books");
const AUTHORS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("authors");
const PUBLICATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("publications");

macro_rules! impl_backend_error {
    ($($err:ty),* $(,)?) => {
        $(impl From<$err> for StoreError {
            fn from(e: $err) -> Self {
                StoreError::Backend(e.to_string())
            }
        })*
    };
}

impl_backend_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// redb-backed implementation of [`RecordStore`].
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Creates or opens a record store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        let db = Database::create(path)?;

        // Initialize tables so read transactions never see a missing table
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(BOOKS_TABLE)?;
            write_txn.open_table(AUTHORS_TABLE)?;
            write_txn.open_table(PUBLICATIONS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

#[async_trait]
impl RecordStore for RedbStore {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKS_TABLE)?;
        let mut books = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            books.push(serde_json::from_slice(value.value())?);
        }
        Ok(books)
    }

    async fn find_book(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKS_TABLE)?;
        table
            .get(isbn)?
            .map(|guard| serde_json::from_slice(guard.value()).map_err(StoreError::from))
            .transpose()
    }

    async fn find_book_by_category(&self, category: &str) -> StoreResult<Option<Book>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKS_TABLE)?;
        for entry in table.iter()? {
            let (_, value) = entry?;
            let book: Book = serde_json::from_slice(value.value())?;
            if book.category == category {
                return Ok(Some(book));
            }
        }
        Ok(None)
    }

    async fn create_book(&self, book: Book) -> StoreResult<Book> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(BOOKS_TABLE)?;
            if table.get(book.isbn.as_str())?.is_some() {
                return Err(StoreError::Duplicate(book.isbn));
            }
            let bytes = serde_json::to_vec(&book)?;
            table.insert(book.isbn.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> StoreResult<Book> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(BOOKS_TABLE)?;
            if table.get(book.isbn.as_str())?.is_none() {
                return Err(StoreError::NotFound(book.isbn.clone()));
            }
            let bytes = serde_json::to_vec(book)?;
            table.insert(book.isbn.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(book.clone())
    }

    async fn delete_book(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(BOOKS_TABLE)?;
            let removed = table
                .remove(isbn)?
                .map(|guard| serde_json::from_slice(guard.value()).map_err(StoreError::from))
                .transpose()?;
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUTHORS_TABLE)?;
        let mut authors = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            authors.push(serde_json::from_slice(value.value())?);
        }
        Ok(authors)
    }

    async fn find_author(&self, id: u64) -> StoreResult<Option<Author>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUTHORS_TABLE)?;
        table
            .get(id)?
            .map(|guard| serde_json::from_slice(guard.value()).map_err(StoreError::from))
            .transpose()
    }

    async fn find_authors_by_book(&self, isbn: &str) -> StoreResult<Vec<Author>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUTHORS_TABLE)?;
        let mut authors = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let author: Author = serde_json::from_slice(value.value())?;
            if author.books.iter().any(|b| b == isbn) {
                authors.push(author);
            }
        }
        Ok(authors)
    }

    async fn create_author(&self, author: Author) -> StoreResult<Author> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(AUTHORS_TABLE)?;
            if table.get(author.id)?.is_some() {
                return Err(StoreError::Duplicate(author.id.to_string()));
            }
            let bytes = serde_json::to_vec(&author)?;
            table.insert(author.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(author)
    }

    async fn update_author(&self, author: &Author) -> StoreResult<Author> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(AUTHORS_TABLE)?;
            if table.get(author.id)?.is_none() {
                return Err(StoreError::NotFound(author.id.to_string()));
            }
            let bytes = serde_json::to_vec(author)?;
            table.insert(author.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(author.clone())
    }

    async fn list_publications(&self) -> StoreResult<Vec<Publication>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PUBLICATIONS_TABLE)?;
        let mut publications = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            publications.push(serde_json::from_slice(value.value())?);
        }
        Ok(publications)
    }

    async fn find_publication(&self, id: u64) -> StoreResult<Option<Publication>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PUBLICATIONS_TABLE)?;
        table
            .get(id)?
            .map(|guard| serde_json::from_slice(guard.value()).map_err(StoreError::from))
            .transpose()
    }

    async fn create_publication(&self, publication: Publication) -> StoreResult<Publication> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PUBLICATIONS_TABLE)?;
            if table.get(publication.id)?.is_some() {
                return Err(StoreError::Duplicate(publication.id.to_string()));
            }
            let bytes = serde_json::to_vec(&publication)?;
            table.insert(publication.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(publication)
    }

    async fn update_publication(&self, publication: &Publication) -> StoreResult<Publication> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PUBLICATIONS_TABLE)?;
            if table.get(publication.id)?.is_none() {
                return Err(StoreError::NotFound(publication.id.to_string()));
            }
            let bytes = serde_json::to_vec(publication)?;
            table.insert(publication.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(publication.clone())
    }
}
