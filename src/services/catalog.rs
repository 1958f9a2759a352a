//! Catalog service: lookups and single-collection CRUD

use std::sync::Arc;

use chrono::Utc;
use snowflaked::sync::Generator;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, CreateAuthor, CreateBook, CreatePublication, Publication},
    store::{RecordStore, StoreError},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    /// Snowflake generator for author and publication IDs
    ids: Arc<Generator>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            ids: Arc::new(Generator::new(0)),
        }
    }

    // Lookups. Absence is reported as `None`/empty, not as an error; the
    // handlers decide how to shape a miss.

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.store.list_books().await?)
    }

    pub async fn find_book(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.store.find_book(isbn).await?)
    }

    pub async fn find_book_by_category(&self, category: &str) -> AppResult<Option<Book>> {
        Ok(self.store.find_book_by_category(category).await?)
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        Ok(self.store.list_authors().await?)
    }

    pub async fn find_authors_by_book(&self, isbn: &str) -> AppResult<Vec<Author>> {
        Ok(self.store.find_authors_by_book(isbn).await?)
    }

    pub async fn list_publications(&self) -> AppResult<Vec<Publication>> {
        Ok(self.store.list_publications().await?)
    }

    /// Create a new book. The ISBN is client-supplied and must be unique.
    pub async fn create_book(&self, request: CreateBook) -> AppResult<Book> {
        let now = Utc::now();
        let book = Book {
            isbn: request.isbn,
            title: request.title,
            category: request.category,
            authors: Vec::new(),
            publication: None,
            created_at: now,
            updated_at: now,
        };

        match self.store.create_book(book).await {
            Ok(book) => Ok(book),
            Err(StoreError::Duplicate(isbn)) => Err(AppError::Conflict(format!(
                "A book with ISBN {isbn} already exists"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a new author with a generated ID.
    pub async fn create_author(&self, request: CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();
        let author = Author {
            id: self.ids.generate(),
            name: request.name,
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.create_author(author).await?)
    }

    /// Create a new publication with a generated ID.
    pub async fn create_publication(&self, request: CreatePublication) -> AppResult<Publication> {
        let now = Utc::now();
        let publication = Publication {
            id: self.ids.generate(),
            name: request.name,
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.create_publication(publication).await?)
    }

    /// Update a book's title.
    pub async fn update_book_title(&self, isbn: &str, title: String) -> AppResult<Book> {
        let mut book = self
            .store
            .find_book(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {isbn} not found")))?;

        book.title = title;
        book.updated_at = Utc::now();
        Ok(self.store.update_book(&book).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn create_book_request(isbn: &str) -> CreateBook {
        CreateBook {
            isbn: isbn.to_string(),
            title: "Title".to_string(),
            category: "fiction".to_string(),
        }
    }

    #[tokio::test]
    async fn create_book_rejects_duplicate_isbn() {
        let catalog = service();
        catalog.create_book(create_book_request("978-1")).await.unwrap();

        let err = catalog
            .create_book(create_book_request("978-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn created_authors_get_distinct_ids() {
        let catalog = service();
        let a = catalog
            .create_author(CreateAuthor { name: "A".to_string() })
            .await
            .unwrap();
        let b = catalog
            .create_author(CreateAuthor { name: "B".to_string() })
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(catalog.list_authors().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_title_touches_only_title() {
        let catalog = service();
        let created = catalog.create_book(create_book_request("978-1")).await.unwrap();

        let updated = catalog
            .update_book_title("978-1", "Renamed".to_string())
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_title_of_missing_book_fails() {
        let catalog = service();
        let err = catalog
            .update_book_title("978-9", "Renamed".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
