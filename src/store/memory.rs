//! In-memory record store.
//!
//! Lock-free concurrent maps, one per collection. Non-persistent: all
//! records are lost when the process exits. Selected at startup with
//! `database.url = "memory"`.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::{Author, Book, Publication};
use crate::store::{RecordStore, StoreError, StoreResult};

/// In-memory implementation of [`RecordStore`].
///
/// Uses `DashMap` for thread-safe concurrent access without a global lock.
/// Key lookups are O(1); list and filter operations scan the collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: DashMap<String, Book>,
    authors: DashMap<u64, Author>,
    publications: DashMap<u64, Publication>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let mut books: Vec<Book> = self.books.iter().map(|e| e.value().clone()).collect();
        books.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        Ok(books)
    }

    async fn find_book(&self, isbn: &str) -> StoreResult<Option<Book>> {
        Ok(self.books.get(isbn).map(|e| e.value().clone()))
    }

    async fn find_book_by_category(&self, category: &str) -> StoreResult<Option<Book>> {
        let mut matches: Vec<Book> = self
            .books
            .iter()
            .filter(|e| e.value().category == category)
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        Ok(matches.into_iter().next())
    }

    async fn create_book(&self, book: Book) -> StoreResult<Book> {
        // Atomic entry API: no race between the duplicate check and the insert
        use dashmap::mapref::entry::Entry;
        match self.books.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(book.isbn)),
            Entry::Vacant(entry) => {
                entry.insert(book.clone());
                Ok(book)
            }
        }
    }

    async fn update_book(&self, book: &Book) -> StoreResult<Book> {
        match self.books.get_mut(&book.isbn) {
            Some(mut entry) => {
                *entry = book.clone();
                Ok(book.clone())
            }
            None => Err(StoreError::NotFound(book.isbn.clone())),
        }
    }

    async fn delete_book(&self, isbn: &str) -> StoreResult<Option<Book>> {
        Ok(self.books.remove(isbn).map(|(_, book)| book))
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.authors.iter().map(|e| e.value().clone()).collect();
        authors.sort_by_key(|a| a.id);
        Ok(authors)
    }

    async fn find_author(&self, id: u64) -> StoreResult<Option<Author>> {
        Ok(self.authors.get(&id).map(|e| e.value().clone()))
    }

    async fn find_authors_by_book(&self, isbn: &str) -> StoreResult<Vec<Author>> {
        let mut authors: Vec<Author> = self
            .authors
            .iter()
            .filter(|e| e.value().books.iter().any(|b| b == isbn))
            .map(|e| e.value().clone())
            .collect();
        authors.sort_by_key(|a| a.id);
        Ok(authors)
    }

    async fn create_author(&self, author: Author) -> StoreResult<Author> {
        use dashmap::mapref::entry::Entry;
        match self.authors.entry(author.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(author.id.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(author.clone());
                Ok(author)
            }
        }
    }

    async fn update_author(&self, author: &Author) -> StoreResult<Author> {
        match self.authors.get_mut(&author.id) {
            Some(mut entry) => {
                *entry = author.clone();
                Ok(author.clone())
            }
            None => Err(StoreError::NotFound(author.id.to_string())),
        }
    }

    async fn list_publications(&self) -> StoreResult<Vec<Publication>> {
        let mut publications: Vec<Publication> =
            self.publications.iter().map(|e| e.value().clone()).collect();
        publications.sort_by_key(|p| p.id);
        Ok(publications)
    }

    async fn find_publication(&self, id: u64) -> StoreResult<Option<Publication>> {
        Ok(self.publications.get(&id).map(|e| e.value().clone()))
    }

    async fn create_publication(&self, publication: Publication) -> StoreResult<Publication> {
        use dashmap::mapref::entry::Entry;
        match self.publications.entry(publication.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(publication.id.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(publication.clone());
                Ok(publication)
            }
        }
    }

    async fn update_publication(&self, publication: &Publication) -> StoreResult<Publication> {
        match self.publications.get_mut(&publication.id) {
            Some(mut entry) => {
                *entry = publication.clone();
                Ok(publication.clone())
            }
            None => Err(StoreError::NotFound(publication.id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(isbn: &str, category: &str) -> Book {
        let now = Utc::now();
        Book {
            isbn: isbn.to_string(),
            title: format!("Book {isbn}"),
            category: category.to_string(),
            authors: Vec::new(),
            publication: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn author(id: u64, books: &[&str]) -> Author {
        let now = Utc::now();
        Author {
            id,
            name: format!("Author {id}"),
            books: books.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_and_find_book() {
        let store = MemoryStore::new();
        store.create_book(book("978-1", "fiction")).await.unwrap();

        let found = store.find_book("978-1").await.unwrap().unwrap();
        assert_eq!(found.title, "Book 978-1");
        assert!(store.find_book("978-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_isbn_rejected() {
        let store = MemoryStore::new();
        store.create_book(book("978-1", "fiction")).await.unwrap();

        let err = store.create_book(book("978-1", "tech")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn list_books_sorted_by_isbn() {
        let store = MemoryStore::new();
        store.create_book(book("978-3", "fiction")).await.unwrap();
        store.create_book(book("978-1", "fiction")).await.unwrap();
        store.create_book(book("978-2", "fiction")).await.unwrap();

        let isbns: Vec<String> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.isbn)
            .collect();
        assert_eq!(isbns, vec!["978-1", "978-2", "978-3"]);
    }

    #[tokio::test]
    async fn find_book_by_category_first_match() {
        let store = MemoryStore::new();
        store.create_book(book("978-2", "tech")).await.unwrap();
        store.create_book(book("978-1", "tech")).await.unwrap();

        let found = store.find_book_by_category("tech").await.unwrap().unwrap();
        assert_eq!(found.isbn, "978-1");
        assert!(store
            .find_book_by_category("poetry")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_missing_book_fails() {
        let store = MemoryStore::new();
        let err = store.update_book(&book("978-9", "fiction")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_book_returns_removed_record() {
        let store = MemoryStore::new();
        store.create_book(book("978-1", "fiction")).await.unwrap();

        let removed = store.delete_book("978-1").await.unwrap();
        assert_eq!(removed.unwrap().isbn, "978-1");
        assert!(store.delete_book("978-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_authors_by_book_filters_on_back_reference() {
        let store = MemoryStore::new();
        store.create_author(author(1, &["978-1", "978-2"])).await.unwrap();
        store.create_author(author(2, &["978-2"])).await.unwrap();
        store.create_author(author(3, &[])).await.unwrap();

        let ids: Vec<u64> = store
            .find_authors_by_book("978-2")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(store.find_authors_by_book("978-9").await.unwrap().is_empty());
    }
}
