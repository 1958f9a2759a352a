//! Relationship maintenance between books, authors and publications.
//!
//! A book's forward references (`Book::authors`, `Book::publication`) and
//! the matching back-references (`Author::books`, `Publication::books`)
//! live in independently stored records, so every mutation here updates
//! both sides. The two writes are sequential store operations without a
//! rollback: a crash between them leaves a mismatched pair until
//! [`RelationsService::reconcile`] repairs it.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, Publication},
    store::RecordStore,
};

/// Summary of the repairs performed by a reconciliation pass
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ReconcileReport {
    /// Authors whose book set was rewritten
    pub authors_repaired: u64,
    /// Publications whose book set was rewritten
    pub publications_repaired: u64,
    /// Back-references added (forward reference had no counterpart)
    pub references_added: u64,
    /// Back-references removed (dangling or unmatched)
    pub references_removed: u64,
}

#[derive(Clone)]
pub struct RelationsService {
    store: Arc<dyn RecordStore>,
}

impl RelationsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn book_not_found(isbn: &str) -> AppError {
        AppError::NotFound(format!("Book with ISBN {isbn} not found"))
    }

    fn author_not_found(id: u64) -> AppError {
        AppError::NotFound(format!("Author with id {id} not found"))
    }

    /// Attach an author to a book, updating both sides idempotently.
    ///
    /// Both records are resolved before either is written: a missing book
    /// or author fails the whole operation with no partial mutation.
    pub async fn attach_author(&self, isbn: &str, author_id: u64) -> AppResult<(Book, Author)> {
        let mut book = self
            .store
            .find_book(isbn)
            .await?
            .ok_or_else(|| Self::book_not_found(isbn))?;
        let mut author = self
            .store
            .find_author(author_id)
            .await?
            .ok_or_else(|| Self::author_not_found(author_id))?;

        let now = Utc::now();
        if !book.authors.contains(&author_id) {
            book.authors.push(author_id);
            book.updated_at = now;
            book = self.store.update_book(&book).await?;
        }
        if !author.books.iter().any(|b| b == isbn) {
            author.books.push(isbn.to_string());
            author.updated_at = now;
            author = self.store.update_author(&author).await?;
        }

        Ok((book, author))
    }

    /// Attach a publication to a book.
    ///
    /// The book side holds a single publication reference: attaching a new
    /// publication replaces the previous one, and the displaced
    /// publication's back-reference is removed so the invariant holds for
    /// it too. The publication side is a set of ISBNs.
    pub async fn attach_publication(
        &self,
        isbn: &str,
        publication_id: u64,
    ) -> AppResult<(Book, Publication)> {
        let mut book = self
            .store
            .find_book(isbn)
            .await?
            .ok_or_else(|| Self::book_not_found(isbn))?;
        let mut publication = self
            .store
            .find_publication(publication_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Publication with id {publication_id} not found"))
            })?;

        let now = Utc::now();

        // Strip the displaced publication's back-reference first
        if let Some(previous_id) = book.publication.filter(|&id| id != publication_id) {
            if let Some(mut previous) = self.store.find_publication(previous_id).await? {
                if previous.books.iter().any(|b| b == isbn) {
                    previous.books.retain(|b| b != isbn);
                    previous.updated_at = now;
                    self.store.update_publication(&previous).await?;
                }
            }
        }

        if book.publication != Some(publication_id) {
            book.publication = Some(publication_id);
            book.updated_at = now;
            book = self.store.update_book(&book).await?;
        }
        if !publication.books.iter().any(|b| b == isbn) {
            publication.books.push(isbn.to_string());
            publication.updated_at = now;
            publication = self.store.update_publication(&publication).await?;
        }

        Ok((book, publication))
    }

    /// Detach an author from a book.
    ///
    /// Removing a reference that is already absent on either side is a
    /// no-op, not an error; a missing book or author record is.
    pub async fn detach_author(&self, isbn: &str, author_id: u64) -> AppResult<(Book, Author)> {
        let mut book = self
            .store
            .find_book(isbn)
            .await?
            .ok_or_else(|| Self::book_not_found(isbn))?;
        let mut author = self
            .store
            .find_author(author_id)
            .await?
            .ok_or_else(|| Self::author_not_found(author_id))?;

        let now = Utc::now();
        if book.authors.contains(&author_id) {
            book.authors.retain(|&id| id != author_id);
            book.updated_at = now;
            book = self.store.update_book(&book).await?;
        }
        if author.books.iter().any(|b| b == isbn) {
            author.books.retain(|b| b != isbn);
            author.updated_at = now;
            author = self.store.update_author(&author).await?;
        }

        Ok((book, author))
    }

    /// Delete a book record.
    ///
    /// Authors and publications are not cascade-deleted, and their
    /// back-references to the deleted ISBN are intentionally left in
    /// place; [`Self::reconcile`] removes them on demand.
    pub async fn delete_book(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .delete_book(isbn)
            .await?
            .ok_or_else(|| Self::book_not_found(isbn))
    }

    /// Repair every author and publication back-reference.
    ///
    /// The book records are authoritative. Back-reference sets are
    /// rewritten to exactly match the forward references found on books;
    /// dangling ISBNs are dropped and missing entries added.
    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let books = self.store.list_books().await?;

        let mut author_books: HashMap<u64, BTreeSet<String>> = HashMap::new();
        let mut publication_books: HashMap<u64, BTreeSet<String>> = HashMap::new();
        for book in &books {
            for &author_id in &book.authors {
                author_books
                    .entry(author_id)
                    .or_default()
                    .insert(book.isbn.clone());
            }
            if let Some(publication_id) = book.publication {
                publication_books
                    .entry(publication_id)
                    .or_default()
                    .insert(book.isbn.clone());
            }
        }

        let mut report = ReconcileReport::default();
        let now = Utc::now();

        for mut author in self.store.list_authors().await? {
            let expected = author_books.remove(&author.id).unwrap_or_default();
            let current: BTreeSet<String> = author.books.iter().cloned().collect();
            if current == expected {
                continue;
            }

            report.references_added += expected.difference(&current).count() as u64;
            report.references_removed += current.difference(&expected).count() as u64;

            // Keep the author's existing ordering for surviving entries
            author.books.retain(|b| expected.contains(b));
            for isbn in &expected {
                if !author.books.contains(isbn) {
                    author.books.push(isbn.clone());
                }
            }
            author.updated_at = now;
            self.store.update_author(&author).await?;
            report.authors_repaired += 1;
        }

        for mut publication in self.store.list_publications().await? {
            let expected = publication_books.remove(&publication.id).unwrap_or_default();
            let current: BTreeSet<String> = publication.books.iter().cloned().collect();
            if current == expected {
                continue;
            }

            report.references_added += expected.difference(&current).count() as u64;
            report.references_removed += current.difference(&expected).count() as u64;

            publication.books.retain(|b| expected.contains(b));
            for isbn in &expected {
                if !publication.books.contains(isbn) {
                    publication.books.push(isbn.clone());
                }
            }
            publication.updated_at = now;
            self.store.update_publication(&publication).await?;
            report.publications_repaired += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{MockRecordStore, StoreError};

    fn book(isbn: &str) -> Book {
        let now = Utc::now();
        Book {
            isbn: isbn.to_string(),
            title: "X".to_string(),
            category: "fiction".to_string(),
            authors: Vec::new(),
            publication: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn author(id: u64) -> Author {
        let now = Utc::now();
        Author {
            id,
            name: "A".to_string(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn publication(id: u64) -> Publication {
        let now = Utc::now();
        Publication {
            id,
            name: "P".to_string(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.create_book(book("978-1")).await.unwrap();
        store.create_author(author(1)).await.unwrap();
        store.create_publication(publication(10)).await.unwrap();
        store.create_publication(publication(11)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn attach_author_updates_both_sides() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        let (book, author) = relations.attach_author("978-1", 1).await.unwrap();

        assert_eq!(book.authors, vec![1]);
        assert_eq!(author.books, vec!["978-1"]);

        // and the stored records agree
        assert_eq!(store.find_book("978-1").await.unwrap().unwrap().authors, vec![1]);
        assert_eq!(
            store.find_author(1).await.unwrap().unwrap().books,
            vec!["978-1"]
        );
    }

    #[tokio::test]
    async fn attach_author_is_idempotent() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_author("978-1", 1).await.unwrap();
        let (book, author) = relations.attach_author("978-1", 1).await.unwrap();

        assert_eq!(book.authors, vec![1]);
        assert_eq!(author.books, vec!["978-1"]);
    }

    #[tokio::test]
    async fn attach_author_missing_book_mutates_nothing() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        let err = relations.attach_author("does-not-exist", 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(store.find_author(1).await.unwrap().unwrap().books.is_empty());
    }

    #[tokio::test]
    async fn attach_author_missing_author_mutates_nothing() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        let err = relations.attach_author("978-1", 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(store.find_book("978-1").await.unwrap().unwrap().authors.is_empty());
    }

    #[tokio::test]
    async fn detach_then_attach_restores_state() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_author("978-1", 1).await.unwrap();
        relations.detach_author("978-1", 1).await.unwrap();

        let book = store.find_book("978-1").await.unwrap().unwrap();
        let author = store.find_author(1).await.unwrap().unwrap();
        assert!(book.authors.is_empty());
        assert!(author.books.is_empty());

        let (book, author) = relations.attach_author("978-1", 1).await.unwrap();
        assert_eq!(book.authors, vec![1]);
        assert_eq!(author.books, vec!["978-1"]);
    }

    #[tokio::test]
    async fn detach_absent_reference_is_a_noop() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store);

        let (book, author) = relations.detach_author("978-1", 1).await.unwrap();
        assert!(book.authors.is_empty());
        assert!(author.books.is_empty());
    }

    #[tokio::test]
    async fn detach_missing_record_is_not_found() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store);

        let err = relations.detach_author("978-9", 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn attach_publication_replaces_previous_reference() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_publication("978-1", 10).await.unwrap();
        let (book, publication) = relations.attach_publication("978-1", 11).await.unwrap();

        assert_eq!(book.publication, Some(11));
        assert_eq!(publication.books, vec!["978-1"]);

        // the displaced publication no longer references the book
        let previous = store.find_publication(10).await.unwrap().unwrap();
        assert!(previous.books.is_empty());
    }

    #[tokio::test]
    async fn attach_publication_is_idempotent() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_publication("978-1", 10).await.unwrap();
        let (book, publication) = relations.attach_publication("978-1", 10).await.unwrap();

        assert_eq!(book.publication, Some(10));
        assert_eq!(publication.books, vec!["978-1"]);
    }

    #[tokio::test]
    async fn delete_book_leaves_back_references_dangling() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_author("978-1", 1).await.unwrap();
        relations.delete_book("978-1").await.unwrap();

        assert!(store.find_book("978-1").await.unwrap().is_none());
        // documented limitation: the author still references the dead ISBN
        assert_eq!(
            store.find_author(1).await.unwrap().unwrap().books,
            vec!["978-1"]
        );
    }

    #[tokio::test]
    async fn delete_missing_book_is_not_found() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store);

        let err = relations.delete_book("978-9").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn reconcile_removes_dangling_back_references() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        relations.attach_author("978-1", 1).await.unwrap();
        relations.attach_publication("978-1", 10).await.unwrap();
        relations.delete_book("978-1").await.unwrap();

        let report = relations.reconcile().await.unwrap();

        assert_eq!(report.authors_repaired, 1);
        assert_eq!(report.publications_repaired, 1);
        assert_eq!(report.references_removed, 2);
        assert_eq!(report.references_added, 0);
        assert!(store.find_author(1).await.unwrap().unwrap().books.is_empty());
        assert!(store
            .find_publication(10)
            .await
            .unwrap()
            .unwrap()
            .books
            .is_empty());
    }

    #[tokio::test]
    async fn reconcile_adds_missing_back_references() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store.clone());

        // Simulate a crash after the book-side write: forward reference
        // present, back-reference missing.
        let mut orphaned = store.find_book("978-1").await.unwrap().unwrap();
        orphaned.authors.push(1);
        store.update_book(&orphaned).await.unwrap();

        let report = relations.reconcile().await.unwrap();

        assert_eq!(report.authors_repaired, 1);
        assert_eq!(report.references_added, 1);
        assert_eq!(
            store.find_author(1).await.unwrap().unwrap().books,
            vec!["978-1"]
        );
    }

    #[tokio::test]
    async fn reconcile_on_consistent_catalog_reports_nothing() {
        let store = seeded_store().await;
        let relations = RelationsService::new(store);

        relations.attach_author("978-1", 1).await.unwrap();
        let report = relations.reconcile().await.unwrap();

        assert_eq!(report.authors_repaired, 0);
        assert_eq!(report.publications_repaired, 0);
        assert_eq!(report.references_added, 0);
        assert_eq!(report.references_removed, 0);
    }

    #[tokio::test]
    async fn attach_author_never_writes_when_lookup_fails() {
        let mut store = MockRecordStore::new();
        store.expect_find_book().returning(|_| Ok(None));
        store.expect_find_author().never();
        store.expect_update_book().never();
        store.expect_update_author().never();

        let relations = RelationsService::new(Arc::new(store));
        let err = relations.attach_author("978-1", 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn attach_author_surfaces_second_write_failure() {
        // Best-effort sequential writes: the book side lands, the author
        // side fails, and the error propagates without a rollback.
        let mut store = MockRecordStore::new();
        store
            .expect_find_book()
            .returning(|isbn| Ok(Some(book(isbn))));
        store.expect_find_author().returning(|id| Ok(Some(author(id))));
        store
            .expect_update_book()
            .times(1)
            .returning(|b| Ok(b.clone()));
        store
            .expect_update_author()
            .times(1)
            .returning(|_| Err(StoreError::Backend("write failed".to_string())));

        let relations = RelationsService::new(Arc::new(store));
        let err = relations.attach_author("978-1", 1).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(StoreError::Backend(_))));
    }
}
