use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::domain::Book;
use crate::store::JsonStore;

const BLOB: &str = "favorites";

/// Unique-by-key set of favorited books, persisted in full after every
/// mutation.
pub struct Favorites {
    store: Arc<JsonStore>,
    books: Mutex<Vec<Book>>,
}

impl Favorites {
    /// Load the persisted set; a missing or corrupt blob starts empty.
    pub fn load(store: Arc<JsonStore>) -> Self {
        let books: Vec<Book> = store.load(BLOB);
        Self {
            store,
            books: Mutex::new(books),
        }
    }

    /// Add the book if absent, remove it if present. Returns the new
    /// membership, so toggling twice restores the original set.
    pub fn toggle(&self, book: &Book) -> bool {
        let mut books = self.lock();
        let favorited = if books.iter().any(|b| b.key == book.key) {
            books.retain(|b| b.key != book.key);
            false
        } else {
            books.push(book.clone());
            true
        };
        self.persist(&books);
        favorited
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().iter().any(|b| b.key == key)
    }

    pub fn all(&self) -> Vec<Book> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn persist(&self, books: &[Book]) {
        if let Err(e) = self.store.save(BLOB, books) {
            warn!(error = %e, "failed to persist favorites");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Book>> {
        self.books.lock().unwrap_or_else(|e| e.into_inner())
    }
}
