use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;
use uuid::Uuid;

use crate::domain::Review;
use crate::store::JsonStore;

const BLOB: &str = "reviews";

/// Mean rating for one book, keeping the unrated case distinct from a
/// rated 0.0 so callers never conflate the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageRating {
    NoReviews,
    /// Arithmetic mean of ratings, rounded to one decimal.
    Rated(f64),
}

impl AverageRating {
    pub fn value(self) -> Option<f64> {
        match self {
            AverageRating::NoReviews => None,
            AverageRating::Rated(mean) => Some(mean),
        }
    }
}

/// Orderings the review list view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    Newest,
    Oldest,
    Highest,
    Lowest,
    MostHelpful,
}

/// Subsets the review list view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFilter {
    All,
    /// Exact star rating.
    Stars(u8),
    Recommended,
}

/// User reviews across all books, newest-added first, persisted in full
/// after every mutation. Aggregates (count, mean, recommendation rate) are
/// recomputed per read.
pub struct Reviews {
    store: Arc<JsonStore>,
    reviews: Mutex<Vec<Review>>,
}

impl Reviews {
    /// Load the persisted reviews; a missing or corrupt blob starts empty.
    pub fn load(store: Arc<JsonStore>) -> Self {
        let reviews: Vec<Review> = store.load(BLOB);
        Self {
            store,
            reviews: Mutex::new(reviews),
        }
    }

    /// Prepend a review. Multiple reviews per user per book are allowed.
    pub fn add(&self, review: Review) {
        let mut reviews = self.lock();
        reviews.insert(0, review);
        self.persist(&reviews);
    }

    /// Remove the review with the given id. Returns false if absent.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut reviews = self.lock();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        let removed = reviews.len() < before;
        if removed {
            self.persist(&reviews);
        }
        removed
    }

    /// Bump the helpful counter of one review. Returns false if absent.
    pub fn mark_helpful(&self, id: Uuid) -> bool {
        let mut reviews = self.lock();
        let Some(review) = reviews.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        review.helpful += 1;
        self.persist(&reviews);
        true
    }

    /// All reviews for one book, in store order (newest-added first).
    pub fn for_book(&self, book_key: &str) -> Vec<Review> {
        self.lock()
            .iter()
            .filter(|r| r.book_key == book_key)
            .cloned()
            .collect()
    }

    pub fn count_for(&self, book_key: &str) -> usize {
        self.lock().iter().filter(|r| r.book_key == book_key).count()
    }

    /// Mean rating for one book, tagged so "unrated" stays distinct.
    pub fn average_rating(&self, book_key: &str) -> AverageRating {
        let reviews = self.lock();
        let ratings: Vec<u8> = reviews
            .iter()
            .filter(|r| r.book_key == book_key)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return AverageRating::NoReviews;
        }

        let mean = ratings.iter().map(|&r| r as f64).sum::<f64>() / ratings.len() as f64;
        AverageRating::Rated((mean * 10.0).round() / 10.0)
    }

    /// Percent of a book's reviewers who would recommend it, rounded.
    /// `None` when the book has no reviews.
    pub fn recommendation_percentage(&self, book_key: &str) -> Option<u32> {
        let reviews = self.lock();
        let (total, recommends) = reviews
            .iter()
            .filter(|r| r.book_key == book_key)
            .fold((0u32, 0u32), |(total, recommends), r| {
                (total + 1, recommends + r.would_recommend as u32)
            });
        if total == 0 {
            return None;
        }
        Some((recommends as f64 / total as f64 * 100.0).round() as u32)
    }

    /// One book's reviews, filtered then sorted for the list view.
    ///
    /// Non-mutating; the sort is stable, so ties keep store order.
    pub fn filtered(&self, book_key: &str, filter: ReviewFilter, sort: ReviewSort) -> Vec<Review> {
        let mut reviews = self.for_book(book_key);
        reviews.retain(|r| match filter {
            ReviewFilter::All => true,
            ReviewFilter::Stars(stars) => r.rating == stars,
            ReviewFilter::Recommended => r.would_recommend,
        });
        match sort {
            ReviewSort::Newest => reviews.sort_by(|a, b| b.date.cmp(&a.date)),
            ReviewSort::Oldest => reviews.sort_by(|a, b| a.date.cmp(&b.date)),
            ReviewSort::Highest => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ReviewSort::Lowest => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
            ReviewSort::MostHelpful => reviews.sort_by(|a, b| b.helpful.cmp(&a.helpful)),
        }
        reviews
    }

    pub fn all(&self) -> Vec<Review> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn persist(&self, reviews: &[Review]) {
        if let Err(e) = self.store.save(BLOB, reviews) {
            warn!(error = %e, "failed to persist reviews");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Review>> {
        self.reviews.lock().unwrap_or_else(|e| e.into_inner())
    }
}
