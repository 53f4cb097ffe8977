pub mod favorites;
pub mod history;
pub mod reviews;

pub use favorites::Favorites;
pub use history::{SearchHistory, HISTORY_CAPACITY};
pub use reviews::{AverageRating, ReviewFilter, ReviewSort, Reviews};
