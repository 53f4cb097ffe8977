use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when a search document carries author keys but no names.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A normalized catalog entry.
///
/// Built from a raw search document by the [`Normalizer`](crate::normalizer::Normalizer);
/// also the payload persisted for favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// OpenLibrary work key, e.g. `/works/OL45883W`.
    pub key: String,
    pub title: String,
    /// Never empty; falls back to [`UNKNOWN_AUTHOR`].
    pub authors: Vec<String>,
    pub first_publish_year: Option<i32>,
    pub isbn: Option<String>,
    pub cover_id: Option<i64>,
    /// At most the first five subjects of the source document.
    pub subjects: Vec<String>,
    pub publisher: Option<String>,
    pub language: String,
    pub page_count: Option<u32>,
    /// Community rating, rounded to one decimal.
    pub external_rating: Option<f64>,
    pub publish_date: Option<String>,
    /// Medium-size cover image URL, present iff `cover_id` is.
    pub cover_url: Option<String>,
}

impl Book {
    pub fn primary_author(&self) -> &str {
        self.authors
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn display_authors(&self) -> String {
        self.authors.join(", ")
    }

    /// Large-size variant of the cover URL, for detail views.
    pub fn large_cover_url(&self) -> Option<String> {
        self.cover_url
            .as_ref()
            .map(|url| url.replace("-M.jpg", "-L.jpg"))
    }
}

/// Best-effort extra data fetched per work.
///
/// The upstream `description` field is either a bare string or a
/// `{"type": ..., "value": ...}` object; both decode to a plain string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkDetail {
    #[serde(default, deserialize_with = "text_or_value")]
    pub description: Option<String>,
}

fn text_or_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Plain(String),
        Typed { value: String },
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Plain(value) | Text::Typed { value } => value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            key: "/works/OL45883W".into(),
            title: "Dune".into(),
            authors: vec!["Frank Herbert".into()],
            first_publish_year: Some(1965),
            isbn: Some("9780441172719".into()),
            cover_id: Some(11481354),
            subjects: vec!["Science fiction".into()],
            publisher: Some("Ace Books".into()),
            language: "en".into(),
            page_count: Some(412),
            external_rating: Some(4.2),
            publish_date: Some("1965".into()),
            cover_url: Some("https://covers.openlibrary.org/b/id/11481354-M.jpg".into()),
        }
    }

    #[test]
    fn test_large_cover_url_swaps_size() {
        let book = sample_book();
        assert_eq!(
            book.large_cover_url().unwrap(),
            "https://covers.openlibrary.org/b/id/11481354-L.jpg"
        );
    }

    #[test]
    fn test_large_cover_url_absent_without_cover() {
        let mut book = sample_book();
        book.cover_id = None;
        book.cover_url = None;
        assert!(book.large_cover_url().is_none());
    }

    #[test]
    fn test_primary_author() {
        let mut book = sample_book();
        assert_eq!(book.primary_author(), "Frank Herbert");
        book.authors.clear();
        assert_eq!(book.primary_author(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_display_authors_joins_names() {
        let mut book = sample_book();
        book.authors.push("Brian Herbert".into());
        assert_eq!(book.display_authors(), "Frank Herbert, Brian Herbert");
    }

    #[test]
    fn test_detail_description_plain_string() {
        let detail: WorkDetail =
            serde_json::from_str(r#"{"description": "A desert planet."}"#).unwrap();
        assert_eq!(detail.description.as_deref(), Some("A desert planet."));
    }

    #[test]
    fn test_detail_description_typed_object() {
        let detail: WorkDetail = serde_json::from_str(
            r#"{"description": {"type": "/type/text", "value": "A desert planet."}}"#,
        )
        .unwrap();
        assert_eq!(detail.description.as_deref(), Some("A desert planet."));
    }

    #[test]
    fn test_detail_description_missing() {
        let detail: WorkDetail = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert!(detail.description.is_none());
    }

    #[test]
    fn test_book_roundtrips_through_json() {
        let book = sample_book();
        let encoded = serde_json::to_string(&book).unwrap();
        let decoded: Book = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, book);
    }
}
