use serde::Deserialize;

use crate::app::Result;
use crate::domain::{Book, WorkDetail, UNKNOWN_AUTHOR};

/// Subjects kept per book, in source order.
pub const MAX_SUBJECTS: usize = 5;

/// Raw `search.json` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
}

/// One raw search document, as the API returns it. Every field is optional;
/// the normalizer decides which documents survive.
#[derive(Debug, Default, Deserialize)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub author_key: Vec<String>,
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub isbn: Vec<String>,
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub language: Vec<String>,
    pub number_of_pages_median: Option<u32>,
    pub ratings_average: Option<f64>,
    #[serde(default)]
    pub publish_date: Vec<String>,
}

/// Converts raw search documents into [`Book`]s, dropping invalid entries.
#[derive(Debug, Clone)]
pub struct Normalizer {
    covers_base: String,
}

impl Normalizer {
    pub fn new(covers_base: impl Into<String>) -> Self {
        Self {
            covers_base: covers_base.into(),
        }
    }

    /// Parse a raw `search.json` body and normalize its documents.
    pub fn parse_page(&self, body: &[u8]) -> Result<Vec<Book>> {
        let page: SearchPage = serde_json::from_slice(body)?;
        Ok(self.normalize(page.docs))
    }

    /// Parse a raw work-detail body. Best-effort: any parse failure is `None`.
    pub fn parse_detail(&self, body: &[u8]) -> Option<WorkDetail> {
        serde_json::from_slice(body).ok()
    }

    /// Normalize a batch, keeping the subsequence of valid documents in order.
    pub fn normalize(&self, docs: Vec<SearchDoc>) -> Vec<Book> {
        docs.into_iter()
            .filter_map(|doc| self.normalize_doc(doc))
            .collect()
    }

    /// Build a [`Book`] from one raw document.
    ///
    /// A document is dropped unless it has a key, a title, and at least one
    /// author signal (a name or an author key).
    pub fn normalize_doc(&self, doc: SearchDoc) -> Option<Book> {
        let key = doc.key?;
        let title = doc.title?;
        if doc.author_name.is_empty() && doc.author_key.is_empty() {
            return None;
        }

        let authors = if doc.author_name.is_empty() {
            vec![UNKNOWN_AUTHOR.to_string()]
        } else {
            doc.author_name
        };

        Some(Book {
            key,
            title,
            authors,
            first_publish_year: doc.first_publish_year,
            isbn: doc.isbn.into_iter().next(),
            cover_id: doc.cover_i,
            subjects: doc.subject.into_iter().take(MAX_SUBJECTS).collect(),
            publisher: doc.publisher.into_iter().next(),
            language: doc
                .language
                .into_iter()
                .next()
                .unwrap_or_else(|| "en".to_string()),
            page_count: doc.number_of_pages_median,
            external_rating: doc.ratings_average.map(round_rating),
            publish_date: doc.publish_date.into_iter().next(),
            cover_url: doc.cover_i.map(|id| self.cover_url(id)),
        })
    }

    fn cover_url(&self, cover_id: i64) -> String {
        format!("{}/{}-M.jpg", self.covers_base, cover_id)
    }
}

/// Round to one decimal, half away from zero.
fn round_rating(raw: f64) -> f64 {
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";

    const PAGE_SAMPLE: &str = r#"{
        "numFound": 3,
        "start": 0,
        "docs": [
            {
                "key": "/works/OL45883W",
                "title": "Dune",
                "author_name": ["Frank Herbert"],
                "author_key": ["OL79034A"],
                "first_publish_year": 1965,
                "isbn": ["9780441172719", "0441172717"],
                "cover_i": 11481354,
                "subject": ["Science fiction", "Desert planets", "Ecology", "Politics", "Religion", "Spice"],
                "publisher": ["Ace Books", "Chilton"],
                "language": ["eng", "fre"],
                "number_of_pages_median": 412,
                "ratings_average": 4.26666,
                "publish_date": ["1965", "1990"]
            },
            {
                "key": "/works/OL000001W",
                "author_name": ["Nobody"],
                "first_publish_year": 2001
            },
            {
                "key": "/works/OL000002W",
                "title": "Orphaned Work"
            }
        ]
    }"#;

    fn normalizer() -> Normalizer {
        Normalizer::new(COVERS_BASE)
    }

    #[test]
    fn test_page_keeps_only_valid_docs() {
        let books = normalizer().parse_page(PAGE_SAMPLE.as_bytes()).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn test_field_mapping() {
        let books = normalizer().parse_page(PAGE_SAMPLE.as_bytes()).unwrap();
        let book = &books[0];

        assert_eq!(book.key, "/works/OL45883W");
        assert_eq!(book.authors, vec!["Frank Herbert"]);
        assert_eq!(book.first_publish_year, Some(1965));
        assert_eq!(book.isbn.as_deref(), Some("9780441172719"));
        assert_eq!(book.publisher.as_deref(), Some("Ace Books"));
        assert_eq!(book.language, "eng");
        assert_eq!(book.page_count, Some(412));
        assert_eq!(book.publish_date.as_deref(), Some("1965"));
    }

    #[test]
    fn test_subjects_truncated_to_five() {
        let books = normalizer().parse_page(PAGE_SAMPLE.as_bytes()).unwrap();
        assert_eq!(books[0].subjects.len(), MAX_SUBJECTS);
        assert_eq!(books[0].subjects[0], "Science fiction");
        assert_eq!(books[0].subjects[4], "Religion");
    }

    #[test]
    fn test_rating_rounded_to_one_decimal() {
        let books = normalizer().parse_page(PAGE_SAMPLE.as_bytes()).unwrap();
        assert_eq!(books[0].external_rating, Some(4.3));
    }

    #[test]
    fn test_rating_rounds_half_up() {
        assert_eq!(round_rating(4.25), 4.3);
        assert_eq!(round_rating(4.24), 4.2);
        assert_eq!(round_rating(3.0), 3.0);
    }

    #[test]
    fn test_cover_url_from_cover_id() {
        let books = normalizer().parse_page(PAGE_SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            books[0].cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
        );
    }

    #[test]
    fn test_missing_title_dropped() {
        let doc = SearchDoc {
            key: Some("/works/OL1W".into()),
            author_name: vec!["Someone".into()],
            ..SearchDoc::default()
        };
        assert!(normalizer().normalize_doc(doc).is_none());
    }

    #[test]
    fn test_missing_author_signals_dropped() {
        let doc = SearchDoc {
            key: Some("/works/OL1W".into()),
            title: Some("Orphaned".into()),
            ..SearchDoc::default()
        };
        assert!(normalizer().normalize_doc(doc).is_none());
    }

    #[test]
    fn test_author_key_only_falls_back_to_placeholder() {
        let doc = SearchDoc {
            key: Some("/works/OL1W".into()),
            title: Some("Anonymous Work".into()),
            author_key: vec!["OL1A".into()],
            ..SearchDoc::default()
        };
        let book = normalizer().normalize_doc(doc).unwrap();
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR]);
    }

    #[test]
    fn test_defaults_for_sparse_doc() {
        let doc = SearchDoc {
            key: Some("/works/OL1W".into()),
            title: Some("Sparse".into()),
            author_name: vec!["Someone".into()],
            ..SearchDoc::default()
        };
        let book = normalizer().normalize_doc(doc).unwrap();
        assert_eq!(book.language, "en");
        assert!(book.subjects.is_empty());
        assert!(book.isbn.is_none());
        assert!(book.external_rating.is_none());
        assert!(book.cover_url.is_none());
    }

    #[test]
    fn test_order_preserved() {
        let docs = vec![
            SearchDoc {
                key: Some("/works/OL1W".into()),
                title: Some("First".into()),
                author_name: vec!["A".into()],
                ..SearchDoc::default()
            },
            SearchDoc {
                key: Some("/works/OL2W".into()),
                title: None,
                author_name: vec!["B".into()],
                ..SearchDoc::default()
            },
            SearchDoc {
                key: Some("/works/OL3W".into()),
                title: Some("Third".into()),
                author_name: vec!["C".into()],
                ..SearchDoc::default()
            },
        ];
        let books = normalizer().normalize(docs);
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
    }

    #[test]
    fn test_malformed_page_is_an_error() {
        assert!(normalizer().parse_page(b"<html>not json</html>").is_err());
    }

    #[test]
    fn test_empty_docs_page() {
        let books = normalizer().parse_page(br#"{"numFound": 0, "docs": []}"#).unwrap();
        assert!(books.is_empty());
    }
}
