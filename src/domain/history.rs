use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which query parameter a search varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Title,
    Author,
    Subject,
    Isbn,
    Publisher,
}

impl SearchKind {
    /// The outbound query parameter name for this kind.
    pub fn query_param(self) -> &'static str {
        match self {
            SearchKind::Title => "title",
            SearchKind::Author => "author",
            SearchKind::Subject => "subject",
            SearchKind::Isbn => "isbn",
            SearchKind::Publisher => "publisher",
        }
    }
}

/// One past search, as kept by the history cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub query: String,
    pub kind: SearchKind,
    pub timestamp: DateTime<Utc>,
    pub results_count: usize,
}

impl SearchHistoryEntry {
    pub fn new(query: String, kind: SearchKind, results_count: usize) -> Self {
        Self {
            query,
            kind,
            timestamp: Utc::now(),
            results_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_names() {
        assert_eq!(SearchKind::Title.query_param(), "title");
        assert_eq!(SearchKind::Author.query_param(), "author");
        assert_eq!(SearchKind::Subject.query_param(), "subject");
        assert_eq!(SearchKind::Isbn.query_param(), "isbn");
        assert_eq!(SearchKind::Publisher.query_param(), "publisher");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SearchKind::Isbn).unwrap(), "\"isbn\"");
        let kind: SearchKind = serde_json::from_str("\"publisher\"").unwrap();
        assert_eq!(kind, SearchKind::Publisher);
    }
}
