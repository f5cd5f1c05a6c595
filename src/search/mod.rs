pub mod client;
pub mod endpoint;
pub mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location sentinel meaning "let the provider choose".
pub const AUTO_LOCATION: &str = "Auto";

/// Result-count policy bounds. These are our own limits, not an API mandate.
pub const MIN_RESULTS: u32 = 10;
pub const MAX_RESULTS: u32 = 100;
pub const DEFAULT_RESULTS: u32 = 20;

/// The supported search verticals.
///
/// This enum is closed on purpose: every kind maps to exactly one endpoint
/// and payload shape in [`endpoint::resolve`], so adding a vertical without
/// wiring it there is a compile error rather than a silent reroute to
/// organic search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Organic web search
    Search,
    News,
    Images,
    Videos,
    /// Places / maps
    Places,
    Shopping,
    Scholar,
    Patents,
    /// Reviews for a single place, looked up by place ID or CID
    Reviews,
    /// Query suggestions
    Autocomplete,
    /// Reverse-image lookup
    Lens,
    /// Webpage scraping (distinct host)
    Webpage,
}

impl SearchKind {
    pub const ALL: [SearchKind; 12] = [
        SearchKind::Search,
        SearchKind::News,
        SearchKind::Images,
        SearchKind::Videos,
        SearchKind::Places,
        SearchKind::Shopping,
        SearchKind::Scholar,
        SearchKind::Patents,
        SearchKind::Reviews,
        SearchKind::Autocomplete,
        SearchKind::Lens,
        SearchKind::Webpage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Search => "search",
            SearchKind::News => "news",
            SearchKind::Images => "images",
            SearchKind::Videos => "videos",
            SearchKind::Places => "places",
            SearchKind::Shopping => "shopping",
            SearchKind::Scholar => "scholar",
            SearchKind::Patents => "patents",
            SearchKind::Reviews => "reviews",
            SearchKind::Autocomplete => "autocomplete",
            SearchKind::Lens => "lens",
            SearchKind::Webpage => "webpage",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "search" | "organic" => Ok(SearchKind::Search),
            "news" => Ok(SearchKind::News),
            "images" | "image" => Ok(SearchKind::Images),
            "videos" | "video" => Ok(SearchKind::Videos),
            "places" | "maps" => Ok(SearchKind::Places),
            "shopping" => Ok(SearchKind::Shopping),
            "scholar" => Ok(SearchKind::Scholar),
            "patents" => Ok(SearchKind::Patents),
            "reviews" => Ok(SearchKind::Reviews),
            "autocomplete" | "suggest" => Ok(SearchKind::Autocomplete),
            "lens" | "reverse-image" => Ok(SearchKind::Lens),
            "webpage" | "scrape" => Ok(SearchKind::Webpage),
            other => Err(format!("unknown search vertical: {other}")),
        }
    }
}

/// Localization parameters shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    /// Two-letter country code (gl)
    pub gl: String,
    /// Two-letter language code (hl)
    pub hl: String,
    /// Free-text location, e.g. "Boston, MA"
    pub location: Option<String>,
}

impl Locale {
    pub fn new(gl: impl Into<String>, hl: impl Into<String>) -> Self {
        Self {
            gl: gl.into(),
            hl: hl.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Location to send with the request, if any.
    ///
    /// Empty strings and the [`AUTO_LOCATION`] sentinel mean "let the
    /// provider choose" and are omitted from the payload entirely rather
    /// than sent as blanks.
    pub fn effective_location(&self) -> Option<&str> {
        match self.location.as_deref() {
            Some(loc) if loc.trim().is_empty() || loc == AUTO_LOCATION => None,
            other => other,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("us", "en")
    }
}

/// Place identifier for a reviews lookup.
///
/// Serper accepts either a Google place ID or a CID; the two travel in
/// different payload fields and are never interchangeable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceRef {
    PlaceId(String),
    Cid(String),
}

impl PlaceRef {
    /// Classify a bare identifier by its shape.
    ///
    /// Place IDs in the wild start with "ChIJ"; checking only the first two
    /// characters matches the upstream dashboard and is kept for
    /// compatibility. It is unreliable: any other "Ch"-prefixed string is
    /// misclassified as a place ID and the provider will most likely answer
    /// with an empty reviews section. Callers that know which identifier
    /// they hold should construct the variant directly.
    pub fn infer(term: &str) -> Self {
        if term.starts_with("Ch") {
            PlaceRef::PlaceId(term.to_string())
        } else {
            PlaceRef::Cid(term.to_string())
        }
    }

    /// Payload field this identifier travels in.
    pub fn field(&self) -> &'static str {
        match self {
            PlaceRef::PlaceId(_) => "placeId",
            PlaceRef::Cid(_) => "cid",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PlaceRef::PlaceId(v) | PlaceRef::Cid(v) => v,
        }
    }
}

/// One unit of work for the dispatcher.
///
/// Built fresh per user action and discarded after producing a result. The
/// credential is not part of the request; it is held by the client as
/// read-only configuration.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub kind: SearchKind,
    /// Free-text query, URL (lens/webpage) or place identifier (reviews)
    pub query: String,
    pub locale: Locale,
    /// Maximum result count, clamped to [`MIN_RESULTS`]..=[`MAX_RESULTS`]
    pub num: u32,
}

impl SearchRequest {
    pub fn new(kind: SearchKind, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
            locale: Locale::default(),
            num: DEFAULT_RESULTS,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_num(mut self, num: u32) -> Self {
        self.num = num.clamp(MIN_RESULTS, MAX_RESULTS);
        self
    }
}

/// A flattened result record: field name to scalar value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Outcome of a successful dispatch.
///
/// `rows` being empty is a valid zero-result outcome, not an error; `raw`
/// always carries the full provider response for callers that need fields
/// the normalizer drops.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub raw: serde_json::Value,
    pub rows: Vec<Row>,
}

/// Search-related errors. All recoverable at the caller level.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("unauthorized: API key rejected (HTTP 401)")]
    Unauthorized,

    #[error("forbidden: API key invalid or out of credits (HTTP 403)")]
    Forbidden,

    #[error("API error (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_and_parse_round_trip() {
        for kind in SearchKind::ALL {
            let parsed: SearchKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("teleport".parse::<SearchKind>().is_err());
    }

    #[test]
    fn kind_aliases_parse() {
        assert_eq!("maps".parse::<SearchKind>(), Ok(SearchKind::Places));
        assert_eq!("scrape".parse::<SearchKind>(), Ok(SearchKind::Webpage));
        assert_eq!("reverse-image".parse::<SearchKind>(), Ok(SearchKind::Lens));
    }

    #[test]
    fn effective_location_filters_sentinel_and_blank() {
        let auto = Locale::default().with_location(AUTO_LOCATION);
        assert_eq!(auto.effective_location(), None);

        let blank = Locale::default().with_location("   ");
        assert_eq!(blank.effective_location(), None);

        let real = Locale::default().with_location("Boston, MA");
        assert_eq!(real.effective_location(), Some("Boston, MA"));

        assert_eq!(Locale::default().effective_location(), None);
    }

    #[test]
    fn result_count_clamped_to_policy_bounds() {
        assert_eq!(SearchRequest::new(SearchKind::Search, "q").with_num(5).num, 10);
        assert_eq!(SearchRequest::new(SearchKind::Search, "q").with_num(500).num, 100);
        assert_eq!(SearchRequest::new(SearchKind::Search, "q").with_num(42).num, 42);
    }

    #[test]
    fn place_ref_accessors() {
        let id = PlaceRef::PlaceId("ChIJx".into());
        assert_eq!(id.field(), "placeId");
        assert_eq!(id.value(), "ChIJx");

        let cid = PlaceRef::Cid("112".into());
        assert_eq!(cid.field(), "cid");
        assert_eq!(cid.value(), "112");
    }
}
