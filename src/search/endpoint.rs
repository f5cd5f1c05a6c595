use super::{PlaceRef, SearchKind, SearchRequest};
use serde_json::Value;

/// Primary search host; serves every vertical except webpage scraping.
pub const SEARCH_HOST: &str = "https://google.serper.dev";

/// Scrape host; takes the target URL in the body and has no sub-path.
pub const SCRAPE_HOST: &str = "https://scrape.serper.dev";

/// How a vertical's payload is shaped. Closed union, fixed at resolve time
/// and never reinterpreted afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{url, gl, hl}`: the query term is a URL.
    UrlBased,
    /// `{placeId|cid, gl, hl}`: the query term is a place identifier.
    IdBased(PlaceRef),
    /// `{q, num, gl, hl}` plus `location` when one is set.
    QueryBased,
}

/// Concrete routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub host: &'static str,
    pub path: &'static str,
    pub shape: PayloadShape,
}

impl EndpointSpec {
    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

/// Map a search kind to its endpoint and payload shape.
///
/// Pure and total: no I/O, no failure. The match is exhaustive over
/// [`SearchKind`], so a new vertical cannot be silently routed to the
/// organic endpoint.
pub fn resolve(kind: SearchKind, query: &str) -> EndpointSpec {
    let (host, path, shape) = match kind {
        SearchKind::Search => (SEARCH_HOST, "/search", PayloadShape::QueryBased),
        SearchKind::News => (SEARCH_HOST, "/news", PayloadShape::QueryBased),
        SearchKind::Images => (SEARCH_HOST, "/images", PayloadShape::QueryBased),
        SearchKind::Videos => (SEARCH_HOST, "/videos", PayloadShape::QueryBased),
        SearchKind::Places => (SEARCH_HOST, "/places", PayloadShape::QueryBased),
        SearchKind::Shopping => (SEARCH_HOST, "/shopping", PayloadShape::QueryBased),
        SearchKind::Scholar => (SEARCH_HOST, "/scholar", PayloadShape::QueryBased),
        SearchKind::Patents => (SEARCH_HOST, "/patents", PayloadShape::QueryBased),
        SearchKind::Autocomplete => (SEARCH_HOST, "/autocomplete", PayloadShape::QueryBased),
        SearchKind::Reviews => (
            SEARCH_HOST,
            "/reviews",
            PayloadShape::IdBased(PlaceRef::infer(query)),
        ),
        SearchKind::Lens => (SEARCH_HOST, "/lens", PayloadShape::UrlBased),
        SearchKind::Webpage => (SCRAPE_HOST, "", PayloadShape::UrlBased),
    };

    EndpointSpec { host, path, shape }
}

/// Build the JSON body for a request against a resolved endpoint.
///
/// Every payload carries `gl` and `hl`. All parameters travel in the body;
/// no query-string parameters are used.
pub fn build_payload(spec: &EndpointSpec, req: &SearchRequest) -> Value {
    let mut body = serde_json::Map::new();

    match &spec.shape {
        PayloadShape::UrlBased => {
            body.insert("url".into(), Value::String(req.query.clone()));
        }
        PayloadShape::IdBased(place) => {
            body.insert(place.field().into(), Value::String(place.value().to_string()));
        }
        PayloadShape::QueryBased => {
            body.insert("q".into(), Value::String(req.query.clone()));
            body.insert("num".into(), Value::from(req.num));
            if let Some(location) = req.locale.effective_location() {
                body.insert("location".into(), Value::String(location.to_string()));
            }
        }
    }

    body.insert("gl".into(), Value::String(req.locale.gl.clone()));
    body.insert("hl".into(), Value::String(req.locale.hl.clone()));

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Locale;

    fn payload_keys(req: &SearchRequest) -> Vec<String> {
        let spec = resolve(req.kind, &req.query);
        let payload = build_payload(&spec, req);
        let mut keys: Vec<String> = payload.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn every_kind_resolves_to_a_host() {
        for kind in SearchKind::ALL {
            let spec = resolve(kind, "anything");
            assert!(!spec.host.is_empty(), "{kind} resolved to an empty host");
            assert!(spec.url().starts_with("https://"), "{kind} url malformed");
        }
    }

    #[test]
    fn webpage_targets_scrape_host_without_sub_path() {
        let spec = resolve(SearchKind::Webpage, "https://example.com");
        assert_eq!(spec.host, SCRAPE_HOST);
        assert_eq!(spec.path, "");
        assert_eq!(spec.url(), "https://scrape.serper.dev");
    }

    #[test]
    fn place_id_prefix_heuristic() {
        // The two identifier shapes the reviews endpoint accepts.
        let spec = resolve(SearchKind::Reviews, "ChIJN1t_tDeuEmsRUsoyG83frY4");
        assert_eq!(
            spec.shape,
            PayloadShape::IdBased(PlaceRef::PlaceId("ChIJN1t_tDeuEmsRUsoyG83frY4".into()))
        );

        let spec = resolve(SearchKind::Reviews, "112000000000000000000");
        assert_eq!(
            spec.shape,
            PayloadShape::IdBased(PlaceRef::Cid("112000000000000000000".into()))
        );
    }

    #[test]
    fn reviews_payload_carries_place_id_not_cid() {
        let req = SearchRequest::new(SearchKind::Reviews, "ChIJN1t_tDeuEmsRUsoyG83frY4");
        let payload = build_payload(&resolve(req.kind, &req.query), &req);
        assert!(payload.get("placeId").is_some());
        assert!(payload.get("cid").is_none());
    }

    #[test]
    fn reviews_payload_carries_cid_not_place_id() {
        let req = SearchRequest::new(SearchKind::Reviews, "112000000000000000000");
        let payload = build_payload(&resolve(req.kind, &req.query), &req);
        assert!(payload.get("cid").is_some());
        assert!(payload.get("placeId").is_none());
    }

    #[test]
    fn query_based_payload_has_exact_field_set() {
        let req = SearchRequest::new(SearchKind::News, "rust 1.80");
        assert_eq!(payload_keys(&req), ["gl", "hl", "num", "q"]);
    }

    #[test]
    fn url_based_payload_has_exact_field_set() {
        let req = SearchRequest::new(SearchKind::Lens, "https://example.com/cat.jpg");
        assert_eq!(payload_keys(&req), ["gl", "hl", "url"]);
    }

    #[test]
    fn location_included_only_when_specific() {
        let auto = SearchRequest::new(SearchKind::Search, "pizza")
            .with_locale(Locale::default().with_location("Auto"));
        assert_eq!(payload_keys(&auto), ["gl", "hl", "num", "q"]);

        let blank = SearchRequest::new(SearchKind::Search, "pizza")
            .with_locale(Locale::default().with_location(""));
        assert_eq!(payload_keys(&blank), ["gl", "hl", "num", "q"]);

        let boston = SearchRequest::new(SearchKind::Search, "pizza")
            .with_locale(Locale::default().with_location("Boston, MA"));
        let spec = resolve(boston.kind, &boston.query);
        let payload = build_payload(&spec, &boston);
        assert_eq!(payload["location"], "Boston, MA");
    }
}
