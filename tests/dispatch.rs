//! Dispatcher properties exercised through the public API: endpoint
//! resolution and payload shaping for every supported vertical, plus
//! normalization of representative provider responses.

use serde_json::json;
use serper_hub::search::endpoint::{build_payload, resolve, SCRAPE_HOST, SEARCH_HOST};
use serper_hub::search::normalize::normalize;
use serper_hub::search::{Locale, SearchKind, SearchRequest};

fn payload_keys(kind: SearchKind, query: &str) -> Vec<String> {
    let req = SearchRequest::new(kind, query);
    let spec = resolve(kind, query);
    let payload = build_payload(&spec, &req);
    let mut keys: Vec<String> = payload.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

#[test]
fn all_twelve_verticals_route_and_shape_as_documented() {
    // (kind, query, expected path, expected payload field set)
    let query_fields: &[&str] = &["gl", "hl", "num", "q"];
    let cases: &[(SearchKind, &str, &str, &[&str])] = &[
        (SearchKind::Search, "rust", "/search", query_fields),
        (SearchKind::News, "rust", "/news", query_fields),
        (SearchKind::Images, "rust", "/images", query_fields),
        (SearchKind::Videos, "rust", "/videos", query_fields),
        (SearchKind::Places, "coffee", "/places", query_fields),
        (SearchKind::Shopping, "laptop", "/shopping", query_fields),
        (SearchKind::Scholar, "crdt", "/scholar", query_fields),
        (SearchKind::Patents, "hinge", "/patents", query_fields),
        (SearchKind::Autocomplete, "ru", "/autocomplete", query_fields),
        (
            SearchKind::Reviews,
            "ChIJN1t_tDeuEmsRUsoyG83frY4",
            "/reviews",
            &["gl", "hl", "placeId"],
        ),
        (
            SearchKind::Lens,
            "https://example.com/cat.jpg",
            "/lens",
            &["gl", "hl", "url"],
        ),
        (
            SearchKind::Webpage,
            "https://example.com",
            "",
            &["gl", "hl", "url"],
        ),
    ];

    assert_eq!(cases.len(), SearchKind::ALL.len());

    for (kind, query, path, fields) in cases {
        let spec = resolve(*kind, query);
        assert!(!spec.host.is_empty(), "{kind}: empty host");
        assert_eq!(spec.path, *path, "{kind}: wrong path");

        let expected_host = if *kind == SearchKind::Webpage {
            SCRAPE_HOST
        } else {
            SEARCH_HOST
        };
        assert_eq!(spec.host, expected_host, "{kind}: wrong host");

        assert_eq!(&payload_keys(*kind, query), fields, "{kind}: wrong payload fields");
    }
}

#[test]
fn reviews_identifier_field_follows_prefix() {
    assert!(payload_keys(SearchKind::Reviews, "ChIJN1t_tDeuEmsRUsoyG83frY4")
        .contains(&"placeId".to_string()));
    assert!(payload_keys(SearchKind::Reviews, "112000000000000000000")
        .contains(&"cid".to_string()));
}

#[test]
fn location_is_forwarded_verbatim_when_specific() {
    let req = SearchRequest::new(SearchKind::Search, "pizza")
        .with_locale(Locale::new("us", "en").with_location("Boston, MA"));
    let payload = build_payload(&resolve(req.kind, &req.query), &req);
    assert_eq!(payload["location"], "Boston, MA");

    let req = SearchRequest::new(SearchKind::Search, "pizza")
        .with_locale(Locale::new("us", "en").with_location("Auto"));
    let payload = build_payload(&resolve(req.kind, &req.query), &req);
    assert!(payload.get("location").is_none());
}

#[test]
fn empty_organic_section_normalizes_to_zero_rows() {
    let rows = normalize(SearchKind::Search, &json!({ "organic": [] }));
    assert!(rows.is_empty());
}

#[test]
fn places_rows_expose_lat_lon_for_mapping_consumers() {
    let raw = json!({
        "places": [
            { "title": "A", "latitude": 1.0, "longitude": 2.0 },
            { "title": "B", "latitude": 3.0, "longitude": 4.0 }
        ]
    });

    let rows = normalize(SearchKind::Places, &raw);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(row.contains_key("lat"));
        assert!(row.contains_key("lon"));
        assert!(!row.contains_key("latitude"));
        assert!(!row.contains_key("longitude"));
    }
}

#[test]
fn scraped_page_normalizes_to_a_single_content_row() {
    let raw = json!({ "text": "body text", "html": "<body>body text</body>" });
    let rows = normalize(SearchKind::Webpage, &raw);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["text"], "body text");
}
