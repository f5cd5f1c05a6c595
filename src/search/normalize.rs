use super::{Row, SearchKind};
use serde_json::Value;

/// Response shape a vertical's results come back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// JSON array of result records under [`SectionSpec::key`].
    List,
    /// Scalar `text`/`html` page content; becomes a single row.
    Scalar,
}

/// Per-vertical response schema: where the results live and how fields are
/// adjusted on the way into rows.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    /// Top-level key the result list lives under. Unused for scalar shapes.
    pub key: &'static str,
    pub shape: SectionShape,
    /// Field renames applied while flattening: (provider name, canonical name).
    pub renames: &'static [(&'static str, &'static str)],
}

/// Fields excluded from rows by default. They stay available in the raw
/// payload; they only clutter the tabular view (`position` duplicates row
/// order, `snippetHighlighted` duplicates `snippet`, `sitelinks` is deeply
/// nested).
pub const DEFAULT_DROP: &[&str] = &["position", "sitelinks", "snippetHighlighted"];

/// Canonical coordinate names expected by mapping consumers.
const GEO_RENAMES: &[(&str, &str)] = &[("latitude", "lat"), ("longitude", "lon")];

/// Schema for a vertical's result section.
pub fn section_spec(kind: SearchKind) -> SectionSpec {
    let list = |key| SectionSpec {
        key,
        shape: SectionShape::List,
        renames: &[],
    };

    match kind {
        // Scholar, patents and lens share the organic section key.
        SearchKind::Search | SearchKind::Scholar | SearchKind::Patents | SearchKind::Lens => {
            list("organic")
        }
        SearchKind::News => list("news"),
        SearchKind::Images => list("images"),
        SearchKind::Videos => list("videos"),
        SearchKind::Shopping => list("shopping"),
        SearchKind::Reviews => list("reviews"),
        SearchKind::Autocomplete => list("suggestions"),
        SearchKind::Places => SectionSpec {
            key: "places",
            shape: SectionShape::List,
            renames: GEO_RENAMES,
        },
        SearchKind::Webpage => SectionSpec {
            key: "",
            shape: SectionShape::Scalar,
            renames: &[],
        },
    }
}

/// Flatten the relevant result section of a raw provider response.
///
/// A missing or non-list section is a normal zero-result outcome and maps
/// to an empty row set, never an error.
pub fn normalize(kind: SearchKind, raw: &Value) -> Vec<Row> {
    normalize_with(kind, raw, DEFAULT_DROP)
}

/// [`normalize`] with a caller-supplied drop-list.
pub fn normalize_with(kind: SearchKind, raw: &Value, drop: &[&str]) -> Vec<Row> {
    let spec = section_spec(kind);

    match spec.shape {
        SectionShape::Scalar => scrape_row(raw),
        SectionShape::List => {
            let Some(items) = raw.get(spec.key).and_then(Value::as_array) else {
                return Vec::new();
            };
            items.iter().map(|item| flatten(item, &spec, drop)).collect()
        }
    }
}

fn flatten(item: &Value, spec: &SectionSpec, drop: &[&str]) -> Row {
    let mut row = Row::new();

    match item {
        Value::Object(fields) => {
            for (name, value) in fields {
                if drop.contains(&name.as_str()) {
                    continue;
                }
                push_flat(&mut row, rename(spec, name), value);
            }
        }
        // Some sections (autocomplete on older plans) hold bare scalars.
        other => {
            row.insert("value".into(), other.clone());
        }
    }

    row
}

/// Insert `value` under `name`, expanding nested objects to dotted paths.
/// Arrays are kept as a single JSON-encoded cell.
fn push_flat(row: &mut Row, name: String, value: &Value) {
    match value {
        Value::Object(nested) => {
            for (child, value) in nested {
                push_flat(row, format!("{name}.{child}"), value);
            }
        }
        Value::Array(_) => {
            row.insert(name, Value::String(value.to_string()));
        }
        scalar => {
            row.insert(name, scalar.clone());
        }
    }
}

fn rename(spec: &SectionSpec, name: &str) -> String {
    for (from, to) in spec.renames {
        if name == *from {
            return (*to).to_string();
        }
    }
    name.to_string()
}

/// Scraped content is not list-shaped: the provider answers with scalar
/// `text` and `html` fields, which become one row.
fn scrape_row(raw: &Value) -> Vec<Row> {
    let mut row = Row::new();
    for key in ["text", "html"] {
        if let Some(content) = raw.get(key).and_then(Value::as_str) {
            row.insert(key.into(), Value::String(content.to_string()));
        }
    }

    if row.is_empty() {
        Vec::new()
    } else {
        vec![row]
    }
}
