//! The bangumi-data entry model and loading of the dataset file.
//!
//! onair only understands the `sites` list of an entry. Every other field
//! (titles, air dates, broadcast rules, ...) is carried through verbatim so a
//! resolved entry is served back exactly as the dataset describes it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// One entry of the dataset.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub sites: Vec<Site>,
}

/// A cross-reference from an entry to another cataloging site.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Site {
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// The first site reference named `site`, if any.
    pub fn site(&self, site: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.site == site)
    }
}

/// The published distribution: `{"siteMeta": .., "items": [..]}`.
#[derive(Deserialize)]
struct Distribution {
    items: Vec<Item>,
}

/// Parses a dataset from raw JSON bytes.
///
/// Accepts both the published distribution and a bare array of items. The
/// shape is picked from the first token so that errors keep their position.
pub fn parse(bytes: &[u8]) -> Result<Vec<Item>, serde_json::Error> {
    let first = bytes.iter().copied().find(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    match first {
        Some(b'[') => serde_json::from_slice(bytes),
        _ => serde_json::from_slice::<Distribution>(bytes).map(|d| d.items),
    }
}

/// Reads and parses the dataset file at `path`.
pub async fn load(path: impl AsRef<Path>) -> Result<Vec<Item>, Error> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::ReadDataset {
        path: path.to_owned(),
        source,
    })?;
    parse(&bytes).map_err(|source| Error::ParseDataset {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    #[test]
    fn parses_distribution_and_bare_array() {
        let item = json!({
            "title": "Cowboy Bebop",
            "sites": [{ "site": "bangumi", "id": "253" }],
        });
        let wrapped = json!({ "siteMeta": {}, "items": [item.clone()] });
        let bare = json!([item]);

        let a = parse(wrapped.to_string().as_bytes()).unwrap();
        let b = parse(bare.to_string().as_bytes()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].site("bangumi").unwrap().id.as_deref(), Some("253"));
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "title": "Planetes",
            "titleTranslate": { "en": ["Planetes"] },
            "type": "tv",
            "sites": [{ "site": "bilibili", "id": "1", "begin": "2003-10-04" }],
        });
        let item: Item = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn missing_sites_is_an_empty_list() {
        let item: Item = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(item.sites.is_empty());
        assert!(item.site("bangumi").is_none());
    }

    #[test]
    fn errors_point_at_the_bad_entry() {
        let wrapped = "{\n  \"siteMeta\": {},\n  \"items\": [\n    { \"title\": \"x\", \"sites\": 7 }\n  ]\n}";
        let err = parse(wrapped.as_bytes()).unwrap_err();
        assert_eq!(err.line(), 4, "{err}");
        assert!(err.column() > 0, "{err}");
        assert!(!err.to_string().contains("untagged"), "{err}");

        let bare = "\n\n  [{ \"title\": \"x\", \"sites\": 7 }]";
        let err = parse(bare.as_bytes()).unwrap_err();
        assert_eq!(err.line(), 3, "{err}");
        assert!(err.to_string().contains("sequence"), "{err}");
    }

    #[tokio::test]
    async fn load_reports_the_failing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::ParseDataset { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));

        let err = load(file.path().with_extension("missing")).await.unwrap_err();
        assert!(matches!(err, Error::ReadDataset { .. }));
    }
}
