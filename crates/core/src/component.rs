//! Component records and the listing page wire format

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One remote component as exposed by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub id: String,
    pub file_size: u64,
    pub path: String,
}

impl Component {
    /// Create a new component record
    pub fn new(id: impl Into<String>, file_size: u64, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_size,
            path: path.into(),
        }
    }
}

/// One parsed listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Component>,
    /// `None` marks the last page
    pub next_token: Option<String>,
}

impl Page {
    /// Parse a listing response body fetched from `url`.
    ///
    /// Only the first asset of each item is read. Any missing or empty
    /// required field fails the whole page.
    pub fn from_json(url: &str, body: &str) -> Result<Self> {
        let wire: ComponentPage =
            serde_json::from_str(body).map_err(|e| Error::fetch(url, format!("Invalid JSON: {}", e)))?;

        let records = wire
            .items
            .into_iter()
            .map(|item| item.into_component().map_err(|reason| Error::fetch(url, reason)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            records,
            next_token: wire.continuation_token,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentPage {
    items: Vec<ComponentItem>,
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComponentItem {
    id: String,
    assets: Vec<ComponentAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentAsset {
    file_size: u64,
    path: String,
}

impl ComponentItem {
    fn into_component(self) -> std::result::Result<Component, String> {
        if self.id.is_empty() {
            return Err("component with empty id".to_string());
        }

        let asset = self
            .assets
            .into_iter()
            .next()
            .ok_or_else(|| format!("component {} has no assets", self.id))?;

        if asset.path.is_empty() {
            return Err(format!("component {} has an empty asset path", self.id));
        }

        Ok(Component {
            id: self.id,
            file_size: asset.file_size,
            path: asset.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://nexus/service/rest/v1/components?repository=r&continuationToken=";

    #[test]
    fn test_parse_page_with_token() {
        let body = r#"{
            "items": [
                {"id": "a", "repository": "r", "assets": [{"fileSize": 10, "path": "x/1", "checksum": {}}]},
                {"id": "b", "assets": [{"fileSize": 20, "path": "y/2"}]}
            ],
            "continuationToken": "tok1"
        }"#;

        let page = Page::from_json(URL, body).unwrap();

        assert_eq!(
            page.records,
            vec![Component::new("a", 10, "x/1"), Component::new("b", 20, "y/2")]
        );
        assert_eq!(page.next_token.as_deref(), Some("tok1"));
    }

    #[test]
    fn test_null_or_missing_token_is_last_page() {
        let null = Page::from_json(URL, r#"{"items": [], "continuationToken": null}"#).unwrap();
        assert!(null.next_token.is_none());

        let missing = Page::from_json(URL, r#"{"items": []}"#).unwrap();
        assert!(missing.next_token.is_none());
        assert!(missing.records.is_empty());
    }

    #[test]
    fn test_only_first_asset_is_used() {
        let body = r#"{"items": [{"id": "a", "assets": [
            {"fileSize": 5, "path": "a.jar"},
            {"fileSize": 1, "path": "a.pom"}
        ]}]}"#;

        let page = Page::from_json(URL, body).unwrap();
        assert_eq!(page.records, vec![Component::new("a", 5, "a.jar")]);
    }

    #[test]
    fn test_item_without_assets_fails_page() {
        let body = r#"{"items": [{"id": "a", "assets": []}]}"#;
        let err = Page::from_json(URL, body).unwrap_err();

        match err {
            Error::Fetch { url, reason } => {
                assert_eq!(url, URL);
                assert!(reason.contains("no assets"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_size_fails_page() {
        let body = r#"{"items": [{"id": "a", "assets": [{"fileSize": -1, "path": "p"}]}]}"#;
        assert!(matches!(Page::from_json(URL, body), Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_missing_field_fails_page() {
        let body = r#"{"items": [{"id": "a", "assets": [{"path": "p"}]}]}"#;
        assert!(matches!(Page::from_json(URL, body), Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_empty_id_fails_page() {
        let body = r#"{"items": [{"id": "", "assets": [{"fileSize": 1, "path": "p"}]}]}"#;
        assert!(matches!(Page::from_json(URL, body), Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_malformed_json_fails_page() {
        assert!(matches!(Page::from_json(URL, "<html>"), Err(Error::Fetch { .. })));
    }
}
