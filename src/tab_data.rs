/// Data structures exchanged with the tabs API and the injected capture script
use serde::{Deserialize, Serialize};

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: i32,
    /// Missing for tabs the extension has no host permission on
    #[serde(default)]
    pub url: Option<String>,
}

impl TabInfo {
    pub fn new(id: i32, url: &str) -> TabInfo {
        TabInfo {
            id,
            url: Some(url.to_string()),
        }
    }
}

/// What the injected script extracts from a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_info_from_host_json() {
        let tab: TabInfo =
            serde_json::from_str(r#"{"id": 7, "url": "https://google.com", "title": "Google", "active": true}"#).unwrap();

        assert_eq!(tab.id, 7);
        assert_eq!(tab.url.as_deref(), Some("https://google.com"));
    }

    #[test]
    fn test_tab_info_without_url() {
        let tab: TabInfo = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(tab.url, None);
    }

    #[test]
    fn test_page_content_text_optional() {
        let page: PageContent =
            serde_json::from_str(r#"{"url": "https://a.com", "title": "A"}"#).unwrap();
        assert_eq!(page.text, "");
    }
}
