/// Error taxonomy shared by the background worker and the popup
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Serializable so the background worker can hand failures back to the popup
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ExtensionError {
    /// A storage get/set/clear was rejected by the host
    #[error("storage unavailable: {0}")]
    StoreUnavailable(String),

    /// Capture attempted on a browser-internal page
    #[error("cannot capture browser system pages: {0}")]
    RestrictedPage(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// UI wiring referenced a DOM node that is not mounted
    #[error("missing element: #{0}")]
    ElementMissing(String),

    #[error("no active tab")]
    NoActiveTab,

    /// Tabs, scripting, badge or messaging call rejected
    #[error("browser API error: {0}")]
    Host(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ExtensionError {
    fn from(e: serde_json::Error) -> Self {
        ExtensionError::Serialization(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for ExtensionError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        ExtensionError::Serialization(e.to_string())
    }
}
