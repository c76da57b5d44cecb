/// Envelopes carried over chrome.runtime messaging
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExtensionError, Result};
use crate::settings::PartialSettings;
use crate::tab_data::PageContent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    UpdateStats {
        #[serde(default)]
        data: StatsDelta,
    },
    /// Sent by the injected capture script
    #[serde(alias = "PAGE_CAPTURED")]
    CapturePage { data: PageContent },
    GetData { key: String },
    SaveSettings { data: PartialSettings },
    ClearData,
}

/// Response envelope sent back through `sendResponse`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reply {
    Ok(Value),
    Err(ExtensionError),
}

impl Reply {
    pub fn into_result(self) -> Result<Value> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Err(e) => Err(e),
        }
    }
}

impl From<Result<Value>> for Reply {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => Reply::Ok(value),
            Err(e) => Reply::Err(e),
        }
    }
}

/// Requested counter increments; unset means 1 view and 0 time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_saved: Option<u64>,
}

impl StatsDelta {
    pub fn new(page_views: u64, time_saved: u64) -> Self {
        StatsDelta {
            page_views: Some(page_views),
            time_saved: Some(time_saved),
        }
    }

    pub fn page_views(&self) -> u64 {
        self.page_views.unwrap_or(1)
    }

    pub fn time_saved(&self) -> u64 {
        self.time_saved.unwrap_or(0)
    }
}

/// Current counter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub page_views: u64,
    pub time_saved: u64,
}

impl Stats {
    pub fn apply(self, delta: StatsDelta) -> Stats {
        Stats {
            page_views: self.page_views.saturating_add(delta.page_views()),
            time_saved: self.time_saved.saturating_add(delta.time_saved()),
        }
    }
}
