/// Runtime configuration for both extension contexts
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::Result;

/// What "Clear data" removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClearScope {
    /// Only the synced settings partition; captured pages survive
    #[default]
    SettingsOnly,
    SettingsAndCaptures,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionConfig {
    pub capture_limit: usize,
    pub capture_text_limit: usize,
    pub note_debounce_ms: u32,
    pub badge_color: String,
    pub help_url: String,
    pub restricted_prefixes: Vec<String>,
    pub clear_scope: ClearScope,
    /// Write the default settings back after an explicit clear
    pub reseed_after_clear: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            capture_limit: 50,
            capture_text_limit: 1000,
            note_debounce_ms: 1000,
            badge_color: "#667eea".to_string(),
            help_url: "https://example.com/help".to_string(),
            restricted_prefixes: vec![
                "chrome://".to_string(),
                "chrome-extension://".to_string(),
                "edge://".to_string(),
                "about:".to_string(),
            ],
            clear_scope: ClearScope::SettingsOnly,
            reseed_after_clear: false,
        }
    }
}

impl ExtensionConfig {
    /// Build from an optional JS object passed by the boot script
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_null() || value.is_undefined() {
            return Ok(Self::default());
        }
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    pub fn is_restricted(&self, url: &str) -> bool {
        self.restricted_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtensionConfig::default();
        assert_eq!(config.capture_limit, 50);
        assert_eq!(config.capture_text_limit, 1000);
        assert_eq!(config.note_debounce_ms, 1000);
        assert_eq!(config.clear_scope, ClearScope::SettingsOnly);
        assert!(!config.reseed_after_clear);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExtensionConfig =
            serde_json::from_str(r#"{"clearScope": "settingsAndCaptures", "captureLimit": 10}"#).unwrap();

        assert_eq!(config.clear_scope, ClearScope::SettingsAndCaptures);
        assert_eq!(config.capture_limit, 10);
        assert_eq!(config.badge_color, "#667eea");
    }

    #[test]
    fn test_is_restricted() {
        let config = ExtensionConfig::default();
        assert!(config.is_restricted("chrome://extensions"));
        assert!(config.is_restricted("about:blank"));
        assert!(!config.is_restricted("https://example.com"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_from_js_undefined_is_default() {
        let config = ExtensionConfig::from_js(JsValue::UNDEFINED).unwrap();
        assert_eq!(config, ExtensionConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_from_js_object() {
        let object = js_sys::Object::new();
        js_sys::Reflect::set(&object, &"noteDebounceMs".into(), &JsValue::from_f64(250.0)).unwrap();

        let config = ExtensionConfig::from_js(object.into()).unwrap();

        assert_eq!(config.note_debounce_ms, 250);
        assert_eq!(config.capture_limit, 50);
    }
}
