/// User preferences and running counters in the synced partition
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ExtensionError, Result};
use crate::host::KeyValueStore;
use crate::messages::Stats;

/// Field names as stored in the synced partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    AutoSave,
    Notifications,
    Analytics,
    QuickNote,
    PageViews,
    TimeSaved,
    AutoStart,
    ShowBadge,
    ThemeColor,
    FontSize,
    DataCollection,
    ClearOnExit,
    StorageLimit,
}

impl SettingKey {
    pub const ALL: [SettingKey; 13] = [
        SettingKey::AutoSave,
        SettingKey::Notifications,
        SettingKey::Analytics,
        SettingKey::QuickNote,
        SettingKey::PageViews,
        SettingKey::TimeSaved,
        SettingKey::AutoStart,
        SettingKey::ShowBadge,
        SettingKey::ThemeColor,
        SettingKey::FontSize,
        SettingKey::DataCollection,
        SettingKey::ClearOnExit,
        SettingKey::StorageLimit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::AutoSave => "autoSave",
            SettingKey::Notifications => "notifications",
            SettingKey::Analytics => "analytics",
            SettingKey::QuickNote => "quickNote",
            SettingKey::PageViews => "pageViews",
            SettingKey::TimeSaved => "timeSaved",
            SettingKey::AutoStart => "autoStart",
            SettingKey::ShowBadge => "showBadge",
            SettingKey::ThemeColor => "themeColor",
            SettingKey::FontSize => "fontSize",
            SettingKey::DataCollection => "dataCollection",
            SettingKey::ClearOnExit => "clearOnExit",
            SettingKey::StorageLimit => "storageLimit",
        }
    }
}

/// The full record written on a fresh install
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_save: bool,
    pub notifications: bool,
    pub analytics: bool,
    pub quick_note: String,
    pub page_views: u64,
    pub time_saved: u64,
    pub auto_start: bool,
    pub show_badge: bool,
    pub theme_color: String,
    pub font_size: String,
    pub data_collection: bool,
    pub clear_on_exit: bool,
    pub storage_limit: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_save: true,
            notifications: false,
            analytics: true,
            quick_note: String::new(),
            page_views: 0,
            time_saved: 0,
            auto_start: false,
            show_badge: true,
            theme_color: "#667eea".to_string(),
            font_size: "medium".to_string(),
            data_collection: true,
            clear_on_exit: false,
            storage_limit: 100,
        }
    }
}

/// A subset of the settings record: the result of a keyed read, or a
/// patch to merge into the store. Unset fields are neither read nor written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_save: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_saved: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_badge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_collection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_on_exit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_limit: Option<u64>,
}

impl PartialSettings {
    pub fn is_empty(&self) -> bool {
        *self == PartialSettings::default()
    }

    fn into_map(self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ExtensionError::Serialization(format!(
                "settings patch is not an object: {}",
                other
            ))),
        }
    }
}

impl From<Settings> for PartialSettings {
    fn from(s: Settings) -> Self {
        PartialSettings {
            auto_save: Some(s.auto_save),
            notifications: Some(s.notifications),
            analytics: Some(s.analytics),
            quick_note: Some(s.quick_note),
            page_views: Some(s.page_views),
            time_saved: Some(s.time_saved),
            auto_start: Some(s.auto_start),
            show_badge: Some(s.show_badge),
            theme_color: Some(s.theme_color),
            font_size: Some(s.font_size),
            data_collection: Some(s.data_collection),
            clear_on_exit: Some(s.clear_on_exit),
            storage_limit: Some(s.storage_limit),
        }
    }
}

/// Typed accessor over the synced partition
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        SettingsStore { store }
    }

    pub async fn get(&self, keys: &[SettingKey]) -> Result<PartialSettings> {
        let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        let map = self.store.get(&names).await?;
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Read a single raw value by name, as requested over `GET_DATA`
    pub async fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        let mut map = self.store.get(&[key]).await?;
        Ok(map.remove(key))
    }

    pub async fn set(&self, patch: PartialSettings) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.store.set(patch.into_map()?).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    pub async fn seed_defaults(&self) -> Result<()> {
        self.set(Settings::default().into()).await
    }

    /// Counters with unset fields read as zero
    pub async fn stats(&self) -> Result<Stats> {
        let current = self.get(&[SettingKey::PageViews, SettingKey::TimeSaved]).await?;
        Ok(Stats {
            page_views: current.page_views.unwrap_or(0),
            time_saved: current.time_saved.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn test_default_record_has_every_field() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), SettingKey::ALL.len());
        for key in SettingKey::ALL {
            assert!(object.contains_key(key.as_str()), "missing {}", key.as_str());
        }
    }

    #[test]
    fn test_partial_skips_unset_fields() {
        let patch = PartialSettings {
            page_views: Some(3),
            ..Default::default()
        };

        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"pageViews":3}"#);
    }

    #[tokio::test]
    async fn test_seed_and_get() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(store.clone());

        settings.seed_defaults().await.unwrap();
        let current = settings
            .get(&[SettingKey::AutoSave, SettingKey::ThemeColor, SettingKey::StorageLimit])
            .await
            .unwrap();

        assert_eq!(current.auto_save, Some(true));
        assert_eq!(current.theme_color.as_deref(), Some("#667eea"));
        assert_eq!(current.storage_limit, Some(100));
        assert_eq!(current.quick_note, None);
        assert_eq!(store.len(), 13);
    }

    #[tokio::test]
    async fn test_stats_default_to_zero() {
        let settings = SettingsStore::new(MemoryStore::new());

        let stats = settings.stats().await.unwrap();

        assert_eq!(stats, Stats { page_views: 0, time_saved: 0 });
    }

    #[tokio::test]
    async fn test_set_merges() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(store.clone());
        settings.seed_defaults().await.unwrap();

        settings
            .set(PartialSettings {
                quick_note: Some("remember".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let current = settings.get(&SettingKey::ALL).await.unwrap();
        assert_eq!(current.quick_note.as_deref(), Some("remember"));
        assert_eq!(current.analytics, Some(true));
    }

    #[tokio::test]
    async fn test_get_raw_missing_key() {
        let settings = SettingsStore::new(MemoryStore::new());
        assert_eq!(settings.get_raw("themeColor").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::new();
        store.fail_with("quota exceeded");
        let settings = SettingsStore::new(store);

        let err = settings.stats().await.unwrap_err();
        assert!(matches!(err, ExtensionError::StoreUnavailable(_)));
    }
}
