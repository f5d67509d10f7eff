//! The configuration store: load, validate, and look up settings.

use super::env::{EnvSource, ProcessEnv};
use super::error::{ConfigurationError, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key holding the market data API key.
pub const API_KEY: &str = "API_KEY";
/// Key holding the ordered list of data provider identifiers.
pub const DATA_SOURCES: &str = "DATA_SOURCES";
/// Key holding the analysis model path.
pub const MODEL_PATH: &str = "MODEL_PATH";

/// Environment variable read into [`API_KEY`].
pub const API_KEY_ENV: &str = "FIN_API_KEY";

pub const DEFAULT_DATA_SOURCES: [&str; 2] = ["alpha_vantage", "yahoo"];
pub const DEFAULT_MODEL_PATH: &str = "models/stock_predictor.h5";

/// Keys whose absence makes a mapping invalid, in reporting order.
pub const REQUIRED_KEYS: [&str; 2] = [API_KEY, DATA_SOURCES];

/// Mask shown in place of a configured API key.
const REDACTED: &str = "***";

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Key present, value unset.
    Null,
    Text(String),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<String>> for ConfigValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

/// Raw key/value mapping checked by [`ConfigurationStore::validate`].
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// Immutable, validated configuration.
///
/// Built once at startup with [`ConfigurationStore::load`]. There is no
/// mutation API, so a store can be shared behind an `Arc` by any number of
/// readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigurationStore {
    values: ConfigMap,
}

impl ConfigurationStore {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::load_from(&ProcessEnv)
    }

    /// Load configuration from `env`.
    ///
    /// Builds exactly three entries: `API_KEY` from `FIN_API_KEY` (null when
    /// unset), and the fixed `DATA_SOURCES` and `MODEL_PATH` literals. The
    /// mapping is then validated. Any failure surfaces as
    /// [`ConfigurationError`].
    pub fn load_from<E: EnvSource + ?Sized>(env: &E) -> Result<Self, ConfigurationError> {
        let api_key = env
            .var(API_KEY_ENV)
            .map_err(|source| ConfigurationError::InvalidEnvironment {
                var: API_KEY_ENV.to_string(),
                source,
            })?;

        let mut values = ConfigMap::new();
        values.insert(API_KEY.to_string(), ConfigValue::from(api_key));
        values.insert(
            DATA_SOURCES.to_string(),
            ConfigValue::List(DEFAULT_DATA_SOURCES.iter().map(|s| s.to_string()).collect()),
        );
        values.insert(
            MODEL_PATH.to_string(),
            ConfigValue::Text(DEFAULT_MODEL_PATH.to_string()),
        );

        Self::validate(&values)?;

        let store = Self { values };
        let keys: Vec<&str> = store.keys().collect();
        tracing::debug!(
            ?keys,
            api_key_present = store.api_key().is_some(),
            "configuration loaded"
        );
        Ok(store)
    }

    /// Build a store from an explicit mapping, validating it first.
    pub fn from_values(values: ConfigMap) -> Result<Self, ConfigurationError> {
        Self::validate(&values)?;
        Ok(Self { values })
    }

    /// Check that every required key is present in `values`.
    ///
    /// A key mapped to [`ConfigValue::Null`] counts as present.
    pub fn validate(values: &ConfigMap) -> Result<(), ValidationError> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !values.contains_key(**key))
            .map(|key| key.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingKeys(missing))
        }
    }

    /// Value for `key`, or `None` if the key is absent.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// String value for `key`. `None` if absent, null, or a list.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// List value for `key`. `None` if absent or not a list.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(ConfigValue::as_list)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.get_str(API_KEY)
    }

    pub fn data_sources(&self) -> &[String] {
        self.get_list(DATA_SOURCES).unwrap_or(&[])
    }

    pub fn model_path(&self) -> Option<&str> {
        self.get_str(MODEL_PATH)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON view of the mapping with the API key masked.
    pub fn redacted(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(key, value)| {
                let shown = match (key, value) {
                    (API_KEY, ConfigValue::Text(_)) => serde_json::Value::from(REDACTED),
                    _ => serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
                };
                (key.to_string(), shown)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::ffi::OsString;

    fn env_with_key(key: &str) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(API_KEY_ENV.to_string(), key.to_string());
        env
    }

    fn full_map() -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(API_KEY.into(), ConfigValue::Text("k".into()));
        map.insert(
            DATA_SOURCES.into(),
            ConfigValue::List(vec!["alpha_vantage".into(), "yahoo".into()]),
        );
        map.insert(MODEL_PATH.into(), ConfigValue::Text(DEFAULT_MODEL_PATH.into()));
        map
    }

    struct NonUnicodeEnv;

    impl EnvSource for NonUnicodeEnv {
        fn var(&self, _key: &str) -> Result<Option<String>, VarError> {
            Err(VarError::NotUnicode(OsString::from("\u{FFFD}")))
        }
    }

    #[test]
    fn api_key_comes_from_environment() {
        let store = ConfigurationStore::load_from(&env_with_key("abc123")).unwrap();
        assert_eq!(store.get(API_KEY), Some(&ConfigValue::Text("abc123".into())));
        assert_eq!(store.api_key(), Some("abc123"));
    }

    #[test]
    fn unset_api_key_is_null_but_present() {
        let env: HashMap<String, String> = HashMap::new();
        let store = ConfigurationStore::load_from(&env).unwrap();

        assert!(store.contains_key(API_KEY));
        assert_eq!(store.get(API_KEY), Some(&ConfigValue::Null));
        assert_eq!(store.get_str(API_KEY), None);
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn empty_api_key_is_kept_as_empty_string() {
        let store = ConfigurationStore::load_from(&env_with_key("")).unwrap();
        assert_eq!(store.api_key(), Some(""));
    }

    #[test]
    fn fixed_entries_are_literal() {
        let store = ConfigurationStore::load_from(&env_with_key("k")).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(DATA_SOURCES),
            Some(&ConfigValue::List(vec!["alpha_vantage".into(), "yahoo".into()]))
        );
        assert_eq!(store.data_sources(), ["alpha_vantage", "yahoo"]);
        assert_eq!(store.get_str(MODEL_PATH), Some("models/stock_predictor.h5"));
        assert_eq!(store.model_path(), Some("models/stock_predictor.h5"));
    }

    #[test]
    fn unrelated_environment_does_not_leak_in() {
        let mut env = env_with_key("k");
        env.insert("DATA_SOURCES".into(), "csv".into());
        env.insert("MODEL_PATH".into(), "/tmp/other.h5".into());

        let store = ConfigurationStore::load_from(&env).unwrap();
        assert_eq!(store.data_sources(), ["alpha_vantage", "yahoo"]);
        assert_eq!(store.model_path(), Some(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn unknown_key_is_absent() {
        let store = ConfigurationStore::load_from(&env_with_key("k")).unwrap();
        assert_eq!(store.get("nonexistent_key"), None);
        assert_eq!(store.get_str("nonexistent_key"), None);
        assert_eq!(store.get_list("nonexistent_key"), None);
        assert!(!store.contains_key("nonexistent_key"));
    }

    #[test]
    fn typed_getters_reject_wrong_shape() {
        let store = ConfigurationStore::load_from(&env_with_key("k")).unwrap();
        assert_eq!(store.get_str(DATA_SOURCES), None);
        assert_eq!(store.get_list(MODEL_PATH), None);
    }

    #[test]
    fn non_unicode_environment_is_configuration_error() {
        let err = ConfigurationStore::load_from(&NonUnicodeEnv).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidEnvironment { .. }));
        assert!(err.to_string().starts_with("Failed to load configuration: "));
    }

    #[test]
    fn validate_accepts_complete_map() {
        assert_eq!(ConfigurationStore::validate(&full_map()), Ok(()));
    }

    #[test]
    fn validate_accepts_null_api_key() {
        let mut map = full_map();
        map.insert(API_KEY.into(), ConfigValue::Null);
        assert!(ConfigurationStore::validate(&map).is_ok());
    }

    #[test]
    fn validate_reports_missing_api_key() {
        let mut map = full_map();
        map.remove(API_KEY);

        let err = ConfigurationStore::validate(&map).unwrap_err();
        assert_eq!(err.missing_keys(), ["API_KEY"]);
        assert!(err.to_string().contains("API_KEY"));
        assert!(!err.to_string().contains("DATA_SOURCES"));
    }

    #[test]
    fn validate_reports_both_keys_in_required_order() {
        let err = ConfigurationStore::validate(&ConfigMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required keys: API_KEY, DATA_SOURCES");
    }

    #[test]
    fn validate_ignores_model_path() {
        let mut map = full_map();
        map.remove(MODEL_PATH);
        assert!(ConfigurationStore::validate(&map).is_ok());
    }

    #[test]
    fn from_values_validates() {
        assert!(ConfigurationStore::from_values(full_map()).is_ok());

        let mut map = full_map();
        map.remove(DATA_SOURCES);
        let err = ConfigurationStore::from_values(map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load configuration: Missing required keys: DATA_SOURCES"
        );
    }

    #[test]
    fn redacted_masks_api_key() {
        let store = ConfigurationStore::load_from(&env_with_key("secret")).unwrap();
        let shown = store.redacted();

        assert_eq!(shown["API_KEY"], "***");
        assert_eq!(shown["DATA_SOURCES"], serde_json::json!(["alpha_vantage", "yahoo"]));
        assert_eq!(shown["MODEL_PATH"], DEFAULT_MODEL_PATH);
        assert!(!shown.to_string().contains("secret"));
    }

    #[test]
    fn redacted_keeps_null_api_key() {
        let env: HashMap<String, String> = HashMap::new();
        let store = ConfigurationStore::load_from(&env).unwrap();
        assert!(store.redacted()["API_KEY"].is_null());
    }

    #[test]
    fn store_serializes_as_plain_mapping() {
        let store = ConfigurationStore::load_from(&env_with_key("k")).unwrap();
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["API_KEY"], "k");
        assert_eq!(json["MODEL_PATH"], DEFAULT_MODEL_PATH);
    }
}
