//! Resolved provider configuration

use crate::config::ProviderSection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Provider identity plus the whitelisted parameters passed to every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            params: BTreeMap::new(),
        }
    }

    /// Resolve from the project file section; `model_override` wins over the file
    pub fn resolve(section: &ProviderSection, model_override: Option<&str>) -> Self {
        let name = if section.name.trim().is_empty() {
            crate::config::default_provider_name()
        } else {
            section.name.clone()
        };
        let model = match model_override {
            Some(model) if !model.trim().is_empty() => model.to_string(),
            _ if !section.model.trim().is_empty() => section.model.clone(),
            _ => crate::config::default_model(),
        };

        let mut params = BTreeMap::new();
        let mut insert = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        };
        insert("api_key_env", section.api_key_env.clone().map(Value::from));
        insert("base_url", section.base_url.clone().map(Value::from));
        insert("temperature", section.temperature.map(Value::from));
        insert("top_p", section.top_p.map(Value::from));
        insert("max_output_tokens", section.max_output_tokens.map(Value::from));
        insert("seed", section.seed.map(Value::from));
        insert("timeout_seconds", section.timeout_seconds.map(Value::from));
        insert("max_retries", section.max_retries.map(Value::from));
        insert("retry_backoff_ms", section.retry_backoff_ms.map(Value::from));
        insert("stub_qc_status", section.stub_qc_status.clone().map(Value::from));

        Self {
            name,
            model,
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn max_retries(&self) -> Option<u32> {
        self.param("max_retries")
            .and_then(Value::as_u64)
            .map(|retries| retries.min(u32::MAX as u64) as u32)
    }

    pub fn retry_backoff(&self) -> Option<Duration> {
        self.param("retry_backoff_ms")
            .and_then(Value::as_u64)
            .map(Duration::from_millis)
    }

    pub fn stub_qc_status(&self) -> Option<&str> {
        self.param("stub_qc_status").and_then(Value::as_str)
    }
}
