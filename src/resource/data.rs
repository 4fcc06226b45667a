//! Resource records
//!
//! [`ResourceData`] is the local side of a resource: the server-assigned id
//! plus the schema-checked field values. Handlers read configuration from it
//! and copy remote state back into it.

use super::registry::ResourceDef;
use super::schema::{self, Mode};
use crate::nsxt::model::Tag;
use anyhow::Result;
use serde_json::{Map, Value};

/// Name of the tag set field
pub const TAG_FIELD: &str = "tag";

/// Local record of one resource
#[derive(Debug, Clone)]
pub struct ResourceData {
    definition: &'static ResourceDef,
    id: String,
    values: Map<String, Value>,
}

impl ResourceData {
    /// Empty record with no id
    pub fn new(definition: &'static ResourceDef) -> Self {
        Self {
            definition,
            id: String::new(),
            values: Map::new(),
        }
    }

    /// Build a record from a configuration or state document
    pub fn from_document(
        definition: &'static ResourceDef,
        document: &Value,
        mode: Mode,
    ) -> Result<Self> {
        let values = schema::validate(definition, document, mode)?;
        let id = document
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            definition,
            id,
            values,
        })
    }

    pub fn resource_type(&self) -> &'static str {
        self.definition.key.as_str()
    }

    /// Manager-side entity name, as it appears in error messages
    pub fn api_entity(&self) -> &'static str {
        self.definition.api_entity.as_str()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    /// The remote object is gone, or was never created
    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }

    /// Current id, or an error naming what was missing
    pub fn require_id(&self, what: &str) -> Result<String> {
        if self.id.is_empty() {
            anyhow::bail!("Error obtaining {} id", what);
        }
        Ok(self.id.clone())
    }

    /// Field values without the id
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> String {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.values.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
    }

    pub fn get_string_set(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_tags(&self) -> Vec<Tag> {
        self.values
            .get(TAG_FIELD)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Store a field value
    /// Keys outside the schema are dropped with a warning
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        if self.definition.field(key).is_none() {
            tracing::warn!("{}: ignoring unknown field {}", self.definition.key, key);
            return;
        }
        self.values.insert(key.to_string(), value.into());
    }

    pub fn set_string_set(&mut self, key: &str, values: Vec<String>) {
        self.set(key, schema::normalize_string_set(values));
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        let tags = schema::normalize_tags(tags);
        let value = tags
            .into_iter()
            .map(|t| serde_json::json!({"scope": t.scope, "tag": t.tag}))
            .collect::<Vec<_>>();
        self.set(TAG_FIELD, value);
    }

    /// State document: `null` when absent, otherwise id plus every field
    pub fn to_state(&self) -> Value {
        if self.is_absent() {
            return Value::Null;
        }
        let mut state = Map::new();
        state.insert("id".to_string(), Value::String(self.id.clone()));
        state.extend(self.values.clone());
        Value::Object(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::get_resource;
    use serde_json::json;

    fn lb_data() -> ResourceData {
        ResourceData::from_document(
            get_resource("nsxt_lb_service").unwrap(),
            &json!({
                "size": "SMALL",
                "logical_router_id": "t1",
                "virtual_server_ids": ["vs-2", "vs-1"],
                "tag": [{"scope": "env", "tag": "dev"}]
            }),
            Mode::Plan,
        )
        .unwrap()
    }

    #[test]
    fn test_typed_getters() {
        let data = lb_data();
        assert_eq!(data.resource_type(), "nsxt_lb_service");
        assert_eq!(data.api_entity(), "LbService");
        assert_eq!(data.get_str("size"), "SMALL");
        assert!(data.get_bool("enabled"));
        assert_eq!(data.get_i64("revision"), 0);
        assert_eq!(data.get_string_set("virtual_server_ids"), vec!["vs-1", "vs-2"]);
        assert_eq!(data.get_tags(), vec![Tag::new("env", "dev")]);
        assert_eq!(data.get_str("description"), "");
    }

    #[test]
    fn test_require_id() {
        let mut data = lb_data();
        let err = data.require_id("logical object").unwrap_err();
        assert_eq!(err.to_string(), "Error obtaining logical object id");

        data.set_id("lb-1");
        assert_eq!(data.require_id("logical object").unwrap(), "lb-1");
    }

    #[test]
    fn test_state_is_null_when_absent() {
        let mut data = lb_data();
        assert_eq!(data.to_state(), Value::Null);

        data.set_id("lb-1");
        let state = data.to_state();
        assert_eq!(state["id"], "lb-1");
        assert_eq!(state["error_log_level"], "INFO");
    }

    #[test]
    fn test_set_ignores_unknown_fields() {
        let mut data = lb_data();
        data.set("default_service", true);
        assert!(data.get("default_service").is_none());
    }

    #[test]
    fn test_setters_normalize_sets() {
        let mut data = lb_data();
        data.set_string_set("virtual_server_ids", vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(data.get_string_set("virtual_server_ids"), vec!["a", "b"]);

        data.set_tags(vec![Tag::new("z", "1"), Tag::new("a", "2")]);
        assert_eq!(data.get_tags(), vec![Tag::new("a", "2"), Tag::new("z", "1")]);
    }
}
