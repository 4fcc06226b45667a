//! Resource Registry - Load resource schemas from JSON
//!
//! This module loads all resource schemas from embedded JSON files and
//! provides lookup functions for the rest of the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/common.json"),
    include_str!("../resources/grouping.json"),
    include_str!("../resources/loadbalancer.json"),
];

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Int,
    /// Unordered set of strings
    StringSet,
    /// Unordered set of scope/tag pairs
    TagSet,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::StringSet => "set of strings",
            FieldType::TagSet => "set of tags",
        }
    }
}

/// Field definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    /// Filled in by the server when not set
    #[serde(default)]
    pub computed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl FieldDef {
    /// Set only by the server, never by configuration
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Resource type name, taken from the map key
    #[serde(skip_deserializing, default)]
    pub key: String,
    pub display_name: String,
    /// Entity name used in error messages
    pub api_entity: String,
    /// Supports import by id
    #[serde(default)]
    pub importable: bool,
    /// Shared fields pulled in from `common_fields`
    #[serde(default, skip_serializing)]
    pub common_fields: Vec<String>,
    pub fields: BTreeMap<String, FieldDef>,
}

impl ResourceDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceConfig {
    #[serde(default)]
    common_fields: HashMap<String, FieldDef>,
    #[serde(default)]
    resources: HashMap<String, ResourceDef>,
}

/// All registered resource schemas
#[derive(Debug)]
pub struct Registry {
    pub resources: BTreeMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut common_fields = HashMap::new();
        let mut resources = BTreeMap::new();

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            common_fields.extend(partial.common_fields);
            resources.extend(partial.resources);
        }

        for (key, resource) in resources.iter_mut() {
            resource.key = key.clone();
            for name in &resource.common_fields {
                let field = common_fields
                    .get(name)
                    .unwrap_or_else(|| panic!("Resource {} uses unknown common field {}", key, name));
                resource.fields.insert(name.clone(), field.clone());
            }
        }

        Registry { resources }
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}
