//! NSX-T API objects
//!
//! Only the fields the resource handlers read or write are modelled. Field
//! names follow the manager's JSON (snake_case, `_revision`, `_system_owned`).

use serde::{Deserialize, Serialize};

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Scope/tag pair attached to most NSX objects
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub tag: String,
}

impl Tag {
    pub fn new(scope: &str, tag: &str) -> Self {
        Self {
            scope: scope.to_string(),
            tag: tag.to_string(),
        }
    }
}

/// Typed pointer from one object to another
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceReference {
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub target_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
}

impl ResourceReference {
    pub fn new(target_type: &str, target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            target_type: target_type.to_string(),
            ..Default::default()
        }
    }
}

/// `nsservice_element` of an ALG-type NSService
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgTypeNsServiceEntry {
    pub resource_type: String,
    #[serde(default)]
    pub alg: String,
    #[serde(default)]
    pub destination_ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ports: Vec<String>,
}

/// NSService whose element is an application-level gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgTypeNsService {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "_revision", default, skip_serializing_if = "is_zero")]
    pub revision: i64,
    #[serde(rename = "_system_owned", default, skip_serializing)]
    pub system_owned: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub default_service: bool,
    pub nsservice_element: AlgTypeNsServiceEntry,
}

/// Load balancer service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbService {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "_revision", default, skip_serializing_if = "is_zero")]
    pub revision: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<ResourceReference>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_log_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_server_ids: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alg_service_wire_names() {
        let service = AlgTypeNsService {
            revision: 3,
            system_owned: true,
            display_name: "ftp".to_string(),
            nsservice_element: AlgTypeNsServiceEntry {
                resource_type: "ALGTypeNSService".to_string(),
                alg: "FTP".to_string(),
                destination_ports: vec!["21".to_string()],
                source_ports: Vec::new(),
            },
            ..Default::default()
        };

        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["_revision"], 3);
        assert_eq!(value["nsservice_element"]["resource_type"], "ALGTypeNSService");
        // server-owned and empty fields stay off the wire
        assert!(value.get("_system_owned").is_none());
        assert!(value.get("id").is_none());
        assert!(value["nsservice_element"].get("source_ports").is_none());
    }

    #[test]
    fn test_lb_service_reads_server_fields() {
        let service: LbService = serde_json::from_value(json!({
            "id": "lb-1",
            "_revision": 7,
            "display_name": "lb-1",
            "attachment": {"target_id": "t1", "target_type": "LogicalRouter", "is_valid": true},
            "error_log_level": "INFO",
            "size": "SMALL"
        }))
        .unwrap();

        assert_eq!(service.revision, 7);
        assert!(service.enabled);
        assert_eq!(service.attachment.unwrap().target_id, "t1");
        assert!(service.virtual_server_ids.is_empty());
    }

    #[test]
    fn test_lb_service_always_sends_enabled() {
        let service: LbService = serde_json::from_value(json!({"enabled": false})).unwrap();
        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["enabled"], false);
        assert!(value.get("_revision").is_none());
    }
}
