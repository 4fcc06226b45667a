//! Schema validation
//!
//! Checks a configuration document against a [`ResourceDef`], applies field
//! defaults and normalises set-typed values (sorted, de-duplicated).

use super::registry::{FieldDef, FieldType, ResourceDef};
use crate::nsxt::model::Tag;
use anyhow::Result;
use serde_json::{Map, Value};

/// What a document is being validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// User configuration before create: computed-only fields are rejected
    Plan,
    /// Stored state going into update: computed fields allowed, required enforced
    Apply,
    /// Stored state going into read or delete: only types are checked
    Refresh,
}

/// Sort and de-duplicate a set of strings
pub fn normalize_string_set(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.dedup();
    values
}

/// Sort and de-duplicate a set of tags
pub fn normalize_tags(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort();
    tags.dedup();
    tags
}

/// String form of a scalar, numbers included
fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn check_value(name: &str, field: &FieldDef, value: &Value) -> std::result::Result<Value, String> {
    let mismatch = || format!("{}: expected {}", name, field.field_type.name());

    let normalized = match field.field_type {
        FieldType::String => Value::String(as_string(value).ok_or_else(mismatch)?),
        FieldType::Bool => Value::Bool(value.as_bool().ok_or_else(mismatch)?),
        FieldType::Int => Value::from(value.as_i64().ok_or_else(mismatch)?),
        FieldType::StringSet => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let strings = items
                .iter()
                .map(as_string)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(mismatch)?;
            Value::from(normalize_string_set(strings))
        }
        FieldType::TagSet => {
            let tags: Vec<Tag> = serde_json::from_value(value.clone()).map_err(|_| mismatch())?;
            serde_json::to_value(normalize_tags(tags)).map_err(|e| format!("{}: {}", name, e))?
        }
    };

    if !field.allowed_values.is_empty() {
        if let Some(s) = normalized.as_str() {
            if !field.allowed_values.iter().any(|allowed| allowed == s) {
                return Err(format!(
                    "{}: expected one of [{}], got \"{}\"",
                    name,
                    field.allowed_values.join(", "),
                    s
                ));
            }
        }
    }

    Ok(normalized)
}

/// Validate a document and return its normalised field values
///
/// The `id` key is accepted and left out of the result. Null values count as
/// unset. Numbers are accepted for string fields. All problems are reported
/// together, once per field.
pub fn validate(def: &ResourceDef, document: &Value, mode: Mode) -> Result<Map<String, Value>> {
    let Some(object) = document.as_object() else {
        anyhow::bail!("Configuration for {} must be an object", def.key);
    };

    let mut errors = Vec::new();
    let mut values = Map::new();
    let mut rejected = Vec::new();

    for (name, value) in object {
        if name == "id" || value.is_null() {
            continue;
        }
        let Some(field) = def.field(name) else {
            errors.push(format!("{}: unknown field", name));
            continue;
        };
        if mode == Mode::Plan && field.is_computed_only() {
            errors.push(format!("{}: computed field cannot be set", name));
            continue;
        }
        match check_value(name, field, value) {
            Ok(normalized) => {
                values.insert(name.clone(), normalized);
            }
            Err(e) => {
                errors.push(e);
                rejected.push(name.as_str());
            }
        }
    }

    if mode != Mode::Refresh {
        for (name, field) in &def.fields {
            if values.contains_key(name) || rejected.contains(&name.as_str()) {
                continue;
            }
            if field.required {
                errors.push(format!("{}: required field is missing", name));
            } else if let Some(default) = &field.default {
                values.insert(name.clone(), default.clone());
            }
        }
    }

    if !errors.is_empty() {
        anyhow::bail!("Invalid configuration for {}: {}", def.key, errors.join("; "));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::get_resource;
    use serde_json::json;

    fn lb() -> &'static ResourceDef {
        get_resource("nsxt_lb_service").unwrap()
    }

    fn alg() -> &'static ResourceDef {
        get_resource("nsxt_alg_type_ns_service").unwrap()
    }

    #[test]
    fn test_defaults_are_applied() {
        let values = validate(
            lb(),
            &json!({"size": "SMALL", "logical_router_id": "t1"}),
            Mode::Plan,
        )
        .unwrap();
        assert_eq!(values["enabled"], true);
        assert_eq!(values["error_log_level"], "INFO");
        assert!(values.get("description").is_none());
    }

    #[test]
    fn test_explicit_values_beat_defaults() {
        let values = validate(
            lb(),
            &json!({
                "size": "LARGE",
                "logical_router_id": "t1",
                "enabled": false,
                "error_log_level": "DEBUG"
            }),
            Mode::Plan,
        )
        .unwrap();
        assert_eq!(values["enabled"], false);
        assert_eq!(values["error_log_level"], "DEBUG");
    }

    #[test]
    fn test_allowed_values_are_enforced() {
        let err = validate(
            lb(),
            &json!({"size": "HUGE", "logical_router_id": "t1"}),
            Mode::Plan,
        )
        .unwrap_err();
        assert!(err.to_string().contains("size: expected one of [SMALL, MEDIUM, LARGE]"));

        let err = validate(
            alg(),
            &json!({"alg": "HTTP", "destination_ports": "80"}),
            Mode::Plan,
        )
        .unwrap_err();
        assert!(err.to_string().contains("alg: expected one of"));
    }

    #[test]
    fn test_reports_every_problem() {
        let err = validate(
            alg(),
            &json!({"bogus": 1, "source_ports": "21", "default_service": true}),
            Mode::Plan,
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("bogus: unknown field"));
        assert!(err.contains("source_ports: expected set of strings"));
        assert!(err.contains("default_service: computed field cannot be set"));
        assert!(err.contains("alg: required field is missing"));
        assert!(err.contains("destination_ports: required field is missing"));
    }

    #[test]
    fn test_apply_accepts_computed_fields() {
        let state = json!({
            "id": "svc-1",
            "revision": 2,
            "system_owned": false,
            "default_service": false,
            "alg": "FTP",
            "destination_ports": "21"
        });
        assert!(validate(alg(), &state, Mode::Plan).is_err());
        let values = validate(alg(), &state, Mode::Apply).unwrap();
        assert_eq!(values["revision"], 2);
        assert!(values.get("id").is_none());
    }

    #[test]
    fn test_refresh_skips_required_and_defaults() {
        let values = validate(lb(), &json!({"id": "lb-1"}), Mode::Refresh).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_sets_are_normalized() {
        let values = validate(
            alg(),
            &json!({
                "alg": "FTP",
                "destination_ports": "21",
                "source_ports": ["2000", "1000-1100", "2000"],
                "tag": [
                    {"scope": "team", "tag": "net"},
                    {"scope": "env", "tag": "prod"},
                    {"scope": "team", "tag": "net"}
                ]
            }),
            Mode::Plan,
        )
        .unwrap();
        assert_eq!(values["source_ports"], json!(["1000-1100", "2000"]));
        assert_eq!(
            values["tag"],
            json!([{"scope": "env", "tag": "prod"}, {"scope": "team", "tag": "net"}])
        );
    }

    #[test]
    fn test_numbers_accepted_for_string_fields() {
        let document = crate::document::parse_document(
            "alg: FTP\ndestination_ports: 21\nsource_ports: [2000, \"1000-1100\"]\n",
            true,
        )
        .unwrap();
        let values = validate(alg(), &document, Mode::Plan).unwrap();
        assert_eq!(values["destination_ports"], "21");
        assert_eq!(values["source_ports"], json!(["1000-1100", "2000"]));
    }

    #[test]
    fn test_wrong_type_is_reported_once() {
        let err = validate(
            alg(),
            &json!({"alg": "FTP", "destination_ports": true}),
            Mode::Plan,
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("destination_ports: expected string"));
        assert!(!err.contains("destination_ports: required field is missing"));

        let err = validate(
            lb(),
            &json!({"size": "SMALL", "logical_router_id": "t1", "enabled": "yes"}),
            Mode::Plan,
        )
        .unwrap_err()
        .to_string();
        assert_eq!(
            err,
            "Invalid configuration for nsxt_lb_service: enabled: expected bool"
        );
    }

    #[test]
    fn test_null_counts_as_unset() {
        let values = validate(
            lb(),
            &json!({"size": "SMALL", "logical_router_id": "t1", "description": null}),
            Mode::Plan,
        )
        .unwrap();
        assert!(values.get("description").is_none());
    }

    #[test]
    fn test_document_must_be_object() {
        assert!(validate(lb(), &json!(["size"]), Mode::Plan).is_err());
    }
}
