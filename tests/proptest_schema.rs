//! Property-based tests using proptest
//!
//! These tests verify schema validation and set normalisation using
//! randomized inputs.

use nsxt_provider::resource::{self, get_resource, schema, Mode};
use nsxt_provider::nsxt::model::Tag;
use proptest::prelude::*;
use serde_json::{json, Value};

const LB: &str = "nsxt_lb_service";
const ALG: &str = "nsxt_alg_type_ns_service";

/// Generate a port or port range
fn arb_port() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u16..=65535).prop_map(|p| p.to_string()),
        (1u16..=32000, 1u16..=32000).prop_map(|(a, b)| format!("{}-{}", a, a + b)),
    ]
}

/// Generate a list of tags, duplicates likely
fn arb_tags() -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(
        ("[a-c]{0,2}", "[x-z]{1,2}").prop_map(|(scope, tag)| Tag::new(&scope, &tag)),
        0..12,
    )
}

fn lb_config(size: &str, level: &str) -> Value {
    json!({"size": size, "logical_router_id": "tier1", "error_log_level": level})
}

proptest! {
    /// Size is accepted exactly when it is one of the allowed values
    #[test]
    fn size_accepted_iff_allowed(size in "[A-Z]{3,7}") {
        let allowed = ["SMALL", "MEDIUM", "LARGE"].contains(&size.as_str());
        let result = resource::load(LB, &lb_config(&size, "INFO"), Mode::Plan);
        prop_assert_eq!(result.is_ok(), allowed);
    }

    /// Every allowed log level validates and is kept verbatim
    #[test]
    fn allowed_log_levels_validate(
        level in prop_oneof!["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "ALERT", "EMERGENCY"]
    ) {
        let d = resource::load(LB, &lb_config("LARGE", &level), Mode::Plan).unwrap();
        prop_assert_eq!(d.get_str("error_log_level"), level);
    }

    /// Log levels are case sensitive
    #[test]
    fn lowercase_log_level_rejected(
        level in prop_oneof!["debug", "info", "warning", "error"]
    ) {
        prop_assert!(resource::load(LB, &lb_config("SMALL", &level), Mode::Plan).is_err());
    }

    /// Source ports are order-insensitive and de-duplicated
    #[test]
    fn source_ports_are_a_set(ports in prop::collection::vec(arb_port(), 0..20)) {
        let mut reversed = ports.clone();
        reversed.reverse();
        let mut expected = ports.clone();
        expected.sort();
        expected.dedup();

        let forward = resource::load(
            ALG,
            &json!({"alg": "FTP", "destination_ports": "21", "source_ports": ports}),
            Mode::Plan,
        ).unwrap();
        let backward = resource::load(
            ALG,
            &json!({"alg": "FTP", "destination_ports": "21", "source_ports": reversed}),
            Mode::Plan,
        ).unwrap();

        let set = forward.get_string_set("source_ports");
        prop_assert_eq!(&set, &backward.get_string_set("source_ports"));
        prop_assert_eq!(set, expected);
    }

    /// Tag normalisation is idempotent and never grows the set
    #[test]
    fn tag_normalization_is_idempotent(tags in arb_tags()) {
        let once = schema::normalize_tags(tags.clone());
        let twice = schema::normalize_tags(once.clone());
        prop_assert!(once.len() <= tags.len());
        prop_assert_eq!(once, twice);
    }

    /// Unknown field names are always rejected
    #[test]
    fn unknown_fields_rejected(name in "[a-z_]{3,12}") {
        let definition = get_resource(LB).unwrap();
        prop_assume!(definition.field(&name).is_none() && name != "id");

        let mut config = lb_config("SMALL", "INFO");
        config[name.as_str()] = json!("x");
        let err = resource::load(LB, &config, Mode::Plan).unwrap_err();
        let expected = format!("{}: unknown field", name);
        prop_assert!(err.to_string().contains(&expected));
    }

    /// Refresh mode accepts any id without other fields
    #[test]
    fn refresh_accepts_bare_id(id in "[a-f0-9-]{1,36}") {
        let d = resource::load(ALG, &json!({"id": id.clone()}), Mode::Refresh).unwrap();
        prop_assert_eq!(d.id(), id.as_str());
        prop_assert!(d.values().is_empty());
    }
}

/// Tests for computed fields across modes
mod computed_field_tests {
    use super::*;

    proptest! {
        /// Computed-only fields are refused in configuration but kept in state
        #[test]
        fn computed_only_fields_by_mode(system_owned in any::<bool>(), revision in 0i64..1000) {
            let state = json!({
                "id": "svc-1",
                "revision": revision,
                "system_owned": system_owned,
                "alg": "TFTP",
                "destination_ports": "69"
            });

            prop_assert!(resource::load(ALG, &state, Mode::Plan).is_err());

            let d = resource::load(ALG, &state, Mode::Apply).unwrap();
            prop_assert_eq!(d.get_bool("system_owned"), system_owned);
            prop_assert_eq!(d.get_i64("revision"), revision);
        }
    }
}
