//! ALG-type NSService handlers
//!
//! `nsxt_alg_type_ns_service` - an NSService whose element selects an
//! application-level gateway (FTP, TFTP, RPC variants...) on a destination
//! port range.

use super::data::ResourceData;
use crate::nsxt::client::NsxClient;
use crate::nsxt::model::{AlgTypeNsService, AlgTypeNsServiceEntry};
use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const RESOURCE_TYPE: &str = "nsxt_alg_type_ns_service";

/// `resource_type` of the NSService element
const ELEMENT_TYPE: &str = "ALGTypeNSService";

fn build_ns_service(d: &ResourceData, revision: i64) -> AlgTypeNsService {
    AlgTypeNsService {
        revision,
        description: d.get_str("description"),
        display_name: d.get_str("display_name"),
        tags: d.get_tags(),
        default_service: d.get_bool("default_service"),
        nsservice_element: AlgTypeNsServiceEntry {
            resource_type: ELEMENT_TYPE.to_string(),
            alg: d.get_str("alg"),
            // single value in the schema, a list on the wire
            destination_ports: vec![d.get_str("destination_ports")],
            source_ports: d.get_string_set("source_ports"),
        },
        ..Default::default()
    }
}

pub async fn create(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let ns_service = build_ns_service(d, 0);
    let body = serde_json::to_value(&ns_service)?;

    let response = client
        .post(&client.ns_services_url(), &body)
        .await
        .with_context(|| format!("Error during {} create", entity))?;

    if response.status != StatusCode::CREATED {
        return Err(anyhow::anyhow!(
            "Unexpected status returned during {} create: {}",
            entity,
            response.describe()
        ));
    }

    let created: AlgTypeNsService = response.json()?;
    tracing::info!("Created {} {}", entity, created.id);
    d.set_id(&created.id);

    read(client, d).await
}

pub async fn read(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let id = d.require_id("ns service")?;

    let response = client
        .get(&client.ns_service_url(&id))
        .await
        .with_context(|| format!("Error during {} read", entity))?;

    if response.is_not_found() {
        tracing::warn!("{} {} not found", entity, id);
        d.set_id("");
        return Ok(());
    }
    if !response.is_success() {
        return Err(anyhow::anyhow!(
            "Error during {} read: {}",
            entity,
            response.describe()
        ));
    }

    let ns_service: AlgTypeNsService = response.json()?;
    let element = ns_service.nsservice_element;

    d.set("revision", ns_service.revision);
    d.set("system_owned", ns_service.system_owned);
    d.set("description", ns_service.description);
    d.set("display_name", ns_service.display_name);
    d.set_tags(ns_service.tags);
    d.set("default_service", ns_service.default_service);
    d.set("alg", element.alg);
    d.set(
        "destination_ports",
        element.destination_ports.into_iter().next().unwrap_or_default(),
    );
    d.set_string_set("source_ports", element.source_ports);
    tracing::info!("Read {} {}", entity, id);

    Ok(())
}

pub async fn update(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let id = d.require_id("ns service")?;
    let ns_service = build_ns_service(d, d.get_i64("revision"));
    let body = serde_json::to_value(&ns_service)?;

    let response = client
        .put(&client.ns_service_url(&id), &body)
        .await
        .with_context(|| format!("Error during {} update", entity))?;

    if !response.is_success() {
        return Err(anyhow::anyhow!(
            "Error during {} update: {}",
            entity,
            response.describe()
        ));
    }
    tracing::info!("Updated {} {}", entity, id);

    read(client, d).await
}

pub async fn delete(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let id = d.require_id("ns service")?;

    let response = client
        .delete(&client.ns_service_url(&id))
        .await
        .with_context(|| format!("Error during {} delete", entity))?;

    if response.is_not_found() {
        tracing::warn!("{} {} not found", entity, id);
        d.set_id("");
        return Ok(());
    }
    if !response.is_success() {
        return Err(anyhow::anyhow!(
            "Error during {} delete: {}",
            entity,
            response.describe()
        ));
    }
    tracing::info!("Deleted {} {}", entity, id);

    Ok(())
}
