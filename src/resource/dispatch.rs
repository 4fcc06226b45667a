//! Handler Dispatch
//!
//! Maps resource type names to their create/read/update/delete handlers.

use super::data::ResourceData;
use super::registry::get_resource;
use super::schema::Mode;
use super::{alg_type_ns_service, lb_service};
use crate::nsxt::client::NsxClient;
use anyhow::Result;
use serde_json::Value;

/// Build a record for a resource type from a document
pub fn load(resource_type: &str, document: &Value, mode: Mode) -> Result<ResourceData> {
    let Some(definition) = get_resource(resource_type) else {
        return Err(anyhow::anyhow!("Unknown resource type: {}", resource_type));
    };
    ResourceData::from_document(definition, document, mode)
}

/// Create the remote object and populate computed fields
pub async fn create(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    tracing::debug!("create: type={}", d.resource_type());

    match d.resource_type() {
        alg_type_ns_service::RESOURCE_TYPE => alg_type_ns_service::create(client, d).await,
        lb_service::RESOURCE_TYPE => lb_service::create(client, d).await,
        other => Err(anyhow::anyhow!("Unknown resource type: {}", other)),
    }
}

/// Refresh the record from the remote object; clears the id when it is gone
pub async fn read(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    tracing::debug!("read: type={}, id={}", d.resource_type(), d.id());

    match d.resource_type() {
        alg_type_ns_service::RESOURCE_TYPE => alg_type_ns_service::read(client, d).await,
        lb_service::RESOURCE_TYPE => lb_service::read(client, d).await,
        other => Err(anyhow::anyhow!("Unknown resource type: {}", other)),
    }
}

/// Push the record to the remote object, carrying the held revision
pub async fn update(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    tracing::debug!("update: type={}, id={}", d.resource_type(), d.id());

    match d.resource_type() {
        alg_type_ns_service::RESOURCE_TYPE => alg_type_ns_service::update(client, d).await,
        lb_service::RESOURCE_TYPE => lb_service::update(client, d).await,
        other => Err(anyhow::anyhow!("Unknown resource type: {}", other)),
    }
}

/// Delete the remote object; clears the id when it was already gone
pub async fn delete(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    tracing::debug!("delete: type={}, id={}", d.resource_type(), d.id());

    match d.resource_type() {
        alg_type_ns_service::RESOURCE_TYPE => alg_type_ns_service::delete(client, d).await,
        lb_service::RESOURCE_TYPE => lb_service::delete(client, d).await,
        other => Err(anyhow::anyhow!("Unknown resource type: {}", other)),
    }
}

/// Adopt an existing remote object by id
pub async fn import(client: &NsxClient, resource_type: &str, id: &str) -> Result<ResourceData> {
    let Some(definition) = get_resource(resource_type) else {
        return Err(anyhow::anyhow!("Unknown resource type: {}", resource_type));
    };
    if !definition.importable {
        anyhow::bail!("Resource {} does not support import", resource_type);
    }

    let mut d = ResourceData::new(definition);
    d.set_id(id);
    read(client, &mut d).await?;

    if d.is_absent() {
        anyhow::bail!("Cannot import non-existent remote object {}", id);
    }
    tracing::info!("Imported {} {}", resource_type, id);

    Ok(d)
}
