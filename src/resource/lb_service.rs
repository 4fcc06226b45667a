//! Load balancer service handlers
//!
//! `nsxt_lb_service` - a load balancer instance attached to a Tier1 logical
//! router.

use super::data::ResourceData;
use crate::nsxt::client::NsxClient;
use crate::nsxt::model::{LbService, ResourceReference};
use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const RESOURCE_TYPE: &str = "nsxt_lb_service";

/// Only attachment type a load balancer service supports
const ATTACHMENT_TYPE: &str = "LogicalRouter";

fn build_lb_service(d: &ResourceData, revision: i64) -> LbService {
    // TODO: NSX rejects the service when the Tier1 router has no Tier0 uplink
    // or service port; the router id alone does not express that dependency.
    LbService {
        id: String::new(),
        revision,
        description: d.get_str("description"),
        display_name: d.get_str("display_name"),
        tags: d.get_tags(),
        attachment: Some(ResourceReference::new(
            ATTACHMENT_TYPE,
            &d.get_str("logical_router_id"),
        )),
        enabled: d.get_bool("enabled"),
        error_log_level: d.get_str("error_log_level"),
        size: d.get_str("size"),
        virtual_server_ids: d.get_string_set("virtual_server_ids"),
    }
}

pub async fn create(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let lb_service = build_lb_service(d, 0);
    let body = serde_json::to_value(&lb_service)?;

    let response = client
        .post(&client.lb_services_url(), &body)
        .await
        .with_context(|| format!("Error during {} create", entity))?;

    if response.status != StatusCode::CREATED && response.status != StatusCode::OK {
        return Err(anyhow::anyhow!(
            "Unexpected status returned during {} create: {}",
            entity,
            response.describe()
        ));
    }

    let created: LbService = response.json()?;
    tracing::info!("Created {} {}", entity, created.id);
    d.set_id(&created.id);

    read(client, d).await
}

pub async fn read(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let id = d.require_id("logical object")?;

    let response = client
        .get(&client.lb_service_url(&id))
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

    let lb_service: LbService = response.json()?;

    d.set("revision", lb_service.revision);
    d.set("description", lb_service.description);
    d.set("display_name", lb_service.display_name);
    d.set_tags(lb_service.tags);
    if let Some(attachment) = lb_service.attachment {
        if attachment.target_type != ATTACHMENT_TYPE {
            return Err(anyhow::anyhow!(
                "Error during {} attachment read: attachment type {} is not supported",
                entity,
                attachment.target_type
            ));
        }
        d.set("logical_router_id", attachment.target_id);
    }
    d.set("enabled", lb_service.enabled);
    d.set("error_log_level", lb_service.error_log_level);
    d.set("size", lb_service.size);
    d.set_string_set("virtual_server_ids", lb_service.virtual_server_ids);
    tracing::info!("Read {} {}", entity, id);

    Ok(())
}

pub async fn update(client: &NsxClient, d: &mut ResourceData) -> Result<()> {
    let entity = d.api_entity();
    let id = d.require_id("logical object")?;
    let lb_service = build_lb_service(d, d.get_i64("revision"));
    let body = serde_json::to_value(&lb_service)?;

    let response = client
        .put(&client.lb_service_url(&id), &body)
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
    let id = d.require_id("logical object")?;

    let response = client
        .delete(&client.lb_service_url(&id))
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
