//! File attachment transfer.
//!
//! Attachment bytes move through signed storage URLs: a GET against the
//! source environment's download URL, then a PUT against the upload URL the
//! target environment hands back from `createAsset`. The signed URLs carry
//! their own authorization, so neither transfer sends the bearer token.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::{debug, info};

use fabops_core::error::TransportError;
use fabops_core::{EntityId, Result};

use crate::client::{GraphqlClient, transport};
use crate::queries;

const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// A source-side attachment record.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub id: EntityId,
    pub filename: String,
    pub content_type: String,
    pub download_url: String,
}

/// A freshly created target-side asset, with the signed URL to fill it.
#[derive(Clone, Debug)]
pub struct CreatedAsset {
    pub id: EntityId,
    pub upload_url: String,
}

/// Fetch one attachment's metadata and signed download URL.
pub async fn get_attachment(client: &GraphqlClient, id: &EntityId) -> Result<Attachment> {
    let data = client
        .execute(queries::GET_FILE_ATTACHMENT, json!({"id": id.to_value()}))
        .await?;
    let node = &data["fileAttachment"];
    let parse = || -> Option<Attachment> {
        Some(Attachment {
            id: serde_json::from_value(node["id"].clone()).ok()?,
            filename: node["filename"].as_str()?.to_string(),
            content_type: node["contentType"].as_str()?.to_string(),
            download_url: node["downloadUrl"].as_str()?.to_string(),
        })
    };
    parse().ok_or_else(|| super::shape_error("fileAttachment response is incomplete"))
}

/// Create an empty asset attached to an entity; the platform returns the
/// new attachment plus a signed URL to upload the bytes to.
pub async fn create_asset(
    client: &GraphqlClient,
    filename: &str,
    content_type: &str,
    entity_id: &EntityId,
) -> Result<CreatedAsset> {
    debug!(filename, %entity_id, "creating asset");
    let variables = json!({"input": {
        "filename": filename,
        "contentType": content_type,
        "entityId": entity_id.to_value(),
    }});
    let data = client.execute(queries::CREATE_ASSET, variables).await?;
    let node = &data["createAsset"];
    let parse = || -> Option<CreatedAsset> {
        Some(CreatedAsset {
            id: serde_json::from_value(node["fileAttachment"]["id"].clone()).ok()?,
            upload_url: node["uploadUrl"].as_str()?.to_string(),
        })
    };
    parse().ok_or_else(|| super::shape_error("createAsset response is incomplete"))
}

/// A file attachment created from a filename alone; the platform derives
/// the content type and reports it back for the upload.
#[derive(Clone, Debug)]
pub struct CreatedFileAttachment {
    pub id: EntityId,
    pub content_type: String,
    pub upload_url: String,
}

/// Create a file attachment on an entity by filename, letting the platform
/// pick the content type.
pub async fn create_file_attachment(
    client: &GraphqlClient,
    entity_id: &EntityId,
    filename: &str,
) -> Result<CreatedFileAttachment> {
    debug!(filename, %entity_id, "creating file attachment");
    let variables = json!({"input": {
        "entityId": entity_id.to_value(),
        "filename": filename,
    }});
    let data = client.execute(queries::CREATE_FILE_ATTACHMENT, variables).await?;
    let node = &data["createFileAttachment"];
    let parse = || -> Option<CreatedFileAttachment> {
        Some(CreatedFileAttachment {
            id: serde_json::from_value(node["fileAttachment"]["id"].clone()).ok()?,
            content_type: node["fileAttachment"]["contentType"].as_str()?.to_string(),
            upload_url: node["uploadUrl"].as_str()?.to_string(),
        })
    };
    parse().ok_or_else(|| super::shape_error("createFileAttachment response is incomplete"))
}

/// Download attachment bytes from a signed URL.
pub async fn download(client: &GraphqlClient, url: &str) -> Result<Vec<u8>> {
    let response = client
        .http()
        .get(url)
        .timeout(TRANSFER_TIMEOUT)
        .send()
        .await
        .map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            endpoint: url.to_string(),
        }
        .into());
    }
    let bytes = response.bytes().await.map_err(transport)?;
    debug!(len = bytes.len(), "downloaded attachment");
    Ok(bytes.to_vec())
}

/// Upload attachment bytes to a signed URL.
pub async fn upload(
    client: &GraphqlClient,
    url: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<()> {
    let len = bytes.len();
    let response = client
        .http()
        .put(url)
        .timeout(TRANSFER_TIMEOUT)
        .header(CONTENT_TYPE, content_type)
        .body(bytes)
        .send()
        .await
        .map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            endpoint: url.to_string(),
        }
        .into());
    }
    info!(len, "uploaded attachment");
    Ok(())
}

/// Copy one attachment from a source environment onto an entity in a
/// target environment, returning the new attachment id.
pub async fn copy_attachment(
    source: &GraphqlClient,
    target: &GraphqlClient,
    attachment_id: &EntityId,
    target_entity_id: &EntityId,
) -> Result<EntityId> {
    let attachment = get_attachment(source, attachment_id).await?;
    let bytes = download(source, &attachment.download_url).await?;
    let asset = create_asset(
        target,
        &attachment.filename,
        &attachment.content_type,
        target_entity_id,
    )
    .await?;
    upload(target, &asset.upload_url, &attachment.content_type, bytes).await?;
    info!(source_id = %attachment_id, target_id = %asset.id, "copied attachment");
    Ok(asset.id)
}
