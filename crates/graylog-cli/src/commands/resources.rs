use anyhow::Result;
use graylog_client::{GraylogClient, RemoteResource, ResourceClient, ResourceKind};
use serde_json::json;

use super::with_resource_client;
use crate::cli::OutputFormat;
use crate::output::print_value;

pub async fn get(
    client: &GraylogClient,
    kind: ResourceKind,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    with_resource_client!(kind, client, |rc| get_record(&rc, id, format).await)
}

pub async fn list(client: &GraylogClient, kind: ResourceKind, format: OutputFormat) -> Result<()> {
    with_resource_client!(kind, client, |rc| list_records(&rc, format).await)
}

pub async fn search(
    client: &GraylogClient,
    kind: ResourceKind,
    title: &str,
    format: OutputFormat,
) -> Result<()> {
    with_resource_client!(kind, client, |rc| search_records(&rc, title, format).await)
}

async fn get_record<R: RemoteResource>(
    rc: &ResourceClient<R>,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    let record = rc.get(id).await?;
    print_value(&serde_json::to_value(&record)?, format)
}

async fn list_records<R: RemoteResource>(
    rc: &ResourceClient<R>,
    format: OutputFormat,
) -> Result<()> {
    let page = rc.list().await?;
    print_value(&serde_json::to_value(&page)?, format)
}

async fn search_records<R: RemoteResource>(
    rc: &ResourceClient<R>,
    title: &str,
    format: OutputFormat,
) -> Result<()> {
    let matches = rc.search(title).await?;
    let value = json!({
        "total": matches.len(),
        "items": matches,
    });
    print_value(&value, format)
}
