use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use graylog_client::{GraylogClient, ResourceKind};
use graylog_reconcile::Reconciler;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{read_json, with_reconciler};
use crate::cli::OutputFormat;
use crate::output::{print_success, print_value};

pub async fn create(
    client: &GraylogClient,
    kind: ResourceKind,
    file: &Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    with_reconciler!(kind, client, |rc| create_with(&rc, file, format).await)
}

pub async fn read(
    client: &GraylogClient,
    kind: ResourceKind,
    file: &Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    with_reconciler!(kind, client, |rc| read_with(&rc, file, format).await)
}

pub async fn update(
    client: &GraylogClient,
    kind: ResourceKind,
    id: &str,
    file: &Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    with_reconciler!(kind, client, |rc| update_with(&rc, id, file, format).await)
}

pub async fn delete(client: &GraylogClient, kind: ResourceKind, id: &str) -> Result<()> {
    with_reconciler!(kind, client, |rc| rc.delete(id).await)?;
    print_success(&format!("Deleted {} {}", kind.label().cyan(), id.cyan()));
    Ok(())
}

pub async fn import(
    client: &GraylogClient,
    kind: ResourceKind,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    with_reconciler!(kind, client, |rc| import_with(&rc, id, format).await)
}

async fn create_with<Rc>(rc: &Rc, file: &Option<PathBuf>, format: OutputFormat) -> Result<()>
where
    Rc: Reconciler,
    Rc::Spec: DeserializeOwned,
    Rc::State: Serialize,
{
    let spec: Rc::Spec = read_json(file)?;
    let state = serde_json::to_value(rc.create(&spec).await?)?;
    print_success(&format!(
        "Created {} {}",
        rc.kind().label().cyan(),
        id_of(&state).cyan()
    ));
    print_value(&state, format)
}

async fn read_with<Rc>(rc: &Rc, file: &Option<PathBuf>, format: OutputFormat) -> Result<()>
where
    Rc: Reconciler,
    Rc::State: Serialize + DeserializeOwned,
{
    let prior: Rc::State =
        read_json(file).context("Expected a state printed by create, update or import")?;
    let state = rc.read(&prior).await?;
    print_value(&serde_json::to_value(state)?, format)
}

async fn update_with<Rc>(
    rc: &Rc,
    id: &str,
    file: &Option<PathBuf>,
    format: OutputFormat,
) -> Result<()>
where
    Rc: Reconciler,
    Rc::Spec: DeserializeOwned,
    Rc::State: Serialize,
{
    let spec: Rc::Spec = read_json(file)?;
    let state = serde_json::to_value(rc.update(id, &spec).await?)?;
    print_success(&format!("Updated {} {}", rc.kind().label().cyan(), id.cyan()));
    print_value(&state, format)
}

async fn import_with<Rc>(rc: &Rc, id: &str, format: OutputFormat) -> Result<()>
where
    Rc: Reconciler,
    Rc::State: Serialize,
{
    let state = rc.import(id).await?;
    print_value(&serde_json::to_value(state)?, format)
}

fn id_of(state: &Value) -> &str {
    state.get("id").and_then(Value::as_str).unwrap_or("?")
}
