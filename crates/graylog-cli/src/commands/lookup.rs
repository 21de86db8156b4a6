use anyhow::Result;
use graylog_client::GraylogClient;
use graylog_reconcile::lookup;

use crate::cli::{LookupArgs, LookupKind, OutputFormat};
use crate::output::print_value;

pub async fn resolve(client: &GraylogClient, args: &LookupArgs, format: OutputFormat) -> Result<()> {
    let (id, title) = (args.id.clone(), args.title.clone());
    let value = match args.kind {
        LookupKind::EventDefinition => {
            serde_json::to_value(lookup::event_definition(client, id, title).await?)?
        }
        LookupKind::EventNotification => {
            serde_json::to_value(lookup::event_notification(client, id, title).await?)?
        }
    };
    print_value(&value, format)
}
