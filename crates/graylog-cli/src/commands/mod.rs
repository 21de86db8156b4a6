use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Run `$body` with `$rc` bound to the reconciler for `$kind`.
macro_rules! with_reconciler {
    ($kind:expr, $client:expr, |$rc:ident| $body:expr) => {
        match $kind {
            graylog_client::ResourceKind::EventDefinition => {
                let $rc = graylog_reconcile::EventDefinitionReconciler::new($client);
                $body
            }
            graylog_client::ResourceKind::EventNotification => {
                let $rc = graylog_reconcile::EventNotificationReconciler::new($client);
                $body
            }
            graylog_client::ResourceKind::IndexSet => {
                let $rc = graylog_reconcile::IndexSetReconciler::new($client);
                $body
            }
            graylog_client::ResourceKind::Input => {
                let $rc = graylog_reconcile::InputReconciler::new($client);
                $body
            }
        }
    };
}

/// Run `$body` with `$rc` bound to the resource client for `$kind`.
macro_rules! with_resource_client {
    ($kind:expr, $client:expr, |$rc:ident| $body:expr) => {
        match $kind {
            graylog_client::ResourceKind::EventDefinition => {
                let $rc = $client.event_definitions();
                $body
            }
            graylog_client::ResourceKind::EventNotification => {
                let $rc = $client.event_notifications();
                $body
            }
            graylog_client::ResourceKind::IndexSet => {
                let $rc = $client.index_sets();
                $body
            }
            graylog_client::ResourceKind::Input => {
                let $rc = $client.inputs();
                $body
            }
        }
    };
}

pub(crate) use with_reconciler;
pub(crate) use with_resource_client;

pub mod lookup;
pub mod reconcile;
pub mod resources;

/// Read a JSON document from `file`, or from stdin when no file is given.
pub fn read_json<T: DeserializeOwned>(file: &Option<PathBuf>) -> Result<T> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use graylog_reconcile::InputSpec;
    use std::io::Write;

    #[test]
    fn test_read_json_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"title": "syslog-in", "type": "SyslogUDPInput", "configuration": {{"port": "514"}}}}"#
        )
        .unwrap();
        let spec: InputSpec = read_json(&Some(file.path().to_path_buf())).unwrap();
        assert_eq!(spec.title, "syslog-in");
        assert_eq!(spec.configuration["port"], "514");
    }

    #[test]
    fn test_read_json_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_json::<InputSpec>(&Some(path)).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read file"));
    }

    #[test]
    fn test_read_json_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_json::<InputSpec>(&Some(file.path().to_path_buf())).unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON");
    }
}
