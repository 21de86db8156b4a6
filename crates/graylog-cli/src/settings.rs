use anyhow::{Context, Result};
use graylog_client::{ClientSettings, GraylogClient};

use crate::cli::Cli;

/// Settings given as flags. Each one overrides the file and the environment.
fn flag_overrides(cli: &Cli) -> ClientSettings {
    ClientSettings {
        web_endpoint_uri: cli.endpoint.clone(),
        auth_name: cli.auth_name.clone(),
        auth_password: cli.auth_password.clone(),
        x_requested_by: cli.x_requested_by.clone(),
        api_version: cli.api_version.clone(),
        timeout_secs: cli.timeout_secs,
    }
}

pub fn make_client(cli: &Cli) -> Result<GraylogClient> {
    let settings = ClientSettings::load(cli.config.as_deref())
        .context("Failed to load client settings")?
        .merge(flag_overrides(cli));
    tracing::debug!(?settings, "resolved client settings");
    let config = settings.resolve()?;
    Ok(GraylogClient::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "graylog",
            "list",
            "input",
            "--auth-name",
            "admin",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let overrides = flag_overrides(&cli);
        assert_eq!(overrides.auth_name.as_deref(), Some("admin"));
        assert_eq!(overrides.timeout_secs, Some(5));
        assert!(overrides.web_endpoint_uri.is_none());
    }
}
