use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use graylog_client::ResourceKind;

#[derive(Parser)]
#[command(name = "graylog")]
#[command(about = "Reconcile Graylog event definitions, notifications, index sets and inputs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML, JSON or YAML). GRAYLOG_* variables fill in what it leaves out
    #[arg(short, long, global = true, env = "GRAYLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Graylog web endpoint URI (e.g. https://graylog.example.com)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API user name or access token
    #[arg(long, global = true)]
    pub auth_name: Option<String>,

    /// API password, or "token" when authenticating with an access token
    #[arg(long, global = true)]
    pub auth_password: Option<String>,

    /// Value of the X-Requested-By header
    #[arg(long, global = true)]
    pub x_requested_by: Option<String>,

    /// API version label
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "GRAYLOG_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    EventDefinition,
    EventNotification,
    IndexSet,
    Input,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::EventDefinition => ResourceKind::EventDefinition,
            KindArg::EventNotification => ResourceKind::EventNotification,
            KindArg::IndexSet => ResourceKind::IndexSet,
            KindArg::Input => ResourceKind::Input,
        }
    }
}

/// Kinds that can be resolved by title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LookupKind {
    EventDefinition,
    EventNotification,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one record by id
    Get(TargetArgs),
    /// List every record of a kind
    List(KindArgs),
    /// List records whose title matches exactly
    Search(SearchArgs),
    /// Resolve one record by id or unique title
    Lookup(LookupArgs),
    /// Create a resource from a declared spec and print its state
    Create(SpecArgs),
    /// Refresh a previously printed state
    Read(SpecArgs),
    /// Replace a resource's declared fields
    Update(UpdateArgs),
    /// Delete a resource
    Delete(TargetArgs),
    /// Print the state of an existing resource, tracking no extra configuration
    Import(TargetArgs),
}

#[derive(clap::Args)]
pub struct KindArgs {
    pub kind: KindArg,
}

#[derive(clap::Args)]
pub struct TargetArgs {
    pub kind: KindArg,
    /// Record id
    pub id: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    pub kind: KindArg,
    /// Exact, case-sensitive title
    pub title: String,
}

#[derive(clap::Args)]
pub struct LookupArgs {
    pub kind: LookupKind,
    /// Record id (takes precedence over --title)
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(clap::Args)]
pub struct SpecArgs {
    pub kind: KindArg,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    pub kind: KindArg,
    /// Record id
    pub id: String,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_kebab_case() {
        let cli = Cli::try_parse_from(["graylog", "get", "event-definition", "ed1"]).unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.kind, KindArg::EventDefinition);
                assert_eq!(args.id, "ed1");
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "graylog",
            "create",
            "input",
            "--file",
            "syslog.json",
            "--endpoint",
            "http://localhost:9000",
            "--format",
            "table",
        ])
        .unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(cli.format, Some(OutputFormat::Table)));
    }

    #[test]
    fn test_lookup_rejects_other_kinds() {
        assert!(Cli::try_parse_from(["graylog", "lookup", "input", "--id", "x"]).is_err());
    }
}
