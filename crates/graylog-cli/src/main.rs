mod cli;
mod commands;
mod observability;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format.unwrap_or_default();
    let client = settings::make_client(&cli)?;

    match &cli.command {
        Commands::Get(args) => {
            commands::resources::get(&client, args.kind.into(), &args.id, format).await?;
        }
        Commands::List(args) => {
            commands::resources::list(&client, args.kind.into(), format).await?;
        }
        Commands::Search(args) => {
            commands::resources::search(&client, args.kind.into(), &args.title, format).await?;
        }
        Commands::Lookup(args) => {
            commands::lookup::resolve(&client, args, format).await?;
        }
        Commands::Create(args) => {
            commands::reconcile::create(&client, args.kind.into(), &args.file, format).await?;
        }
        Commands::Read(args) => {
            commands::reconcile::read(&client, args.kind.into(), &args.file, format).await?;
        }
        Commands::Update(args) => {
            commands::reconcile::update(&client, args.kind.into(), &args.id, &args.file, format)
                .await?;
        }
        Commands::Delete(args) => {
            commands::reconcile::delete(&client, args.kind.into(), &args.id).await?;
        }
        Commands::Import(args) => {
            commands::reconcile::import(&client, args.kind.into(), &args.id, format).await?;
        }
    }

    Ok(())
}
