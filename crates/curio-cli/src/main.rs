//! Curio CLI: migration administration against a running server and local
//! IPFS gateway preferences.
//!
//! Set CURIO_API_URL (or API_URL) and optionally CURIO_API_KEY.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use curio_api_client::ApiClient;
use curio_cli::{gateway_rows, gateways_file_path, init_tracing, open_gateway_manager, resolve_ipfs};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "curio", about = "Curio archive storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show migration progress
    Status,
    /// Migrate legacy file references into external objects
    Migrate {
        /// Base URL of the asset host (defaults to the server's ASSET_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,
        /// Rows per batch
        #[arg(long)]
        batch_size: Option<u32>,
    },
    /// Strip the base URL from file identifiers stored as full URLs
    Repair {
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Check migration completeness and referential integrity
    Validate,
    /// Manage your IPFS gateway preferences
    Gateways {
        #[command(subcommand)]
        sub: GatewayCommands,
    },
}

#[derive(Subcommand)]
enum GatewayCommands {
    /// Show the effective gateway list in resolution order
    List,
    /// Add a custom gateway
    Add { url: String },
    /// Remove a custom gateway
    Remove {
        url: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Remove all custom gateways
    Clear,
    /// Print the URL an IPFS identifier resolves to
    Resolve { file_id: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn run_gateways(client: &ApiClient, sub: GatewayCommands) -> anyhow::Result<()> {
    let manager = open_gateway_manager(gateways_file_path()?).await?;
    manager.refresh_system_defaults(client).await;

    match sub {
        GatewayCommands::List => {
            print_json(&gateway_rows(&manager).await?)?;
        }
        GatewayCommands::Add { url } => {
            let change = manager.add_gateway(&url).await;
            print_json(&change)?;
            if !change.success {
                std::process::exit(1);
            }
        }
        GatewayCommands::Remove { url, yes } => {
            if !yes && !confirm(&format!("Remove gateway {}?", url))? {
                println!("Cancelled");
                return Ok(());
            }
            if manager.remove_gateway(&url).await? {
                println!("Removed {}", url);
            } else {
                println!("{} is not one of your custom gateways", url);
            }
        }
        GatewayCommands::Clear => {
            manager.clear_user_gateways().await?;
            println!("Custom gateways cleared");
        }
        GatewayCommands::Resolve { file_id } => {
            println!("{}", resolve_ipfs(manager, &file_id).await);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env()
        .context("Failed to create API client. Set CURIO_API_URL (or API_URL)")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            print_json(&client.migration_status().await?)?;
        }
        Commands::Migrate {
            base_url,
            batch_size,
        } => {
            let result = client.run_migration(base_url, batch_size).await?;
            print_json(&result)?;
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Repair { base_url } => {
            print_json(&client.repair_file_ids(base_url).await?)?;
        }
        Commands::Validate => {
            let report = client.validate_migration().await?;
            print_json(&report)?;
            if !report.valid {
                std::process::exit(1);
            }
        }
        Commands::Gateways { sub } => run_gateways(&client, sub).await?,
    }

    Ok(())
}
